// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookies, Netscape cookie-jar files and the on-disk jar dump
//!
//! Loading reads the tab-separated Netscape layout; saving writes one
//! `name=value; Path=...; Domain=...` line per cookie. The two formats are
//! different on purpose and do not round-trip.

mod jar;
mod parser;

pub use jar::{save, CookieJar};
pub use parser::{parse_cookie_line, HTTP_ONLY_PREFIX};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A cookie as held by the jar
///
/// A `domain` with a leading dot also covers its subdomains; without one the
/// cookie is host-only. An empty domain applies everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub domain: String,
    pub path: String,
    pub name: String,
    /// Absent for six-field jar lines
    pub value: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    /// None for session cookies
    pub expires: Option<DateTime<Utc>>,
}

impl Cookie {
    /// Session cookie scoped to `/` with no domain
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            domain: String::new(),
            path: "/".to_string(),
            name: name.into(),
            value: Some(value.into()),
            secure: false,
            http_only: false,
            expires: None,
        }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Value or the empty string
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|exp| exp < Utc::now())
    }

    /// Scheme the jar files this cookie under
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Whether the jar should send this cookie to `url`
    pub fn matches(&self, url: &Url) -> bool {
        if self.secure && url.scheme() != "https" {
            return false;
        }
        let host = url.host_str().unwrap_or("");
        domain_match(&self.domain, host) && path_match(&self.path, url.path()) && !self.is_expired()
    }
}

/// Exact host match, or any subdomain when `domain` starts with a dot.
/// Hosts compare case-insensitively.
fn domain_match(domain: &str, host: &str) -> bool {
    if domain.is_empty() {
        return true;
    }
    let host = host.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();

    match domain.strip_prefix('.') {
        Some(bare) => host == bare || host.ends_with(&domain),
        None => host == domain,
    }
}

/// `/api` covers `/api` and `/api/...` but not `/apix`.
fn path_match(cookie_path: &str, request_path: &str) -> bool {
    match request_path.strip_prefix(cookie_path) {
        Some(rest) => rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

/// Name and value of a `Set-Cookie` header, attributes dropped
pub(crate) fn set_cookie_pair(header: &str) -> Option<(&str, &str)> {
    let first = header.split(';').next()?;
    let (name, value) = first.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim().trim_matches('"')))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_set_cookie_pair() {
        assert_eq!(
            set_cookie_pair("session=abc123; Domain=.example.com; Path=/app; Secure"),
            Some(("session", "abc123"))
        );
        assert_eq!(set_cookie_pair(r#" q = "quoted" "#), Some(("q", "quoted")));
        assert_eq!(set_cookie_pair("empty="), Some(("empty", "")));
        assert!(set_cookie_pair("novalue").is_none());
        assert!(set_cookie_pair("=orphan").is_none());
    }

    #[test]
    fn test_host_only_domain() {
        let cookie = Cookie::new("sid", "abc").domain("example.com");

        assert!(cookie.matches(&url("http://example.com/")));
        assert!(cookie.matches(&url("http://EXAMPLE.com/")));
        assert!(!cookie.matches(&url("http://api.example.com/")));
        assert!(!cookie.matches(&url("http://notexample.com/")));
    }

    #[test]
    fn test_dotted_domain_covers_subdomains() {
        let cookie = Cookie::new("sid", "abc").domain(".Example.com");

        assert!(cookie.matches(&url("http://example.com/")));
        assert!(cookie.matches(&url("http://api.example.com/")));
        assert!(cookie.matches(&url("http://a.b.EXAMPLE.COM/")));
        assert!(!cookie.matches(&url("http://notexample.com/")));
    }

    #[test]
    fn test_path_boundary() {
        let cookie = Cookie {
            path: "/api".to_string(),
            ..Cookie::new("a", "1").domain("example.com")
        };

        assert!(cookie.matches(&url("http://example.com/api")));
        assert!(cookie.matches(&url("http://example.com/api/v1")));
        assert!(!cookie.matches(&url("http://example.com/apix")));
        assert!(!cookie.matches(&url("http://example.com/other")));

        assert!(path_match("/", "/anything"));
        assert!(path_match("/api/", "/api/v1"));
        assert!(!path_match("/api/", "/api"));
    }

    #[test]
    fn test_secure_needs_https() {
        let secure = Cookie::new("s", "1").domain("example.com").secure(true);
        assert!(!secure.matches(&url("http://example.com/")));
        assert!(secure.matches(&url("https://example.com/")));
    }

    #[test]
    fn test_expired_cookie_does_not_match() {
        let past = Utc::now() - chrono::Duration::hours(1);
        let cookie = Cookie::new("old", "1").domain("example.com").expires(past);

        assert!(cookie.is_expired());
        assert!(!cookie.matches(&url("http://example.com/")));
    }
}
