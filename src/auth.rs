// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Authentication header computation
//!
//! Basic and Digest (RFC 2617, MD5) are computed for real. NTLM and
//! Negotiate only announce the scheme; no handshake is performed.
//!
//! Digest needs a server challenge. Until one is supplied through
//! [`Authenticator::set_challenge`], only a partial `Digest username="..."`
//! header is emitted.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use base64::Engine;
use md5::{Digest, Md5};

use crate::error::{Error, Result};

/// Fixed nonce-count for `qop=auth` responses
pub const DIGEST_NC: &str = "00000001";
/// Fixed client nonce; keeps digest output reproducible
pub const DIGEST_CNONCE: &str = "0a4f113b";

/// Authentication scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    #[default]
    None,
    Basic,
    Digest,
    Ntlm,
    Negotiate,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::None => "none",
            AuthScheme::Basic => "basic",
            AuthScheme::Digest => "digest",
            AuthScheme::Ntlm => "ntlm",
            AuthScheme::Negotiate => "negotiate",
        }
    }
}

impl FromStr for AuthScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "none" => Ok(AuthScheme::None),
            "basic" => Ok(AuthScheme::Basic),
            "digest" => Ok(AuthScheme::Digest),
            "ntlm" => Ok(AuthScheme::Ntlm),
            "negotiate" => Ok(AuthScheme::Negotiate),
            other => Err(Error::config(format!("unknown auth scheme: {other}"))),
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who the credentials are for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTarget {
    /// The origin server
    #[default]
    Server,
    /// The configured proxy
    Proxy,
}

impl AuthTarget {
    /// Header carrying the credentials
    pub fn header_name(&self) -> &'static str {
        match self {
            AuthTarget::Server => "Authorization",
            AuthTarget::Proxy => "Proxy-Authenticate",
        }
    }
}

/// Username and password, always set together
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Split `user:password` on the first colon. Both halves must be non-empty.
    pub fn parse(user_pass: &str) -> Result<Self> {
        match user_pass.split_once(':') {
            Some((user, pass)) if !user.is_empty() && !pass.is_empty() => {
                Ok(Self::new(user, pass))
            }
            _ => Err(Error::config(
                "need to specify username and password in <username:password> format",
            )),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parsed `WWW-Authenticate: Digest ...` attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub qop: Option<String>,
}

impl DigestChallenge {
    /// Parse a comma-separated `key="value"` list. A leading `Digest` token
    /// is ignored. Splitting is naive: commas inside quotes are not special.
    pub fn parse(challenge: &str) -> Self {
        let trimmed = challenge.trim();
        let body = match trimmed.get(..7) {
            Some(prefix) if prefix.eq_ignore_ascii_case("digest ") => &trimmed[7..],
            _ => trimmed,
        };

        let mut params: HashMap<&str, &str> = HashMap::new();
        for part in body.split(',') {
            let part = part.trim();
            if let Some(idx) = part.find('=') {
                if idx == 0 {
                    continue;
                }
                let key = part[..idx].trim();
                let value = part[idx + 1..].trim().trim_matches('"');
                params.insert(key, value);
            }
        }

        Self {
            realm: params.get("realm").copied().unwrap_or_default().to_string(),
            nonce: params.get("nonce").copied().unwrap_or_default().to_string(),
            qop: params
                .get("qop")
                .filter(|q| !q.is_empty())
                .map(|q| q.to_string()),
        }
    }
}

/// One configured scheme plus its credentials
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    scheme: AuthScheme,
    credentials: Option<Credentials>,
    target: AuthTarget,
    challenge: Option<DigestChallenge>,
}

impl Authenticator {
    pub fn new(scheme: AuthScheme, credentials: Credentials, target: AuthTarget) -> Self {
        Self {
            scheme,
            credentials: Some(credentials),
            target,
            challenge: None,
        }
    }

    /// No authentication for `target`
    pub fn none(target: AuthTarget) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    pub fn target(&self) -> AuthTarget {
        self.target
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Store a Digest challenge received from the server
    pub fn set_challenge(&mut self, challenge: &str) {
        self.challenge = Some(DigestChallenge::parse(challenge));
    }

    /// `(header name, header value)` for a request, if a scheme is active
    pub fn header(&self, method: &str, uri: &str) -> Option<(&'static str, String)> {
        let creds = self.credentials.as_ref()?;
        let value = match self.scheme {
            AuthScheme::None => return None,
            AuthScheme::Basic => basic_header_value(creds),
            AuthScheme::Digest => match &self.challenge {
                Some(challenge) => digest_header_value(creds, challenge, method, uri),
                None => format!("Digest username=\"{}\"", creds.username),
            },
            AuthScheme::Ntlm => "NTLM".to_string(),
            AuthScheme::Negotiate => "Negotiate".to_string(),
        };
        Some((self.target.header_name(), value))
    }
}

/// `Basic base64(user:password)`
pub fn basic_header_value(creds: &Credentials) -> String {
    let encoded = base64::engine::general_purpose::STANDARD
        .encode(format!("{}:{}", creds.username, creds.password));
    format!("Basic {}", encoded)
}

/// Digest response for `method` and `uri` against `challenge`
pub fn digest_header_value(
    creds: &Credentials,
    challenge: &DigestChallenge,
    method: &str,
    uri: &str,
) -> String {
    let ha1 = md5_hex(&format!(
        "{}:{}:{}",
        creds.username, challenge.realm, creds.password
    ));
    let ha2 = md5_hex(&format!("{}:{}", method, uri));

    match challenge.qop.as_deref() {
        Some(qop @ "auth") => {
            let response = md5_hex(&format!(
                "{}:{}:{}:{}:{}:{}",
                ha1, challenge.nonce, DIGEST_NC, DIGEST_CNONCE, qop, ha2
            ));
            format!(
                "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", qop={}, nc={}, cnonce=\"{}\", response=\"{}\"",
                creds.username, challenge.realm, challenge.nonce, uri, qop, DIGEST_NC, DIGEST_CNONCE, response
            )
        }
        _ => {
            let response = md5_hex(&format!("{}:{}:{}", ha1, challenge.nonce, ha2));
            format!(
                "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", response=\"{}\"",
                creds.username, challenge.realm, challenge.nonce, uri, response
            )
        }
    }
}

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}
