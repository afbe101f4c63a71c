// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar: load from a Netscape file, resolve per URL, dump to disk

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use super::{parse_cookie_line, Cookie};
use crate::error::{PathContext, Result};
use crate::mapper::Mapper;

/// Timestamp written for cookies with no expiry
const ZERO_EXPIRES: &str = "Mon, 01 Jan 0001 00:00:00 UTC";

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// Cookies keyed by the URL they were filed under (`scheme://domain`)
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, Vec<Cookie>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a jar from a Netscape cookie file.
    ///
    /// Comment and blank lines are skipped; the first malformed line aborts
    /// the load with its line number.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_path(path)?;
        let reader = BufReader::new(file);

        let mut jar = CookieJar::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.with_path(path)?;
            if let Some(cookie) = parse_cookie_line(&line, idx + 1)? {
                jar.add(cookie);
            }
        }

        info!(path = %path.display(), cookies = jar.len(), "Loaded cookie jar");
        Ok(jar)
    }

    /// Add a cookie, replacing one with the same name and path
    pub fn add(&mut self, cookie: Cookie) {
        let key = format!("{}://{}", cookie.scheme(), cookie.domain);
        let entry = self.cookies.entry(key).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        entry.push(cookie);
    }

    /// Record cookies received from `url` (name/value only)
    pub fn merge_response(&mut self, url: &Url, received: &Mapper) {
        let host = url.host_str().unwrap_or("");
        for (name, value) in received.iter() {
            self.add(Cookie::new(name, value).domain(host));
        }
    }

    /// Every cookie that applies to `url`
    pub fn cookies_for(&self, url: &Url) -> Vec<&Cookie> {
        self.cookies
            .values()
            .flatten()
            .filter(|c| c.matches(url))
            .collect()
    }

    /// `Cookie` header value for `url`, if any cookie applies
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.cookies_for(url);
        if cookies.is_empty() {
            return None;
        }

        Some(
            cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value_str()))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Applicable cookies as a name/value mapper for a client
    pub fn cookie_mapper(&self, url: &Url) -> Mapper {
        self.cookies_for(url)
            .into_iter()
            .map(|c| (c.name.clone(), c.value_str().to_string()))
            .collect()
    }

    /// Write the cookies applicable to `url` to `<dir>/<host>.txt`
    pub fn save_for(&self, dir: impl AsRef<Path>, url: &Url) -> Result<PathBuf> {
        let cookies: Vec<Cookie> = self.cookies_for(url).into_iter().cloned().collect();
        save(dir, url, &cookies)
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.values().map(Vec::len).sum()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all cookies
    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.values().flatten()
    }
}

/// Write `cookies` to `<dir>/<host[:port]>.txt`, one per line, overwriting.
pub fn save(dir: impl AsRef<Path>, url: &Url, cookies: &[Cookie]) -> Result<PathBuf> {
    let path = dir.as_ref().join(format!("{}.txt", host_with_port(url)));
    let file = File::create(&path).with_path(&path)?;
    let mut out = BufWriter::new(file);

    for cookie in cookies {
        writeln!(out, "{}", format_saved_line(cookie)).with_path(&path)?;
    }
    out.flush().with_path(&path)?;

    debug!(path = %path.display(), cookies = cookies.len(), "Saved cookie jar");
    Ok(path)
}

fn format_saved_line(cookie: &Cookie) -> String {
    let expires = cookie
        .expires
        .map(|t| t.format(EXPIRES_FORMAT).to_string())
        .unwrap_or_else(|| ZERO_EXPIRES.to_string());

    format!(
        "{}={}; Path={}; Domain={}; Expires={}; Secure={}; HttpOnly={}",
        cookie.name,
        cookie.value_str(),
        cookie.path,
        cookie.domain,
        expires,
        cookie.secure,
        cookie.http_only
    )
}

fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
