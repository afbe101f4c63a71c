// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Netscape cookie-jar line parser
//!
//! Layout, tab separated:
//! `domain  include-subdomains  path  secure  expires  name  [value]`

use chrono::{TimeZone, Utc};

use super::Cookie;
use crate::error::{Error, Result};

/// Comment marker curl uses for HttpOnly cookies
pub const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

const MIN_FIELDS: usize = 6;
const MAX_FIELDS: usize = 7;

/// Parse one jar line. `line_num` is 1-based and only used in errors.
///
/// Returns `Ok(None)` for blank lines and comments, which callers skip.
/// Any `Err` means the jar is corrupt and the whole load should stop.
pub fn parse_cookie_line(line: &str, line_num: usize) -> Result<Option<Cookie>> {
    let (line, http_only) = match line.strip_prefix(HTTP_ONLY_PREFIX) {
        Some(rest) => (rest, true),
        None => (line, false),
    };

    if line.starts_with('#') || line.trim().is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    if fields.len() < MIN_FIELDS || fields.len() > MAX_FIELDS {
        return Err(Error::MalformedLine {
            line: line_num,
            fields: fields.len(),
        });
    }

    // fields[1] (include-subdomains) is ignored; a leading dot on the domain decides
    let secure = parse_bool(fields[3])
        .ok_or_else(|| Error::parse(line_num, format!("invalid secure flag {:?}", fields[3])))?;

    let expires_secs: i64 = fields[4]
        .parse()
        .map_err(|_| Error::parse(line_num, format!("invalid expiry {:?}", fields[4])))?;

    let expires = if expires_secs > 0 {
        let ts = Utc
            .timestamp_opt(expires_secs, 0)
            .single()
            .ok_or_else(|| Error::parse(line_num, format!("expiry out of range: {expires_secs}")))?;
        Some(ts)
    } else {
        None
    };

    let path = if fields[2].is_empty() { "/" } else { fields[2] };

    Ok(Some(Cookie {
        domain: fields[0].to_string(),
        path: path.to_string(),
        name: fields[5].to_string(),
        value: fields.get(6).map(|v| v.to_string()),
        secure,
        http_only,
        expires,
    }))
}

/// Boolean spellings accepted in jar files (`TRUE`/`FALSE` in practice)
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
