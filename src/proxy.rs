// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Proxy address and proxy-user handling

use url::Url;

use crate::error::{Error, Result};

/// Port appended when a proxy address carries none
pub const DEFAULT_PROXY_PORT: &str = "1080";

/// Validate `[protocol://]host[:port]` and append the default port if missing.
pub fn normalize_proxy(proxy: &str) -> Result<String> {
    let candidate = if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{proxy}")
    };
    Url::parse(&candidate).map_err(|e| Error::config(format!("not valid proxy address: {e}")))?;

    let (prefix, authority, tail) = split_authority(proxy);
    if has_explicit_port(authority) {
        return Ok(proxy.to_string());
    }

    let host = authority.strip_suffix(':').unwrap_or(authority);
    Ok(format!("{prefix}{host}:{DEFAULT_PROXY_PORT}{tail}"))
}

/// `(scheme://, authority, /path...)` of a proxy address
fn split_authority(proxy: &str) -> (&str, &str, &str) {
    let start = proxy.find("://").map_or(0, |i| i + 3);
    let end = proxy[start..].find('/').map_or(proxy.len(), |i| start + i);
    (&proxy[..start], &proxy[start..end], &proxy[end..])
}

/// `url::Url` hides default ports, so look at the authority text directly
fn has_explicit_port(authority: &str) -> bool {
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    match host_port.rsplit_once(':') {
        Some((_, port)) => !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Proxy users must be exactly `user:password`, both halves non-empty
pub fn check_user_password(user_pass: &str) -> Result<()> {
    let parts: Vec<&str> = user_pass.split(':').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(Error::config(
            "need to specify username and password in <username:password> format",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_explicit_port() {
        assert_eq!(normalize_proxy("proxy://myproxy:1234").unwrap(), "proxy://myproxy:1234");
        assert_eq!(normalize_proxy("http://myproxy:1234").unwrap(), "http://myproxy:1234");
        assert_eq!(normalize_proxy("http://myproxy:80").unwrap(), "http://myproxy:80");
        assert_eq!(normalize_proxy("[::1]:3128").unwrap(), "[::1]:3128");
    }

    #[test]
    fn test_appends_default_port() {
        assert_eq!(normalize_proxy("proxy://proxy").unwrap(), "proxy://proxy:1080");
        assert_eq!(normalize_proxy("http://myproxy").unwrap(), "http://myproxy:1080");
        assert_eq!(normalize_proxy("http://myproxy:").unwrap(), "http://myproxy:1080");
        assert_eq!(normalize_proxy("myproxy").unwrap(), "myproxy:1080");
    }

    #[test]
    fn test_port_goes_into_authority() {
        assert_eq!(normalize_proxy("http://proxy/").unwrap(), "http://proxy:1080/");
        assert_eq!(
            normalize_proxy("socks5://u:p@proxy/x").unwrap(),
            "socks5://u:p@proxy:1080/x"
        );
        assert_eq!(normalize_proxy("http://proxy:3128/").unwrap(), "http://proxy:3128/");
    }

    #[test]
    fn test_rejects_garbage() {
        let err = normalize_proxy("http://[::1").unwrap_err();
        assert!(err.to_string().contains("not valid proxy address"));
    }

    #[test]
    fn test_check_user_password() {
        assert!(check_user_password("user:pass").is_ok());
        for bad in ["", "user:", ":pass", "user:pass1:pass2", "user"] {
            assert!(check_user_password(bad).is_err(), "{bad:?}");
        }
    }
}
