// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Command-line interface
//!
//! A thin curl-style wrapper: flags become [`Client`] configuration, cookie
//! arguments are resolved through a [`CookieJar`], and the response is
//! handed back to `main` for printing.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use url::{form_urlencoded, Url};

use crate::auth::AuthScheme;
use crate::config::ProtocolVersion;
use crate::cookie::CookieJar;
use crate::error::{Error, Result};
use crate::http::{Client, Response};
use crate::mapper::Cookies;

/// gurl - a small HTTP client with cookie jars and auth schemes
#[derive(Parser, Debug)]
#[command(name = "gurl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Transfer a URL over HTTP/1.0, HTTP/1.1, HTTP/2 or HTTP/3")]
pub struct Cli {
    /// URL to request
    pub url: String,

    /// Request method
    #[arg(short = 'X', long = "request")]
    pub method: Option<String>,

    /// Extra header, `Name: value`
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body
    #[arg(short = 'd', long = "data")]
    pub data: Option<String>,

    /// Upload a file as a form field, `name=path`
    #[arg(short = 'F', long = "form")]
    pub forms: Vec<String>,

    /// Send `--data` as query parameters of a GET
    #[arg(short = 'G', long = "get")]
    pub get: bool,

    /// Inline cookies `name=value[; name=value]` or a Netscape cookie file
    #[arg(short = 'b', long = "cookie")]
    pub cookies: Vec<String>,

    /// Directory to write cookies to after the transfer
    #[arg(short = 'c', long = "cookie-jar")]
    pub cookie_jar: Option<PathBuf>,

    /// Server credentials, `user:password`
    #[arg(short = 'u', long = "user")]
    pub user: Option<String>,

    /// Use Basic authentication (default)
    #[arg(long, conflicts_with_all = ["digest", "ntlm", "negotiate"])]
    pub basic: bool,

    /// Use Digest authentication
    #[arg(long, conflicts_with_all = ["ntlm", "negotiate"])]
    pub digest: bool,

    /// Announce NTLM authentication
    #[arg(long, conflicts_with = "negotiate")]
    pub ntlm: bool,

    /// Announce Negotiate authentication
    #[arg(long)]
    pub negotiate: bool,

    /// Proxy, `[protocol://]host[:port]`
    #[arg(short = 'x', long = "proxy")]
    pub proxy: Option<String>,

    /// Proxy credentials, `user:password`
    #[arg(short = 'U', long = "proxy-user")]
    pub proxy_user: Option<String>,

    /// Use Basic proxy authentication (default)
    #[arg(long, conflicts_with_all = ["proxy_digest", "proxy_ntlm", "proxy_negotiate"])]
    pub proxy_basic: bool,

    /// Use Digest proxy authentication
    #[arg(long, conflicts_with_all = ["proxy_ntlm", "proxy_negotiate"])]
    pub proxy_digest: bool,

    /// Announce NTLM proxy authentication
    #[arg(long, conflicts_with = "proxy_negotiate")]
    pub proxy_ntlm: bool,

    /// Announce Negotiate proxy authentication
    #[arg(long)]
    pub proxy_negotiate: bool,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Client certificate (PEM)
    #[arg(short = 'E', long = "cert")]
    pub cert: Option<PathBuf>,

    /// Private key for `--cert` (PEM); defaults to the certificate file
    #[arg(long, requires = "cert")]
    pub key: Option<PathBuf>,

    /// Maximum time allowed for the transfer, in seconds
    #[arg(short = 'm', long = "max-time")]
    pub max_time: Option<f64>,

    /// User agent
    #[arg(short = 'A', long = "user-agent")]
    pub user_agent: Option<String>,

    /// Use HTTP/1.0
    #[arg(long = "http1.0", group = "http_version")]
    pub http1_0: bool,

    /// Use HTTP/1.1 (default)
    #[arg(long = "http1.1", group = "http_version")]
    pub http1_1: bool,

    /// Use HTTP/2 with prior knowledge
    #[arg(long = "http2", group = "http_version")]
    pub http2: bool,

    /// Use HTTP/3 (needs the `http3` build feature)
    #[arg(long = "http3", group = "http_version")]
    pub http3: bool,

    /// Print response headers
    #[arg(short = 'i', long = "include")]
    pub include: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Requested protocol version
    pub fn protocol(&self) -> ProtocolVersion {
        if self.http1_0 {
            ProtocolVersion::Http10
        } else if self.http2 {
            ProtocolVersion::Http2
        } else if self.http3 {
            ProtocolVersion::Http3
        } else {
            ProtocolVersion::Http11
        }
    }

    /// Server auth scheme picked by the flags
    pub fn auth_scheme(&self) -> AuthScheme {
        scheme(self.digest, self.ntlm, self.negotiate)
    }

    /// Proxy auth scheme picked by the flags
    pub fn proxy_auth_scheme(&self) -> AuthScheme {
        scheme(self.proxy_digest, self.proxy_ntlm, self.proxy_negotiate)
    }

    /// Method to use when `-X` is absent
    pub fn method(&self) -> String {
        match &self.method {
            Some(method) => method.to_ascii_uppercase(),
            None if !self.forms.is_empty() => "POST".to_string(),
            None if self.data.is_some() && !self.get => "POST".to_string(),
            None => "GET".to_string(),
        }
    }

    /// Split `-b` arguments into a jar (from files) and inline cookies
    pub fn load_cookies(&self) -> Result<(CookieJar, Cookies)> {
        let mut jar = CookieJar::new();
        let mut inline = Cookies::new();

        for arg in &self.cookies {
            if arg.contains('=') {
                for pair in arg.split(';') {
                    if let Some((name, value)) = pair.split_once('=') {
                        inline.set(name.trim(), value.trim());
                    }
                }
            } else {
                for cookie in CookieJar::load(arg)?.iter() {
                    jar.add(cookie.clone());
                }
            }
        }

        Ok((jar, inline))
    }

    /// Configure a client from every flag except cookies
    pub fn build_client(&self) -> Result<Client> {
        let mut client = Client::new();
        client.set_protocol(self.protocol()).set_insecure(self.insecure);

        if let Some(secs) = self.max_time {
            let timeout = Duration::try_from_secs_f64(secs)
                .map_err(|_| Error::config(format!("invalid max time: {secs}")))?;
            client.set_timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            client.set_user_agent(user_agent.as_str());
        }
        if let Some(proxy) = &self.proxy {
            client.set_proxy(proxy)?;
        }
        if let Some(cert) = &self.cert {
            client.set_certificate(cert, self.key.as_ref().unwrap_or(cert))?;
        }
        if let Some(user) = &self.user {
            client.set_auth(self.auth_scheme(), user)?;
        }
        if let Some(proxy_user) = &self.proxy_user {
            client.set_proxy_auth(self.proxy_auth_scheme(), proxy_user)?;
        }

        for header in &self.headers {
            let (name, value) = header
                .split_once(':')
                .ok_or_else(|| Error::config(format!("invalid header, expected `Name: value`: {header}")))?;
            client.add_header(name.trim(), value.trim());
        }

        for form in &self.forms {
            let (field, path) = form
                .split_once('=')
                .ok_or_else(|| Error::config(format!("invalid form, expected `name=path`: {form}")))?;
            client.add_file(field, path.trim_start_matches('@'));
        }

        if let Some(data) = &self.data {
            if self.get {
                for (key, value) in form_urlencoded::parse(data.as_bytes()) {
                    client.add_param(key, value);
                }
            } else {
                client.add_body_bytes(data.clone());
            }
        }

        Ok(client)
    }

    /// Run the transfer, saving cookies afterwards when `-c` is set
    pub async fn run(&self) -> Result<Response> {
        if self.url.is_empty() {
            return Err(Error::EmptyUrl);
        }
        let url = Url::parse(&self.url)?;

        let (mut jar, inline) = self.load_cookies()?;
        let mut client = self.build_client()?;
        client
            .add_cookies(&jar.cookie_mapper(&url))
            .add_cookies(&inline);

        let response = if self.forms.is_empty() {
            client.request(&self.method(), &self.url).await?
        } else {
            client.send_file(&self.url).await?
        };

        if let Some(dir) = &self.cookie_jar {
            jar.merge_response(&url, &response.cookies);
            let path = jar.save_for(dir, &url)?;
            info!(path = %path.display(), "Wrote cookies");
        }

        Ok(response)
    }
}

fn scheme(digest: bool, ntlm: bool, negotiate: bool) -> AuthScheme {
    if digest {
        AuthScheme::Digest
    } else if ntlm {
        AuthScheme::Ntlm
    } else if negotiate {
        AuthScheme::Negotiate
    } else {
        AuthScheme::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gurl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_method_defaults() {
        assert_eq!(parse(&["http://h/"]).method(), "GET");
        assert_eq!(parse(&["-d", "a=1", "http://h/"]).method(), "POST");
        assert_eq!(parse(&["-G", "-d", "a=1", "http://h/"]).method(), "GET");
        assert_eq!(parse(&["-X", "put", "http://h/"]).method(), "PUT");
        assert_eq!(parse(&["-F", "f=/tmp/x", "http://h/"]).method(), "POST");
    }

    #[test]
    fn test_protocol_and_schemes() {
        let cli = parse(&["--http2", "--digest", "--proxy-ntlm", "http://h/"]);
        assert_eq!(cli.protocol(), ProtocolVersion::Http2);
        assert_eq!(cli.auth_scheme(), AuthScheme::Digest);
        assert_eq!(cli.proxy_auth_scheme(), AuthScheme::Ntlm);

        let cli = parse(&["http://h/"]);
        assert_eq!(cli.protocol(), ProtocolVersion::Http11);
        assert_eq!(cli.auth_scheme(), AuthScheme::Basic);
    }

    #[test]
    fn test_conflicting_versions_rejected() {
        let res = Cli::try_parse_from(["gurl", "--http1.0", "--http2", "http://h/"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_build_client() {
        let cli = parse(&[
            "-H",
            "X-Trace: 42",
            "-u",
            "alice:secret",
            "-x",
            "proxy.local",
            "-m",
            "2.5",
            "-k",
            "-G",
            "-d",
            "q=rust&page=2",
            "http://h/",
        ]);
        let client = cli.build_client().unwrap();

        assert_eq!(client.request_options().headers.get("X-Trace"), "42");
        assert_eq!(client.request_options().params.get("page"), "2");
        assert!(client.request_options().body.is_none());
        assert_eq!(client.auth().scheme(), AuthScheme::Basic);
        assert_eq!(client.config().proxy.as_deref(), Some("http://proxy.local:1080"));
        assert_eq!(client.config().timeout, Duration::from_millis(2500));
        assert!(client.config().insecure);
    }

    #[test]
    fn test_bad_header_and_user() {
        assert!(parse(&["-H", "nocolon", "http://h/"])
            .build_client()
            .unwrap_err()
            .is_configuration());
        assert!(parse(&["-u", "alice", "http://h/"])
            .build_client()
            .unwrap_err()
            .is_configuration());
        assert!(parse(&["-U", "a:b:c", "http://h/"])
            .build_client()
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_load_cookies_inline_and_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Netscape HTTP Cookie File").unwrap();
        writeln!(file, "example.com\tFALSE\t/\tFALSE\t0\tsid\tabc").unwrap();

        let path = file.path().to_string_lossy().into_owned();
        let cli = parse(&["-b", "a=1; b=2", "-b", &path, "http://example.com/"]);
        let (jar, inline) = cli.load_cookies().unwrap();

        assert_eq!(inline.get("a"), "1");
        assert_eq!(inline.get("b"), "2");
        assert_eq!(jar.len(), 1);

        let url = Url::parse("http://example.com/x").unwrap();
        assert_eq!(jar.cookie_mapper(&url).get("sid"), "abc");
    }

    #[test]
    fn test_load_cookies_missing_file() {
        let cli = parse(&["-b", "/definitely/not/a/jar", "http://h/"]);
        assert!(cli.load_cookies().unwrap_err().is_file_system());
    }
}
