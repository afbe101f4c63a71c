// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;
use url::Url;

use super::dispatch;
use super::multipart::build_multipart;
use super::response::Response;
use super::{headers, JSON_CONTENT_TYPE};
use crate::auth::{AuthScheme, AuthTarget, Authenticator, Credentials};
use crate::config::{ClientConfig, ClientIdentity, ProtocolVersion};
use crate::error::{Error, Result};
use crate::mapper::{Cookies, Files, Headers, Params};
use crate::proxy::{check_user_password, normalize_proxy};

/// Everything attached to the next request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Normal headers
    pub headers: Headers,
    /// Cookies, sent as one `Cookie` header
    pub cookies: Cookies,
    /// Query parameters, folded into the URL for GET
    pub params: Params,
    /// Form field to local path, used by [`Client::send_file`]
    pub files: Files,
    /// Raw body bytes
    pub body: Option<Bytes>,
}

impl RequestOptions {
    /// Drop every attached value, keeping allocations
    pub fn clear(&mut self) {
        self.headers.clear();
        self.cookies.clear();
        self.params.clear();
        self.files.clear();
        self.body = None;
    }
}

/// HTTP client with per-instance options and authentication
///
/// Configuration calls mutate the client in place and chain. Verb calls
/// only read it, so one configured client can be used for several calls.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    auth: Authenticator,
    proxy_auth: Authenticator,
    opts: RequestOptions,
}

impl Default for Client {
    fn default() -> Self {
        Self::with_config(ClientConfig::default())
    }
}

impl Client {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            auth: Authenticator::none(AuthTarget::Server),
            proxy_auth: Authenticator::none(AuthTarget::Proxy),
            opts: RequestOptions::default(),
        }
    }

    /// Get client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the attached request options
    pub fn request_options(&self) -> &RequestOptions {
        &self.opts
    }

    /// Server authentication
    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    /// Proxy authentication
    pub fn proxy_auth(&self) -> &Authenticator {
        &self.proxy_auth
    }

    /// Restore `config` and drop auth and options
    pub fn reset(&mut self, config: &ClientConfig) {
        self.config = config.clone();
        self.auth = Authenticator::none(AuthTarget::Server);
        self.proxy_auth = Authenticator::none(AuthTarget::Proxy);
        self.opts.clear();
    }

    /// Route requests through `proxy`; an empty string means direct.
    /// An address without a port gets the default proxy port.
    pub fn set_proxy(&mut self, proxy: &str) -> Result<&mut Self> {
        if proxy.is_empty() {
            self.config.proxy = None;
            return Ok(self);
        }

        let normalized = normalize_proxy(proxy)?;
        let normalized = if normalized.contains("://") {
            normalized
        } else {
            format!("http://{normalized}")
        };
        debug!(proxy = %normalized, "Using proxy");
        self.config.proxy = Some(normalized);
        Ok(self)
    }

    /// Set the per-call timeout
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the HTTP version
    pub fn set_protocol(&mut self, protocol: ProtocolVersion) -> &mut Self {
        self.config.protocol = protocol;
        self
    }

    /// Set the HTTP version from `1.0`, `1.1`, `2` or `3`
    pub fn set_http_version(&mut self, version: &str) -> Result<&mut Self> {
        self.config.protocol = version.parse()?;
        Ok(self)
    }

    /// Skip TLS certificate verification (dangerous!)
    pub fn set_insecure(&mut self, insecure: bool) -> &mut Self {
        self.config.insecure = insecure;
        self
    }

    /// Present a client certificate read from PEM files
    pub fn set_certificate(
        &mut self,
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
    ) -> Result<&mut Self> {
        self.config.identity = Some(ClientIdentity::from_files(cert_path, key_path)?);
        Ok(self)
    }

    /// Set the user agent
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Server authentication from a `user:password` string
    pub fn set_auth(&mut self, scheme: AuthScheme, user_pass: &str) -> Result<&mut Self> {
        self.auth = authenticator(scheme, user_pass, AuthTarget::Server)?;
        Ok(self)
    }

    pub fn set_basic_auth(&mut self, user_pass: &str) -> Result<&mut Self> {
        self.set_auth(AuthScheme::Basic, user_pass)
    }

    pub fn set_digest_auth(&mut self, user_pass: &str) -> Result<&mut Self> {
        self.set_auth(AuthScheme::Digest, user_pass)
    }

    pub fn set_ntlm_auth(&mut self, user_pass: &str) -> Result<&mut Self> {
        self.set_auth(AuthScheme::Ntlm, user_pass)
    }

    pub fn set_negotiate_auth(&mut self, user_pass: &str) -> Result<&mut Self> {
        self.set_auth(AuthScheme::Negotiate, user_pass)
    }

    /// Proxy authentication; the user must be exactly `user:password`
    pub fn set_proxy_auth(&mut self, scheme: AuthScheme, user_pass: &str) -> Result<&mut Self> {
        check_user_password(user_pass)?;
        self.proxy_auth = authenticator(scheme, user_pass, AuthTarget::Proxy)?;
        Ok(self)
    }

    /// Remember a server Digest challenge for later calls
    pub fn set_digest_challenge(&mut self, challenge: &str) -> &mut Self {
        self.auth.set_challenge(challenge);
        self
    }

    /// Remember a proxy Digest challenge for later calls
    pub fn set_proxy_digest_challenge(&mut self, challenge: &str) -> &mut Self {
        self.proxy_auth.set_challenge(challenge);
        self
    }

    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.opts.params.set(key, value);
        self
    }

    pub fn add_params(&mut self, params: &Params) -> &mut Self {
        self.opts.params.extend(params);
        self
    }

    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.opts.headers.set(key, value);
        self
    }

    pub fn add_headers(&mut self, headers: &Headers) -> &mut Self {
        self.opts.headers.extend(headers);
        self
    }

    pub fn add_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.opts.cookies.set(name, value);
        self
    }

    pub fn add_cookies(&mut self, cookies: &Cookies) -> &mut Self {
        self.opts.cookies.extend(cookies);
        self
    }

    /// Attach the file at `path` as form field `field`
    pub fn add_file(&mut self, field: impl Into<String>, path: impl Into<String>) -> &mut Self {
        self.opts.files.set(field, path);
        self
    }

    pub fn add_files(&mut self, files: &Files) -> &mut Self {
        self.opts.files.extend(files);
        self
    }

    /// Use `body` verbatim; its content type is sniffed unless declared
    pub fn add_body_bytes(&mut self, body: impl Into<Bytes>) -> &mut Self {
        self.opts.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body
    pub fn add_body_json<T: serde::Serialize>(&mut self, value: &T) -> Result<&mut Self> {
        let body = serde_json::to_vec(value)?;
        if !has_content_type(&self.opts.headers) {
            self.opts.headers.set("Content-Type", JSON_CONTENT_TYPE);
        }
        self.opts.body = Some(Bytes::from(body));
        Ok(self)
    }

    /// GET with configured params folded into the query string
    pub async fn get(&self, url: &str) -> Result<Response> {
        let url = fold_params(require_url(url)?, &self.opts.params)?;
        self.dispatch("GET", &url, &self.opts.headers, None).await
    }

    pub async fn head(&self, url: &str) -> Result<Response> {
        self.dispatch("HEAD", require_url(url)?, &self.opts.headers, None)
            .await
    }

    pub async fn post(&self, url: &str) -> Result<Response> {
        self.send_with_body("POST", url).await
    }

    pub async fn put(&self, url: &str) -> Result<Response> {
        self.send_with_body("PUT", url).await
    }

    pub async fn patch(&self, url: &str) -> Result<Response> {
        self.send_with_body("PATCH", url).await
    }

    pub async fn delete(&self, url: &str) -> Result<Response> {
        self.send_with_body("DELETE", url).await
    }

    pub async fn options(&self, url: &str) -> Result<Response> {
        self.send_with_body("OPTIONS", url).await
    }

    /// Any method; GET and HEAD keep their special handling
    pub async fn request(&self, method: &str, url: &str) -> Result<Response> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => self.get(url).await,
            "HEAD" => self.head(url).await,
            other => self.send_with_body(other, url).await,
        }
    }

    /// POST every attached file as `multipart/form-data`
    pub async fn send_file(&self, url: &str) -> Result<Response> {
        let url = require_url(url)?;
        if self.opts.files.is_empty() {
            return Err(Error::EmptyFile);
        }

        let multipart = build_multipart(&self.opts.files).await?;
        debug!(files = self.opts.files.len(), bytes = multipart.body.len(), "Built multipart body");

        let mut headers: Headers = self
            .opts
            .headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(headers::CONTENT_TYPE))
            .collect();
        headers.set("Content-Type", multipart.content_type());

        self.dispatch("POST", url, &headers, Some(multipart.body)).await
    }

    async fn send_with_body(&self, method: &str, url: &str) -> Result<Response> {
        let url = require_url(url)?;
        self.dispatch(method, url, &self.opts.headers, self.opts.body.clone())
            .await
    }

    async fn dispatch(
        &self,
        method: &str,
        url: &str,
        headers: &Headers,
        body: Option<Bytes>,
    ) -> Result<Response> {
        let request = dispatch::prepare(
            method,
            url,
            headers,
            &self.opts.cookies,
            &[&self.auth, &self.proxy_auth],
            body,
        )?;
        dispatch::execute(&self.config, request).await
    }
}

fn has_content_type(headers: &Headers) -> bool {
    headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(headers::CONTENT_TYPE))
}

fn authenticator(scheme: AuthScheme, user_pass: &str, target: AuthTarget) -> Result<Authenticator> {
    if scheme == AuthScheme::None {
        return Ok(Authenticator::none(target));
    }
    Ok(Authenticator::new(scheme, Credentials::parse(user_pass)?, target))
}

fn require_url(url: &str) -> Result<&str> {
    if url.is_empty() {
        return Err(Error::EmptyUrl);
    }
    Ok(url)
}

/// Merge `params` into the query of `url`. Explicit params replace same-named
/// ones already in the URL; the result is sorted by key and any fragment is
/// left where it was.
fn fold_params(url: &str, params: &Params) -> Result<String> {
    if params.is_empty() {
        return Ok(url.to_string());
    }

    let mut url = Url::parse(url)?;
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .filter(|(key, _)| !params.contains(key))
        .collect();
    pairs.extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    url.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults() {
        let client = Client::new();
        assert_eq!(client.config().timeout, Duration::from_secs(10));
        assert_eq!(client.config().protocol, ProtocolVersion::Http11);
        assert_eq!(client.auth().scheme(), AuthScheme::None);
        assert!(client.request_options().headers.is_empty());
    }

    #[test]
    fn test_fold_params() {
        let params: Params = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_eq!(fold_params("http://h/p", &params).unwrap(), "http://h/p?x=1&y=2");
        assert_eq!(
            fold_params("http://h/p?x=0&z=3", &params).unwrap(),
            "http://h/p?x=1&y=2&z=3"
        );
        assert_eq!(fold_params("http://h/p?a=1", &Params::new()).unwrap(), "http://h/p?a=1");
    }

    #[test]
    fn test_fold_params_keeps_fragment() {
        let params: Params = [("y", "2")].into_iter().collect();
        assert_eq!(fold_params("http://h/p#frag", &params).unwrap(), "http://h/p?y=2#frag");
        assert_eq!(
            fold_params("http://h/p?a=1#frag", &params).unwrap(),
            "http://h/p?a=1&y=2#frag"
        );
        assert!(fold_params("not a url", &params).unwrap_err().is_transport());
    }

    #[test]
    fn test_fold_params_encodes_values() {
        let params: Params = [("q", "a b&c")].into_iter().collect();
        assert_eq!(fold_params("http://h/", &params).unwrap(), "http://h/?q=a+b%26c");
    }

    #[test]
    fn test_chained_options() {
        let mut client = Client::new();
        client
            .add_header("X-A", "1")
            .add_cookie("sid", "abc")
            .add_param("q", "rust")
            .add_file("upload", "/tmp/f.txt")
            .add_body_bytes("a=1&b=2");

        let opts = client.request_options();
        assert_eq!(opts.headers.get("X-A"), "1");
        assert_eq!(opts.cookies.get("sid"), "abc");
        assert_eq!(opts.params.get("q"), "rust");
        assert_eq!(opts.files.get("upload"), "/tmp/f.txt");
        assert_eq!(opts.body.as_deref(), Some(&b"a=1&b=2"[..]));
    }

    #[test]
    fn test_body_json_sets_content_type() {
        let mut client = Client::new();
        client
            .add_body_json(&serde_json::json!({"name": "gurl"}))
            .unwrap();
        assert_eq!(client.request_options().headers.get("Content-Type"), JSON_CONTENT_TYPE);
        assert_eq!(client.request_options().body.as_deref(), Some(&br#"{"name":"gurl"}"#[..]));

        let mut client = Client::new();
        client.add_header("content-type", "application/vnd.api+json");
        client.add_body_json(&[1, 2]).unwrap();
        assert!(!client.request_options().headers.contains("Content-Type"));
    }

    #[test]
    fn test_auth_setters() {
        let mut client = Client::new();
        client.set_basic_auth("alice:secret").unwrap();
        assert_eq!(client.auth().scheme(), AuthScheme::Basic);
        assert_eq!(client.auth().credentials().unwrap().username, "alice");

        assert!(client.set_digest_auth("nocolon").unwrap_err().is_configuration());
        // a rejected setter leaves the previous auth in place
        assert_eq!(client.auth().scheme(), AuthScheme::Basic);
    }

    #[test]
    fn test_proxy_auth_requires_single_colon() {
        let mut client = Client::new();
        assert!(client
            .set_proxy_auth(AuthScheme::Basic, "u:p:x")
            .unwrap_err()
            .is_configuration());

        client.set_proxy_auth(AuthScheme::Basic, "u:p").unwrap();
        assert_eq!(client.proxy_auth().target(), AuthTarget::Proxy);
    }

    #[test]
    fn test_set_proxy() {
        let mut client = Client::new();
        client.set_proxy("myproxy").unwrap();
        assert_eq!(client.config().proxy.as_deref(), Some("http://myproxy:1080"));

        client.set_proxy("socks5://p:9050").unwrap();
        assert_eq!(client.config().proxy.as_deref(), Some("socks5://p:9050"));

        client.set_proxy("").unwrap();
        assert!(client.config().proxy.is_none());
    }

    #[test]
    fn test_set_http_version() {
        let mut client = Client::new();
        client.set_http_version("2").unwrap();
        assert_eq!(client.config().protocol, ProtocolVersion::Http2);
        assert!(client.set_http_version("4").is_err());
    }

    #[test]
    fn test_reset() {
        let template = ClientConfig::new().timeout(Duration::from_secs(3));
        let mut client = Client::new();
        client.set_insecure(true).add_header("X", "1");
        client.set_basic_auth("u:p").unwrap();

        client.reset(&template);
        assert_eq!(client.config().timeout, Duration::from_secs(3));
        assert!(!client.config().insecure);
        assert!(client.request_options().headers.is_empty());
        assert_eq!(client.auth().scheme(), AuthScheme::None);
    }

    #[tokio::test]
    async fn test_empty_url() {
        let client = Client::new();
        assert!(matches!(client.get("").await, Err(Error::EmptyUrl)));
        assert!(matches!(client.post("").await, Err(Error::EmptyUrl)));
        assert!(matches!(client.send_file("").await, Err(Error::EmptyUrl)));
    }

    #[tokio::test]
    async fn test_send_file_requires_files() {
        let client = Client::new();
        let err = client.send_file("http://localhost/").await.unwrap_err();
        assert!(matches!(err, Error::EmptyFile));
    }
}
