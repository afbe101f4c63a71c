// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Protocol dispatch
//!
//! Every call goes through the same two steps. [`prepare`] assembles headers,
//! cookies, auth and body. [`execute`] then picks one of two transports from
//! the requested version:
//!
//! - HTTP/1.0 and HTTP/1.1: a reqwest client pinned to HTTP/1.
//! - HTTP/2 and HTTP/3: a generic `http::Request` handed to a prior-knowledge
//!   reqwest client.
//!
//! Both paths normalize into the same [`Response`]. Nothing is retried.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::Method;
use tracing::{debug, info, warn};
use url::Url;

use super::body::encode_body;
use super::response::Response;
use crate::auth::Authenticator;
use crate::config::{ClientConfig, ProtocolVersion};
use crate::cookie::set_cookie_pair;
use crate::error::{Error, Result};
use crate::mapper::{Cookies, Headers};

/// A fully assembled request, ready for either transport
#[derive(Debug, Clone)]
pub(crate) struct OutgoingRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Build the outgoing request shared by both transports.
///
/// Header precedence, lowest first: normal headers, the synthesized
/// `Cookie` header, auth headers, then an inferred content type.
pub(crate) fn prepare(
    method: &str,
    url: &str,
    headers: &Headers,
    cookies: &Cookies,
    authenticators: &[&Authenticator],
    body: Option<Bytes>,
) -> Result<OutgoingRequest> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::config(format!("invalid method: {method}")))?;
    let url = Url::parse(url)?;

    let mut out = HeaderMap::new();
    for (name, value) in headers.iter() {
        insert_header(&mut out, name, value)?;
    }

    if let Some(cookie) = cookie_header(cookies) {
        insert_header(&mut out, COOKIE.as_str(), &cookie)?;
    }

    let uri = request_uri(&url);
    for auth in authenticators {
        if let Some((name, value)) = auth.header(method.as_str(), &uri) {
            insert_header(&mut out, name, &value)?;
        }
    }

    let body = if method == Method::GET || method == Method::HEAD {
        None
    } else {
        let declared = out.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        let encoded = encode_body(declared, body);
        debug!(kind = ?encoded.kind, inferred = ?encoded.inferred_content_type, "Encoded request body");
        if let Some(content_type) = encoded.inferred_content_type {
            out.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        encoded.body
    };

    Ok(OutgoingRequest {
        method,
        url,
        headers: out,
        body,
    })
}

/// Send `request` over the transport selected by `config.protocol`
pub(crate) async fn execute(config: &ClientConfig, request: OutgoingRequest) -> Result<Response> {
    debug!(
        method = %request.method,
        url = %request.url,
        protocol = %config.protocol,
        "Dispatching request"
    );

    let response = if config.protocol.is_multiplexed() {
        send_multiplexed(config, request).await?
    } else {
        send_http1(config, request).await?
    };

    normalize(response).await
}

/// `name=value` pairs joined with `; `, in name order
pub(crate) fn cookie_header(cookies: &Cookies) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }

    let mut pairs: Vec<(&str, &str)> = cookies.iter().collect();
    pairs.sort_unstable();
    Some(
        pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

fn insert_header(map: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| Error::config(format!("invalid header name: {name}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|_| Error::config(format!("invalid value for header {name}")))?;
    map.insert(name, value);
    Ok(())
}

/// Path plus query, as echoed in Digest responses
fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn base_builder(config: &ClientConfig) -> Result<reqwest::ClientBuilder> {
    let mut builder = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .redirect(Policy::none())
        .danger_accept_invalid_certs(config.insecure);

    if let Some(identity) = &config.identity {
        builder = builder.identity(identity.to_reqwest()?);
    }

    Ok(builder)
}

fn with_proxy(builder: reqwest::ClientBuilder, config: &ClientConfig) -> Result<reqwest::ClientBuilder> {
    match &config.proxy {
        Some(proxy) => Ok(builder.proxy(
            reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| Error::config(format!("Invalid proxy URL: {}", e)))?,
        )),
        None => Ok(builder),
    }
}

async fn send_http1(config: &ClientConfig, request: OutgoingRequest) -> Result<reqwest::Response> {
    let client = with_proxy(base_builder(config)?.http1_only(), config)?.build()?;

    let mut builder = client
        .request(request.method, request.url)
        .version(config.protocol.wire_version())
        .headers(request.headers);
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    Ok(builder.send().await?)
}

async fn send_multiplexed(
    config: &ClientConfig,
    request: OutgoingRequest,
) -> Result<reqwest::Response> {
    let builder = base_builder(config)?;
    let builder = match config.protocol {
        ProtocolVersion::Http3 => {
            if config.proxy.is_some() {
                warn!("Proxy is not used for HTTP/3");
            }
            enable_http3(builder)?
        }
        _ => with_proxy(builder, config)?.http2_prior_knowledge(),
    };
    let client = builder.build()?;

    let mut generic = http::Request::builder()
        .method(request.method)
        .uri(request.url.as_str())
        .version(config.protocol.wire_version());
    if let Some(headers) = generic.headers_mut() {
        for (name, value) in request.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }
    let generic = generic
        .body(request.body.unwrap_or_default())
        .map_err(|e| Error::config(format!("invalid request: {e}")))?;

    let request = reqwest::Request::try_from(generic)?;
    Ok(client.execute(request).await?)
}

#[cfg(feature = "http3")]
fn enable_http3(builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder> {
    Ok(builder.http3_prior_knowledge())
}

#[cfg(not(feature = "http3"))]
fn enable_http3(_builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder> {
    Err(Error::UnsupportedProtocol(
        "HTTP/3 support requires building with the `http3` feature".to_string(),
    ))
}

/// Flatten a transport response: last header value wins, cookies keep
/// only name and value.
async fn normalize(response: reqwest::Response) -> Result<Response> {
    let status = response.status().as_u16();
    let version = response.version();

    let mut headers = Headers::new();
    let mut cookies = Cookies::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes());
        if name == SET_COOKIE {
            if let Some((cookie_name, cookie_value)) = set_cookie_pair(&value) {
                cookies.set(cookie_name, cookie_value);
            }
        }
        headers.set(name.as_str(), value);
    }

    let body = response.bytes().await?;
    info!(status, version = ?version, bytes = body.len(), "Received response");

    Ok(Response::new(status, version, headers, cookies, body))
}
