// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, PathContext, Result};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("gurl/", env!("CARGO_PKG_VERSION"));

/// Requested HTTP protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolVersion {
    Http10,
    #[default]
    Http11,
    Http2,
    Http3,
}

impl ProtocolVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolVersion::Http10 => "1.0",
            ProtocolVersion::Http11 => "1.1",
            ProtocolVersion::Http2 => "2",
            ProtocolVersion::Http3 => "3",
        }
    }

    /// HTTP/2 and HTTP/3 go through the generic-request transport
    pub fn is_multiplexed(&self) -> bool {
        matches!(self, ProtocolVersion::Http2 | ProtocolVersion::Http3)
    }

    /// Wire version for the outgoing request
    pub fn wire_version(&self) -> reqwest::Version {
        match self {
            ProtocolVersion::Http10 => reqwest::Version::HTTP_10,
            ProtocolVersion::Http11 => reqwest::Version::HTTP_11,
            ProtocolVersion::Http2 => reqwest::Version::HTTP_2,
            ProtocolVersion::Http3 => reqwest::Version::HTTP_3,
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1.0" => Ok(ProtocolVersion::Http10),
            "1.1" => Ok(ProtocolVersion::Http11),
            "2" => Ok(ProtocolVersion::Http2),
            "3" => Ok(ProtocolVersion::Http3),
            other => Err(Error::config(format!(
                "unsupported HTTP version {other:?}, expected 1.0, 1.1, 2 or 3"
            ))),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client TLS identity: certificate chain and private key as PEM
#[derive(Clone)]
pub struct ClientIdentity {
    pem: Vec<u8>,
}

impl ClientIdentity {
    /// Read a PEM certificate and a PEM private key
    pub fn from_files(cert_path: impl AsRef<Path>, key_path: impl AsRef<Path>) -> Result<Self> {
        let cert_path = cert_path.as_ref();
        let key_path = key_path.as_ref();

        let mut pem = std::fs::read(cert_path).with_path(cert_path)?;
        if !pem.ends_with(b"\n") {
            pem.push(b'\n');
        }
        pem.extend(std::fs::read(key_path).with_path(key_path)?);

        Self::from_pem(pem)
    }

    /// Use a buffer holding both certificate and key
    pub fn from_pem(pem: Vec<u8>) -> Result<Self> {
        reqwest::Identity::from_pem(&pem)
            .map_err(|e| Error::config(format!("invalid client certificate: {e}")))?;
        Ok(Self { pem })
    }

    pub(crate) fn to_reqwest(&self) -> Result<reqwest::Identity> {
        Ok(reqwest::Identity::from_pem(&self.pem)?)
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("pem_len", &self.pem.len())
            .finish()
    }
}

/// Transport configuration for a [`crate::Client`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-call timeout, enforced by the transport
    pub timeout: Duration,
    /// Proxy address; `None` means direct
    pub proxy: Option<String>,
    /// Skip TLS certificate verification (dangerous!)
    pub insecure: bool,
    /// Requested HTTP version
    pub protocol: ProtocolVersion,
    /// Client certificate for mutual TLS
    pub identity: Option<ClientIdentity>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            insecure: false,
            protocol: ProtocolVersion::default(),
            identity: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set proxy; an empty string clears it
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        let proxy = proxy.into();
        self.proxy = if proxy.is_empty() { None } else { Some(proxy) };
        self
    }

    /// Skip certificate verification
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Set HTTP version
    pub fn protocol(mut self, protocol: ProtocolVersion) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set client identity
    pub fn identity(mut self, identity: ClientIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
