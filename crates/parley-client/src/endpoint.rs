//! Address of the local service instance.

use std::fmt;
use std::str::FromStr;

use crate::ClientError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 11434;

/// Host and port of a running service. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
    tls: bool,
}

impl Endpoint {
    /// Plain-HTTP endpoint, the usual local setup.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls: false,
        }
    }

    /// Endpoint reached over HTTPS.
    pub fn https(host: impl Into<String>, port: u16) -> Self {
        Self {
            tls: true,
            ..Self::new(host, port)
        }
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL used for every request, e.g. `http://localhost:11434`.
    pub fn base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{self}")
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Accepts `host`, `host:port`, `http://host:port` and `http://host:port/`.
/// An `https://` prefix selects TLS. A missing host or port falls back to
/// the defaults, matching how `OLLAMA_HOST` is usually written.
impl FromStr for Endpoint {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (tls, rest) = match trimmed.strip_prefix("https://") {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix("http://").unwrap_or(trimmed)),
        };
        let rest = rest.trim_end_matches('/');

        if rest.contains('/') {
            return Err(ClientError::InvalidRequest(format!(
                "endpoint must not contain a path: {s}"
            )));
        }

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    ClientError::InvalidRequest(format!("invalid port in endpoint: {s}"))
                })?;
                (host, port)
            }
            None => (rest, DEFAULT_PORT),
        };

        let host = if host.is_empty() { DEFAULT_HOST } else { host };
        Ok(Self {
            tls,
            ..Self::new(host, port)
        })
    }
}
