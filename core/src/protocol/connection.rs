//! Resolved connection parameters and the `obsws://` URL format

use std::fmt;

use serde::Serialize;
use url::Url;

use super::constants::OBSWS_SCHEME;

/// A complete set of obs-websocket connection parameters.
///
/// Only the discovery strategies construct this; a strategy yields either a
/// full value or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectionConfig {
    address: String,
    port: String,
    password: String,
}

impl ConnectionConfig {
    pub(crate) fn new(
        address: impl Into<String>,
        port: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            port: port.into(),
            password: password.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Encode as an `obsws://` URL, the same shape the connect dialog shows
    pub fn to_url(&self) -> String {
        format!(
            "{}://{}:{}/{}",
            OBSWS_SCHEME,
            self.address,
            self.port,
            urlencoding::encode(&self.password),
        )
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Parse a decoded QR payload of the form `obsws://<host>:<port>/<password>`.
///
/// Returns `None` for any other scheme, a malformed URL, a missing host or a
/// port outside 1..=65535. The scheme comparison is made on the raw payload
/// because URL parsing lowercases it.
pub fn parse_connection_url(payload: &str) -> Option<ConnectionConfig> {
    let payload = payload.trim();
    let scheme_matches = payload
        .split_once(':')
        .is_some_and(|(scheme, _)| scheme == OBSWS_SCHEME);
    if !scheme_matches {
        tracing::debug!("rejecting payload with foreign scheme");
        return None;
    }

    let url = match Url::parse(payload) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("rejecting malformed obsws url: {}", e);
            return None;
        }
    };

    let host = url.host_str().filter(|h| !h.is_empty())?;
    let port = url.port().filter(|p| *p != 0)?;

    let raw_password = url.path().strip_prefix('/').unwrap_or(url.path());
    let password = match urlencoding::decode(raw_password) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw_password.to_string(),
    };

    Some(ConnectionConfig::new(host, port.to_string(), password))
}
