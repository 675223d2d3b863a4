//! Server endpoint configuration
//!
//! The endpoint is resolved once at startup, either from the single optional
//! command-line override or from the compiled-in default, and is immutable
//! for the rest of the process lifetime. Both the WebSocket URL the
//! supervisor dials and the HTTP base used to absolutize event paths are
//! derived from it.

use crate::error::{Error, Result};

/// Compiled-in controller authority (host:port).
pub const DEFAULT_AUTHORITY: &str = "192.168.1.31:3030";

/// Path suffix appended to the default authority for the WebSocket dial.
pub const DEFAULT_WS_PATH: &str = "/ws";

/// The remote controller endpoint.
///
/// `authority` is the `host:port` pair used for both the WebSocket link and
/// outbound HTTP fetches; `ws_path` is only used when dialing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    authority: String,
    ws_path: String,
}

impl ServerEndpoint {
    /// The compiled-in default endpoint.
    pub fn default_endpoint() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            ws_path: DEFAULT_WS_PATH.to_string(),
        }
    }

    /// Parse a command-line endpoint override.
    ///
    /// Accepts either a bare authority (`host:port`, path defaults to `/ws`)
    /// or a full WebSocket URL (`ws://host:port/path`). Anything else is a
    /// configuration error, which the caller treats as fatal.
    pub fn parse_override(value: &str) -> Result<Self> {
        if let Some(rest) = value.strip_prefix("ws://") {
            let (authority, path) = match rest.find('/') {
                Some(idx) => (&rest[..idx], &rest[idx..]),
                None => (rest, DEFAULT_WS_PATH),
            };
            Self::validate_authority(authority)?;
            return Ok(Self {
                authority: authority.to_string(),
                ws_path: path.to_string(),
            });
        }

        if value.contains("://") {
            return Err(Error::Config(format!(
                "unsupported endpoint scheme in '{}', expected ws:// or host:port",
                value
            )));
        }

        Self::validate_authority(value)?;
        Ok(Self {
            authority: value.to_string(),
            ws_path: DEFAULT_WS_PATH.to_string(),
        })
    }

    /// Check that an authority is `host:port` with a numeric port.
    fn validate_authority(authority: &str) -> Result<()> {
        let (host, port) = authority
            .rsplit_once(':')
            .ok_or_else(|| Error::Config(format!("missing port in endpoint '{}'", authority)))?;

        if host.is_empty() {
            return Err(Error::Config(format!("missing host in endpoint '{}'", authority)));
        }
        if port.parse::<u16>().is_err() {
            return Err(Error::Config(format!("invalid port in endpoint '{}'", authority)));
        }
        Ok(())
    }

    /// The `host:port` pair shared by the WebSocket link and HTTP fetches.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Full WebSocket URL to dial.
    pub fn ws_url(&self) -> String {
        format!("ws://{}{}", self.authority, self.ws_path)
    }

    /// Absolutize a server-relative path from an event into an HTTP URL.
    ///
    /// The path is concatenated verbatim; events are expected to carry a
    /// leading slash.
    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.authority, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_uses_compiled_in_authority() {
        let ep = ServerEndpoint::default_endpoint();
        assert_eq!(ep.ws_url(), format!("ws://{}{}", DEFAULT_AUTHORITY, DEFAULT_WS_PATH));
    }

    #[test]
    fn bare_authority_override_gets_default_path() {
        let ep = ServerEndpoint::parse_override("example.com:8080").unwrap();
        assert_eq!(ep.authority(), "example.com:8080");
        assert_eq!(ep.ws_url(), "ws://example.com:8080/ws");
        assert_eq!(ep.http_url("/sounds/a.mp3"), "http://example.com:8080/sounds/a.mp3");
    }

    #[test]
    fn full_ws_url_override_keeps_its_path() {
        let ep = ServerEndpoint::parse_override("ws://10.0.0.5:3030/socket").unwrap();
        assert_eq!(ep.authority(), "10.0.0.5:3030");
        assert_eq!(ep.ws_url(), "ws://10.0.0.5:3030/socket");
        assert_eq!(ep.http_url("/x"), "http://10.0.0.5:3030/x");
    }

    #[test]
    fn ws_url_without_path_gets_default_path() {
        let ep = ServerEndpoint::parse_override("ws://10.0.0.5:3030").unwrap();
        assert_eq!(ep.ws_url(), "ws://10.0.0.5:3030/ws");
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        assert!(ServerEndpoint::parse_override("no-port-here").is_err());
        assert!(ServerEndpoint::parse_override(":3030").is_err());
        assert!(ServerEndpoint::parse_override("host:notaport").is_err());
        assert!(ServerEndpoint::parse_override("http://host:3030/ws").is_err());
    }
}
