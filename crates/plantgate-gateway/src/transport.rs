//! HTTP transport to the rendering engine.
//!
//! One blocking GET per render request: `{base}/{format}/{token}`. The
//! caller-supplied timeout covers the whole request (connect + read). No
//! retries, no request body, no authentication, no shared state beyond the
//! configured base URL.

use std::time::Duration;

use tracing::debug;

use crate::format::RenderFormat;

/// Raw engine response prior to classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Declared `Content-Type`, empty when the engine omits it.
    pub content_type: String,
    /// Response body bytes.
    pub body: Vec<u8>,
}

/// Transport-level failure reaching or reading from the engine.
///
/// Logically distinct from a diagram error: a transport failure means the
/// diagram's validity is unknown, not that the diagram is wrong.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request exceeded the caller-supplied timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// DNS failure, connection refused, or an I/O fault mid-request.
    #[error("engine unreachable: {0}")]
    Unreachable(String),
    /// The engine answered, but not in a usable way.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The engine answered 2xx with no body at all.
    #[error("empty response from engine")]
    EmptyResponse,
}

impl TransportError {
    /// Coarse cause tag for logging and caller-facing messages.
    #[must_use]
    pub fn cause(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Unreachable(_) => "unreachable",
            Self::Protocol(_) => "protocol",
            Self::EmptyResponse => "empty-response",
        }
    }
}

/// Seam between the gateway facade and the engine's HTTP interface.
///
/// Tests substitute fixture transports here; production uses
/// [`HttpTransport`].
pub trait Transport {
    /// Fetch the rendered image for an encoded token.
    fn fetch(
        &self,
        token: &str,
        format: RenderFormat,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError>;
}

/// Blocking HTTP transport backed by ureq.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
}

impl HttpTransport {
    /// Transport for the engine at `base_url` (trailing slashes ignored).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url }
    }

    /// Agent with the caller's timeout as a global (connect + read)
    /// deadline and error statuses surfaced as responses.
    fn agent(timeout: Duration) -> ureq::Agent {
        ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into()
    }
}

impl Transport for HttpTransport {
    fn fetch(
        &self,
        token: &str,
        format: RenderFormat,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let url = format!("{}/{}/{}", self.base_url, format.as_str(), token);
        debug!(url = %url, timeout_ms = timeout.as_millis(), "Requesting rendered diagram");

        let agent = Self::agent(timeout);
        let response = agent
            .get(&url)
            .call()
            .map_err(|e| map_ureq_error(&e, timeout))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let mut body_reader = response.into_body();
        let body = body_reader
            .read_to_vec()
            .map_err(|e| TransportError::Protocol(format!("failed to read response body: {e}")))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Map a ureq failure onto the coarse transport taxonomy.
fn map_ureq_error(error: &ureq::Error, timeout: Duration) -> TransportError {
    match error {
        ureq::Error::Timeout(_) => TransportError::Timeout(timeout),
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Unreachable(error.to_string())
        }
        ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => {
            TransportError::Timeout(timeout)
        }
        ureq::Error::Io(e) => TransportError::Unreachable(e.to_string()),
        other => TransportError::Protocol(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport = HttpTransport::new("http://localhost:8000/plantuml/");
        assert_eq!(transport.base_url, "http://localhost:8000/plantuml");
    }

    #[test]
    fn test_host_not_found_maps_to_unreachable() {
        let mapped = map_ureq_error(&ureq::Error::HostNotFound, Duration::from_secs(1));
        assert_eq!(mapped.cause(), "unreachable");
    }

    #[test]
    fn test_io_timeout_maps_to_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
        let mapped = map_ureq_error(&ureq::Error::Io(io), Duration::from_secs(1));
        assert_eq!(mapped.cause(), "timeout");
    }

    #[test]
    fn test_connection_refused_maps_to_unreachable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let mapped = map_ureq_error(&ureq::Error::Io(io), Duration::from_secs(1));
        assert_eq!(mapped.cause(), "unreachable");
    }

    #[test]
    fn test_cause_tags() {
        assert_eq!(TransportError::Timeout(Duration::from_secs(5)).cause(), "timeout");
        assert_eq!(TransportError::Unreachable(String::new()).cause(), "unreachable");
        assert_eq!(TransportError::Protocol(String::new()).cause(), "protocol");
        assert_eq!(TransportError::EmptyResponse.cause(), "empty-response");
    }
}
