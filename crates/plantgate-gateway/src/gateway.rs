//! Gateway facade composing encoder, transport, and classifier.

use std::time::Duration;

use tracing::{debug, info};

use plantgate_encoding::encode;

use crate::classify::classify;
use crate::consts::{DEFAULT_MAX_SOURCE_BYTES, DEFAULT_PNG_DPI, DEFAULT_VALIDATE_TIMEOUT};
use crate::format::RenderFormat;
use crate::outcome::{RenderOutcome, SyntaxDetail, ValidationResult};
use crate::prepare::prepare_source;
use crate::transport::{HttpTransport, Transport, TransportError};

/// Tunables for a gateway instance.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Local ceiling on prepared source size. Oversized requests never
    /// reach the engine.
    pub max_source_bytes: usize,
    /// DPI injected into PNG renders.
    pub png_dpi: u32,
    /// Timeout used by [`Gateway::validate`].
    pub validate_timeout: Duration,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
            png_dpi: DEFAULT_PNG_DPI,
            validate_timeout: DEFAULT_VALIDATE_TIMEOUT,
        }
    }
}

/// Facade over the rendering engine.
///
/// Stateless apart from its configuration: every call is independent, and a
/// single instance can serve arbitrarily many concurrent callers.
pub struct Gateway<T: Transport = HttpTransport> {
    transport: T,
    options: GatewayOptions,
}

impl Gateway<HttpTransport> {
    /// Gateway talking HTTP to the engine at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, options: GatewayOptions) -> Self {
        Self::with_transport(HttpTransport::new(base_url), options)
    }
}

impl<T: Transport> Gateway<T> {
    /// Gateway over an arbitrary transport. Tests use this to inject
    /// fixture transports without touching process-wide configuration.
    #[must_use]
    pub fn with_transport(transport: T, options: GatewayOptions) -> Self {
        Self { transport, options }
    }

    /// Render diagram source to an image.
    ///
    /// Prepares the source, enforces the local size ceiling, encodes, sends
    /// one request, and classifies the response. Never panics; every
    /// failure mode is a returned outcome.
    pub fn render(&self, source: &str, format: RenderFormat, timeout: Duration) -> RenderOutcome {
        let prepared = prepare_source(source, format, self.options.png_dpi);

        if prepared.len() > self.options.max_source_bytes {
            // Truncation would make the engine render a different diagram;
            // reject before encoding.
            return RenderOutcome::SyntaxError(SyntaxDetail::source_too_large(
                prepared.len(),
                self.options.max_source_bytes,
            ));
        }

        let token = match encode(&prepared) {
            Ok(token) => token,
            // An internal compression fault, not a user input error.
            Err(e) => {
                return RenderOutcome::TransportError(TransportError::Protocol(format!(
                    "failed to encode diagram source: {e}"
                )));
            }
        };
        debug!(
            format = format.as_str(),
            source_len = prepared.len(),
            token_len = token.len(),
            "Dispatching render request"
        );

        match self.transport.fetch(&token, format, timeout) {
            Ok(response) => {
                let outcome = classify(response, format);
                if let RenderOutcome::Success { bytes, .. } = &outcome {
                    info!(format = format.as_str(), size = bytes.len(), "Diagram rendered");
                }
                outcome
            }
            Err(e) => RenderOutcome::TransportError(e),
        }
    }

    /// Validate diagram source without keeping the rendered image.
    ///
    /// Renders as SVG with the configured validate timeout and discards the
    /// bytes. A transport failure is surfaced as `Err` rather than
    /// "invalid": validation cannot assert anything about the diagram when
    /// the engine could not be reached.
    pub fn validate(&self, source: &str) -> Result<ValidationResult, TransportError> {
        match self.render(source, RenderFormat::Svg, self.options.validate_timeout) {
            RenderOutcome::Success { .. } => Ok(ValidationResult {
                valid: true,
                error: None,
            }),
            RenderOutcome::SyntaxError(detail) => Ok(ValidationResult {
                valid: false,
                error: Some(detail),
            }),
            RenderOutcome::TransportError(e) => Err(e),
        }
    }
}
