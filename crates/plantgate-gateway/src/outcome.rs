//! Tagged outcomes for render and validate calls.
//!
//! Syntax errors and transport failures are both routine, returned as
//! values. They stay structurally distinct so a caller can tell "the
//! diagram is wrong" apart from "the engine could not be reached".

use crate::transport::TransportError;

/// Diagram-level error detail: the engine's verdict, or the local size
/// guard's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDetail {
    /// 1-based source line the engine attributed the error to, when it
    /// reported one. Never guessed.
    pub line: Option<u32>,
    /// Human-readable error message.
    pub message: String,
}

impl SyntaxDetail {
    /// Detail for a source exceeding the local size ceiling.
    ///
    /// Built locally, before any transport call: truncating the source
    /// would make the engine silently render a different diagram.
    #[must_use]
    pub fn source_too_large(len: usize, max: usize) -> Self {
        Self {
            line: None,
            message: format!("diagram source is {len} bytes, exceeding the {max}-byte limit"),
        }
    }
}

/// Outcome of a render request.
///
/// Exactly one variant is populated; callers discriminate before touching
/// payload bytes.
#[derive(Debug)]
pub enum RenderOutcome {
    /// The engine produced an image of the requested media type.
    Success {
        /// Image bytes, exactly as the engine sent them.
        bytes: Vec<u8>,
        /// Media type of the image.
        media_type: String,
    },
    /// The diagram itself was rejected, by the engine or by the local size
    /// guard.
    SyntaxError(SyntaxDetail),
    /// The engine could not be reached or did not answer usably; the
    /// diagram's validity is unknown.
    TransportError(TransportError),
}

/// Result of validating diagram source without keeping the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the engine accepted the diagram.
    pub valid: bool,
    /// Error detail when invalid.
    pub error: Option<SyntaxDetail>,
}
