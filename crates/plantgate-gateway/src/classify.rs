//! Classification of raw engine responses.
//!
//! The engine signals diagram syntax errors in-band: the response body is an
//! image carrying a textual error annotation, while the HTTP status may
//! still be 2xx (older engine builds) or 4xx (newer ones). Classification
//! therefore scans the body for the annotation before trusting the status.
//!
//! The annotation echoes the diagram source inside `<text>` elements,
//! followed by a locator of the form `[From string (line N) ]` and a short
//! human-readable message such as `Syntax Error?`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::format::RenderFormat;
use crate::outcome::{RenderOutcome, SyntaxDetail};
use crate::transport::{RawResponse, TransportError};

/// Locator the engine embeds in error annotations: `[From string (line 3) ]`.
const LOCATOR_MARKER: &str = "[From string (line";

/// Message phrase present in every engine syntax-error annotation.
const SYNTAX_MARKER: &str = "Syntax Error";

static LINE_INDICATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(line (\d+)\)").unwrap());

static TEXT_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<text[^>]*>([^<]*)</text>").unwrap());

/// Classify a raw engine response into a render outcome.
///
/// Rules, in order:
/// 1. a body carrying the error annotation, whatever the status or declared
///    content type, is a [`RenderOutcome::SyntaxError`];
/// 2. a non-2xx status otherwise is a protocol-level transport failure;
/// 3. a 2xx status with an empty body is `TransportError::EmptyResponse`;
/// 4. a 2xx status with a body whose content type is compatible with the
///    requested format is a [`RenderOutcome::Success`] carrying the bytes
///    unmodified; a contradictory content type is a protocol failure.
///
/// PNG bodies are binary, so the annotation scan only ever fires on textual
/// bodies; PNG failures surface through transport-level signals.
#[must_use]
pub fn classify(response: RawResponse, format: RenderFormat) -> RenderOutcome {
    if let Some(detail) = scan_error_annotation(&response.body) {
        warn!(
            line = detail.line,
            message = %detail.message,
            status = response.status,
            "Engine reported a diagram error"
        );
        return RenderOutcome::SyntaxError(detail);
    }

    if !(200..300).contains(&response.status) {
        return RenderOutcome::TransportError(TransportError::Protocol(format!(
            "engine returned HTTP {}",
            response.status
        )));
    }

    if response.body.is_empty() {
        return RenderOutcome::TransportError(TransportError::EmptyResponse);
    }

    if !content_type_compatible(&response.content_type, format) {
        return RenderOutcome::TransportError(TransportError::Protocol(format!(
            "expected {}, engine declared {:?}",
            format.media_type(),
            response.content_type
        )));
    }

    RenderOutcome::Success {
        bytes: response.body,
        media_type: format.media_type().to_owned(),
    }
}

/// Whether the declared content type is usable for the requested format.
///
/// An absent content type is accepted; only a contradictory declaration is
/// rejected.
fn content_type_compatible(content_type: &str, format: RenderFormat) -> bool {
    if content_type.is_empty() {
        return true;
    }
    match format {
        RenderFormat::Svg => content_type.contains("svg") || content_type.contains("xml"),
        RenderFormat::Png => content_type.contains("png"),
    }
}

/// Scan a response body for the engine's error annotation.
///
/// Returns the extracted detail, with the line number left absent when the
/// locator carries none.
fn scan_error_annotation(body: &[u8]) -> Option<SyntaxDetail> {
    // Binary bodies never match; lossy conversion keeps any embedded text.
    let text = String::from_utf8_lossy(body);
    if !text.contains(LOCATOR_MARKER) && !text.contains(SYNTAX_MARKER) {
        return None;
    }

    let line = LINE_INDICATOR
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok());

    Some(SyntaxDetail {
        line,
        message: extract_message(&text),
    })
}

/// Pull the human-readable message out of the annotation's text elements.
///
/// The annotation echoes the diagram source first, then the locator, then
/// the message, so the message is the first non-empty text element after
/// the locator.
fn extract_message(text: &str) -> String {
    let mut past_locator = false;
    for caps in TEXT_ELEMENT.captures_iter(text) {
        let content = caps[1].trim();
        if content.contains(LOCATOR_MARKER) {
            past_locator = true;
            continue;
        }
        if past_locator && !content.is_empty() {
            return content.to_owned();
        }
    }

    // Annotation without a separate message element; fall back to any text
    // element naming the syntax error, then to a generic message.
    TEXT_ELEMENT
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_owned())
        .find(|content| content.contains(SYNTAX_MARKER))
        .unwrap_or_else(|| "diagram rendering failed".to_owned())
}
