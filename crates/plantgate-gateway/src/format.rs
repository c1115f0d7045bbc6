//! Output formats for rendered diagrams.

/// Output format requested from the rendering engine.
///
/// The format selects the request path segment and the expected media type.
/// It also changes how errors can be detected: SVG bodies are textual and
/// can carry the engine's in-band error annotation, PNG bodies are binary
/// and only fail via transport-level signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    /// Scalable vector graphics (default).
    #[default]
    Svg,
    /// Bitmap output.
    Png,
}

impl RenderFormat {
    /// Parse format from a user-supplied string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Request path segment for this format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    /// Expected media type of a successful response body.
    #[must_use]
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }
}
