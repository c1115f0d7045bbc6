//! Diagram source preparation before encoding.
//!
//! Callers may submit bare diagram bodies; the engine requires
//! `@startuml`/`@enduml` delimiters. PNG renders additionally get a DPI
//! directive injected for high-resolution output.

use crate::format::RenderFormat;

/// Prepare diagram source for rendering.
///
/// Wraps the source in `@startuml`/`@enduml` when either delimiter is
/// missing, and for PNG injects `skinparam dpi <dpi>` after the
/// `@startuml` line.
#[must_use]
pub fn prepare_source(source: &str, format: RenderFormat, png_dpi: u32) -> String {
    let mut prepared = source.to_owned();
    if !prepared.contains("@startuml") {
        prepared = format!("@startuml\n{prepared}");
    }
    if !prepared.contains("@enduml") {
        prepared = format!("{prepared}\n@enduml");
    }

    if format == RenderFormat::Png {
        prepared = inject_dpi(&prepared, png_dpi);
    }

    prepared
}

/// Insert the DPI directive after the `@startuml` line.
fn inject_dpi(source: &str, dpi: u32) -> String {
    let directive = format!("skinparam dpi {dpi}\n");

    if let Some(pos) = source.find("@startuml") {
        let after_startuml = &source[pos..];
        if let Some(newline_pos) = after_startuml.find('\n') {
            let insert_pos = pos + newline_pos + 1;
            let mut result = String::with_capacity(source.len() + directive.len());
            result.push_str(&source[..insert_pos]);
            result.push_str(&directive);
            result.push_str(&source[insert_pos..]);
            return result;
        }
    }

    // No @startuml line to anchor on; prepend as a best effort.
    format!("{directive}{source}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_PNG_DPI;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bare_source_wrapped() {
        let prepared = prepare_source("Alice -> Bob: hi", RenderFormat::Svg, DEFAULT_PNG_DPI);
        assert_eq!(prepared, "@startuml\nAlice -> Bob: hi\n@enduml");
    }

    #[test]
    fn test_delimited_source_unchanged_for_svg() {
        let source = "@startuml\nAlice -> Bob\n@enduml";
        assert_eq!(prepare_source(source, RenderFormat::Svg, DEFAULT_PNG_DPI), source);
    }

    #[test]
    fn test_missing_enduml_appended() {
        let prepared = prepare_source("@startuml\nAlice -> Bob", RenderFormat::Svg, DEFAULT_PNG_DPI);
        assert_eq!(prepared, "@startuml\nAlice -> Bob\n@enduml");
    }

    #[test]
    fn test_png_dpi_injected_after_startuml() {
        let prepared = prepare_source("@startuml\nAlice -> Bob\n@enduml", RenderFormat::Png, 300);
        assert_eq!(prepared, "@startuml\nskinparam dpi 300\nAlice -> Bob\n@enduml");
    }

    #[test]
    fn test_png_dpi_custom_value() {
        let prepared = prepare_source("@startuml\nA -> B\n@enduml", RenderFormat::Png, 192);
        assert_eq!(prepared, "@startuml\nskinparam dpi 192\nA -> B\n@enduml");
    }

    #[test]
    fn test_png_bare_source_wrapped_then_injected() {
        let prepared = prepare_source("Alice -> Bob", RenderFormat::Png, 300);
        assert_eq!(prepared, "@startuml\nskinparam dpi 300\nAlice -> Bob\n@enduml");
    }

    #[test]
    fn test_content_before_startuml_preserved() {
        let prepared = prepare_source("' note\n@startuml\nA -> B\n@enduml", RenderFormat::Png, 300);
        assert_eq!(prepared, "' note\n@startuml\nskinparam dpi 300\nA -> B\n@enduml");
    }

    #[test]
    fn test_empty_source_wrapped() {
        let prepared = prepare_source("", RenderFormat::Svg, DEFAULT_PNG_DPI);
        assert_eq!(prepared, "@startuml\n\n@enduml");
    }
}
