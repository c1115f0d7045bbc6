//! `plantgate render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use plantgate_config::{CliSettings, Config};
use plantgate_gateway::{Gateway, RenderFormat, RenderOutcome};

use super::{gateway_options, read_source};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Diagram source file (use '-' for stdin).
    input: PathBuf,

    /// Output format: svg or png.
    #[arg(short, long, default_value = "svg")]
    format: String,

    /// Output file (default: input name with the format's extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Request timeout in milliseconds (overrides config).
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Rendering engine base URL (overrides config).
    #[arg(long)]
    engine_url: Option<String>,

    /// DPI for PNG output (overrides config).
    #[arg(long)]
    png_dpi: Option<u32>,

    /// Path to configuration file (default: auto-discover plantgate.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    /// Execute the render command, returning the process exit code.
    ///
    /// Exit codes: 0 rendered, 1 invalid diagram, 2 engine unreachable.
    pub(crate) fn execute(self, output: &Output) -> Result<i32, CliError> {
        let format = RenderFormat::parse(&self.format).ok_or_else(|| {
            CliError::Validation(format!("unknown format '{}' (expected svg or png)", self.format))
        })?;

        let settings = CliSettings {
            engine_url: self.engine_url,
            timeout_ms: self.timeout_ms,
            png_dpi: self.png_dpi,
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;

        let source = read_source(&self.input)?;
        let gateway = Gateway::new(config.engine.url.as_str(), gateway_options(&config));

        match gateway.render(&source, format, config.engine.timeout()) {
            RenderOutcome::Success { bytes, .. } => {
                let path = self
                    .output
                    .unwrap_or_else(|| default_output_path(&self.input, format));
                std::fs::write(&path, &bytes)?;
                output.success(&format!("Rendered {} ({} bytes)", path.display(), bytes.len()));
                Ok(0)
            }
            RenderOutcome::SyntaxError(detail) => {
                match detail.line {
                    Some(line) => {
                        output.error(&format!("Diagram error at line {line}: {}", detail.message));
                    }
                    None => output.error(&format!("Diagram error: {}", detail.message)),
                }
                Ok(1)
            }
            RenderOutcome::TransportError(e) => {
                output.error(&format!("Engine request failed ({}): {e}", e.cause()));
                Ok(2)
            }
        }
    }
}

/// Output path derived from the input name and format.
fn default_output_path(input: &Path, format: RenderFormat) -> PathBuf {
    if input.as_os_str() == "-" {
        return PathBuf::from(format!("diagram.{}", format.as_str()));
    }
    input.with_extension(format.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_output_from_file() {
        let path = default_output_path(Path::new("docs/flow.puml"), RenderFormat::Svg);
        assert_eq!(path, Path::new("docs/flow.svg"));
    }

    #[test]
    fn test_default_output_from_stdin() {
        let path = default_output_path(Path::new("-"), RenderFormat::Png);
        assert_eq!(path, Path::new("diagram.png"));
    }
}
