//! `plantgate check` command implementation.

use std::path::PathBuf;

use clap::Args;
use plantgate_config::{CliSettings, Config};
use plantgate_gateway::Gateway;

use super::{gateway_options, read_source};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Diagram source file (use '-' for stdin).
    input: PathBuf,

    /// Rendering engine base URL (overrides config).
    #[arg(long)]
    engine_url: Option<String>,

    /// Path to configuration file (default: auto-discover plantgate.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CheckArgs {
    /// Execute the check command, returning the process exit code.
    ///
    /// Exit codes: 0 valid, 1 invalid diagram, 2 engine unreachable. An
    /// unreachable engine is not "invalid" - validity is simply unknown.
    pub(crate) fn execute(self, output: &Output) -> Result<i32, CliError> {
        let settings = CliSettings {
            engine_url: self.engine_url,
            timeout_ms: None,
            png_dpi: None,
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;

        let source = read_source(&self.input)?;
        let gateway = Gateway::new(config.engine.url.as_str(), gateway_options(&config));

        match gateway.validate(&source) {
            Ok(result) if result.valid => {
                output.success("Diagram is valid");
                Ok(0)
            }
            Ok(result) => {
                match result.error {
                    Some(detail) => match detail.line {
                        Some(line) => output.error(&format!("line {line}: {}", detail.message)),
                        None => output.error(&detail.message),
                    },
                    None => output.error("Diagram is invalid"),
                }
                Ok(1)
            }
            Err(e) => {
                output.error(&format!("Cannot validate ({}): {e}", e.cause()));
                output.info("The engine could not be reached; the diagram may still be valid.");
                Ok(2)
            }
        }
    }
}
