//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod render;

use std::io::Read;
use std::path::Path;

use plantgate_config::Config;
use plantgate_gateway::GatewayOptions;

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

/// Read diagram source from a file, or from stdin when the path is `-`.
pub(crate) fn read_source(input: &Path) -> Result<String, CliError> {
    if input.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

/// Gateway options derived from the loaded configuration.
pub(crate) fn gateway_options(config: &Config) -> GatewayOptions {
    GatewayOptions {
        max_source_bytes: config.engine.max_source_bytes,
        png_dpi: config.render.png_dpi,
        validate_timeout: config.engine.validate_timeout(),
    }
}
