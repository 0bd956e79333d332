use std::path::Path;

use outline_core::OutlineConfig;

use crate::prelude::*;

/// Defaults when no file is given, otherwise the parsed and validated file.
pub fn load(path: Option<&Path>) -> Result<OutlineConfig> {
    let Some(path) = path else {
        return Ok(OutlineConfig::default());
    };

    let source = std::fs::read_to_string(path)
        .with_context(|| f!("Failed to read config file {}", path.display()))?;

    let config = OutlineConfig::from_toml_str(&source)
        .with_context(|| f!("Invalid config file {}", path.display()))?;

    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}
