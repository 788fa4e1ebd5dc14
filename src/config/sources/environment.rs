//! Environment variable source: LAYOUT_MIRROR__* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix for configuration environment variables
pub const ENV_PREFIX: &str = "LAYOUT_MIRROR";

/// Add environment variable overlay to builder.
///
/// `LAYOUT_MIRROR__REPLAY__PRUNE_EMPTY_DIRS=true` sets `replay.prune_empty_dirs`.
/// `scan.ignore_patterns` accepts a comma-separated list.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(source()))
}

pub(crate) fn source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("scan.ignore_patterns")
        .try_parsing(true)
}
