//! Merge rules: defaults applied before any file or environment source.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

use super::DEFAULT_STAGING_DIR;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("scan.ignore_patterns", Vec::<String>::new())?
        .set_default("replay.staging_dir", DEFAULT_STAGING_DIR)?
        .set_default("replay.prune_empty_dirs", false)
}
