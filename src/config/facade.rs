//! ConfigLoader facade composing sources under the merge policy.

use super::merge_policy;
use super::sources::{environment, global_file};
use super::MirrorConfig;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    /// Precedence: defaults (lowest) -> global file -> environment (highest).
    pub fn load() -> Result<MirrorConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a specific file with environment overlay.
    /// The file replaces the global file and must exist.
    pub fn load_from_file(path: &Path) -> Result<MirrorConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load from `path` when given, otherwise from the standard sources.
    pub fn load_optional(path: Option<&Path>) -> Result<MirrorConfig, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}
