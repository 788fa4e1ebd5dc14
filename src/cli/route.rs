//! CLI route: run context and dispatch to record / replay.

use crate::cli::parse::{Cli, Commands, OutputFormat};
use crate::cli::presentation::{format_record_summary, format_replay_summary, TerminalObserver};
use crate::config::{ConfigLoader, MirrorConfig};
use crate::error::MirrorError;
use crate::mirror::{self, MirrorOptions};
use crate::progress::MirrorObserver;
use std::io::IsTerminal;
use std::path::Path;

/// Runtime context for CLI execution: effective configuration and switches.
pub struct RunContext {
    config: MirrorConfig,
    options: MirrorOptions,
    format: OutputFormat,
    color: bool,
}

impl RunContext {
    /// Load and validate configuration (explicit file or standard sources).
    pub fn load_config(config_path: Option<&Path>) -> Result<MirrorConfig, MirrorError> {
        let config = ConfigLoader::load_optional(config_path)?;
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            MirrorError::Config(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(config)
    }

    /// Build a context from already-loaded configuration and parsed flags.
    pub fn new(config: MirrorConfig, cli: &Cli) -> Self {
        let color = config.logging.color && std::io::stdout().is_terminal();
        Self {
            config,
            options: MirrorOptions {
                verbose: cli.verbose,
                dry_run: cli.dry_run,
            },
            format: cli.format,
            color,
        }
    }

    /// Execute a command, printing progress to stderr, returning the summary.
    pub fn execute(&self, command: &Commands) -> Result<String, MirrorError> {
        self.execute_with_observer(command, &TerminalObserver)
    }

    /// Execute a command reporting progress to `observer`.
    pub fn execute_with_observer(
        &self,
        command: &Commands,
        observer: &dyn MirrorObserver,
    ) -> Result<String, MirrorError> {
        match command {
            Commands::Record { directory, file } => {
                let summary = mirror::record(directory, file, &self.config, self.options, observer)?;
                format_record_summary(&summary, self.format, self.color)
            }
            Commands::Replay { directory, file } => {
                let summary = mirror::replay(directory, file, &self.config, self.options, observer)?;
                format_replay_summary(&summary, self.format, self.color)
            }
        }
    }
}
