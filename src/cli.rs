//! CLI domain: parse, route, output, and presentation only.
//! Record and replay live in `mirror`; this layer only wires flags to them.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{format_event, format_record_summary, format_replay_summary, TerminalObserver};
pub use route::RunContext;
