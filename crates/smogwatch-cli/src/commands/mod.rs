//! Command implementations for the CLI.

mod analyze;
mod anomalies;
mod correlations;
mod import;
mod predict;
mod trend;
mod watch;

use std::path::{Path, PathBuf};

use crate::format::FormatOptions;

pub use analyze::cmd_analyze;
pub use anomalies::cmd_anomalies;
pub use correlations::cmd_correlations;
pub use import::cmd_import;
pub use predict::cmd_predict;
pub use trend::cmd_trend;
pub use watch::{WatchArgs, cmd_watch};

/// Global options every command receives.
#[derive(Debug, Clone, Copy)]
pub struct GlobalArgs<'a> {
    /// Database path override.
    pub database: Option<&'a Path>,
    /// Output file, stdout when `None`.
    pub output: Option<&'a PathBuf>,
    pub no_color: bool,
}

impl GlobalArgs<'_> {
    /// Formatting options for a command's `--compact` flag.
    pub fn format_options(&self, compact: bool) -> FormatOptions {
        // Colors only make sense on a terminal
        FormatOptions::new(self.no_color || self.output.is_some()).with_compact(compact)
    }
}
