//! Specrun CLI: command-line interface for the specification test runner
//!
//! ## Usage
//!
//! ```bash
//! specrun test transcript.yaml                      # Run tests, write JUnit reports
//! specrun test transcript.yaml --coverage           # Also write the HTML coverage report
//! specrun test transcript.yaml --launch-generation all --launch-project stack
//! specrun list transcript.yaml                      # Show discovered tests
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, LaunchArg, ListArgs, TestArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
pub use runner::{local_hostname, SessionOutcome, SessionRunner};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the filter follows the verbosity.
/// Logs go to stderr so stdout stays free for command output.
pub fn init_logging(config: &CliConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(config.color.should_color())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the CLI configuration from parsed arguments
#[must_use]
pub fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
}
