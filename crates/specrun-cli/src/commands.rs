//! CLI command definitions using clap

use crate::config::ColorChoice;
use clap::{Parser, Subcommand, ValueEnum};
use specrun::LaunchGeneration;
use std::path::PathBuf;

/// Specrun: naming-convention test runner for formal specifications
#[derive(Parser, Debug)]
#[command(name = "specrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run tests and write reports
    Test(TestArgs),

    /// List discovered tests without running them
    List(ListArgs),
}

/// Arguments for the test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Interpreter transcript (YAML or JSON)
    pub transcript: PathBuf,

    /// Run configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JUnit report directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Record source coverage
    #[arg(long)]
    pub coverage: bool,

    /// Coverage report directory
    #[arg(long)]
    pub coverage_dir: Option<PathBuf>,

    /// Only cover modules under this directory
    #[arg(long)]
    pub coverage_source_dir: Option<PathBuf>,

    /// Only run test modules under this directory
    #[arg(long)]
    pub test_source_dir: Option<PathBuf>,

    /// Launch descriptor directory
    #[arg(long)]
    pub launch_dir: Option<PathBuf>,

    /// Which tests get launch descriptors
    #[arg(long)]
    pub launch_generation: Option<LaunchArg>,

    /// IDE project name for launch descriptors
    #[arg(long)]
    pub launch_project: Option<String>,

    /// Module name prefix of test modules
    #[arg(long)]
    pub module_prefix: Option<String>,

    /// Regex matched against operation names
    #[arg(long)]
    pub operation_pattern: Option<String>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Interpreter transcript (YAML or JSON)
    pub transcript: PathBuf,

    /// Run configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Detect from terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Launch generation argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LaunchArg {
    /// Every test
    All,
    /// Failed and errored tests only
    Failing,
    /// No descriptors
    None,
}

impl From<LaunchArg> for LaunchGeneration {
    fn from(arg: LaunchArg) -> Self {
        match arg {
            LaunchArg::All => Self::All,
            LaunchArg::Failing => Self::Failing,
            LaunchArg::None => Self::None,
        }
    }
}
