//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions
//! - Tests

pub mod list;

pub use list::{execute_list, render_list};
pub use test::{build_run_config, execute_test};
