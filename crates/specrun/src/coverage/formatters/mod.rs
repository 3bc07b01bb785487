//! Coverage Report Formatters
//!
//! HTML source pages and the coverage index.

mod html;

pub use html::{render_file, render_index};
