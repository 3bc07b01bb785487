//! Source Coverage
//!
//! ```text
//! CoverageSource ──► CoverageRecorder ──► FileCoverage ──► aggregate()
//!                                              │                │
//!                                              ▼                ▼
//!                                        render_file()    render_index()
//!                                              │                │
//!                                              ▼                ▼
//!                                        <module>.html      report.html
//! ```

pub mod formatters;
mod recorder;
mod report;

pub use formatters::{render_file, render_index};
pub use recorder::{CoverageRecorder, INDEX_PAGE};
pub use report::{aggregate, format_percent, percent, CoverageSummary, FileCoverage, FileStats};
