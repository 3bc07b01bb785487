//! Coverage Aggregation
//!
//! Reduces per-file location hit tables to covered/total counts and
//! percentages, per file and overall.

use crate::location::{Location, LocationHit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Coverage of one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverage {
    /// Path of the source file
    pub file_path: PathBuf,
    /// Module the file belongs to
    pub module_name: String,
    /// Raw source text
    pub source_text: String,
    /// Hit count per location
    pub location_hits: BTreeMap<Location, u64>,
}

impl FileCoverage {
    /// Create coverage for a file with no locations yet
    #[must_use]
    pub fn new(
        file_path: impl Into<PathBuf>,
        module_name: impl Into<String>,
        source_text: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            module_name: module_name.into(),
            source_text: source_text.into(),
            location_hits: BTreeMap::new(),
        }
    }

    /// Add location hits; a repeated location keeps the last count
    #[must_use]
    pub fn with_hits(mut self, hits: impl IntoIterator<Item = LocationHit>) -> Self {
        self.location_hits
            .extend(hits.into_iter().map(|h| (h.location, h.hits)));
        self
    }

    /// Number of locations hit at least once
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.location_hits.values().filter(|&&hits| hits > 0).count()
    }

    /// Number of locations
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.location_hits.len()
    }

    /// File name shown in the index
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.file_path)
    }

    /// Name of the per-file report page
    #[must_use]
    pub fn page_name(&self) -> String {
        format!("{}.html", self.module_name)
    }

    /// Summary statistics for this file
    #[must_use]
    pub fn stats(&self) -> FileStats {
        FileStats {
            file_name: self.display_name(),
            page_name: self.page_name(),
            covered: self.covered_count(),
            total: self.total_count(),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Per-file row of the coverage index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    /// File name
    pub file_name: String,
    /// Per-file report page
    pub page_name: String,
    /// Covered locations
    pub covered: usize,
    /// Total locations
    pub total: usize,
}

impl FileStats {
    /// Coverage percentage
    #[must_use]
    pub fn percent(&self) -> f64 {
        percent(self.covered, self.total)
    }
}

/// Coverage summary statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Per-file rows, in input order
    pub files: Vec<FileStats>,
    /// Covered locations over all files
    pub covered: usize,
    /// Total locations over all files
    pub total: usize,
}

impl CoverageSummary {
    /// Overall coverage percentage
    #[must_use]
    pub fn percent(&self) -> f64 {
        percent(self.covered, self.total)
    }

    /// Whether there is anything to report
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Aggregate per-file coverage into a summary
#[must_use]
pub fn aggregate(files: &[FileCoverage]) -> CoverageSummary {
    let files: Vec<FileStats> = files.iter().map(FileCoverage::stats).collect();
    let covered = files.iter().map(|f| f.covered).sum();
    let total = files.iter().map(|f| f.total).sum();
    CoverageSummary {
        files,
        covered,
        total,
    }
}

/// Percentage of `covered` in `total`; 100 when there is nothing to cover
#[must_use]
pub fn percent(covered: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        100.0 * covered as f64 / total as f64
    }
}

/// Format a percentage with two decimals
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, hits: &[u64]) -> FileCoverage {
        FileCoverage::new(format!("src/{name}.vdmsl"), name, "").with_hits(
            hits.iter()
                .enumerate()
                .map(|(i, &h)| LocationHit::new(Location::new(i as u32 + 1, 1, i as u32 + 1, 2), h)),
        )
    }

    #[test]
    fn test_file_counts() {
        let fc = file("Stack", &[1, 0, 5]);
        assert_eq!(fc.covered_count(), 2);
        assert_eq!(fc.total_count(), 3);
        assert_eq!(fc.display_name(), "Stack.vdmsl");
        assert_eq!(fc.page_name(), "Stack.html");
    }

    #[test]
    fn test_aggregate_three_locations() {
        let summary = aggregate(&[file("A", &[1, 0, 5])]);
        assert_eq!(summary.covered, 2);
        assert_eq!(summary.total, 3);
        assert!((summary.percent() - 66.666_666).abs() < 1e-3);
        assert_eq!(format_percent(summary.percent()), "66.67%");
    }

    #[test]
    fn test_aggregate_over_files() {
        let summary = aggregate(&[file("A", &[1, 1]), file("B", &[0, 0])]);
        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.files[0].percent(), 100.0);
        assert_eq!(summary.files[1].percent(), 0.0);
        assert_eq!(summary.covered, 2);
        assert_eq!(summary.total, 4);
        assert_eq!(format_percent(summary.percent()), "50.00%");
    }

    #[test]
    fn test_empty_is_full_coverage() {
        assert_eq!(percent(0, 0), 100.0);
        let summary = aggregate(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.percent(), 100.0);
        assert_eq!(aggregate(&[file("Empty", &[])]).files[0].percent(), 100.0);
    }

    #[test]
    fn test_repeated_location_keeps_last() {
        let loc = Location::new(1, 1, 1, 2);
        let fc = FileCoverage::new("a", "A", "")
            .with_hits([LocationHit::new(loc, 3), LocationHit::new(loc, 0)]);
        assert_eq!(fc.total_count(), 1);
        assert_eq!(fc.covered_count(), 0);
    }
}
