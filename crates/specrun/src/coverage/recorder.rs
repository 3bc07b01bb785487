//! Coverage recording.
//!
//! Snapshots the interpreter's location hit table once all suites have run
//! and writes the HTML report tree.

use super::formatters::{render_file, render_index};
use super::report::{aggregate, format_percent, CoverageSummary, FileCoverage};
use crate::interpreter::{normalize_path, CoverageSource, ModuleInfo};
use crate::reporter::recreate_dir;
use crate::result::SpecrunResult;
use std::path::{Path, PathBuf};

/// File name of the coverage index page
pub const INDEX_PAGE: &str = "report.html";

/// Collects coverage from an interpreter and writes the HTML report
#[derive(Debug, Clone)]
pub struct CoverageRecorder {
    source_dir: Option<PathBuf>,
    output_dir: PathBuf,
}

impl CoverageRecorder {
    /// Create a recorder writing into `output_dir`
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: None,
            output_dir: output_dir.into(),
        }
    }

    /// Only record modules whose files all lie under `dir`
    #[must_use]
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(normalize_path(&dir.into()));
        self
    }

    /// Output directory
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build per-file coverage for the selected modules
    ///
    /// # Errors
    ///
    /// Returns error if the hit table or the source text of a file cannot be
    /// read
    pub fn collect(
        &self,
        source: &dyn CoverageSource,
        modules: &[ModuleInfo],
    ) -> SpecrunResult<Vec<FileCoverage>> {
        let mut files = Vec::new();
        for module in modules.iter().filter(|m| self.includes(m)) {
            for file in &module.files {
                let coverage =
                    FileCoverage::new(file, &module.name, source.source_text(file)?)
                        .with_hits(source.location_hits(file)?);
                files.push(coverage);
            }
        }
        Ok(files)
    }

    fn includes(&self, module: &ModuleInfo) -> bool {
        self.source_dir
            .as_ref()
            .map_or(true, |dir| module.files.iter().all(|f| f.starts_with(dir)))
    }

    /// Record coverage and write the report.
    ///
    /// The output directory is always cleared. Pages are written only when at
    /// least one location exists; `None` is returned otherwise. Every page is
    /// rendered before the directory is touched, so a rendering failure leaves
    /// an empty directory rather than a partial report.
    ///
    /// # Errors
    ///
    /// Returns error on overlapping or out-of-range locations and on any
    /// filesystem failure
    pub fn record(
        &self,
        source: &dyn CoverageSource,
        modules: &[ModuleInfo],
    ) -> SpecrunResult<Option<CoverageSummary>> {
        let files = self.collect(source, modules)?;
        let summary = aggregate(&files);

        let pages: SpecrunResult<Vec<(String, String)>> = if summary.is_empty() {
            Ok(Vec::new())
        } else {
            files
                .iter()
                .map(|f| render_file(f).map(|html| (f.page_name(), html)))
                .collect()
        };
        recreate_dir(&self.output_dir)?;
        let pages = pages?;

        if summary.is_empty() {
            tracing::debug!("no coverage locations recorded");
            return Ok(None);
        }
        tracing::info!("COVERAGE -- {}", format_percent(summary.percent()));

        for (name, html) in pages {
            std::fs::write(self.output_dir.join(name), html)?;
        }
        std::fs::write(self.output_dir.join(INDEX_PAGE), render_index(&summary))?;
        Ok(Some(summary))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::location::{Location, LocationHit};
    use crate::result::SpecrunError;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeSource {
        texts: HashMap<PathBuf, String>,
        hits: HashMap<PathBuf, Vec<LocationHit>>,
    }

    impl FakeSource {
        fn with_file(mut self, path: &str, text: &str, hits: Vec<LocationHit>) -> Self {
            self.texts.insert(PathBuf::from(path), text.to_string());
            self.hits.insert(PathBuf::from(path), hits);
            self
        }
    }

    impl CoverageSource for FakeSource {
        fn location_hits(&self, file: &Path) -> SpecrunResult<Vec<LocationHit>> {
            Ok(self.hits.get(file).cloned().unwrap_or_default())
        }

        fn source_text(&self, file: &Path) -> SpecrunResult<String> {
            self.texts.get(file).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, file.display().to_string())
                    .into()
            })
        }
    }

    fn module(name: &str, file: &str) -> ModuleInfo {
        ModuleInfo {
            name: name.to_string(),
            files: vec![PathBuf::from(file)],
            operations: Vec::new(),
        }
    }

    fn hit(col: u32, hits: u64) -> LocationHit {
        LocationHit::new(Location::new(1, col, 1, col + 1), hits)
    }

    fn source() -> FakeSource {
        FakeSource::default()
            .with_file("src/main/Stack.vdmsl", "abc", vec![hit(1, 1), hit(2, 0), hit(3, 2)])
            .with_file("src/test/TestStack.vdmsl", "xy", vec![hit(1, 1), hit(2, 1)])
    }

    fn modules() -> Vec<ModuleInfo> {
        vec![
            module("Stack", "src/main/Stack.vdmsl"),
            module("TestStack", "src/test/TestStack.vdmsl"),
        ]
    }

    #[test]
    fn test_record_writes_pages_and_index() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("coverage");
        let summary = CoverageRecorder::new(&out)
            .record(&source(), &modules())
            .unwrap()
            .unwrap();

        assert_eq!(summary.covered, 4);
        assert_eq!(summary.total, 5);
        assert!(out.join("Stack.html").exists());
        assert!(out.join("TestStack.html").exists());
        let index = std::fs::read_to_string(out.join(INDEX_PAGE)).unwrap();
        assert!(index.contains("Overall 4 of 5 locations were hit: <b>80.00%</b>"));
    }

    #[test]
    fn test_source_dir_filter() {
        let tmp = TempDir::new().unwrap();
        let recorder = CoverageRecorder::new(tmp.path()).with_source_dir("src/main");
        let files = recorder.collect(&source(), &modules()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].module_name, "Stack");
        assert_eq!(files[0].source_text, "abc");
    }

    #[test]
    fn test_nothing_written_without_locations() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("coverage");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("Stale.html"), "old").unwrap();

        let src = FakeSource::default().with_file("a.vdmsl", "a", Vec::new());
        let result = CoverageRecorder::new(&out)
            .record(&src, &[module("A", "a.vdmsl")])
            .unwrap();
        assert!(result.is_none());
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_overlap_leaves_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("coverage");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join(INDEX_PAGE), "old").unwrap();

        let src = FakeSource::default().with_file(
            "a.vdmsl",
            "abcdef",
            vec![
                LocationHit::new(Location::new(1, 1, 1, 5), 1),
                LocationHit::new(Location::new(1, 2, 1, 3), 1),
            ],
        );
        let err = CoverageRecorder::new(&out)
            .record(&src, &[module("A", "a.vdmsl")])
            .unwrap_err();
        assert!(matches!(err, SpecrunError::OverlappingLocations { .. }));
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_source_text() {
        let tmp = TempDir::new().unwrap();
        let err = CoverageRecorder::new(tmp.path())
            .record(&FakeSource::default(), &[module("A", "missing.vdmsl")])
            .unwrap_err();
        assert!(matches!(err, SpecrunError::Io(_)));
    }
}
