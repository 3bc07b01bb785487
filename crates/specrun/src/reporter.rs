//! Reporter - JUnit XML reports and run summaries
//!
//! # Report layout
//!
//! ```text
//! <report_dir>/
//! ├── TEST-TestStack.xml
//! └── TEST-TestQueue.xml
//! ```
//!
//! One XML document per suite. The report directory is deleted and recreated
//! before the first document is written, so a report directory never mixes
//! results from two runs.

use crate::harness::{TestSuiteResult, Verdict};
use crate::result::SpecrunResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Timestamp format used by the `timestamp` attribute
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a millisecond duration as `seconds.millis`
#[must_use]
pub fn format_time(duration_millis: u64) -> String {
    format!("{}.{:03}", duration_millis / 1000, duration_millis % 1000)
}

/// Render the JUnit XML document for one suite
#[must_use]
pub fn render_junit(suite: &TestSuiteResult, hostname: &str) -> String {
    let mut xml = String::new();

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<testsuite name="{}" tests="{}" failures="{}" errors="{}" time="{}" timestamp="{}" hostname="{}""#,
        escape_xml(&suite.module_name),
        suite.test_count(),
        suite.fail_count(),
        suite.error_count(),
        format_time(suite.duration_millis()),
        suite.timestamp.format(TIMESTAMP_FORMAT),
        escape_xml(hostname)
    ));

    if suite.results.is_empty() {
        xml.push_str("/>\n");
        return xml;
    }
    xml.push_str(">\n");

    for result in &suite.results {
        let open = format!(
            r#"  <testcase name="{}" classname="{}" time="{}""#,
            escape_xml(&result.test_name),
            escape_xml(&suite.module_name),
            format_time(result.duration_millis)
        );
        let tag = match result.verdict {
            Verdict::Pass => None,
            Verdict::Fail => Some("failure"),
            Verdict::Error => Some("error"),
        };
        match tag {
            None => {
                xml.push_str(&open);
                xml.push_str("/>\n");
            }
            Some(tag) => {
                xml.push_str(&open);
                xml.push_str(">\n");
                xml.push_str(&format!(
                    r#"    <{tag} message="{}"/>"#,
                    escape_xml(result.message.as_deref().unwrap_or_default())
                ));
                xml.push('\n');
                xml.push_str("  </testcase>\n");
            }
        }
    }

    xml.push_str("</testsuite>\n");
    xml
}

/// File name of the JUnit report for a module
#[must_use]
pub fn junit_file_name(module_name: &str) -> String {
    format!("TEST-{module_name}.xml")
}

/// Write one JUnit report per suite into a freshly recreated directory
///
/// # Errors
///
/// Returns error if the directory cannot be recreated or a file cannot be
/// written
pub fn write_junit_reports(
    dir: &Path,
    results: &[TestSuiteResult],
    hostname: &str,
) -> SpecrunResult<Vec<PathBuf>> {
    recreate_dir(dir)?;
    let mut written = Vec::with_capacity(results.len());
    for suite in results {
        let path = dir.join(junit_file_name(&suite.module_name));
        std::fs::write(&path, render_junit(suite, hostname))?;
        tracing::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Delete `dir` if it exists, then create it empty
///
/// # Errors
///
/// Returns error on any filesystem failure
pub fn recreate_dir(dir: &Path) -> SpecrunResult<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Totals over all suites of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Tests run
    pub tests: usize,
    /// Tests failed
    pub failures: usize,
    /// Tests errored
    pub errors: usize,
}

impl RunSummary {
    /// Summarize suite results
    #[must_use]
    pub fn from_results(results: &[TestSuiteResult]) -> Self {
        results.iter().fold(Self::default(), |acc, suite| Self {
            tests: acc.tests + suite.test_count(),
            failures: acc.failures + suite.fail_count(),
            errors: acc.errors + suite.error_count(),
        })
    }

    /// Whether every test passed
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }

    /// Log the summary line
    pub fn log(&self) {
        tracing::info!("{self}");
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.succeeded() {
            write!(f, "SUCCESS -- {} tests passed", self.tests)
        } else {
            write!(
                f,
                "FAILURE -- {} tests failed, {} tests had errors [{} tests were run]",
                self.failures, self.errors, self.tests
            )
        }
    }
}

/// Escape XML special characters
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::harness::TestResult;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn timestamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
    }

    fn mixed_suite() -> TestSuiteResult {
        TestSuiteResult::new(
            "TestStack",
            timestamp(),
            vec![
                TestResult::pass("TestPush", 1200),
                TestResult::fail("TestPop", 30, "test passed, but expected precondition failure"),
                TestResult::error("TestPeek", 5, "Error 4034: Name 'x' not in scope"),
            ],
        )
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_time() {
            assert_eq!(format_time(103_435), "103.435");
            assert_eq!(format_time(0), "0.000");
            assert_eq!(format_time(7), "0.007");
            assert_eq!(format_time(1_050), "1.050");
        }

        #[test]
        fn test_escape_xml() {
            assert_eq!(
                escape_xml(r#"<a href="x">&'</a>"#),
                "&lt;a href=&quot;x&quot;&gt;&amp;&apos;&lt;/a&gt;"
            );
        }

        #[test]
        fn test_file_name() {
            assert_eq!(junit_file_name("TestStack"), "TEST-TestStack.xml");
        }
    }

    mod junit_tests {
        use super::*;

        #[test]
        fn test_header_and_suite_attributes() {
            let xml = render_junit(&mixed_suite(), "build-host");
            assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
            assert!(xml.contains(
                r#"<testsuite name="TestStack" tests="3" failures="1" errors="1" time="1.235" timestamp="2024-03-01 09:05:07" hostname="build-host">"#
            ));
            assert!(xml.ends_with("</testsuite>\n"));
        }

        #[test]
        fn test_passing_case_is_self_closing() {
            let xml = render_junit(&mixed_suite(), "h");
            assert!(xml.contains(
                "  <testcase name=\"TestPush\" classname=\"TestStack\" time=\"1.200\"/>\n"
            ));
        }

        #[test]
        fn test_failure_and_error_children() {
            let xml = render_junit(&mixed_suite(), "h");
            assert!(xml.contains(
                "  <testcase name=\"TestPop\" classname=\"TestStack\" time=\"0.030\">\n    <failure message=\"test passed, but expected precondition failure\"/>\n  </testcase>\n"
            ));
            assert!(xml.contains(
                "    <error message=\"Error 4034: Name &apos;x&apos; not in scope\"/>\n"
            ));
        }

        #[test]
        fn test_empty_suite() {
            let suite = TestSuiteResult::new("TestNothing", timestamp(), Vec::new());
            let xml = render_junit(&suite, "h");
            assert!(xml.contains(r#"tests="0" failures="0" errors="0" time="0.000""#));
            assert!(xml.ends_with("hostname=\"h\"/>\n"));
            assert_eq!(xml.matches("<testcase").count(), 0);
        }
    }

    mod write_tests {
        use super::*;

        #[test]
        fn test_write_replaces_previous_reports() {
            let tmp = TempDir::new().unwrap();
            let dir = tmp.path().join("junitreports");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("TEST-Stale.xml"), "old").unwrap();

            let written = write_junit_reports(&dir, &[mixed_suite()], "h").unwrap();
            assert_eq!(written, vec![dir.join("TEST-TestStack.xml")]);
            assert!(!dir.join("TEST-Stale.xml").exists());
            let content = std::fs::read_to_string(&written[0]).unwrap();
            assert!(content.contains("TestPush"));
        }

        #[test]
        fn test_write_creates_missing_dir() {
            let tmp = TempDir::new().unwrap();
            let dir = tmp.path().join("a").join("b");
            write_junit_reports(&dir, &[], "h").unwrap();
            assert!(dir.is_dir());
        }
    }

    mod summary_tests {
        use super::*;

        #[test]
        fn test_success_line() {
            let suite = TestSuiteResult::new(
                "TestA",
                timestamp(),
                vec![TestResult::pass("t1", 1), TestResult::pass("t2", 1)],
            );
            let summary = RunSummary::from_results(&[suite]);
            assert!(summary.succeeded());
            assert_eq!(summary.to_string(), "SUCCESS -- 2 tests passed");
        }

        #[test]
        fn test_failure_line() {
            let summary = RunSummary::from_results(&[mixed_suite(), mixed_suite()]);
            assert!(!summary.succeeded());
            assert_eq!(
                summary.to_string(),
                "FAILURE -- 2 tests failed, 2 tests had errors [6 tests were run]"
            );
        }
    }
}
