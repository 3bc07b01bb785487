//! Test session orchestration

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::ProgressReporter;
use specrun::launch::write_launch_files;
use specrun::reporter::write_junit_reports;
use specrun::{
    CoverageSummary, Interpreter, RunConfig, RunSummary, ScriptedInterpreter, TestRunner,
    TestSuite,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Everything one test session produced
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Totals over all suites
    pub summary: RunSummary,
    /// Coverage totals, when coverage was recorded and non-empty
    pub coverage: Option<CoverageSummary>,
    /// JUnit report files
    pub report_files: Vec<PathBuf>,
    /// Launch descriptor files
    pub launch_files: Vec<PathBuf>,
    /// Wall-clock duration of the session
    pub duration: Duration,
}

/// Runs one transcript through the whole pipeline
#[derive(Debug)]
pub struct SessionRunner {
    config: CliConfig,
    run_config: RunConfig,
    hostname: String,
}

impl SessionRunner {
    /// Create a runner
    #[must_use]
    pub fn new(config: CliConfig, run_config: RunConfig) -> Self {
        Self {
            config,
            run_config,
            hostname: local_hostname(),
        }
    }

    /// Override the hostname written into JUnit reports
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Run configuration in effect
    #[must_use]
    pub const fn run_config(&self) -> &RunConfig {
        &self.run_config
    }

    /// Load, check, discover, run and report.
    ///
    /// Reports are written before returning even when tests fail; the caller
    /// decides the exit status from the summary.
    ///
    /// # Errors
    ///
    /// Returns error if the transcript cannot be loaded or checked, or a
    /// report cannot be written
    pub fn run(&self, transcript: &Path) -> CliResult<SessionOutcome> {
        let start = Instant::now();
        let mut interpreter = ScriptedInterpreter::load(transcript)?;
        interpreter.check()?;

        let modules = interpreter.modules();
        let suites = self.run_config.selector()?.discover(&modules);
        tracing::debug!("discovered {} test modules", suites.len());
        if suites.is_empty() {
            tracing::warn!("no test modules found in {}", transcript.display());
        }

        let mut reporter = ProgressReporter::new(
            self.config.color.should_color(),
            self.config.verbosity.is_quiet(),
        );
        reporter.start_progress(total_tests(&suites), "running tests");
        let results = TestRunner::new(&mut interpreter)
            .with_codes(self.run_config.violation_codes.clone())
            .with_observer(&mut reporter)
            .run(&suites)?;
        reporter.finish();

        let report_files =
            write_junit_reports(&self.run_config.report_dir, &results, &self.hostname)?;

        let summary = RunSummary::from_results(&results);
        summary.log();

        let coverage = match self.run_config.recorder() {
            Some(recorder) => recorder.record(&interpreter, &modules)?,
            None => None,
        };

        let launch_files = write_launch_files(
            self.run_config.launch_dir.as_deref(),
            self.run_config.launch_generation,
            self.run_config.launch_project.as_deref(),
            &results,
        )?;

        if self.config.verbosity.is_verbose() {
            for path in report_files.iter().chain(&launch_files) {
                reporter.info(&format!("wrote {}", path.display()));
            }
        }

        let duration = start.elapsed();
        tracing::debug!("session finished in {:.2}s", duration.as_secs_f64());
        Ok(SessionOutcome {
            summary,
            coverage,
            report_files,
            launch_files,
            duration,
        })
    }
}

fn total_tests(suites: &[TestSuite]) -> u64 {
    suites.iter().map(|s| s.test_count() as u64).sum()
}

/// Host name for JUnit reports, `localhost` when it cannot be determined
#[must_use]
pub fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string())
}
