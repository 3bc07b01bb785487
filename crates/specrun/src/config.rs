//! Run configuration.
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration:
//!
//! ```yaml
//! module_prefix: Test
//! operation_pattern: "^Test"
//! test_source_dir: src/test/vdm
//! record_coverage: true
//! coverage_source_dir: src/main/vdm
//! launch_dir: build/specrun/launch
//! launch_generation: failing
//! launch_project: stack-spec
//! violation_codes:
//!   precondition: [4055, 4071]
//! ```

use crate::coverage::CoverageRecorder;
use crate::discovery::{TestSelector, DEFAULT_MODULE_PREFIX, DEFAULT_OPERATION_PATTERN};
use crate::expectation::ViolationCodes;
use crate::launch::LaunchGeneration;
use crate::result::{SpecrunError, SpecrunResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default JUnit report directory
pub const DEFAULT_REPORT_DIR: &str = "build/specrun/junitreports";

/// Default coverage report directory
pub const DEFAULT_COVERAGE_DIR: &str = "build/specrun/coverage";

/// Default launch descriptor directory
pub const DEFAULT_LAUNCH_DIR: &str = "build/specrun/launch";

/// Configuration of one test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Module name prefix of test modules
    pub module_prefix: String,
    /// Regex matched against operation names
    pub operation_pattern: String,
    /// Only modules under this directory hold tests
    pub test_source_dir: Option<PathBuf>,
    /// Only modules under this directory are covered
    pub coverage_source_dir: Option<PathBuf>,
    /// Record source coverage
    pub record_coverage: bool,
    /// JUnit report directory
    pub report_dir: PathBuf,
    /// Coverage report directory
    pub coverage_dir: PathBuf,
    /// Launch descriptor directory
    pub launch_dir: Option<PathBuf>,
    /// Which tests get launch descriptors
    pub launch_generation: LaunchGeneration,
    /// IDE project name written into launch descriptors
    pub launch_project: Option<String>,
    /// Violation code sets
    pub violation_codes: ViolationCodes,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            module_prefix: DEFAULT_MODULE_PREFIX.to_string(),
            operation_pattern: DEFAULT_OPERATION_PATTERN.to_string(),
            test_source_dir: None,
            coverage_source_dir: None,
            record_coverage: false,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            coverage_dir: PathBuf::from(DEFAULT_COVERAGE_DIR),
            launch_dir: Some(PathBuf::from(DEFAULT_LAUNCH_DIR)),
            launch_generation: LaunchGeneration::default(),
            launch_project: None,
            violation_codes: ViolationCodes::default(),
        }
    }
}

impl RunConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from YAML
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is invalid
    pub fn from_yaml(yaml: &str) -> SpecrunResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> SpecrunResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| SpecrunError::config(format!("{}: {e}", path.display())))
    }

    /// Check settings that can only be judged together
    ///
    /// # Errors
    ///
    /// Returns a configuration error when launch generation is requested
    /// without a directory or project, or when the operation pattern is not
    /// a valid regex
    pub fn validate(&self) -> SpecrunResult<()> {
        self.selector()?;
        if self.launch_generation != LaunchGeneration::None {
            if self.launch_dir.is_none() {
                return Err(SpecrunError::config(
                    "asked to generate launch files, but no launch directory specified",
                ));
            }
            if self.launch_project.is_none() {
                return Err(SpecrunError::config(
                    "asked to generate launch files, but no launch project specified",
                ));
            }
        }
        for code in self.violation_codes.overlapping() {
            tracing::warn!("violation code {code} appears in more than one category");
        }
        Ok(())
    }

    /// Test selector for this configuration
    ///
    /// # Errors
    ///
    /// Returns error if the operation pattern is not a valid regex
    pub fn selector(&self) -> SpecrunResult<TestSelector> {
        let selector = TestSelector::new()
            .with_module_prefix(&self.module_prefix)
            .with_operation_pattern(&self.operation_pattern)?;
        Ok(match &self.test_source_dir {
            Some(dir) => selector.with_test_source_dir(dir),
            None => selector,
        })
    }

    /// Coverage recorder, if coverage is enabled
    #[must_use]
    pub fn recorder(&self) -> Option<CoverageRecorder> {
        if !self.record_coverage {
            return None;
        }
        let recorder = CoverageRecorder::new(&self.coverage_dir);
        Some(match &self.coverage_source_dir {
            Some(dir) => recorder.with_source_dir(dir),
            None => recorder,
        })
    }
}
