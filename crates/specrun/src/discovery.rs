//! Test discovery.
//!
//! A module is a test module when its name starts with the configured prefix
//! and, if a test source root is configured, every one of its files lies under
//! that root. Within a test module, every zero-argument operation whose name
//! matches the operation pattern is a test. Discovery order is load order for
//! modules and definition order for operations.

use crate::harness::TestSuite;
use crate::interpreter::{normalize_path, ModuleInfo};
use crate::result::{SpecrunError, SpecrunResult};
use regex::Regex;
use std::path::PathBuf;

/// Default module name prefix
pub const DEFAULT_MODULE_PREFIX: &str = "Test";

/// Default operation name pattern
pub const DEFAULT_OPERATION_PATTERN: &str = "^Test";

/// Selects test suites from the modules of a specification
#[derive(Debug, Clone)]
pub struct TestSelector {
    module_prefix: String,
    operation_pattern: Regex,
    test_source_dir: Option<PathBuf>,
}

impl Default for TestSelector {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            module_prefix: DEFAULT_MODULE_PREFIX.to_string(),
            operation_pattern: Regex::new(DEFAULT_OPERATION_PATTERN)
                .expect("default operation pattern is valid"),
            test_source_dir: None,
        }
    }
}

impl TestSelector {
    /// Create a selector with the default prefix and pattern
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module name prefix
    #[must_use]
    pub fn with_module_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.module_prefix = prefix.into();
        self
    }

    /// Set the operation name pattern
    pub fn with_operation_pattern(mut self, pattern: &str) -> SpecrunResult<Self> {
        self.operation_pattern =
            Regex::new(pattern).map_err(|source| SpecrunError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(self)
    }

    /// Only consider modules whose files all lie under `dir`
    #[must_use]
    pub fn with_test_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.test_source_dir = Some(normalize_path(&dir.into()));
        self
    }

    /// Whether a module is a test module
    #[must_use]
    pub fn is_test_module(&self, module: &ModuleInfo) -> bool {
        if !module.name.starts_with(&self.module_prefix) {
            return false;
        }
        match &self.test_source_dir {
            Some(dir) => module.files.iter().all(|f| f.starts_with(dir)),
            None => true,
        }
    }

    /// Collect test suites from the given modules
    #[must_use]
    pub fn discover(&self, modules: &[ModuleInfo]) -> Vec<TestSuite> {
        modules
            .iter()
            .filter(|m| self.is_test_module(m))
            .map(|module| {
                let tests = module
                    .operations
                    .iter()
                    .filter(|op| op.arity == 0 && self.operation_pattern.is_match(&op.name))
                    .map(|op| op.name.clone())
                    .collect();
                TestSuite::with_tests(&module.name, tests)
            })
            .collect()
    }
}
