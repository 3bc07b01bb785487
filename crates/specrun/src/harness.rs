//! Test harness for running specification test suites.
//!
//! # Verdicts
//!
//! ```text
//! ┌──────────────────────┬──────────────────┬────────────────────────────┐
//! │ outcome              │ expected         │ verdict                    │
//! ├──────────────────────┼──────────────────┼────────────────────────────┤
//! │ normal return        │ success          │ Pass                       │
//! │ normal return        │ any failure      │ Fail "test passed, but…"   │
//! │ postcondition        │ postcondition    │ Pass                       │
//! │ postcondition        │ anything else    │ Fail (violation message)   │
//! │ precondition         │ precondition     │ Pass                       │
//! │ invariant            │ invariant        │ Pass                       │
//! │ any other violation  │ -                │ Error (violation message)  │
//! └──────────────────────┴──────────────────┴────────────────────────────┘
//! ```
//!
//! Postcondition violations are the specification asserting something about
//! the result of a test, so an unexpected one is a failure. Any other
//! unexpected violation is an error.

use crate::expectation::{ExpectedOutcome, ViolationCategory, ViolationCodes};
use crate::interpreter::{Interpreter, Violation};
use crate::result::SpecrunResult;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// The tests of one module, in discovery order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    /// Module name
    pub module_name: String,
    /// Test operation names
    pub test_names: Vec<String>,
}

impl TestSuite {
    /// Create a new, empty test suite
    #[must_use]
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            test_names: Vec::new(),
        }
    }

    /// Create a test suite with the given tests
    #[must_use]
    pub fn with_tests(module_name: impl Into<String>, test_names: Vec<String>) -> Self {
        Self {
            module_name: module_name.into(),
            test_names,
        }
    }

    /// Add a test operation
    pub fn add_test(&mut self, test_name: impl Into<String>) {
        self.test_names.push(test_name.into());
    }

    /// Get the number of tests
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.test_names.len()
    }
}

/// Three-way outcome of one test execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Outcome matched the expectation
    Pass,
    /// The specification contradicted the test's declared intent
    Fail,
    /// An interpreter condition the classifier does not understand
    Error,
}

impl Verdict {
    /// Short label used in log lines
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Error => "ERRR",
        }
    }

    /// Check if verdict is passing
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a single test execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestState {
    /// Not yet invoked
    NotStarted,
    /// Invocation in progress
    Running,
    /// Terminal state
    Finished(Verdict),
}

/// Result of running a single test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test operation name
    pub test_name: String,
    /// Wall-clock duration in milliseconds
    pub duration_millis: u64,
    /// Verdict
    pub verdict: Verdict,
    /// Failure or error message
    pub message: Option<String>,
}

impl TestResult {
    /// Create a passing test result
    #[must_use]
    pub fn pass(test_name: impl Into<String>, duration_millis: u64) -> Self {
        Self {
            test_name: test_name.into(),
            duration_millis,
            verdict: Verdict::Pass,
            message: None,
        }
    }

    /// Create a failing test result
    #[must_use]
    pub fn fail(
        test_name: impl Into<String>,
        duration_millis: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            duration_millis,
            verdict: Verdict::Fail,
            message: Some(message.into()),
        }
    }

    /// Create an errored test result
    #[must_use]
    pub fn error(
        test_name: impl Into<String>,
        duration_millis: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            duration_millis,
            verdict: Verdict::Error,
            message: Some(message.into()),
        }
    }

    /// Duration as a [`Duration`]
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_millis)
    }
}

/// Results of one suite in one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuiteResult {
    /// Module name
    pub module_name: String,
    /// Start of the run this suite belongs to
    pub timestamp: NaiveDateTime,
    /// Results in execution order
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    /// Create a suite result
    #[must_use]
    pub fn new(
        module_name: impl Into<String>,
        timestamp: NaiveDateTime,
        results: Vec<TestResult>,
    ) -> Self {
        Self {
            module_name: module_name.into(),
            timestamp,
            results,
        }
    }

    /// Get total test count
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.results.len()
    }

    /// Count passed tests
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.count(Verdict::Pass)
    }

    /// Count failed tests
    #[must_use]
    pub fn fail_count(&self) -> usize {
        self.count(Verdict::Fail)
    }

    /// Count errored tests
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Verdict::Error)
    }

    /// Sum of test durations in milliseconds
    #[must_use]
    pub fn duration_millis(&self) -> u64 {
        self.results.iter().map(|r| r.duration_millis).sum()
    }

    /// Check if all tests passed
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.results.iter().all(|r| r.verdict.is_pass())
    }

    /// Tests that did not pass
    #[must_use]
    pub fn unsuccessful(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.verdict.is_pass()).collect()
    }

    fn count(&self, verdict: Verdict) -> usize {
        self.results.iter().filter(|r| r.verdict == verdict).count()
    }
}

/// Decide the verdict for one invocation outcome.
///
/// Returns the verdict and, for `Fail` and `Error`, the message to report.
#[must_use]
pub fn decide(
    expected: ExpectedOutcome,
    outcome: &Result<(), Violation>,
    codes: &ViolationCodes,
) -> (Verdict, Option<String>) {
    match outcome {
        Ok(()) if expected == ExpectedOutcome::Success => (Verdict::Pass, None),
        Ok(()) => (
            Verdict::Fail,
            Some(format!("test passed, but expected {}", expected.description())),
        ),
        Err(violation) => match codes.category_of(violation.code) {
            ViolationCategory::Postcondition
                if expected == ExpectedOutcome::ExpectPostconditionFailure =>
            {
                (Verdict::Pass, None)
            }
            ViolationCategory::Postcondition => (Verdict::Fail, Some(violation.message.clone())),
            category if expected.expected_category() == Some(category) => (Verdict::Pass, None),
            _ => (Verdict::Error, Some(violation.message.clone())),
        },
    }
}

/// Receives progress notifications while a run is in flight
pub trait RunObserver {
    /// A suite is about to run
    fn suite_started(&mut self, _suite: &TestSuite) {}

    /// A test reached its terminal state
    fn test_finished(&mut self, _module_name: &str, _result: &TestResult) {}
}

impl<T: RunObserver + ?Sized> RunObserver for &mut T {
    fn suite_started(&mut self, suite: &TestSuite) {
        (**self).suite_started(suite);
    }

    fn test_finished(&mut self, module_name: &str, result: &TestResult) {
        (**self).test_finished(module_name, result);
    }
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// One test operation moving through [`TestState`]
#[derive(Debug)]
pub struct TestExecution<'a> {
    module_name: &'a str,
    test_name: &'a str,
    expected: ExpectedOutcome,
    state: TestState,
}

impl<'a> TestExecution<'a> {
    /// Prepare a test for execution
    #[must_use]
    pub fn new(module_name: &'a str, test_name: &'a str) -> Self {
        Self {
            module_name,
            test_name,
            expected: ExpectedOutcome::classify(test_name),
            state: TestState::NotStarted,
        }
    }

    /// Outcome this test expects
    #[must_use]
    pub const fn expected(&self) -> ExpectedOutcome {
        self.expected
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> TestState {
        self.state
    }

    /// Invoke the operation once and resolve the verdict
    pub fn execute(
        &mut self,
        interpreter: &mut dyn Interpreter,
        codes: &ViolationCodes,
    ) -> TestResult {
        self.state = TestState::Running;
        let start = Instant::now();
        let outcome = interpreter.invoke(self.test_name);
        let duration_millis = start.elapsed().as_millis() as u64;

        let (verdict, message) = decide(self.expected, &outcome, codes);
        self.state = TestState::Finished(verdict);
        self.log(verdict, message.as_deref());

        TestResult {
            test_name: self.test_name.to_string(),
            duration_millis,
            verdict,
            message,
        }
    }

    fn log(&self, verdict: Verdict, message: Option<&str>) {
        let (module, test) = (self.module_name, self.test_name);
        match (verdict, message) {
            (Verdict::Pass, _) => tracing::debug!("PASS .. {module}`{test}"),
            (_, Some(msg)) => tracing::info!("{verdict} .. {module}`{test} -- {msg}"),
            (_, None) => tracing::info!("{verdict} .. {module}`{test}"),
        }
    }
}

/// Runs test suites against one interpreter session
pub struct TestRunner<'a> {
    interpreter: &'a mut dyn Interpreter,
    codes: ViolationCodes,
    observer: Box<dyn RunObserver + 'a>,
}

impl fmt::Debug for TestRunner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRunner")
            .field("codes", &self.codes)
            .finish_non_exhaustive()
    }
}

impl<'a> TestRunner<'a> {
    /// Create a runner over an interpreter session
    #[must_use]
    pub fn new(interpreter: &'a mut dyn Interpreter) -> Self {
        Self {
            interpreter,
            codes: ViolationCodes::default(),
            observer: Box::new(NoopObserver),
        }
    }

    /// Use custom violation codes
    #[must_use]
    pub fn with_codes(mut self, codes: ViolationCodes) -> Self {
        self.codes = codes;
        self
    }

    /// Report progress to an observer
    #[must_use]
    pub fn with_observer(mut self, observer: impl RunObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Run all suites in order.
    ///
    /// The interpreter is initialized once up front, and every suite result
    /// carries the same timestamp taken at the start of the run.
    pub fn run(&mut self, suites: &[TestSuite]) -> SpecrunResult<Vec<TestSuiteResult>> {
        self.interpreter.initialize()?;
        let timestamp = chrono::Local::now().naive_local();
        Ok(suites
            .iter()
            .map(|suite| self.run_suite(suite, timestamp))
            .collect())
    }

    fn run_suite(&mut self, suite: &TestSuite, timestamp: NaiveDateTime) -> TestSuiteResult {
        self.observer.suite_started(suite);
        self.interpreter.set_default_context(&suite.module_name);
        let results = suite
            .test_names
            .iter()
            .map(|test_name| self.run_one(&suite.module_name, test_name))
            .collect();
        TestSuiteResult::new(&suite.module_name, timestamp, results)
    }

    /// Run a single test in the current default context
    pub fn run_one(&mut self, module_name: &str, test_name: &str) -> TestResult {
        let result =
            TestExecution::new(module_name, test_name).execute(self.interpreter, &self.codes);
        self.observer.test_finished(module_name, &result);
        result
    }
}
