//! Specrun: naming-convention test runner for formal specifications
//!
//! Runs the zero-argument test operations of a specification through an
//! interpreter, classifies every outcome as Pass, Fail or Error from the
//! test's name and the violation it raised, and writes JUnit XML, IDE launch
//! descriptors and an HTML source coverage report.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Interpreter  │──►│ TestSelector │──►│ TestRunner   │──►│ reporter     │
//! │ (transcript) │   │ (discovery)  │   │ (harness)    │   │ launch       │
//! └──────┬───────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!        │ CoverageSource
//!        ▼
//! ┌──────────────┐   ┌──────────────┐
//! │ Coverage     │──►│ HTML report  │
//! │ Recorder     │   │ + index      │
//! └──────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use specrun::{ScriptedInterpreter, TestRunner, TestSelector, Transcript};
//! use specrun::Interpreter;
//!
//! let transcript = Transcript::from_yaml(
//!     "modules:\n  - name: TestStack\n    operations:\n      - name: TestPush\n",
//! )
//! .unwrap();
//! let mut interpreter = ScriptedInterpreter::new(transcript, ".");
//! let suites = TestSelector::new().discover(&interpreter.modules());
//! let results = TestRunner::new(&mut interpreter).run(&suites).unwrap();
//! assert!(results[0].succeeded());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod coverage;
mod discovery;
mod expectation;
mod harness;
mod interpreter;
pub mod launch;
mod location;
pub mod reporter;
mod result;
mod transcript;

pub use config::RunConfig;
pub use coverage::{CoverageRecorder, CoverageSummary, FileCoverage};
pub use discovery::{TestSelector, DEFAULT_MODULE_PREFIX, DEFAULT_OPERATION_PATTERN};
pub use expectation::{ExpectedOutcome, ViolationCategory, ViolationCodes};
pub use harness::{
    decide, NoopObserver, RunObserver, TestExecution, TestResult, TestRunner, TestState,
    TestSuite, TestSuiteResult, Verdict,
};
pub use interpreter::{CoverageSource, Interpreter, ModuleInfo, OperationInfo, Violation};
pub use launch::LaunchGeneration;
pub use location::{Location, LocationHit};
pub use reporter::RunSummary;
pub use result::{SpecrunError, SpecrunResult};
pub use transcript::{
    Dialect, FileHits, ScriptedInterpreter, ScriptedModule, ScriptedOperation, ScriptedOutcome,
    Transcript, NAME_NOT_IN_SCOPE,
};
