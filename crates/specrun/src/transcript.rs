//! Interpreter transcripts.
//!
//! A transcript is a YAML (or JSON) document produced by an external
//! interpreter. It describes the loaded specification and the outcome of
//! each operation, and [`ScriptedInterpreter`] replays it through the
//! [`Interpreter`] and [`CoverageSource`] seams.
//!
//! ```yaml
//! dialect: vdmsl
//! modules:
//!   - name: TestStack
//!     files: [src/test/vdm/TestStack.vdmsl]
//!     operations:
//!       - name: TestPush
//!       - name: TestPopEmptyExpectPreconditionFailure
//!         outcome:
//!           violation: { code: 4071, message: "Precondition failure: pre_Pop" }
//! coverage:
//!   - file: src/test/vdm/TestStack.vdmsl
//!     locations:
//!       - { start_line: 3, start_col: 5, end_line: 3, end_col: 12, hits: 2 }
//! ```

use crate::interpreter::{
    normalize_path, CoverageSource, Interpreter, ModuleInfo, OperationInfo, Violation,
};
use crate::location::LocationHit;
use crate::result::{SpecrunError, SpecrunResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Violation code raised for an operation name the module does not define
pub const NAME_NOT_IN_SCOPE: i64 = 4034;

/// Specification dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// VDM-SL
    #[default]
    Vdmsl,
    /// VDM++
    Vdmpp,
    /// VDM-RT
    Vdmrt,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vdmsl => "vdmsl",
            Self::Vdmpp => "vdmpp",
            Self::Vdmrt => "vdmrt",
        };
        f.write_str(s)
    }
}

/// What an operation does when invoked
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedOutcome {
    /// Returns normally
    #[default]
    Return,
    /// Raises a violation
    Violation {
        /// Interpreter error number
        code: i64,
        /// Interpreter error message
        #[serde(default)]
        message: String,
    },
}

/// Operation entry of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedOperation {
    /// Operation name
    pub name: String,
    /// Number of parameters
    #[serde(default)]
    pub arity: usize,
    /// Invocation outcome, written as `return` or `violation: {code, message}`
    #[serde(default, with = "serde_yaml_ng::with::singleton_map")]
    pub outcome: ScriptedOutcome,
}

/// Module entry of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedModule {
    /// Module name
    pub name: String,
    /// Source files
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Operations in definition order
    #[serde(default)]
    pub operations: Vec<ScriptedOperation>,
}

impl ScriptedModule {
    fn info(&self) -> ModuleInfo {
        ModuleInfo {
            name: self.name.clone(),
            files: self.files.clone(),
            operations: self
                .operations
                .iter()
                .map(|op| OperationInfo {
                    name: op.name.clone(),
                    arity: op.arity,
                })
                .collect(),
        }
    }
}

/// Coverage entry of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHits {
    /// Source file
    pub file: PathBuf,
    /// Source text; read from disk when absent
    #[serde(default)]
    pub text: Option<String>,
    /// Location hit table
    #[serde(default)]
    pub locations: Vec<LocationHit>,
}

/// Root transcript document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transcript {
    /// Specification dialect
    #[serde(default)]
    pub dialect: Dialect,
    /// Parse diagnostics
    #[serde(default)]
    pub parse_errors: Vec<String>,
    /// Type-check diagnostics
    #[serde(default)]
    pub type_errors: Vec<String>,
    /// Modules in load order
    #[serde(default)]
    pub modules: Vec<ScriptedModule>,
    /// Per-file coverage
    #[serde(default)]
    pub coverage: Vec<FileHits>,
}

impl Transcript {
    /// Parse a transcript from YAML
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is invalid
    pub fn from_yaml(yaml: &str) -> SpecrunResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse a transcript from JSON
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is invalid
    pub fn from_json(json: &str) -> SpecrunResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that module names are unique
    ///
    /// # Errors
    ///
    /// Returns the first duplicated module name
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for module in &self.modules {
            if !seen.insert(module.name.as_str()) {
                return Err(format!("duplicate module '{}'", module.name));
            }
        }
        Ok(())
    }
}

/// Replays a transcript as an interpreter session
#[derive(Debug, Clone)]
pub struct ScriptedInterpreter {
    transcript: Transcript,
    base_dir: PathBuf,
    context: Option<String>,
    invocations: Vec<String>,
}

impl ScriptedInterpreter {
    /// Create an interpreter over a parsed transcript. Relative source paths
    /// resolve against `base_dir`.
    #[must_use]
    pub fn new(transcript: Transcript, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            transcript,
            base_dir: base_dir.into(),
            context: None,
            invocations: Vec::new(),
        }
    }

    /// Load a transcript file. `.json` files are read as JSON, anything
    /// else as YAML.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a valid transcript
    pub fn load(path: &Path) -> SpecrunResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Transcript::from_json(&content)
        } else {
            Transcript::from_yaml(&content)
        };
        let invalid = |message: String| SpecrunError::Transcript {
            path: path.to_path_buf(),
            message,
        };
        let transcript = parsed.map_err(|e| invalid(e.to_string()))?;
        transcript.validate().map_err(invalid)?;

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::debug!(
            "loaded transcript {} ({} modules)",
            path.display(),
            transcript.modules.len()
        );
        Ok(Self::new(transcript, base_dir))
    }

    /// The underlying transcript
    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Qualified names of invoked operations, in order
    #[must_use]
    pub fn invocations(&self) -> &[String] {
        &self.invocations
    }

    /// Check that the specification parsed, type checked and is a dialect
    /// that can run tests
    ///
    /// # Errors
    ///
    /// Returns [`SpecrunError::ParseFailed`], [`SpecrunError::TypeCheckFailed`]
    /// or [`SpecrunError::UnsupportedDialect`]
    pub fn check(&self) -> SpecrunResult<()> {
        let t = &self.transcript;
        for message in &t.parse_errors {
            tracing::error!("{message}");
        }
        if !t.parse_errors.is_empty() {
            return Err(SpecrunError::ParseFailed {
                count: t.parse_errors.len(),
            });
        }
        for message in &t.type_errors {
            tracing::error!("{message}");
        }
        if !t.type_errors.is_empty() {
            return Err(SpecrunError::TypeCheckFailed {
                count: t.type_errors.len(),
            });
        }
        if t.dialect != Dialect::Vdmsl {
            return Err(SpecrunError::UnsupportedDialect {
                dialect: t.dialect.to_string(),
            });
        }
        Ok(())
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        normalize_path(&self.base_dir.join(file))
    }

    fn file_hits(&self, file: &Path) -> Option<&FileHits> {
        self.transcript
            .coverage
            .iter()
            .find(|h| self.resolve(&h.file) == file)
    }
}

impl Interpreter for ScriptedInterpreter {
    /// Module files are reported relative to the working directory, not the
    /// transcript
    fn modules(&self) -> Vec<ModuleInfo> {
        self.transcript
            .modules
            .iter()
            .map(|m| {
                let mut info = m.info();
                info.files = info.files.iter().map(|f| self.resolve(f)).collect();
                info
            })
            .collect()
    }

    fn initialize(&mut self) -> SpecrunResult<()> {
        self.context = None;
        self.invocations.clear();
        Ok(())
    }

    fn set_default_context(&mut self, module_name: &str) {
        self.context = Some(module_name.to_string());
    }

    fn invoke(&mut self, operation_name: &str) -> Result<(), Violation> {
        let module_name = self.context.as_deref().unwrap_or_default();
        self.invocations
            .push(format!("{module_name}`{operation_name}"));

        let operation = self
            .transcript
            .modules
            .iter()
            .find(|m| m.name == module_name)
            .and_then(|m| m.operations.iter().find(|op| op.name == operation_name));

        match operation.map(|op| &op.outcome) {
            Some(ScriptedOutcome::Return) => Ok(()),
            Some(ScriptedOutcome::Violation { code, message }) => {
                Err(Violation::new(*code, message.clone()))
            }
            None => Err(Violation::new(
                NAME_NOT_IN_SCOPE,
                format!("Name '{operation_name}' is not in scope"),
            )),
        }
    }
}

impl CoverageSource for ScriptedInterpreter {
    fn location_hits(&self, file: &Path) -> SpecrunResult<Vec<LocationHit>> {
        Ok(self
            .file_hits(file)
            .map(|h| h.locations.clone())
            .unwrap_or_default())
    }

    fn source_text(&self, file: &Path) -> SpecrunResult<String> {
        match self.file_hits(file).and_then(|h| h.text.clone()) {
            Some(text) => Ok(text),
            None => Ok(std::fs::read_to_string(file)?),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::location::Location;
    use tempfile::TempDir;

    const STACK: &str = r#"
dialect: vdmsl
modules:
  - name: Stack
    files: [src/main/Stack.vdmsl]
    operations:
      - { name: Push, arity: 1 }
  - name: TestStack
    files: [src/test/TestStack.vdmsl]
    operations:
      - name: TestPush
      - name: TestPopEmptyExpectPreconditionFailure
        outcome:
          violation: { code: 4071, message: "Precondition failure: pre_Pop" }
coverage:
  - file: src/main/Stack.vdmsl
    text: "push(x)"
    locations:
      - { start_line: 1, start_col: 1, end_line: 1, end_col: 5, hits: 2 }
  - file: src/test/TestStack.vdmsl
"#;

    fn stack() -> ScriptedInterpreter {
        ScriptedInterpreter::new(Transcript::from_yaml(STACK).unwrap(), "")
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let t = Transcript::from_yaml("modules: []").unwrap();
            assert_eq!(t.dialect, Dialect::Vdmsl);
            assert!(t.parse_errors.is_empty());
            assert!(t.coverage.is_empty());
        }

        #[test]
        fn test_outcomes() {
            let t = Transcript::from_yaml(STACK).unwrap();
            let ops = &t.modules[1].operations;
            assert_eq!(ops[0].outcome, ScriptedOutcome::Return);
            assert_eq!(
                ops[1].outcome,
                ScriptedOutcome::Violation {
                    code: 4071,
                    message: "Precondition failure: pre_Pop".to_string()
                }
            );
        }

        #[test]
        fn test_json() {
            let t = Transcript::from_json(
                r#"{"dialect":"vdmpp","modules":[{"name":"TestA","operations":[{"name":"TestX","outcome":"return"}]}]}"#,
            )
            .unwrap();
            assert_eq!(t.dialect, Dialect::Vdmpp);
            assert_eq!(t.modules[0].operations[0].outcome, ScriptedOutcome::Return);
        }

        #[test]
        fn test_violation_outcome_in_json() {
            let t = Transcript::from_json(
                r#"{"modules":[{"name":"TestA","operations":[{"name":"TestX","outcome":{"violation":{"code":4072,"message":"post"}}}]}]}"#,
            )
            .unwrap();
            assert_eq!(
                t.modules[0].operations[0].outcome,
                ScriptedOutcome::Violation {
                    code: 4072,
                    message: "post".to_string()
                }
            );
        }

        #[test]
        fn test_violation_message_defaults_to_empty() {
            let t = Transcript::from_yaml(
                "modules:\n  - name: TestA\n    operations:\n      - name: TestX\n        outcome:\n          violation: { code: 4060 }\n",
            )
            .unwrap();
            assert_eq!(
                t.modules[0].operations[0].outcome,
                ScriptedOutcome::Violation {
                    code: 4060,
                    message: String::new()
                }
            );
        }

        #[test]
        fn test_explicit_return_outcome() {
            let t = Transcript::from_yaml(
                "modules:\n  - name: TestA\n    operations:\n      - { name: TestX, outcome: return }\n",
            )
            .unwrap();
            assert_eq!(t.modules[0].operations[0].outcome, ScriptedOutcome::Return);
        }

        #[test]
        fn test_duplicate_modules_rejected() {
            let t = Transcript::from_yaml("modules: [{name: A}, {name: A}]").unwrap();
            assert!(t.validate().unwrap_err().contains("duplicate module 'A'"));
        }
    }

    mod interpreter_tests {
        use super::*;

        #[test]
        fn test_modules() {
            let modules = stack().modules();
            assert_eq!(modules.len(), 2);
            assert_eq!(modules[0].operations[0], OperationInfo { name: "Push".into(), arity: 1 });
            assert_eq!(modules[1].files, vec![PathBuf::from("src/test/TestStack.vdmsl")]);
        }

        #[test]
        fn test_invoke_uses_default_context() {
            let mut interp = stack();
            interp.initialize().unwrap();
            interp.set_default_context("TestStack");
            assert!(interp.invoke("TestPush").is_ok());
            let v = interp
                .invoke("TestPopEmptyExpectPreconditionFailure")
                .unwrap_err();
            assert_eq!(v.code, 4071);

            interp.set_default_context("Stack");
            let v = interp.invoke("TestPush").unwrap_err();
            assert_eq!(v.code, NAME_NOT_IN_SCOPE);
            assert_eq!(
                interp.invocations(),
                &[
                    "TestStack`TestPush",
                    "TestStack`TestPopEmptyExpectPreconditionFailure",
                    "Stack`TestPush"
                ]
            );
        }

        #[test]
        fn test_initialize_resets() {
            let mut interp = stack();
            interp.set_default_context("TestStack");
            let _ = interp.invoke("TestPush");
            interp.initialize().unwrap();
            assert!(interp.invocations().is_empty());
            assert!(interp.invoke("TestPush").is_err());
        }
    }

    mod check_tests {
        use super::*;

        #[test]
        fn test_clean_vdmsl() {
            assert!(stack().check().is_ok());
        }

        #[test]
        fn test_parse_errors_first() {
            let t = Transcript {
                dialect: Dialect::Vdmrt,
                parse_errors: vec!["Error 2013: Expected 'end'".into()],
                type_errors: vec!["Error 3000: x".into()],
                ..Transcript::default()
            };
            let err = ScriptedInterpreter::new(t, "").check().unwrap_err();
            assert!(matches!(err, SpecrunError::ParseFailed { count: 1 }));
        }

        #[test]
        fn test_type_errors() {
            let t = Transcript {
                type_errors: vec!["a".into(), "b".into()],
                ..Transcript::default()
            };
            let err = ScriptedInterpreter::new(t, "").check().unwrap_err();
            assert!(matches!(err, SpecrunError::TypeCheckFailed { count: 2 }));
        }

        #[test]
        fn test_unsupported_dialect() {
            let t = Transcript {
                dialect: Dialect::Vdmpp,
                ..Transcript::default()
            };
            let err = ScriptedInterpreter::new(t, "").check().unwrap_err();
            assert!(err.to_string().contains("vdmpp"));
        }
    }

    mod coverage_tests {
        use super::*;

        #[test]
        fn test_embedded_text_and_hits() {
            let interp = stack();
            let file = Path::new("src/main/Stack.vdmsl");
            assert_eq!(interp.source_text(file).unwrap(), "push(x)");
            let hits = interp.location_hits(file).unwrap();
            assert_eq!(hits, vec![LocationHit::new(Location::new(1, 1, 1, 5), 2)]);
            assert!(interp.location_hits(Path::new("other")).unwrap().is_empty());
        }

        #[test]
        fn test_text_read_relative_to_transcript() {
            let tmp = TempDir::new().unwrap();
            let src = tmp.path().join("src/test");
            std::fs::create_dir_all(&src).unwrap();
            std::fs::write(src.join("TestStack.vdmsl"), "module TestStack\n").unwrap();
            let path = tmp.path().join("transcript.yaml");
            std::fs::write(&path, STACK).unwrap();

            let interp = ScriptedInterpreter::load(&path).unwrap();
            let file = interp.modules()[1].files[0].clone();
            assert_eq!(file, src.join("TestStack.vdmsl"));
            assert_eq!(interp.source_text(&file).unwrap(), "module TestStack\n");
        }

        #[test]
        fn test_hits_found_under_resolved_paths() {
            let interp = ScriptedInterpreter::new(Transcript::from_yaml(STACK).unwrap(), "./proj");
            let file = interp.modules()[0].files[0].clone();
            assert_eq!(file, PathBuf::from("proj/src/main/Stack.vdmsl"));
            assert_eq!(interp.source_text(&file).unwrap(), "push(x)");
            assert_eq!(interp.location_hits(&file).unwrap().len(), 1);
        }

        #[test]
        fn test_load_invalid() {
            let tmp = TempDir::new().unwrap();
            let path = tmp.path().join("bad.json");
            std::fs::write(&path, "{ not json").unwrap();
            let err = ScriptedInterpreter::load(&path).unwrap_err();
            assert!(matches!(err, SpecrunError::Transcript { .. }));
        }
    }
}
