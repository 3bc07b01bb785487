//! List command handler

use crate::error::CliResult;
use crate::ListArgs;
use specrun::{ExpectedOutcome, Interpreter, RunConfig, ScriptedInterpreter, TestSuite};

/// Execute the list command, returning the rendered listing
///
/// # Errors
///
/// Returns error if the config or transcript cannot be loaded, or the
/// transcript does not pass its checks
pub fn execute_list(args: &ListArgs) -> CliResult<String> {
    let config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let interpreter = ScriptedInterpreter::load(&args.transcript)?;
    interpreter.check()?;
    let suites = config.selector()?.discover(&interpreter.modules());
    Ok(render_list(&suites))
}

/// One line per module, then one indented line per test with its expected
/// outcome
#[must_use]
pub fn render_list(suites: &[TestSuite]) -> String {
    let mut out = String::new();
    for suite in suites {
        out.push_str(&format!("{}\n", suite.module_name));
        for test in &suite.test_names {
            let expected = ExpectedOutcome::classify(test);
            out.push_str(&format!("  {test} [{}]\n", expected.description()));
        }
    }
    let total: usize = suites.iter().map(TestSuite::test_count).sum();
    out.push_str(&format!("{total} tests in {} modules\n", suites.len()));
    out
}
