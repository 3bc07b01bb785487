//! IDE launch descriptors.
//!
//! For each selected test a `<module>`<test>.launch` file is written that an
//! IDE can use to re-run that single test in its debugger.

use crate::harness::TestSuiteResult;
use crate::reporter::{escape_xml, recreate_dir};
use crate::result::{SpecrunError, SpecrunResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Launch configuration type understood by the IDE
pub const LAUNCH_CONFIGURATION_TYPE: &str = "org.overture.ide.vdmsl.debug.launchConfigurationType";

const CHECK_KEYS: [&str; 4] = [
    "vdm_launch_config_inv_checks",
    "vdm_launch_config_pre_checks",
    "vdm_launch_config_post_checks",
    "vdm_launch_config_measure_checks",
];

/// Which tests get a launch descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchGeneration {
    /// Every test
    All,
    /// Tests that failed or errored
    #[default]
    Failing,
    /// No tests
    None,
}

impl LaunchGeneration {
    /// Whether a test with the given pass state gets a descriptor
    #[must_use]
    pub const fn selects(self, passed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Failing => !passed,
            Self::None => false,
        }
    }
}

impl fmt::Display for LaunchGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Failing => "failing",
            Self::None => "none",
        };
        f.write_str(s)
    }
}

impl FromStr for LaunchGeneration {
    type Err = SpecrunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "failing" => Ok(Self::Failing),
            "none" => Ok(Self::None),
            other => Err(SpecrunError::config(format!(
                "unknown launch generation '{other}' (expected all, failing or none)"
            ))),
        }
    }
}

/// File name of the descriptor for one test
#[must_use]
pub fn launch_file_name(module_name: &str, test_name: &str) -> String {
    format!("{module_name}`{test_name}.launch")
}

/// Render the launch descriptor for one test
#[must_use]
pub fn render_launch(module_name: &str, test_name: &str, project: &str) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<launchConfiguration type=\"{LAUNCH_CONFIGURATION_TYPE}\">\n"
    ));

    let string_attr = |key: &str, value: &str| {
        format!(
            "  <stringAttribute key=\"{key}\" value=\"{}\"/>\n",
            escape_xml(value)
        )
    };
    let bool_attr = |key: &str| format!("  <booleanAttribute key=\"{key}\" value=\"true\"/>\n");

    xml.push_str(&string_attr("vdm_launch_config_default", module_name));
    xml.push_str(&bool_attr("vdm_launch_config_dtc_checks"));
    xml.push_str(&string_attr(
        "vdm_launch_config_expression",
        &format!("{module_name}`{test_name}()"),
    ));
    xml.push_str(&string_attr("vdm_launch_config_project", project));
    xml.push_str(&string_attr(
        "vdm_launch_config_method",
        &format!("{test_name}()"),
    ));
    xml.push_str(&string_attr("vdm_launch_config_module", module_name));
    for key in CHECK_KEYS {
        xml.push_str(&bool_attr(key));
    }

    xml.push_str("</launchConfiguration>\n");
    xml
}

/// Write launch descriptors for the selected tests.
///
/// With no directory configured nothing is written, which is only allowed
/// when generation is [`LaunchGeneration::None`]. Otherwise the directory is
/// recreated even for `None`, and a project name is required for any other
/// setting.
///
/// # Errors
///
/// Returns a configuration error when the directory or project is missing,
/// and an I/O error on filesystem failure
pub fn write_launch_files(
    dir: Option<&Path>,
    generation: LaunchGeneration,
    project: Option<&str>,
    results: &[TestSuiteResult],
) -> SpecrunResult<Vec<PathBuf>> {
    let Some(dir) = dir else {
        if generation == LaunchGeneration::None {
            return Ok(Vec::new());
        }
        return Err(SpecrunError::config(
            "asked to generate launch files, but no launch directory specified",
        ));
    };

    recreate_dir(dir)?;
    if generation == LaunchGeneration::None {
        return Ok(Vec::new());
    }
    let project = project.ok_or_else(|| {
        SpecrunError::config("asked to generate launch files, but no launch project specified")
    })?;

    let mut written = Vec::new();
    for suite in results {
        for result in &suite.results {
            if !generation.selects(result.verdict.is_pass()) {
                continue;
            }
            let path = dir.join(launch_file_name(&suite.module_name, &result.test_name));
            std::fs::write(
                &path,
                render_launch(&suite.module_name, &result.test_name, project),
            )?;
            written.push(path);
        }
    }
    tracing::debug!("wrote {} launch file(s) to {}", written.len(), dir.display());
    Ok(written)
}
