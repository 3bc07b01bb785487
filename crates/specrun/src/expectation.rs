//! Expected outcomes and violation categories.
//!
//! A test declares what it expects through its name: a test called
//! `TestPopEmptyExpectPreconditionFailure` passes only if the interpreter
//! rejects it with a precondition violation. Violations carry a numeric code
//! which [`ViolationCodes`] maps onto a [`ViolationCategory`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const PRECONDITION_MARKER: &str = "expectpreconditionfailure";
const POSTCONDITION_MARKER: &str = "expectpostconditionfailure";
const INVARIANT_MARKER: &str = "expectinvariantfailure";

/// Outcome a test expects, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpectedOutcome {
    /// Normal return
    Success,
    /// A precondition violation
    ExpectPreconditionFailure,
    /// A postcondition violation
    ExpectPostconditionFailure,
    /// An invariant violation
    ExpectInvariantFailure,
}

impl ExpectedOutcome {
    /// Classify a test by the marker substring in its name.
    ///
    /// Matching is case-insensitive and checks the precondition,
    /// postcondition and invariant markers in that order; the first match
    /// wins.
    #[must_use]
    pub fn classify(test_name: &str) -> Self {
        let lower = test_name.to_lowercase();
        if lower.contains(PRECONDITION_MARKER) {
            Self::ExpectPreconditionFailure
        } else if lower.contains(POSTCONDITION_MARKER) {
            Self::ExpectPostconditionFailure
        } else if lower.contains(INVARIANT_MARKER) {
            Self::ExpectInvariantFailure
        } else {
            Self::Success
        }
    }

    /// Human-readable description used in failure messages
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ExpectPreconditionFailure => "precondition failure",
            Self::ExpectPostconditionFailure => "postcondition failure",
            Self::ExpectInvariantFailure => "invariant failure",
        }
    }

    /// The violation category this outcome expects, if any
    #[must_use]
    pub const fn expected_category(self) -> Option<ViolationCategory> {
        match self {
            Self::Success => None,
            Self::ExpectPreconditionFailure => Some(ViolationCategory::Precondition),
            Self::ExpectPostconditionFailure => Some(ViolationCategory::Postcondition),
            Self::ExpectInvariantFailure => Some(ViolationCategory::Invariant),
        }
    }
}

impl fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Category of a runtime contract violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationCategory {
    /// Precondition failed
    Precondition,
    /// Postcondition failed
    Postcondition,
    /// Type or state invariant failed
    Invariant,
    /// Any other interpreter error
    Unrecognized,
}

/// Violation codes raised by the interpreter, grouped by category.
///
/// The three sets are expected to be disjoint; a code found in more than one
/// set resolves to the first of precondition, postcondition, invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationCodes {
    /// Precondition failure codes
    pub precondition: BTreeSet<i64>,
    /// Postcondition failure codes
    pub postcondition: BTreeSet<i64>,
    /// Invariant failure codes
    pub invariant: BTreeSet<i64>,
}

impl Default for ViolationCodes {
    fn default() -> Self {
        Self {
            precondition: BTreeSet::from([4055, 4071]),
            postcondition: BTreeSet::from([4056, 4072]),
            invariant: BTreeSet::from([4060, 4079, 4082]),
        }
    }
}

impl ViolationCodes {
    /// Map a violation code to its category
    #[must_use]
    pub fn category_of(&self, code: i64) -> ViolationCategory {
        if self.precondition.contains(&code) {
            ViolationCategory::Precondition
        } else if self.postcondition.contains(&code) {
            ViolationCategory::Postcondition
        } else if self.invariant.contains(&code) {
            ViolationCategory::Invariant
        } else {
            ViolationCategory::Unrecognized
        }
    }

    /// Codes that appear in more than one category
    #[must_use]
    pub fn overlapping(&self) -> Vec<i64> {
        let mut shared: BTreeSet<i64> = BTreeSet::new();
        shared.extend(self.precondition.intersection(&self.postcondition));
        shared.extend(self.precondition.intersection(&self.invariant));
        shared.extend(self.postcondition.intersection(&self.invariant));
        shared.into_iter().collect()
    }
}
