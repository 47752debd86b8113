//! Failure policy for recoverable control-plane and snapshot errors.
//!
//! Every call site that may degrade instead of aborting consults a
//! `FailurePolicy` value rather than deciding on its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const VALID_FAILURE_POLICIES: &[&str] = &["fail-open", "fail-closed"];

/// How a recoverable failure is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log a warning and continue with the empty / "does not exist" result.
    /// Biases the assembler toward creating resources.
    #[default]
    FailOpen,
    /// Abort with the original error.
    FailClosed,
}

impl FailurePolicy {
    /// Whether a failure should be replaced by the degraded result.
    #[must_use]
    pub fn degrades(self) -> bool {
        self == Self::FailOpen
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailOpen => "fail-open",
            Self::FailClosed => "fail-closed",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail-open" => Ok(Self::FailOpen),
            "fail-closed" => Ok(Self::FailClosed),
            other => Err(format!(
                "unknown failure policy '{other}' (expected one of: {})",
                VALID_FAILURE_POLICIES.join(", ")
            )),
        }
    }
}
