//! Assertion helpers that report every failing verdict at once.

use crate::oracle::OracleVerdict;

/// Unified error type for the test harness.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("{} oracle(s) failed:\n{}", failures.len(), failures.join("\n"))]
    OracleFailures { failures: Vec<String> },
}

/// Fail with every failing verdict listed, or pass if none failed.
pub fn assert_all_pass(verdicts: &[OracleVerdict]) -> Result<(), HarnessError> {
    let failures: Vec<String> = verdicts
        .iter()
        .filter(|v| !v.passed)
        .map(|v| format!("  {}: {}", v.oracle_name, v.detail))
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::OracleFailures { failures })
    }
}

/// Assert that the named oracle is present and failed.
pub fn assert_fails(verdicts: &[OracleVerdict], oracle_name: &str) -> Result<(), HarnessError> {
    match verdicts.iter().find(|v| v.oracle_name == oracle_name) {
        Some(v) if !v.passed => Ok(()),
        Some(v) => Err(HarnessError::AssertionFailed {
            detail: format!("{oracle_name} passed unexpectedly: {}", v.detail),
        }),
        None => Err(HarnessError::AssertionFailed {
            detail: format!("{oracle_name} was not run"),
        }),
    }
}
