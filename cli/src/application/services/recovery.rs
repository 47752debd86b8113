//! Applies the failure policy at recoverable call sites.

use anyhow::Result;

use crate::application::ports::ProgressReporter;
use crate::domain::policy::FailurePolicy;

/// Route a recoverable result through `policy`.
///
/// Under fail-open an error becomes `T::default()` (the empty or
/// "does not exist" answer) after a warning naming `what` failed. Under
/// fail-closed the error is returned unchanged.
///
/// # Errors
///
/// Returns the original error when `policy` is fail-closed.
pub fn absorb<T: Default>(
    policy: FailurePolicy,
    reporter: &impl ProgressReporter,
    what: &str,
    result: Result<T>,
) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if policy.degrades() => {
            tracing::warn!(error = %format!("{e:#}"), "{what} failed; continuing");
            reporter.warn(&format!("{what} failed: {e:#}"));
            Ok(T::default())
        }
        Err(e) => Err(e.context(format!("{what} failed"))),
    }
}
