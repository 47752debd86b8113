//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document to
//! stdout; failures print the error object from [`format_error`].

use anyhow::{Context, Result};
use devfleet_common::{LookupReport, PlanReport, SynthReport};
use serde::Serialize;

use crate::domain::config::DevFleetConfig;
use crate::domain::error::{ConfigError, DiscoveryError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable machine-readable code for a top-level error.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<ConfigError>().is_some() {
        "CONFIG_INVALID"
    } else if err.downcast_ref::<DiscoveryError>().is_some() {
        "DISCOVERY_FAILED"
    } else {
        "COMMAND_FAILED"
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

/// Renders reports as JSON documents on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        print(&serde_json::json!({ "version": version }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_lookup(&self, report: &LookupReport) -> Result<()> {
        print(report)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_plan(&self, report: &PlanReport) -> Result<()> {
        print(report)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_synth(&self, report: &SynthReport) -> Result<()> {
        print(report)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &DevFleetConfig, path: &std::path::Path) -> Result<()> {
        let settings: serde_json::Map<String, serde_json::Value> = config
            .entries()
            .into_iter()
            .map(|(key, value)| (key.to_string(), serde_json::Value::String(value)))
            .collect();
        print(&serde_json::json!({
            "path": path.display().to_string(),
            "settings": settings,
        }))
    }
}
