//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{rule}")]
    InvalidValue {
        key: String,
        value: String,
        rule: String,
    },
}

// ── Discovery errors ──────────────────────────────────────────────────────────

/// Lookups the stack cannot be built without.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("No default VPC found in region {region}.")]
    NoDefaultVpc { region: String },

    #[error("Default VPC {vpc_id} has no public subnets.")]
    NoPublicSubnets { vpc_id: String },

    #[error("Hosted zone '{0}' not found.")]
    HostedZoneNotFound(String),
}
