//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or the AWS SDK.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod network;
pub mod policy;
pub mod reconcile;
pub mod stack;
pub mod template;

pub use config::{DevFleetConfig, resolve_region, validate_config_key, validate_config_value};
pub use error::{ConfigError, DiscoveryError};
pub use policy::FailurePolicy;
pub use reconcile::{ReconcilePlan, ResourceNames, decide, plan};
pub use stack::{RoleBinding, RoleBindings, StackInputs, synthesize};
pub use template::Template;
