//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: AWS SDK calls, snapshot and
//! template files, configuration, and the tracing subscriber.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod aws;
pub mod config;
pub mod logging;
pub mod snapshot;
pub mod template;
