//! Integration tests for the devfleet CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior. None of
//! them reach AWS: they cover the commands that work offline.

mod cli_tests;
mod config_command;
mod plan_command;
