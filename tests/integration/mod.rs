//! Integration test suite for pubmail
//!
//! End-to-end tests driving the library through its public API and the
//! `pubmail` binary through `assert_cmd`.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `render` and `check` commands, exit codes, error output
//! - **render_pipeline**: full renders against the recording form access fake
//! - **serialization**: round-tripping trees and contexts through JSON

mod cli;
mod render_pipeline;
mod serialization;
