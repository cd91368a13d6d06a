//! Core types for pubmail
//!
//! This module holds the error taxonomy shared by every stage of a render and the
//! user-facing error reporting used by the CLI.
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! - [`DirectiveError`] - Enumerated failure modes of a render
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format

pub mod error;

pub use error::{
    DirectiveError, ErrorContext, Result, UpstreamOperation, suggest_directive,
    user_friendly_error,
};
