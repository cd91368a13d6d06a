//! Test utilities for pubmail
//!
//! Helpers shared by unit tests and the integration suite: render context
//! fixtures, and a [`FormAccess`](crate::access::FormAccess) fake that records
//! every call and can be told to fail for particular forms.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pubmail::renderer::DirectiveRenderer;
//! use pubmail::test_utils::RecordingFormAccess;
//! use pubmail::test_utils::fixtures::ContextBuilder;
//!
//! let access = Arc::new(RecordingFormAccess::new().failing_mint("broken"));
//! let renderer = DirectiveRenderer::new(access.clone());
//! let context = ContextBuilder::new().recipient("Ada", None).build();
//! ```

pub mod fixtures;
mod form_access;

pub use form_access::RecordingFormAccess;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber once regardless of how many times it's
/// called. Uses the provided level, or `RUST_LOG` when no level is given; with
/// neither, tests run without logging.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
