//! Error handling for pubmail
//!
//! This module provides the error taxonomy for directive rendering and the
//! user-facing error reporting used by the CLI. It follows two principles:
//! 1. **Strongly-typed errors** so callers can tell exactly why a body could not be rendered
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - [`DirectiveError::MissingAttribute`] - a directive lacks a required attribute
//! - [`DirectiveError::MissingContext`] - a parent pub or an assignee is required but absent
//! - [`DirectiveError::MissingValue`] - a referenced field is not in the pub's values
//! - [`DirectiveError::InvalidDirective`] - unknown directive name, malformed `link`, bad `rel`
//! - [`DirectiveError::UpstreamFailure`] - membership enrollment or invite minting failed
//!
//! Every one of these is fatal to a render. A body that fails to render must not be
//! sent, so nothing in the engine downgrades an error to a warning.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pubmail::core::{DirectiveError, user_friendly_error};
//!
//! let error = DirectiveError::InvalidDirective {
//!     directive: "recipientNmae".to_string(),
//!     reason: "unrecognized directive".to_string(),
//! };
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // error, details and a "did you mean" suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::directives::Directive;

/// Result alias for directive rendering.
pub type Result<T, E = DirectiveError> = std::result::Result<T, E>;

/// Which collaborator call failed during deferred link resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOperation {
    /// Enrolling the recipient as a member of the form
    EnsureMembership,
    /// Minting the one-time invite link
    MintInviteLink,
}

impl fmt::Display for UpstreamOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnsureMembership => f.write_str("ensure form membership"),
            Self::MintInviteLink => f.write_str("mint invite link"),
        }
    }
}

/// The error type for directive rendering.
///
/// Each variant names the directive it came from so a failed render can be traced
/// back to the offending markup.
#[derive(Error, Debug)]
pub enum DirectiveError {
    /// A required attribute key is absent (or present with an empty value)
    ///
    /// # Fields
    /// - `directive`: The directive name as written in the document
    /// - `attribute`: The attribute that was expected
    #[error("Directive '{directive}' is missing the '{attribute}' attribute")]
    MissingAttribute {
        /// The directive name as written in the document
        directive: String,
        /// The attribute that was expected
        attribute: String,
    },

    /// A parent pub or an assignee is needed to resolve the directive but is absent
    #[error("Directive '{directive}' requires {missing}")]
    MissingContext {
        /// The directive name as written in the document
        directive: String,
        /// What is missing, e.g. "a parent pub" or "an assignee on the pub"
        missing: String,
    },

    /// A referenced field key is not present in the resolved pub's values
    #[error("Directive '{directive}' references field '{field}' which has no value")]
    MissingValue {
        /// The directive name as written in the document
        directive: String,
        /// The field slug that was looked up
        field: String,
    },

    /// Unrecognized directive name, a `link` matching none of its forms, or a bad `rel`
    #[error("Invalid directive '{directive}': {reason}")]
    InvalidDirective {
        /// The directive name as written in the document
        directive: String,
        /// Why the directive was rejected
        reason: String,
    },

    /// The membership-ensure or token-mint call failed for a deferred link
    #[error("Failed to {operation} for form '{form}'")]
    UpstreamFailure {
        /// Which collaborator call failed
        operation: UpstreamOperation,
        /// The form slug the deferred link targets
        form: String,
        /// The underlying collaborator error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DirectiveError {
    pub(crate) fn missing_attribute(directive: &str, attribute: &str) -> Self {
        Self::MissingAttribute {
            directive: directive.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn missing_context(directive: &str, missing: impl Into<String>) -> Self {
        Self::MissingContext {
            directive: directive.to_string(),
            missing: missing.into(),
        }
    }

    pub(crate) fn missing_value(directive: &str, field: &str) -> Self {
        Self::MissingValue {
            directive: directive.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(directive: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDirective {
            directive: directive.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn upstream(
        operation: UpstreamOperation,
        form: &str,
        source: anyhow::Error,
    ) -> Self {
        Self::UpstreamFailure {
            operation,
            form: form.to_string(),
            source: source.into(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Wraps a [`DirectiveError`] with optional details and a suggestion. The CLI
/// prints these with terminal colors via [`ErrorContext::display`].
///
/// # Examples
///
/// ```rust,no_run
/// use pubmail::core::{DirectiveError, ErrorContext};
///
/// let context = ErrorContext::new(DirectiveError::MissingValue {
///     directive: "value".to_string(),
///     field: "pubpub:title".to_string(),
/// })
/// .with_suggestion("Check the field slug against the pub's values")
/// .with_details("Directives never render an empty value in place of a missing one");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The error message shown first
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`DirectiveError`]
    #[must_use]
    pub fn new(error: DirectiveError) -> Self {
        Self::from_message(error.to_string())
    }

    /// Create a context from a plain message, for errors outside the directive taxonomy
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`DirectiveError`] anywhere in the error chain (the CLI wraps render
/// errors with file context), then [`std::io::Error`] and [`serde_json::Error`], and
/// otherwise falls back to the full error chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(directive_error) =
        error.chain().find_map(|cause| cause.downcast_ref::<DirectiveError>())
    {
        return create_error_context(directive_error);
    }

    if let Some(io_error) = error.chain().find_map(|cause| cause.downcast_ref::<std::io::Error>())
    {
        let context = ErrorContext::from_message(format!("{error}"))
            .with_details(io_error.to_string());
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the file exists and the path is correct"),
            std::io::ErrorKind::PermissionDenied => {
                context.with_suggestion("Check the file permissions")
            }
            _ => context,
        };
    }

    if let Some(json_error) =
        error.chain().find_map(|cause| cause.downcast_ref::<serde_json::Error>())
    {
        return ErrorContext::from_message(format!("{error}"))
            .with_details(json_error.to_string())
            .with_suggestion(
                "The tree must be an mdast JSON document and the context must use camelCase keys",
            );
    }

    let mut context = ErrorContext::from_message(format!("{error}"));
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !causes.is_empty() {
        context = context.with_details(causes.join(": "));
    }
    context
}

fn create_error_context(error: &DirectiveError) -> ErrorContext {
    let context = ErrorContext::from_message(error.to_string());
    match error {
        DirectiveError::MissingAttribute {
            attribute,
            ..
        } => context
            .with_suggestion(format!("Add a non-empty {attribute}=... attribute to the directive")),
        DirectiveError::MissingContext {
            ..
        } => context
            .with_details("The pub this email is sent for does not provide the required data")
            .with_suggestion(
                "Remove rel=parent or the assignee directive, or send from a pub that has it",
            ),
        DirectiveError::MissingValue {
            field,
            ..
        } => context
            .with_details(format!("No value is stored for field '{field}'"))
            .with_suggestion("Check the field slug, including its community prefix"),
        DirectiveError::InvalidDirective {
            directive,
            ..
        } => match suggest_directive(directive) {
            Some(name) => context.with_suggestion(format!("Did you mean ':{name}'?")),
            None => context.with_details(format!(
                "Available directives: {}",
                Directive::ALL.iter().map(|d| d.name()).collect::<Vec<_>>().join(", ")
            )),
        },
        DirectiveError::UpstreamFailure {
            source,
            ..
        } => context.with_details(source.to_string()).with_suggestion(
            "Check the [forms] section of the configuration and that the form exists",
        ),
    }
}

/// Maximum Levenshtein distance for a directive name suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Find the registered directive name closest to `name`, if any is close enough.
///
/// Exact (case-insensitive) matches are not suggestions: a known name that was
/// rejected failed for some other reason.
#[must_use]
pub fn suggest_directive(name: &str) -> Option<&'static str> {
    let lowered = name.to_lowercase();
    Directive::ALL
        .iter()
        .map(|d| (d.name(), strsim::levenshtein(&lowered, &d.name().to_lowercase())))
        .filter(|(_, distance)| *distance > 0 && *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance)
        .map(|(name, _)| name)
}
