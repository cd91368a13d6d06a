//! Configuration management for pubmail
//!
//! The engine itself takes no configuration: a render is fully described by the
//! tree, the [`RenderContext`](crate::context::RenderContext) and the
//! [`FormAccess`](crate::access::FormAccess) it is given. Configuration only tells
//! the CLI how to reach the form API.
//!
//! # Modules
//!
//! - `global` - The global configuration file (`~/.pubmail/config.toml`)

pub mod global;

pub use global::{FormApiConfig, GlobalConfig};
