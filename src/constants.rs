//! Global constants used throughout the pubmail codebase.

use std::time::Duration;

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "PUBMAIL_CONFIG_PATH";

/// Environment variable that overrides `forms.api_token` from the configuration.
pub const API_TOKEN_ENV: &str = "PUBMAIL_API_TOKEN";

/// Directory under the home directory holding the configuration file.
pub const CONFIG_DIR_NAME: &str = ".pubmail";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default timeout for a single form API request (30 seconds).
///
/// Rendering has no timeout of its own; a deferred link waits as long as its
/// two requests take.
pub const DEFAULT_FORM_API_TIMEOUT: Duration = Duration::from_secs(30);
