//! Aide shell configuration.
//!
//! TOML-based configuration for the view orchestration core: the
//! cross-family switch policy and the URL rules that classify views into
//! the Assistant and Editor families. All fields use serde defaults so
//! partial configs work out of the box, and the policy defaults are the
//! non-disruptive choice (never close or intercept unless asked to).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use aide_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! assert!(!config.switch.close_current_on_switch);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{AideConfig, SwitchPolicy, UrlConfig, UrlRules, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{default_config_path, load_from_path};

use aide_common::ConfigError;

/// Convenience function to load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creating a default
/// file if none exists, and validates the result.
pub fn load_config() -> Result<AideConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
