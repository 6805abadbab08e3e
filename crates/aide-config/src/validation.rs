//! Config validation.

use aide_common::ConfigError;

use crate::schema::{AideConfig, UrlRules};

/// Validate a parsed config.
///
/// Checks that the index URL looks like a web URL and that the editor
/// pattern compiles. Policy flags need no validation -- any bool is fine.
pub fn validate(config: &AideConfig) -> Result<(), ConfigError> {
    let index = config.urls.index_url.trim();
    if index.is_empty() {
        return Err(ConfigError::ValidationError("urls.index_url is empty".into()));
    }
    if !index.starts_with("http://") && !index.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "urls.index_url must be an http(s) URL, got {index:?}"
        )));
    }

    // Compiling the rules exercises the regex.
    UrlRules::compile(&config.urls)?;

    Ok(())
}
