//! Configuration schema for the shell.
//!
//! Every field has a serde default so partial configs work out of the box.
//! The switch-policy defaults are deliberately the non-disruptive choice:
//! a missing flag must never make the shell destroy user state.

use regex::Regex;
use serde::{Deserialize, Serialize};

use aide_common::ConfigError;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Top-level shell configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AideConfig {
    #[serde(default)]
    pub switch: SwitchPolicy,
    #[serde(default)]
    pub urls: UrlConfig,
}

/// Policy flags applied by the tab-switch controller on cross-family
/// switches.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchPolicy {
    /// Destroy every view of the current family when switching away from it.
    #[serde(default)]
    pub close_current_on_switch: bool,
    /// Pause a switch into the Editor family pending user confirmation.
    #[serde(default)]
    pub alert_on_editor_switch: bool,
}

/// URL configuration: the Assistant home page and the pattern that
/// classifies a URL as belonging to the Editor family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UrlConfig {
    #[serde(default = "default_index_url")]
    pub index_url: String,
    #[serde(default = "default_editor_url_pattern")]
    pub editor_url_pattern: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            index_url: default_index_url(),
            editor_url_pattern: default_editor_url_pattern(),
        }
    }
}

fn default_index_url() -> String {
    "https://assistant.aide.local/index".to_string()
}

fn default_editor_url_pattern() -> String {
    r"^https://editor\.aide\.local/".to_string()
}

/// Compiled URL rules, built once from [`UrlConfig`] at startup so the
/// orchestrator never re-parses the pattern on the hot path.
#[derive(Debug, Clone)]
pub struct UrlRules {
    index_url: String,
    editor: Regex,
}

impl UrlRules {
    pub fn compile(urls: &UrlConfig) -> Result<Self, ConfigError> {
        let editor = Regex::new(&urls.editor_url_pattern).map_err(|e| {
            ConfigError::ValidationError(format!(
                "editor_url_pattern is not a valid regex: {e}"
            ))
        })?;
        Ok(Self {
            index_url: urls.index_url.clone(),
            editor,
        })
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    /// Whether `url` is the Assistant home page. Query strings and a
    /// trailing slash on either side are ignored.
    pub fn is_index_url(&self, url: &str) -> bool {
        normalize(url) == normalize(&self.index_url)
    }

    /// Whether `url` belongs to the Editor family.
    pub fn is_editor_url(&self, url: &str) -> bool {
        self.editor.is_match(url)
    }
}

fn normalize(url: &str) -> &str {
    let url = url.split(['?', '#']).next().unwrap_or(url);
    url.trim_end_matches('/')
}
