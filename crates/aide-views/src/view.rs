//! View records and their labels.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use aide_common::ViewId;

use crate::surface::Surface;

/// Well-known label keys.
pub mod labels {
    /// The tab family the view was created under. Never changes.
    pub const FAMILY: &str = "family";
    /// Document title, best-effort, updated from the surface.
    pub const TITLE: &str = "title";
    /// Where the open request came from (e.g. `external`).
    pub const SOURCE: &str = "source";
}

/// The two mutually exclusive content families. A view's family is fixed
/// at creation; switching families selects or creates a different view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabFamily {
    Assistant,
    Editor,
}

impl TabFamily {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Assistant => "assistant",
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for TabFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One content view: the record the registry stores per surface.
pub struct ViewRecord {
    id: ViewId,
    url: String,
    labels: HashMap<String, String>,
    creation_index: u64,
    surface: Box<dyn Surface>,
}

impl ViewRecord {
    pub(crate) fn new(
        id: ViewId,
        url: String,
        labels: HashMap<String, String>,
        creation_index: u64,
        surface: Box<dyn Surface>,
    ) -> Self {
        Self {
            id,
            url,
            labels,
            creation_index,
            surface,
        }
    }

    pub fn id(&self) -> &ViewId {
        &self.id
    }

    /// Last-requested navigation target.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.url = url;
    }

    pub fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    pub(crate) fn set_label(&mut self, key: &str, value: String) {
        self.labels.insert(key.to_string(), value);
    }

    pub fn creation_index(&self) -> u64 {
        self.creation_index
    }

    pub fn family_label(&self) -> Option<&str> {
        self.labels.get(labels::FAMILY).map(String::as_str)
    }

    /// Whether this record's labels are a superset of `filter`.
    pub fn matches_labels(&self, filter: &HashMap<String, String>) -> bool {
        filter
            .iter()
            .all(|(k, v)| self.labels.get(k).is_some_and(|have| have == v))
    }

    pub(crate) fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    /// Serializable projection of this record for the sync payload.
    pub fn info(&self) -> ViewInfo {
        ViewInfo {
            id: self.id.clone(),
            url: self.url.clone(),
            title: self.labels.get(labels::TITLE).cloned(),
            labels: self.labels.clone(),
        }
    }
}

impl fmt::Debug for ViewRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRecord")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("labels", &self.labels)
            .field("creation_index", &self.creation_index)
            .finish_non_exhaustive()
    }
}

/// What the UI layer sees about one view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewInfo {
    pub id: ViewId,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub labels: HashMap<String, String>,
}
