use serde::{Deserialize, Serialize};

use crate::domain::CatalogEntry;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct YmlEntry {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl From<YmlEntry> for CatalogEntry {
    fn from(value: YmlEntry) -> Self {
        Self {
            title: value.title,
            description: value.description,
            tags: value.tags.unwrap_or_default(),
        }
    }
}
