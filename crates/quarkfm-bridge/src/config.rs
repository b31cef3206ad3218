use serde::{Deserialize, Serialize};

use crate::api::FormFields;

/// Server address used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5180";

/// Local configuration of the client application.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the classification server. Endpoint paths are resolved
    /// against it.
    pub server_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
        }
    }
}

/// Connection settings of the language model used by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSection {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,
}

/// Category labels and how they map to target folders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassificationSection {
    /// Comma separated category labels.
    pub categories: String,
    /// One `category:path` entry per line.
    pub category_paths: String,
    pub category_descriptions: String,
}

/// Source and destination folders on the server's file system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsSection {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_folder: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_base_folder: String,
}

/// Configuration document owned by the classification server. The client
/// reads it to fill the configuration page and posts it back on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api: ApiSection,
    pub classification: ClassificationSection,
    pub paths: PathsSection,
}

/// Form field names of the configuration page, one per [`ServerConfig`]
/// value.
pub mod field {
    pub const API_KEY: &str = "api_key";
    pub const BASE_URL: &str = "base_url";
    pub const MODEL: &str = "model";
    pub const CATEGORIES: &str = "categories";
    pub const CATEGORY_PATHS: &str = "category_paths";
    pub const CATEGORY_DESCRIPTIONS: &str = "category_descriptions";
    pub const SOURCE_FOLDER: &str = "source_folder";
    pub const TARGET_BASE_FOLDER: &str = "target_base_folder";
}

/// Separator used to enter several `category:path` entries on one line.
const INLINE_PATH_SEPARATOR: char = ';';

impl ServerConfig {
    /// Builds the document from the flat fields of the configuration form.
    /// Missing fields become empty strings. The server overwrites every key
    /// it receives, so empty `api` and `paths` values are left out of the
    /// serialized document and keep their stored value.
    pub fn from_fields(fields: &FormFields) -> Self {
        let value = |name: &str| fields.get(name).unwrap_or_default().trim().to_owned();

        Self {
            api: ApiSection {
                api_key: value(field::API_KEY),
                base_url: value(field::BASE_URL),
                model: value(field::MODEL),
            },
            classification: ClassificationSection {
                categories: value(field::CATEGORIES),
                category_paths: value(field::CATEGORY_PATHS)
                    .split(INLINE_PATH_SEPARATOR)
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n"),
                category_descriptions: value(field::CATEGORY_DESCRIPTIONS),
            },
            paths: PathsSection {
                source_folder: value(field::SOURCE_FOLDER),
                target_base_folder: value(field::TARGET_BASE_FOLDER),
            },
        }
    }

    /// Category paths joined on a single line, the way the configuration
    /// form displays them.
    pub fn inline_category_paths(&self) -> String {
        self.classification
            .category_paths
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(&format!("{INLINE_PATH_SEPARATOR} "))
    }
}
