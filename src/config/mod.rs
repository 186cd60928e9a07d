use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod store;

pub use store::{ConfigError, ConfigStore};

pub const DEFAULT_TOOL_KEY: &str = "stable_diffusion";
pub const DEFAULT_TOOL_NAME: &str = "Stable Diffusion";
pub const DEFAULT_TOOL_URL: &str = "http://127.0.0.1:7860";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebviewTheme {
    #[default]
    Light,
    Dark,
}

impl WebviewTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// One configured external web tool.
///
/// On disk the key is the `menu_items` mapping key, so it is not serialized
/// with the entry itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ToolEntry {
    #[serde(skip)]
    pub key: String,
    pub name: String,
    pub url: String,
}

impl ToolEntry {
    pub fn new(key: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredConfiguration")]
pub struct Configuration {
    #[serde(rename = "webview_theme", default)]
    pub theme: WebviewTheme,
    #[serde(rename = "menu_items", default)]
    pub tools: IndexMap<String, ToolEntry>,
}

impl Default for Configuration {
    fn default() -> Self {
        let mut config = Self::empty(WebviewTheme::Light);
        config.insert(ToolEntry::new(
            DEFAULT_TOOL_KEY,
            DEFAULT_TOOL_NAME,
            DEFAULT_TOOL_URL,
        ));
        config
    }
}

impl Configuration {
    pub fn empty(theme: WebviewTheme) -> Self {
        Self {
            theme,
            tools: IndexMap::new(),
        }
    }

    /// Inserts or replaces the entry under its key. A replaced key keeps its
    /// original position.
    pub fn insert(&mut self, entry: ToolEntry) {
        self.tools.insert(entry.key.clone(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&ToolEntry> {
        self.tools.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ToolEntry> {
        self.tools.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn first_key(&self) -> Option<&str> {
        self.keys().next()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

}

/// `menu_items` value as written on disk. Older files may omit `name`.
#[derive(Deserialize)]
struct StoredEntry {
    name: Option<String>,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
struct StoredConfiguration {
    #[serde(rename = "webview_theme", default)]
    theme: WebviewTheme,
    #[serde(rename = "menu_items", default)]
    tools: IndexMap<String, StoredEntry>,
}

impl From<StoredConfiguration> for Configuration {
    fn from(stored: StoredConfiguration) -> Self {
        let tools = stored
            .tools
            .into_iter()
            .map(|(key, entry)| {
                let name = entry.name.unwrap_or_else(|| key.clone());
                let tool = ToolEntry {
                    key: key.clone(),
                    name,
                    url: entry.url,
                };
                (key, tool)
            })
            .collect();
        Self {
            theme: stored.theme,
            tools,
        }
    }
}
