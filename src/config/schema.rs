use crate::errors::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// TOML-deserializable config file. All fields are Option for layered merging.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub defaults: DefaultsFileConfig,
    #[serde(default)]
    pub targeting: TargetingFileConfig,
    #[serde(default)]
    pub map_kind: BTreeMap<String, String>,
    #[serde(default)]
    pub resolve: Vec<ResolveDirective>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DefaultsFileConfig {
    pub repo_name: Option<String>,
    pub langs: Option<Vec<String>>,
    pub format: Option<String>,
    pub quiet: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TargetingFileConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[[resolve]]` entry. `import_lang` defaults to `lang`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveDirective {
    pub lang: String,
    pub import_lang: Option<String>,
    pub import: String,
    pub label: String,
}

impl FileConfig {
    /// Load from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
