use crate::errors::{Result, RuleIndexError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the declarative build file loaded from each package directory.
pub const BUILD_FILE_NAME: &str = "BUILD.toml";

/// An attribute value on a rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    String(String),
    List(Vec<String>),
}

/// A single build rule: a kind, a name and its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rule {
    kind: String,
    name: String,
    #[serde(flatten)]
    attrs: BTreeMap<String, AttrValue>,
}

impl Rule {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// String attribute, or `None` if unset or not a string.
    pub fn attr_string(&self, key: &str) -> Option<&str> {
        match self.attrs.get(key) {
            Some(AttrValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// List attribute. A single string is treated as a one-element list.
    pub fn attr_strings(&self, key: &str) -> Vec<&str> {
        match self.attrs.get(key) {
            Some(AttrValue::List(items)) => items.iter().map(String::as_str).collect(),
            Some(AttrValue::String(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        match self.attrs.get(key) {
            Some(AttrValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileSchema {
    #[serde(default, rename = "rule")]
    rules: Vec<Rule>,
}

/// A build file: the rules declared in one package.
#[derive(Debug, Clone)]
pub struct File {
    /// Package path relative to the repository root, `/`-separated.
    pub pkg: String,
    pub path: PathBuf,
    pub rules: Vec<Rule>,
}

impl File {
    /// An empty file for the given package, mostly useful when building
    /// rules programmatically.
    pub fn empty(pkg: impl Into<String>) -> Self {
        let pkg = pkg.into();
        Self {
            path: PathBuf::from(&pkg).join(BUILD_FILE_NAME),
            pkg,
            rules: Vec::new(),
        }
    }

    pub fn parse(content: &str, path: &Path, pkg: &str) -> Result<Self> {
        let schema: FileSchema =
            toml::from_str(content).map_err(|e| RuleIndexError::Manifest {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;
        for rule in &schema.rules {
            if rule.name.is_empty() {
                return Err(RuleIndexError::Manifest {
                    file: path.to_path_buf(),
                    message: format!("rule of kind {} has an empty name", rule.kind),
                });
            }
        }
        Ok(Self {
            pkg: pkg.to_string(),
            path: path.to_path_buf(),
            rules: schema.rules,
        })
    }

    pub fn load(path: &Path, pkg: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path, pkg)
    }
}
