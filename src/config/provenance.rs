use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Default,
    UserConfig(PathBuf),
    ProjectConfig(PathBuf),
    EnvVar(String),
    CliFlag(String),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Default => write!(f, "default"),
            Source::UserConfig(path) => write!(f, "user config ({})", path.display()),
            Source::ProjectConfig(path) => write!(f, "project config ({})", path.display()),
            Source::EnvVar(name) => write!(f, "env var ({name})"),
            Source::CliFlag(name) => write!(f, "CLI flag ({name})"),
        }
    }
}

/// Every setting that carries provenance. Ordered as rendered by `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    RepoName,
    Langs,
    Format,
    Quiet,
    Include,
    Exclude,
    MapKind,
    Resolve,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 8] = [
        ConfigKey::RepoName,
        ConfigKey::Langs,
        ConfigKey::Format,
        ConfigKey::Quiet,
        ConfigKey::Include,
        ConfigKey::Exclude,
        ConfigKey::MapKind,
        ConfigKey::Resolve,
    ];

    /// Dotted key as written in the config file.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::RepoName => "defaults.repo_name",
            ConfigKey::Langs => "defaults.langs",
            ConfigKey::Format => "defaults.format",
            ConfigKey::Quiet => "defaults.quiet",
            ConfigKey::Include => "targeting.include",
            ConfigKey::Exclude => "targeting.exclude",
            ConfigKey::MapKind => "map_kind",
            ConfigKey::Resolve => "resolve",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceMap {
    entries: BTreeMap<ConfigKey, Source>,
}

impl ProvenanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with every key attributed to the built-in defaults.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        for key in ConfigKey::ALL {
            map.set(key, Source::Default);
        }
        map
    }

    pub fn set(&mut self, key: ConfigKey, source: Source) {
        self.entries.insert(key, source);
    }

    pub fn get(&self, key: ConfigKey) -> Option<&Source> {
        self.entries.get(&key)
    }

    /// All entries in display order.
    pub fn sorted_entries(&self) -> Vec<(ConfigKey, &Source)> {
        self.entries.iter().map(|(k, v)| (*k, v)).collect()
    }

    /// Entries whose dotted key lives under `section` (e.g. "targeting").
    pub fn entries_in_section(&self, section: &str) -> Vec<(ConfigKey, &Source)> {
        self.entries
            .iter()
            .filter(|(k, _)| {
                let key = k.as_str();
                key == section
                    || key
                        .strip_prefix(section)
                        .is_some_and(|rest| rest.starts_with('.'))
            })
            .map(|(k, v)| (*k, v))
            .collect()
    }
}
