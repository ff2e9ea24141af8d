pub mod ignore;
pub mod provenance;
pub mod resolve;
pub mod schema;
pub mod show;

use crate::resolve::overrides::ResolveOverride;
use provenance::ProvenanceMap;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name of the project config file, looked up from the working directory upwards.
pub const PROJECT_CONFIG_FILE: &str = ".ruleindex.toml";

/// Fully resolved configuration after all layers are applied.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    // Workspace
    pub repo_name: String,
    /// Languages to index. Empty means all.
    pub langs: Vec<String>,

    // Operational
    pub format: String,
    pub quiet: bool,

    // Targeting
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub ignore_patterns: Vec<String>,

    // Resolution
    /// Wrapper kind -> builtin kind.
    pub map_kind: BTreeMap<String, String>,
    pub overrides: Vec<ResolveOverride>,

    // Provenance
    pub provenance: ProvenanceMap,
    pub loaded_files: Vec<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            repo_name: String::new(),
            langs: Vec::new(),
            format: "json".to_string(),
            quiet: false,
            include: Vec::new(),
            exclude: Vec::new(),
            ignore_patterns: Vec::new(),
            map_kind: BTreeMap::new(),
            overrides: Vec::new(),
            provenance: ProvenanceMap::new(),
            loaded_files: Vec::new(),
        }
    }
}

impl ResolvedConfig {
    /// Exclude globs from config plus `.ruleindexignore` patterns.
    pub fn all_excludes(&self) -> Vec<String> {
        let mut exclude = self.exclude.clone();
        exclude.extend(self.ignore_patterns.iter().cloned());
        exclude
    }
}
