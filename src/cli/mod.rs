pub mod config;
pub mod query;
pub mod resolve;

use crate::config::resolve::{resolve_config, CliOverrides};
use crate::config::ResolvedConfig;
use crate::errors::{Result, RuleIndexError};
use crate::lang::LanguageRegistry;
use crate::resolve::RuleIndex;
use crate::rule::File;
use crate::walk;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "ruleindex",
    version,
    about = "Resolve build rule dependencies from an import index"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Index every rule under a path and resolve each rule's imports
    Resolve(resolve::ResolveArgs),
    /// Find the rules that provide one import
    Query(query::QueryArgs),
    /// Inspect resolved configuration
    Config(config::ConfigArgs),
}

/// Dispatch to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resolve(args) => resolve::run(&args),
        Commands::Query(args) => query::run(&args),
        Commands::Config(args) => config::run(&args),
    }
}

/// Build files and configuration for one workspace root.
pub(crate) struct Workspace {
    pub root: PathBuf,
    pub config: ResolvedConfig,
    pub files: Vec<File>,
}

impl Workspace {
    pub fn load(path: &Path, overrides: &CliOverrides) -> Result<Self> {
        let root = path.canonicalize().map_err(|_| RuleIndexError::NoFiles {
            path: path.to_path_buf(),
        })?;
        let config = resolve_config(&root, overrides)?;
        let paths = walk::discover_build_files(&root, &config.include, &config.all_excludes())?;
        if paths.is_empty() {
            return Err(RuleIndexError::NoFiles { path: root });
        }
        let files = walk::load_build_files(&root, &paths)?;
        tracing::debug!("loaded {} build files from {}", files.len(), root.display());
        Ok(Self {
            root,
            config,
            files,
        })
    }

    /// Add every rule to a fresh index and finish it.
    pub fn build_index<'a>(&'a self, registry: &'a LanguageRegistry) -> RuleIndex<'a> {
        let mut ix = RuleIndex::from_registry(registry);
        for f in &self.files {
            for r in &f.rules {
                ix.add_rule(&self.config, r, f);
            }
        }
        ix.finish();
        ix
    }

    pub fn rule_count(&self) -> usize {
        self.files.iter().map(|f| f.rules.len()).sum()
    }
}
