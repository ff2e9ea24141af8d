use crate::config::provenance::{ConfigKey, ProvenanceMap, Source};
use crate::config::schema::FileConfig;
use crate::config::{ResolvedConfig, PROJECT_CONFIG_FILE};
use crate::errors::{Result, RuleIndexError};
use crate::label::Label;
use crate::output::OutputFormat;
use crate::resolve::overrides::ResolveOverride;
use crate::resolve::ImportSpec;
use std::path::{Path, PathBuf};

/// CLI overrides extracted from command arguments.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub repo_name: Option<String>,
    pub langs: Vec<String>,
    pub format: Option<OutputFormat>,
    pub quiet: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Resolve configuration by applying layers bottom-up:
/// 1. Built-in defaults
/// 2. User config (~/.config/ruleindex/config.toml)
/// 3. Project config (nearest .ruleindex.toml walking up from working_dir)
/// 4. Environment variables
/// 5. CLI overrides
pub fn resolve_config(working_dir: &Path, cli: &CliOverrides) -> Result<ResolvedConfig> {
    let mut prov = ProvenanceMap::with_defaults();
    let mut loaded_files = Vec::new();

    // 1. Start with built-in defaults
    let mut config = ResolvedConfig::default();

    // 2. User config
    if let Some(user_config_path) = find_user_config() {
        if user_config_path.exists() {
            let file_config = load_file_config(&user_config_path, "user")?;
            apply_file_config(
                &mut config,
                &file_config,
                Source::UserConfig(user_config_path.clone()),
                &mut prov,
            )?;
            loaded_files.push(user_config_path);
        }
    }

    // 3. Project config (walk up from working_dir)
    if let Some(project_config_path) = find_project_config(working_dir) {
        let file_config = load_file_config(&project_config_path, "project")?;
        apply_file_config(
            &mut config,
            &file_config,
            Source::ProjectConfig(project_config_path.clone()),
            &mut prov,
        )?;
        loaded_files.push(project_config_path);
    }

    // 4. Environment variables
    apply_env_vars(&mut config, &mut prov);

    // 5. CLI overrides
    apply_cli_overrides(&mut config, cli, &mut prov);

    config.ignore_patterns = crate::config::ignore::load_ruleindexignore(working_dir);
    config.provenance = prov;
    config.loaded_files = loaded_files;

    Ok(config)
}

fn load_file_config(path: &Path, layer: &str) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path).map_err(|_| {
        RuleIndexError::Config(format!(
            "Could not read {layer} config: {}",
            path.display()
        ))
    })?;
    FileConfig::from_toml(&content)
        .map_err(|e| RuleIndexError::Config(format!("Invalid {layer} config: {e}")))
}

fn find_user_config() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ruleindex").join("config.toml"))
}

fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

fn apply_file_config(
    config: &mut ResolvedConfig,
    file: &FileConfig,
    source: Source,
    prov: &mut ProvenanceMap,
) -> Result<()> {
    // Defaults
    if let Some(ref repo_name) = file.defaults.repo_name {
        config.repo_name = repo_name.clone();
        prov.set(ConfigKey::RepoName, source.clone());
    }
    if let Some(ref langs) = file.defaults.langs {
        config.langs = langs.clone();
        prov.set(ConfigKey::Langs, source.clone());
    }
    if let Some(ref format) = file.defaults.format {
        config.format = format.clone();
        prov.set(ConfigKey::Format, source.clone());
    }
    if let Some(quiet) = file.defaults.quiet {
        config.quiet = quiet;
        prov.set(ConfigKey::Quiet, source.clone());
    }

    // Targeting
    if !file.targeting.include.is_empty() {
        config.include = file.targeting.include.clone();
        prov.set(ConfigKey::Include, source.clone());
    }
    if !file.targeting.exclude.is_empty() {
        config.exclude = file.targeting.exclude.clone();
        prov.set(ConfigKey::Exclude, source.clone());
    }

    // Kind mapping merges across layers; later layers win per kind.
    if !file.map_kind.is_empty() {
        config.map_kind.extend(
            file.map_kind
                .iter()
                .map(|(from, to)| (from.clone(), to.clone())),
        );
        prov.set(ConfigKey::MapKind, source.clone());
    }

    // Resolve directives accumulate; later ones take priority on lookup.
    if !file.resolve.is_empty() {
        for directive in &file.resolve {
            let label = Label::parse(&directive.label).map_err(|e| {
                RuleIndexError::Config(format!(
                    "Invalid label in resolve directive for {}: {e}",
                    directive.import
                ))
            })?;
            let import_lang = directive
                .import_lang
                .clone()
                .unwrap_or_else(|| directive.lang.clone());
            config.overrides.push(ResolveOverride {
                imp: ImportSpec::new(import_lang, directive.import.clone()),
                lang: directive.lang.clone(),
                label,
            });
        }
        prov.set(ConfigKey::Resolve, source);
    }

    Ok(())
}

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn apply_env_vars(config: &mut ResolvedConfig, prov: &mut ProvenanceMap) {
    if let Ok(val) = std::env::var("RULEINDEX_REPO_NAME") {
        config.repo_name = val;
        prov.set(
            ConfigKey::RepoName,
            Source::EnvVar("RULEINDEX_REPO_NAME".into()),
        );
    }
    if let Ok(val) = std::env::var("RULEINDEX_LANGS") {
        config.langs = split_list(&val);
        prov.set(ConfigKey::Langs, Source::EnvVar("RULEINDEX_LANGS".into()));
    }
    if let Ok(val) = std::env::var("RULEINDEX_FORMAT") {
        config.format = val;
        prov.set(ConfigKey::Format, Source::EnvVar("RULEINDEX_FORMAT".into()));
    }
    if let Ok(val) = std::env::var("RULEINDEX_QUIET") {
        config.quiet = val == "1" || val.eq_ignore_ascii_case("true");
        prov.set(ConfigKey::Quiet, Source::EnvVar("RULEINDEX_QUIET".into()));
    }
    if let Ok(val) = std::env::var("RULEINDEX_INCLUDE") {
        config.include = split_list(&val);
        prov.set(ConfigKey::Include, Source::EnvVar("RULEINDEX_INCLUDE".into()));
    }
    if let Ok(val) = std::env::var("RULEINDEX_EXCLUDE") {
        config.exclude = split_list(&val);
        prov.set(ConfigKey::Exclude, Source::EnvVar("RULEINDEX_EXCLUDE".into()));
    }
}

fn apply_cli_overrides(config: &mut ResolvedConfig, cli: &CliOverrides, prov: &mut ProvenanceMap) {
    if let Some(ref repo_name) = cli.repo_name {
        config.repo_name = repo_name.clone();
        prov.set(ConfigKey::RepoName, Source::CliFlag("--repo-name".into()));
    }
    if !cli.langs.is_empty() {
        config.langs = cli.langs.clone();
        prov.set(ConfigKey::Langs, Source::CliFlag("--langs".into()));
    }
    if let Some(format) = cli.format {
        config.format = format.to_string();
        prov.set(ConfigKey::Format, Source::CliFlag("--format".into()));
    }
    if cli.quiet {
        config.quiet = true;
        prov.set(ConfigKey::Quiet, Source::CliFlag("--quiet".into()));
    }
    if !cli.include.is_empty() {
        config.include = cli.include.clone();
        prov.set(ConfigKey::Include, Source::CliFlag("--include".into()));
    }
    if !cli.exclude.is_empty() {
        config.exclude = cli.exclude.clone();
        prov.set(ConfigKey::Exclude, Source::CliFlag("--exclude".into()));
    }
}
