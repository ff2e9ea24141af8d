use crate::config::provenance::ConfigKey;
use crate::config::ResolvedConfig;
use std::io::Write;

/// Render `config show` output.
pub fn render_show<W: Write>(w: &mut W, config: &ResolvedConfig) -> std::io::Result<()> {
    if config.loaded_files.is_empty() {
        writeln!(w, "Loaded config files: (none)")?;
    } else {
        writeln!(w, "Loaded config files:")?;
        for (i, path) in config.loaded_files.iter().enumerate() {
            writeln!(w, "  {}. {}", i + 1, path.display())?;
        }
    }
    writeln!(w)?;

    writeln!(w, "Resolved settings:")?;
    for (key, source) in config.provenance.sorted_entries() {
        writeln!(w, "  {}: {} <- {}", key, value_for_key(config, key), source)?;
    }

    if !config.overrides.is_empty() {
        writeln!(w)?;
        writeln!(w, "Resolve directives (last match wins):")?;
        for o in &config.overrides {
            writeln!(w, "  [{}] {} -> {}", o.lang, o.imp, o.label)?;
        }
    }

    Ok(())
}

/// Render `config explain <section>` output.
pub fn render_explain<W: Write>(
    w: &mut W,
    config: &ResolvedConfig,
    section: &str,
) -> std::io::Result<()> {
    let entries = config.provenance.entries_in_section(section);

    if entries.is_empty() {
        writeln!(w, "Unknown config section: {section}")?;
        writeln!(
            w,
            "Available sections: defaults, targeting, map_kind, resolve"
        )?;
        return Ok(());
    }

    writeln!(w, "Section: {section}")?;
    writeln!(w)?;
    for (key, source) in &entries {
        writeln!(w, "  {}: {} <- {}", key, value_for_key(config, *key), source)?;
    }

    Ok(())
}

fn value_for_key(config: &ResolvedConfig, key: ConfigKey) -> String {
    match key {
        ConfigKey::RepoName if config.repo_name.is_empty() => "(main)".to_string(),
        ConfigKey::RepoName => config.repo_name.clone(),
        ConfigKey::Langs if config.langs.is_empty() => "(all)".to_string(),
        ConfigKey::Langs => config.langs.join(", "),
        ConfigKey::Format => config.format.clone(),
        ConfigKey::Quiet => config.quiet.to_string(),
        ConfigKey::Include => format!("{:?}", config.include),
        ConfigKey::Exclude => format!("{:?}", config.exclude),
        ConfigKey::MapKind if config.map_kind.is_empty() => "(none)".to_string(),
        ConfigKey::MapKind => config
            .map_kind
            .iter()
            .map(|(from, to)| format!("{from} -> {to}"))
            .collect::<Vec<_>>()
            .join(", "),
        ConfigKey::Resolve => format!("{} directive(s)", config.overrides.len()),
    }
}
