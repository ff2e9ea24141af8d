use crate::cli::Workspace;
use crate::config::resolve::CliOverrides;
use crate::errors::Result;
use crate::label::Label;
use crate::lang::LanguageRegistry;
use crate::output::json::{Metadata, ResolveReport, RuleReport};
use crate::output::OutputFormat;
use clap::Args;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Workspace root to index
    pub path: PathBuf,

    /// Repository name used in rule labels
    #[arg(long)]
    pub repo_name: Option<String>,

    /// Languages to index (comma-separated). Defaults to all.
    #[arg(long, value_delimiter = ',')]
    pub langs: Vec<String>,

    /// Output format
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Include glob patterns
    #[arg(long)]
    pub include: Vec<String>,

    /// Exclude glob patterns
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Suppress progress output
    #[arg(long)]
    pub quiet: bool,
}

impl ResolveArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            repo_name: self.repo_name.clone(),
            langs: self.langs.clone(),
            format: self.format,
            quiet: self.quiet,
            include: self.include.clone(),
            exclude: self.exclude.clone(),
        }
    }
}

pub fn run(args: &ResolveArgs) -> Result<()> {
    let start = Instant::now();

    let ws = Workspace::load(&args.path, &args.overrides())?;
    let format: OutputFormat = ws.config.format.parse()?;
    let quiet = ws.config.quiet;
    let c = &ws.config;

    let registry = LanguageRegistry::builtin(c);
    let ix = ws.build_index(&registry);
    let rules_indexed = ix.len();

    // Every rule with a provider gets resolved, including rules that are
    // not importable themselves.
    let targets: Vec<_> = ws
        .files
        .iter()
        .flat_map(|f| f.rules.iter().map(move |r| (f, r)))
        .filter_map(|(f, r)| registry.resolver_for(r, &f.pkg).map(|res| (f, r, res)))
        .filter(|(_, _, res)| c.langs.is_empty() || c.langs.iter().any(|l| l == res.name()))
        .collect();

    let progress = if !quiet {
        let pb = indicatif::ProgressBar::new(targets.len() as u64);
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} rules ({eta})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let rules: Vec<RuleReport> = targets
        .par_iter()
        .map(|&(f, r, resolver)| {
            let from = Label::new(&c.repo_name, &f.pkg, r.name());
            let imports: Vec<String> = r.attr_strings("imports").into_iter().map(String::from).collect();
            let resolution = resolver.resolve(c, &ix, r, &imports, &from);
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            RuleReport {
                label: from,
                kind: r.kind().to_string(),
                language: resolver.name().to_string(),
                resolution,
            }
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let unresolved_imports = rules.iter().map(|r| r.resolution.unresolved.len()).sum();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let report = ResolveReport {
        metadata: Metadata {
            root: ws.root.clone(),
            repo_name: c.repo_name.clone(),
            languages: registry.languages().into_iter().map(String::from).collect(),
            build_files: ws.files.len(),
            rules_total: ws.rule_count(),
            rules_indexed,
            unresolved_imports,
            elapsed_ms,
        },
        rules,
        diagnostics: ix.diagnostics().to_vec(),
    };

    let mut stdout = std::io::stdout();
    match format {
        OutputFormat::Json => crate::output::json::write_json(&mut stdout, &report)?,
        OutputFormat::Text => crate::output::text::write_resolve_text(&mut stdout, &report)?,
    }

    if !quiet {
        eprintln!(
            "Resolved {} rules ({} indexed) in {:.2}s",
            report.rules.len(),
            rules_indexed,
            elapsed_ms as f64 / 1000.0
        );
    }

    Ok(())
}
