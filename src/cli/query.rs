use crate::cli::Workspace;
use crate::config::resolve::CliOverrides;
use crate::errors::Result;
use crate::lang::LanguageRegistry;
use crate::output::json::QueryReport;
use crate::output::OutputFormat;
use crate::resolve::ImportSpec;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Workspace root to index
    pub path: PathBuf,

    /// Import string to look up
    #[arg(long)]
    pub import: String,

    /// Language the import is written in. Defaults to --lang.
    #[arg(long)]
    pub import_lang: Option<String>,

    /// Language of the importing rule
    #[arg(long)]
    pub lang: String,

    /// Repository name used in rule labels
    #[arg(long)]
    pub repo_name: Option<String>,

    /// Output format
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

pub fn run(args: &QueryArgs) -> Result<()> {
    let overrides = CliOverrides {
        repo_name: args.repo_name.clone(),
        format: args.format,
        ..Default::default()
    };
    let ws = Workspace::load(&args.path, &overrides)?;
    let format: OutputFormat = ws.config.format.parse()?;

    let registry = LanguageRegistry::builtin(&ws.config);
    let ix = ws.build_index(&registry);

    let import = ImportSpec::new(
        args.import_lang.as_deref().unwrap_or(&args.lang),
        args.import.as_str(),
    );
    let results = ix.find_rules_by_import_with_config(&ws.config, &import, &args.lang);
    tracing::debug!("{} result(s) for {import}", results.len());

    let report = QueryReport {
        import,
        lang: args.lang.clone(),
        results,
    };
    let mut stdout = std::io::stdout();
    match format {
        OutputFormat::Json => crate::output::json::write_json(&mut stdout, &report),
        OutputFormat::Text => crate::output::text::write_query_text(&mut stdout, &report),
    }
}
