use crate::config::resolve::{resolve_config, CliOverrides};
use crate::errors::{Result, RuleIndexError};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show resolved configuration with provenance
    Show {
        /// Working directory (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the settings of one config section and where they come from
    Explain {
        /// Section name (defaults, targeting, map_kind, resolve)
        section: String,
        /// Working directory (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn run(args: &ConfigArgs) -> Result<()> {
    let mut stdout = std::io::stdout();
    match &args.action {
        ConfigAction::Show { path } => {
            let config = resolve_config(&working_dir(path.as_deref())?, &CliOverrides::default())?;
            crate::config::show::render_show(&mut stdout, &config)?;
        }
        ConfigAction::Explain { section, path } => {
            let config = resolve_config(&working_dir(path.as_deref())?, &CliOverrides::default())?;
            crate::config::show::render_explain(&mut stdout, &config, section)?;
        }
    }
    Ok(())
}

fn working_dir(path: Option<&Path>) -> Result<PathBuf> {
    let p = path.unwrap_or(Path::new("."));
    p.canonicalize()
        .map_err(|_| RuleIndexError::Config(format!("Invalid path: {}", p.display())))
}
