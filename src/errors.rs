use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum RuleIndexError {
    #[error("No build files found in {path}")]
    #[diagnostic(code(ruleindex::no_files))]
    NoFiles { path: PathBuf },

    #[error("Invalid label {label:?}: {message}")]
    #[diagnostic(code(ruleindex::label))]
    Label { label: String, message: String },

    #[error("Invalid build file {file}: {message}")]
    #[diagnostic(code(ruleindex::manifest))]
    Manifest { file: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(ruleindex::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(ruleindex::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(ruleindex::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(ruleindex::glob))]
    Glob(#[from] globset::Error),

    #[error(transparent)]
    #[diagnostic(code(ruleindex::toml))]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RuleIndexError>;
