use crate::label::Label;
use serde::Serialize;
use std::fmt;

/// Non-fatal problems found while building the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexDiagnostic {
    /// A second rule was registered under an existing label and was dropped.
    DuplicateLabel { label: Label },
    /// Rules that embed each other, directly or transitively. Members are
    /// listed in registration order.
    EmbedCycle { members: Vec<Label> },
}

impl fmt::Display for IndexDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexDiagnostic::DuplicateLabel { label } => {
                write!(f, "multiple rules found with label {label}")
            }
            IndexDiagnostic::EmbedCycle { members } => {
                write!(f, "embed cycle between ")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{m}")?;
                }
                Ok(())
            }
        }
    }
}
