pub mod diagnostics;
pub mod embeds;
pub mod index;
pub mod overrides;

pub use diagnostics::IndexDiagnostic;
pub use index::{AddOutcome, ResolverLookup, RuleIndex};

use crate::config::ResolvedConfig;
use crate::label::Label;
use crate::rule::{File, Rule};
use serde::Serialize;
use std::fmt;

/// An importable symbol: an import string tagged with the language it is
/// written in (e.g. `{go, example.com/foo}` or `{proto, foo/bar.proto}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ImportSpec {
    pub lang: String,
    pub imp: String,
}

impl ImportSpec {
    pub fn new(lang: impl Into<String>, imp: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            imp: imp.into(),
        }
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lang, self.imp)
    }
}

/// Per-language capability provider.
pub trait Resolver: Send + Sync {
    /// Language name, e.g. "go". Usually a prefix of the rule kinds handled.
    fn name(&self) -> &str;

    /// Import specs by which `r` can be imported.
    ///
    /// `None` means the rule is never importable and will not be indexed.
    /// `Some` (even empty) means the rule is indexed and may become
    /// importable through what it embeds.
    fn imports(&self, c: &ResolvedConfig, r: &Rule, f: &File) -> Option<Vec<ImportSpec>>;

    /// Labels of rules embedded by `r`. Relative labels are resolved by the
    /// index against `from`.
    fn embeds(&self, r: &Rule, from: &Label) -> Vec<Label>;

    /// Translate the import strings used by `r` into dependency labels.
    fn resolve(
        &self,
        c: &ResolvedConfig,
        ix: &RuleIndex<'_>,
        r: &Rule,
        imports: &[String],
        from: &Label,
    ) -> Resolution;
}

/// Optional capability: resolve imports on behalf of other languages.
pub trait CrossResolver: Send + Sync {
    /// `lang` is the language of the rule doing the importing.
    fn cross_resolve(
        &self,
        c: &ResolvedConfig,
        ix: &RuleIndex<'_>,
        imp: &ImportSpec,
        lang: &str,
    ) -> Vec<FindResult>;
}

/// A rule matched by an import query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindResult {
    /// Absolute label of the matched rule.
    pub label: Label,
    /// Transitive closure of labels the matched rule embeds. May contain
    /// duplicates; never contains `label` itself.
    pub embeds: Vec<Label>,
}

impl FindResult {
    /// True if this result is `from` itself or transitively embeds `from`.
    /// Depending on such a result would make a rule depend on itself.
    pub fn is_self_import(&self, from: &Label) -> bool {
        self.label == *from || self.embeds.iter().any(|e| e == from)
    }
}

/// An import with more than one candidate rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub import: String,
    pub candidates: Vec<Label>,
}

/// Outcome of resolving one rule's imports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Sorted, deduplicated dependency labels, shortened relative to the
    /// resolving rule's package.
    pub deps: Vec<Label>,
    pub unresolved: Vec<String>,
    pub ambiguous: Vec<Ambiguity>,
}

/// How a single import string was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResolution {
    Dep(Label),
    /// The import is provided by the importing rule itself.
    SelfImport,
    Unresolved,
    /// Several rules provide the import; `chosen` is the first in index order.
    Ambiguous {
        chosen: Label,
        candidates: Vec<Label>,
    },
}

impl Resolution {
    /// Record the outcome for one import of the rule `from`.
    pub fn add(&mut self, import: &str, outcome: ImportResolution, from: &Label) {
        match outcome {
            ImportResolution::Dep(label) => self.deps.push(label.rel(&from.repo, &from.pkg)),
            ImportResolution::SelfImport => {}
            ImportResolution::Unresolved => self.unresolved.push(import.to_string()),
            ImportResolution::Ambiguous { chosen, candidates } => {
                tracing::warn!("{from}: multiple rules provide {import}; using {chosen}");
                self.deps.push(chosen.rel(&from.repo, &from.pkg));
                self.ambiguous.push(Ambiguity {
                    import: import.to_string(),
                    candidates,
                });
            }
        }
    }

    /// Sort and deduplicate deps.
    pub fn finalize(mut self) -> Self {
        self.deps.sort();
        self.deps.dedup();
        self
    }
}
