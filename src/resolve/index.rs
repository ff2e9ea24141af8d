use crate::config::ResolvedConfig;
use crate::label::Label;
use crate::lang::LanguageRegistry;
use crate::resolve::diagnostics::IndexDiagnostic;
use crate::resolve::{embeds, CrossResolver, FindResult, ImportSpec, Resolver};
use crate::rule::{File, Rule};
use std::collections::{HashMap, HashSet};

/// Maps a rule and its package-relative path to the provider for its kind.
pub type ResolverLookup<'a> =
    Box<dyn Fn(&Rule, &str) -> Option<&'a dyn Resolver> + Send + Sync + 'a>;

/// What [`RuleIndex::add_rule`] did with a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Indexed,
    /// No provider handles the rule's kind.
    NoResolver,
    /// The provider's language is excluded by the configured language list.
    LanguageFiltered,
    /// The provider reported the rule as never importable.
    NotImportable,
    /// Another rule already holds this label; the earlier one is kept.
    DuplicateLabel,
}

/// Information about one indexed rule.
pub(crate) struct RuleRecord<'a> {
    pub(crate) rule: &'a Rule,
    pub(crate) file: &'a File,
    pub(crate) label: Label,
    pub(crate) resolver: &'a dyn Resolver,

    /// Import specs this rule can be reached by, including those inherited
    /// from embedded rules. May hold duplicates until the import map is built.
    pub(crate) imported_as: Vec<ImportSpec>,

    /// Transitive closure of embedded labels, same language only.
    pub(crate) embeds: Vec<Label>,

    /// Set when a same-language rule embeds this one. Embedded rules are not
    /// indexed on their own.
    pub(crate) embedded: bool,

    /// Name of the provider that produced `imported_as`.
    pub(crate) lang: String,
}

/// Table of rules, indexed by label and by import spec.
///
/// Built in two phases: [`add_rule`](Self::add_rule) for every candidate
/// rule, then [`finish`](Self::finish) once. Only after `finish` can the
/// index be queried; from then on it is read-only and safe to share across
/// threads.
pub struct RuleIndex<'a> {
    rules: Vec<RuleRecord<'a>>,
    label_map: HashMap<Label, usize>,
    import_map: HashMap<ImportSpec, Vec<usize>>,
    lookup: ResolverLookup<'a>,
    cross_resolvers: Vec<&'a dyn CrossResolver>,
    diagnostics: Vec<IndexDiagnostic>,
    did_finish: bool,
}

impl<'a> RuleIndex<'a> {
    pub fn new(lookup: ResolverLookup<'a>, cross_resolvers: Vec<&'a dyn CrossResolver>) -> Self {
        Self {
            rules: Vec::new(),
            label_map: HashMap::new(),
            import_map: HashMap::new(),
            lookup,
            cross_resolvers,
            diagnostics: Vec::new(),
            did_finish: false,
        }
    }

    /// Index rules using the providers and cross resolvers of a registry.
    pub fn from_registry(registry: &'a LanguageRegistry) -> Self {
        Self::new(
            Box::new(move |r: &Rule, pkg: &str| registry.resolver_for(r, pkg)),
            registry.cross_resolvers(),
        )
    }

    /// Add a candidate rule.
    ///
    /// # Panics
    ///
    /// If called after [`finish`](Self::finish).
    pub fn add_rule(&mut self, c: &ResolvedConfig, r: &'a Rule, f: &'a File) -> AddOutcome {
        assert!(!self.did_finish, "add_rule must not be called after finish");

        let Some(resolver) = (self.lookup)(r, &f.pkg) else {
            tracing::debug!("no resolver for {} rule {}", r.kind(), r.name());
            return AddOutcome::NoResolver;
        };
        let lang = resolver.name();
        if !passes_language_filter(&c.langs, lang) {
            tracing::debug!("language {lang} filtered out; not indexing {}", r.name());
            return AddOutcome::LanguageFiltered;
        }
        // An empty list still indexes the rule: it may become importable
        // through what it embeds.
        let Some(imported_as) = resolver.imports(c, r, f) else {
            return AddOutcome::NotImportable;
        };

        let label = Label::new(&c.repo_name, &f.pkg, r.name());
        if self.label_map.contains_key(&label) {
            let diag = IndexDiagnostic::DuplicateLabel { label };
            tracing::warn!("{diag}");
            self.diagnostics.push(diag);
            return AddOutcome::DuplicateLabel;
        }

        self.label_map.insert(label.clone(), self.rules.len());
        self.rules.push(RuleRecord {
            rule: r,
            file: f,
            label,
            resolver,
            imported_as,
            embeds: Vec::new(),
            embedded: false,
            lang: lang.to_string(),
        });
        AddOutcome::Indexed
    }

    /// Compute embed closures and build the import map. Must be called after
    /// all `add_rule` calls and before any query. Later calls do nothing.
    pub fn finish(&mut self) -> &[IndexDiagnostic] {
        if self.did_finish {
            return &self.diagnostics;
        }
        let cycles = embeds::collect_embeds(&mut self.rules, &self.label_map);
        self.diagnostics.extend(cycles);
        self.build_import_index();
        self.did_finish = true;
        &self.diagnostics
    }

    fn build_import_index(&mut self) {
        let mut import_map: HashMap<ImportSpec, Vec<usize>> = HashMap::new();
        for (i, record) in self.rules.iter().enumerate() {
            if record.embedded {
                continue;
            }
            let mut indexed = HashSet::new();
            for imp in &record.imported_as {
                if indexed.insert(imp) {
                    import_map.entry(imp.clone()).or_default().push(i);
                }
            }
        }
        self.import_map = import_map;
    }

    /// Rules of language `lang` that provide `imp`, in registration order.
    ///
    /// `imp.lang` is the language the import is written in; `lang` is the
    /// language of the rule doing the importing. Any number of rules may
    /// match; choosing between them is up to the caller.
    pub fn find_rules_by_import(&self, imp: &ImportSpec, lang: &str) -> Vec<FindResult> {
        debug_assert!(self.did_finish, "index queried before finish");
        let Some(matches) = self.import_map.get(imp) else {
            return Vec::new();
        };
        matches
            .iter()
            .map(|&i| &self.rules[i])
            .filter(|m| m.lang == lang)
            .map(|m| FindResult {
                label: m.label.clone(),
                embeds: m.embeds.clone(),
            })
            .collect()
    }

    /// Like [`find_rules_by_import`](Self::find_rules_by_import), but falls
    /// back to every registered cross resolver, in order, when the index has
    /// no match.
    pub fn find_rules_by_import_with_config(
        &self,
        c: &ResolvedConfig,
        imp: &ImportSpec,
        lang: &str,
    ) -> Vec<FindResult> {
        let results = self.find_rules_by_import(imp, lang);
        if !results.is_empty() {
            return results;
        }
        self.cross_resolvers
            .iter()
            .flat_map(|cr| cr.cross_resolve(c, self, imp, lang))
            .collect()
    }

    /// The rule and file registered under an absolute label.
    pub fn rule(&self, label: &Label) -> Option<(&'a Rule, &'a File)> {
        self.label_map.get(label).map(|&i| {
            let record = &self.rules[i];
            (record.rule, record.file)
        })
    }

    /// Language of the provider that indexed `label`.
    pub fn language_of(&self, label: &Label) -> Option<&str> {
        self.label_map
            .get(label)
            .map(|&i| self.rules[i].lang.as_str())
    }

    /// Labels of all indexed rules in registration order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.rules.iter().map(|r| &r.label)
    }

    pub fn diagnostics(&self) -> &[IndexDiagnostic] {
        &self.diagnostics
    }

    /// Number of indexed rules, embedded ones included.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// True if the filter is empty or names `lang`.
fn passes_language_filter(filter: &[String], lang: &str) -> bool {
    filter.is_empty() || filter.iter().any(|l| l == lang)
}
