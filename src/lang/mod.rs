pub mod go;
pub mod proto;

use crate::config::ResolvedConfig;
use crate::label::Label;
use crate::resolve::overrides::find_rule_with_override;
use crate::resolve::{CrossResolver, ImportResolution, ImportSpec, Resolver, RuleIndex};
use crate::rule::Rule;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Language providers keyed by the rule kinds they handle.
///
/// Each registration pairs a primary [`Resolver`] with an optional
/// [`CrossResolver`]; the same provider object may fill both slots.
#[derive(Default)]
pub struct LanguageRegistry {
    resolvers: Vec<Arc<dyn Resolver>>,
    by_kind: HashMap<String, usize>,
    cross_resolvers: Vec<Arc<dyn CrossResolver>>,
    map_kind: BTreeMap<String, String>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the builtin `proto` and `go` providers, honoring the
    /// configured kind mapping.
    pub fn builtin(config: &ResolvedConfig) -> Self {
        let mut registry = Self::new().with_map_kind(config.map_kind.clone());
        registry.register(proto::KINDS, Arc::new(proto::ProtoLang), None);
        let go = Arc::new(go::GoLang);
        registry.register(go::KINDS, go.clone(), Some(go));
        registry
    }

    /// Treat rules of kind `from` as rules of kind `to` when looking up providers.
    pub fn with_map_kind(mut self, map_kind: BTreeMap<String, String>) -> Self {
        self.map_kind = map_kind;
        self
    }

    pub fn register(
        &mut self,
        kinds: &[&str],
        resolver: Arc<dyn Resolver>,
        cross_resolver: Option<Arc<dyn CrossResolver>>,
    ) {
        let idx = self.resolvers.len();
        for kind in kinds {
            if let Some(prev) = self.by_kind.insert(kind.to_string(), idx) {
                tracing::warn!(
                    "kind {kind} was handled by {}; now handled by {}",
                    self.resolvers[prev].name(),
                    resolver.name()
                );
            }
        }
        self.resolvers.push(resolver);
        if let Some(cr) = cross_resolver {
            self.cross_resolvers.push(cr);
        }
    }

    /// Provider for a rule's kind, after kind mapping.
    pub fn resolver_for(&self, r: &Rule, _pkg_rel: &str) -> Option<&dyn Resolver> {
        let kind = self
            .map_kind
            .get(r.kind())
            .map(String::as_str)
            .unwrap_or(r.kind());
        self.by_kind
            .get(kind)
            .map(|&idx| self.resolvers[idx].as_ref())
    }

    /// Cross resolvers in registration order.
    pub fn cross_resolvers(&self) -> Vec<&dyn CrossResolver> {
        self.cross_resolvers.iter().map(|cr| cr.as_ref()).collect()
    }

    /// Names of the registered languages in registration order.
    pub fn languages(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }
}

/// Resolve one import for the rule `from`.
///
/// `[[resolve]]` directives win over the index; the index (with
/// cross-resolution fallback) is consulted otherwise. Any match that is
/// `from` itself or embeds `from` makes the import a self-import.
pub fn resolve_import(
    c: &ResolvedConfig,
    ix: &RuleIndex<'_>,
    imp: &ImportSpec,
    lang: &str,
    from: &Label,
) -> ImportResolution {
    if let Some(label) = find_rule_with_override(c, imp, lang) {
        let label = label.abs(&from.repo, &from.pkg);
        if label == *from {
            return ImportResolution::SelfImport;
        }
        return ImportResolution::Dep(label);
    }

    let results = ix.find_rules_by_import_with_config(c, imp, lang);
    if results.iter().any(|r| r.is_self_import(from)) {
        return ImportResolution::SelfImport;
    }
    match results.as_slice() {
        [] => ImportResolution::Unresolved,
        [only] => ImportResolution::Dep(only.label.clone()),
        [first, ..] => ImportResolution::Ambiguous {
            chosen: first.label.clone(),
            candidates: results.iter().map(|r| r.label.clone()).collect(),
        },
    }
}

/// Parse label strings from an attribute, skipping invalid ones.
pub(crate) fn parse_labels<'s>(values: impl IntoIterator<Item = &'s str>, owner: &Label) -> Vec<Label> {
    values
        .into_iter()
        .filter_map(|s| match Label::parse(s) {
            Ok(l) => Some(l),
            Err(e) => {
                tracing::warn!("{owner}: ignoring embed: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::overrides::ResolveOverride;
    use crate::rule::{AttrValue, File};

    #[test]
    fn builtin_registry_dispatches_by_kind() {
        let registry = LanguageRegistry::builtin(&ResolvedConfig::default());
        let lookup = |kind: &str| {
            registry
                .resolver_for(&Rule::new(kind, "x"), "pkg")
                .map(|r| r.name().to_string())
        };
        assert_eq!(lookup("go_library").as_deref(), Some("go"));
        assert_eq!(lookup("go_proto_library").as_deref(), Some("go"));
        assert_eq!(lookup("proto_library").as_deref(), Some("proto"));
        assert_eq!(lookup("sh_binary"), None);
        assert_eq!(registry.languages(), vec!["proto", "go"]);
        assert_eq!(registry.cross_resolvers().len(), 1);
    }

    #[test]
    fn mapped_kinds_use_the_builtin_provider() {
        let config = ResolvedConfig {
            map_kind: BTreeMap::from([("my_go_library".to_string(), "go_library".to_string())]),
            ..Default::default()
        };
        let registry = LanguageRegistry::builtin(&config);
        let resolver = registry.resolver_for(&Rule::new("my_go_library", "x"), "");
        assert_eq!(resolver.map(|r| r.name()), Some("go"));
    }

    fn go_lib(name: &str, importpath: &str) -> Rule {
        Rule::new("go_library", name).with_attr("importpath", AttrValue::String(importpath.into()))
    }

    #[test]
    fn resolve_import_outcomes() {
        let registry = LanguageRegistry::builtin(&ResolvedConfig::default());
        let c = ResolvedConfig {
            overrides: vec![ResolveOverride {
                imp: ImportSpec::new("go", "example.com/forced"),
                lang: "go".to_string(),
                label: Label::parse("//third_party/forced").unwrap(),
            }],
            ..Default::default()
        };
        let x = File::empty("x");
        let y = File::empty("y");
        let x_lib = go_lib("lib", "example.com/x");
        let dup_x = go_lib("dup", "example.com/dup");
        let dup_y = go_lib("dup", "example.com/dup");

        let mut ix = RuleIndex::from_registry(&registry);
        ix.add_rule(&c, &x_lib, &x);
        ix.add_rule(&c, &dup_x, &x);
        ix.add_rule(&c, &dup_y, &y);
        ix.finish();

        let from = Label::new("", "app", "app");
        let go = |imp: &str| ImportSpec::new("go", imp);

        assert_eq!(
            resolve_import(&c, &ix, &go("example.com/x"), "go", &from),
            ImportResolution::Dep(Label::new("", "x", "lib"))
        );
        assert_eq!(
            resolve_import(&c, &ix, &go("example.com/x"), "go", &Label::new("", "x", "lib")),
            ImportResolution::SelfImport
        );
        assert_eq!(
            resolve_import(&c, &ix, &go("example.com/missing"), "go", &from),
            ImportResolution::Unresolved
        );
        assert_eq!(
            resolve_import(&c, &ix, &go("example.com/forced"), "go", &from),
            ImportResolution::Dep(Label::new("", "third_party/forced", "forced"))
        );
        assert_eq!(
            resolve_import(&c, &ix, &go("example.com/dup"), "go", &from),
            ImportResolution::Ambiguous {
                chosen: Label::new("", "x", "dup"),
                candidates: vec![Label::new("", "x", "dup"), Label::new("", "y", "dup")],
            }
        );
    }

    #[test]
    fn override_labels_join_the_configured_repo() {
        let registry = LanguageRegistry::new();
        let c = ResolvedConfig {
            repo_name: "main".to_string(),
            overrides: vec![ResolveOverride {
                imp: ImportSpec::new("go", "example.com/forced"),
                lang: "go".to_string(),
                label: Label::parse("//third_party/forced").unwrap(),
            }],
            ..Default::default()
        };
        let mut ix = RuleIndex::from_registry(&registry);
        ix.finish();

        let imp = ImportSpec::new("go", "example.com/forced");
        let forced = Label::new("main", "third_party/forced", "forced");
        assert_eq!(
            resolve_import(&c, &ix, &imp, "go", &Label::new("main", "app", "app")),
            ImportResolution::Dep(forced.clone())
        );
        assert_eq!(
            resolve_import(&c, &ix, &imp, "go", &forced),
            ImportResolution::SelfImport
        );
    }

    #[test]
    fn parse_labels_skips_invalid() {
        let owner = Label::new("", "pkg", "a");
        let labels = parse_labels([":ok", "//bad:a:b", "//other"], &owner);
        assert_eq!(labels.len(), 2);
    }
}
