use crate::config::ResolvedConfig;
use crate::label::Label;
use crate::lang::{parse_labels, resolve_import};
use crate::resolve::{CrossResolver, FindResult, ImportSpec, Resolution, Resolver, RuleIndex};
use crate::rule::{File, Rule};

pub const GO_LANG: &str = "go";

pub const KINDS: &[&str] = &["go_library", "go_binary", "go_test", "go_proto_library"];

const WELL_KNOWN_PREFIX: &str = "google/protobuf/";
const GO_PROTOBUF_REPO: &str = "org_golang_google_protobuf";

/// Go rules. Libraries are importable by `importpath`; binaries and tests
/// are not. Also resolves well-known protobuf imports for Go consumers.
pub struct GoLang;

impl Resolver for GoLang {
    fn name(&self) -> &str {
        GO_LANG
    }

    // A go_proto_library also becomes reachable by its proto sources
    // through the proto_library it embeds.
    fn imports(&self, _c: &ResolvedConfig, r: &Rule, _f: &File) -> Option<Vec<ImportSpec>> {
        if matches!(r.kind(), "go_binary" | "go_test") {
            return None;
        }
        Some(
            r.attr_string("importpath")
                .map(|p| ImportSpec::new(GO_LANG, p))
                .into_iter()
                .collect(),
        )
    }

    fn embeds(&self, r: &Rule, from: &Label) -> Vec<Label> {
        let mut values = r.attr_strings("embed");
        if r.kind() == "go_proto_library" {
            values.extend(r.attr_strings("proto"));
        }
        parse_labels(values, from)
    }

    fn resolve(
        &self,
        c: &ResolvedConfig,
        ix: &RuleIndex<'_>,
        r: &Rule,
        imports: &[String],
        from: &Label,
    ) -> Resolution {
        let proto_imports = r.kind() == "go_proto_library";
        let mut res = Resolution::default();
        for imp in imports {
            let spec = if proto_imports {
                ImportSpec::new(super::proto::PROTO_LANG, imp.as_str())
            } else if is_standard(imp) {
                continue;
            } else {
                ImportSpec::new(GO_LANG, imp.as_str())
            };
            let outcome = resolve_import(c, ix, &spec, GO_LANG, from);
            res.add(imp, outcome, from);
        }
        res.finalize()
    }
}

impl CrossResolver for GoLang {
    fn cross_resolve(
        &self,
        _c: &ResolvedConfig,
        _ix: &RuleIndex<'_>,
        imp: &ImportSpec,
        lang: &str,
    ) -> Vec<FindResult> {
        if lang != GO_LANG || imp.lang != super::proto::PROTO_LANG {
            return Vec::new();
        }
        well_known_go_package(&imp.imp)
            .map(|pkg| FindResult {
                label: Label::new(GO_PROTOBUF_REPO, pkg.clone(), last_component(&pkg)),
                embeds: Vec::new(),
            })
            .into_iter()
            .collect()
    }
}

/// Go package providing the generated code for a well-known proto file.
fn well_known_go_package(proto: &str) -> Option<String> {
    let file = proto.strip_prefix(WELL_KNOWN_PREFIX)?;
    let stem = file.strip_suffix(".proto")?;
    if stem.is_empty() || stem.contains('/') {
        return None;
    }
    let pkg = if stem == "descriptor" {
        "types/descriptorpb".to_string()
    } else {
        format!("types/known/{}pb", stem.replace('_', ""))
    };
    Some(pkg)
}

fn last_component(pkg: &str) -> &str {
    pkg.rsplit('/').next().unwrap_or(pkg)
}

/// Standard library imports have no dot in their first path element.
fn is_standard(imp: &str) -> bool {
    let first = imp.split('/').next().unwrap_or(imp);
    !first.contains('.')
}
