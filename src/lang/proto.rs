use crate::config::ResolvedConfig;
use crate::label::Label;
use crate::lang::resolve_import;
use crate::resolve::{ImportResolution, ImportSpec, Resolution, Resolver, RuleIndex};
use crate::rule::{File, Rule};

pub const PROTO_LANG: &str = "proto";

pub const KINDS: &[&str] = &["proto_library"];

const WELL_KNOWN_PREFIX: &str = "google/protobuf/";
const PROTOBUF_REPO: &str = "com_google_protobuf";

/// `proto_library` rules, importable by the repository-relative path of
/// each source file.
pub struct ProtoLang;

impl Resolver for ProtoLang {
    fn name(&self) -> &str {
        PROTO_LANG
    }

    fn imports(&self, _c: &ResolvedConfig, r: &Rule, f: &File) -> Option<Vec<ImportSpec>> {
        Some(
            r.attr_strings("srcs")
                .into_iter()
                .map(|src| ImportSpec::new(PROTO_LANG, source_import(&f.pkg, src)))
                .collect(),
        )
    }

    fn embeds(&self, _r: &Rule, _from: &Label) -> Vec<Label> {
        Vec::new()
    }

    fn resolve(
        &self,
        c: &ResolvedConfig,
        ix: &RuleIndex<'_>,
        _r: &Rule,
        imports: &[String],
        from: &Label,
    ) -> Resolution {
        let mut res = Resolution::default();
        for imp in imports {
            let outcome = match well_known_label(imp) {
                Some(label) => ImportResolution::Dep(label),
                None => {
                    let spec = ImportSpec::new(PROTO_LANG, imp.as_str());
                    resolve_import(c, ix, &spec, PROTO_LANG, from)
                }
            };
            res.add(imp, outcome, from);
        }
        res.finalize()
    }
}

/// Import path of a source file declared in package `pkg`.
pub fn source_import(pkg: &str, src: &str) -> String {
    if pkg.is_empty() {
        src.to_string()
    } else {
        format!("{pkg}/{src}")
    }
}

fn well_known_label(imp: &str) -> Option<Label> {
    let stem = imp.strip_prefix(WELL_KNOWN_PREFIX)?.strip_suffix(".proto")?;
    if stem.is_empty() || stem.contains('/') {
        return None;
    }
    Some(Label::new(PROTOBUF_REPO, "", format!("{stem}_proto")))
}
