use crate::config::ResolvedConfig;
use crate::label::Label;
use crate::resolve::ImportSpec;

/// A `[[resolve]]` directive: imports of `imp` by rules of `lang` always
/// resolve to `label`, bypassing the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOverride {
    pub imp: ImportSpec,
    pub lang: String,
    pub label: Label,
}

/// Label of the last directive matching `imp` for a rule of language `lang`.
pub fn find_rule_with_override(
    c: &ResolvedConfig,
    imp: &ImportSpec,
    lang: &str,
) -> Option<Label> {
    c.overrides
        .iter()
        .rev()
        .find(|o| o.imp == *imp && o.lang == lang)
        .map(|o| o.label.clone())
}
