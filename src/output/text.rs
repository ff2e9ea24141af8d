use crate::errors::Result;
use crate::output::json::{QueryReport, ResolveReport};
use std::io::Write;

/// Write the resolve report as human-readable text.
pub fn write_resolve_text<W: Write>(writer: &mut W, report: &ResolveReport) -> Result<()> {
    let metadata = &report.metadata;
    writeln!(writer, "Rule Index Report")?;
    writeln!(writer, "=================")?;
    writeln!(writer)?;
    writeln!(writer, "Root:        {}", metadata.root.display())?;
    if !metadata.repo_name.is_empty() {
        writeln!(writer, "Repository:  {}", metadata.repo_name)?;
    }
    writeln!(writer, "Languages:   {}", metadata.languages.join(", "))?;
    writeln!(writer, "Build files: {}", metadata.build_files)?;
    writeln!(
        writer,
        "Rules:       {} ({} indexed)",
        metadata.rules_total, metadata.rules_indexed
    )?;
    writeln!(writer, "Unresolved:  {} imports", metadata.unresolved_imports)?;
    writeln!(writer)?;

    for rule in &report.rules {
        writeln!(writer, "{} ({})", rule.label, rule.kind)?;
        for dep in &rule.resolution.deps {
            writeln!(writer, "  dep        {dep}")?;
        }
        for imp in &rule.resolution.unresolved {
            writeln!(writer, "  unresolved {imp}")?;
        }
        for amb in &rule.resolution.ambiguous {
            let candidates: Vec<String> = amb.candidates.iter().map(ToString::to_string).collect();
            writeln!(writer, "  ambiguous  {} [{}]", amb.import, candidates.join(", "))?;
        }
    }

    if !report.diagnostics.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Diagnostics")?;
        writeln!(writer, "{:-<60}", "")?;
        for diag in &report.diagnostics {
            writeln!(writer, "  - {diag}")?;
        }
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "Completed in {:.2}s",
        metadata.elapsed_ms as f64 / 1000.0
    )?;
    Ok(())
}

/// Write query results, one label per line with its embeds indented.
pub fn write_query_text<W: Write>(writer: &mut W, report: &QueryReport) -> Result<()> {
    if report.results.is_empty() {
        writeln!(writer, "No {} rules provide {}", report.lang, report.import)?;
        return Ok(());
    }
    for result in &report.results {
        writeln!(writer, "{}", result.label)?;
        for embed in &result.embeds {
            writeln!(writer, "  embeds {embed}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use crate::output::json::{Metadata, RuleReport};
    use crate::resolve::{Ambiguity, FindResult, ImportSpec, IndexDiagnostic, Resolution};
    use std::path::PathBuf;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn resolve_text_lists_rules_and_diagnostics() {
        let report = ResolveReport {
            metadata: Metadata {
                root: PathBuf::from("/ws"),
                repo_name: "main".to_string(),
                languages: vec!["proto".to_string(), "go".to_string()],
                build_files: 2,
                rules_total: 3,
                rules_indexed: 3,
                unresolved_imports: 1,
                elapsed_ms: 1500,
            },
            rules: vec![RuleReport {
                label: Label::new("main", "app", "app"),
                kind: "go_binary".to_string(),
                language: "go".to_string(),
                resolution: Resolution {
                    deps: vec![Label::new("main", "lib", "lib")],
                    unresolved: vec!["example.com/gone".to_string()],
                    ambiguous: vec![Ambiguity {
                        import: "example.com/dup".to_string(),
                        candidates: vec![Label::new("main", "x", "dup"), Label::new("main", "y", "dup")],
                    }],
                },
            }],
            diagnostics: vec![IndexDiagnostic::DuplicateLabel {
                label: Label::new("main", "lib", "lib"),
            }],
        };

        let out = render(|w| write_resolve_text(w, &report));
        assert!(out.contains("Repository:  main"));
        assert!(out.contains("Languages:   proto, go"));
        assert!(out.contains("@main//app (go_binary)"));
        assert!(out.contains("  dep        @main//lib"));
        assert!(out.contains("  unresolved example.com/gone"));
        assert!(out.contains("  ambiguous  example.com/dup [@main//x:dup, @main//y:dup]"));
        assert!(out.contains("multiple rules found with label @main//lib"));
        assert!(out.contains("Completed in 1.50s"));
    }

    #[test]
    fn query_text() {
        let report = QueryReport {
            import: ImportSpec::new("go", "example.com/a"),
            lang: "go".to_string(),
            results: vec![FindResult {
                label: Label::new("", "a", "a"),
                embeds: vec![Label::new("", "a", "a_go_proto")],
            }],
        };
        let out = render(|w| write_query_text(w, &report));
        assert_eq!(out, "//a\n  embeds //a:a_go_proto\n");

        let empty = QueryReport {
            results: vec![],
            ..report
        };
        let out = render(|w| write_query_text(w, &empty));
        assert_eq!(out, "No go rules provide go:example.com/a\n");
    }
}
