use std::path::Path;

/// Name of the ignore file listing extra exclude globs.
pub const IGNORE_FILE: &str = ".ruleindexignore";

/// Load `.ruleindexignore` by walking up from the given directory.
/// Blank lines and `#` comments are skipped.
pub fn load_ruleindexignore(start: &Path) -> Vec<String> {
    let mut dir = start.to_path_buf();
    loop {
        let ignore_path = dir.join(IGNORE_FILE);
        if let Ok(content) = std::fs::read_to_string(&ignore_path) {
            return parse_ignore_patterns(&content);
        }
        if !dir.pop() {
            break;
        }
    }
    Vec::new()
}

fn parse_ignore_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
