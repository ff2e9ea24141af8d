use crate::errors::Result;
use crate::rule::{File, BUILD_FILE_NAME};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Discover build files under `root`.
///
/// - Respects `.gitignore`
/// - Include/exclude globs match the path relative to `root`
/// - Returns sorted paths for deterministic output
pub fn discover_build_files(
    root: &Path,
    include_patterns: &[String],
    exclude_patterns: &[String],
) -> Result<Vec<PathBuf>> {
    let exclude_set = build_globset(exclude_patterns)?;
    let include_set = if include_patterns.is_empty() {
        None
    } else {
        Some(build_globset(include_patterns)?)
    };

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .build();

    let mut files = Vec::new();
    for entry in walker.flatten() {
        let path = entry.path();
        if !path.is_file() || path.file_name().and_then(|n| n.to_str()) != Some(BUILD_FILE_NAME) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if exclude_set.is_match(relative) {
            continue;
        }
        if let Some(ref include) = include_set {
            if !include.is_match(relative) {
                continue;
            }
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Package of a build file: its directory relative to `root`, `/`-separated.
/// The root package is `""`.
pub fn package_of(root: &Path, build_file: &Path) -> String {
    let dir = build_file.parent().unwrap_or(build_file);
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Parse build files in parallel, keeping the input order.
pub fn load_build_files(root: &Path, paths: &[PathBuf]) -> Result<Vec<File>> {
    paths
        .par_iter()
        .map(|path| File::load(path, &package_of(root, path)))
        .collect()
}
