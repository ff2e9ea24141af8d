use crate::errors::{Result, RuleIndexError};
use serde::{Serialize, Serializer};
use std::fmt;

/// Address of a build rule: `@repo//pkg:name`.
///
/// A relative label (`:name` or `name`) carries only a name and must be
/// made absolute with [`Label::abs`] before it can be compared against
/// indexed rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Label {
    pub repo: String,
    pub pkg: String,
    pub name: String,
    pub relative: bool,
}

impl Label {
    /// Build an absolute label.
    pub fn new(repo: impl Into<String>, pkg: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            pkg: pkg.into(),
            name: name.into(),
            relative: false,
        }
    }

    /// Parse a label string.
    pub fn parse(s: &str) -> Result<Self> {
        let err = |message: &str| RuleIndexError::Label {
            label: s.to_string(),
            message: message.to_string(),
        };

        if s.is_empty() {
            return Err(err("empty label"));
        }

        let (repo, rest) = if let Some(stripped) = s.strip_prefix('@') {
            match stripped.find("//") {
                Some(idx) => (&stripped[..idx], &stripped[idx + 2..]),
                None => return Err(err("repository name must be followed by //")),
            }
        } else if let Some(stripped) = s.strip_prefix("//") {
            ("", stripped)
        } else {
            let name = s.strip_prefix(':').unwrap_or(s);
            if name.is_empty() {
                return Err(err("empty name"));
            }
            if name.contains(':') {
                return Err(err("relative label contains ':'"));
            }
            return Ok(Self {
                repo: String::new(),
                pkg: String::new(),
                name: name.to_string(),
                relative: true,
            });
        };

        if rest.starts_with('/') || rest.ends_with('/') {
            return Err(err("package must not start or end with '/'"));
        }

        let (pkg, name) = match rest.split_once(':') {
            Some((pkg, name)) => {
                if name.contains(':') {
                    return Err(err("multiple ':' separators"));
                }
                (pkg, name)
            }
            None => (rest, rest.rsplit('/').next().unwrap_or(rest)),
        };

        if name.is_empty() {
            return Err(err("empty name"));
        }

        Ok(Self::new(repo, pkg, name))
    }

    /// Resolve a label against the repository and package it appears in.
    /// Relative labels take both; `//pkg:name` labels take the repository.
    pub fn abs(&self, repo: &str, pkg: &str) -> Self {
        if self.relative {
            return Self::new(repo, pkg, self.name.clone());
        }
        if self.repo.is_empty() {
            return Self::new(repo, self.pkg.clone(), self.name.clone());
        }
        self.clone()
    }

    /// Shorten a label to `:name` when it lives in the given repo and package.
    pub fn rel(&self, repo: &str, pkg: &str) -> Self {
        if self.relative || self.repo != repo || self.pkg != pkg {
            return self.clone();
        }
        Self {
            repo: String::new(),
            pkg: String::new(),
            name: self.name.clone(),
            relative: true,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relative {
            return write!(f, ":{}", self.name);
        }
        if !self.repo.is_empty() {
            write!(f, "@{}", self.repo)?;
        }
        let base = self.pkg.rsplit('/').next().unwrap_or("");
        if !self.pkg.is_empty() && base == self.name {
            write!(f, "//{}", self.pkg)
        } else {
            write!(f, "//{}:{}", self.pkg, self.name)
        }
    }
}

impl std::str::FromStr for Label {
    type Err = RuleIndexError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
