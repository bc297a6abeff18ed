//! Package reference structures

use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// Matches versions with exactly three numeric components
static THREE_PART_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());

/// Normalizes a raw version string.
///
/// `1.2.3` becomes `1.2.3.0`; anything else (four-part versions, ranges,
/// prerelease versions, the empty string) is kept unchanged.
pub fn normalize_version(raw: &str) -> String {
    if THREE_PART_VERSION_RE.is_match(raw) {
        format!("{}.0", raw)
    } else {
        raw.to_string()
    }
}

/// A package reference, resolved or not.
///
/// Two dependencies are equal when their name and version match exactly;
/// framework, owning project and cap annotation do not take part in equality
/// or hashing.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// Package identifier
    pub name: String,
    /// Normalized version string (see [`normalize_version`])
    pub version: String,
    /// Target framework moniker this reference was resolved under, may be empty
    pub framework: String,
    /// Name of the project that (transitively) requires this package
    pub project: String,
    /// Whether the registry resolved this exact name and version
    pub found_in_registry: bool,
    /// Set when a parent's version range capped this package's selection
    pub version_cap: Option<String>,
    /// Resolved dependencies, in registry enumeration order
    pub children: Vec<Dependency>,
}

impl Dependency {
    /// Creates an unresolved dependency, normalizing `version`
    pub fn new(
        name: impl Into<String>,
        version: &str,
        framework: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: normalize_version(version),
            framework: framework.into(),
            project: project.into(),
            found_in_registry: false,
            version_cap: None,
            children: Vec::new(),
        }
    }

    /// Sets the version cap annotation (builder pattern)
    pub fn with_version_cap(mut self, cap: Option<String>) -> Self {
        self.version_cap = cap;
        self
    }

    /// The version shown in reports: the cap annotation if set, else the version
    pub fn display_version(&self) -> &str {
        self.version_cap.as_deref().unwrap_or(&self.version)
    }

    /// Returns true if `name` and `version` match this dependency
    pub fn is(&self, name: &str, version: &str) -> bool {
        self.name == name && self.version == version
    }

    /// Collects this dependency and every descendant, depth-first pre-order
    pub fn collect_into<'a>(&'a self, out: &mut Vec<&'a Dependency>) {
        out.push(self);
        for child in &self.children {
            child.collect_into(out);
        }
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.is(&other.name, &other.version)
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.display_version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_normalize_three_part_version() {
        assert_eq!(normalize_version("1.2.3"), "1.2.3.0");
    }

    #[test]
    fn test_normalize_keeps_other_versions() {
        assert_eq!(normalize_version("1.2.3.4"), "1.2.3.4");
        assert_eq!(normalize_version(""), "");
        assert_eq!(normalize_version("not-a-version"), "not-a-version");
        assert_eq!(normalize_version("1.2"), "1.2");
        assert_eq!(normalize_version("1.2.3-beta"), "1.2.3-beta");
        assert_eq!(normalize_version("[1.0,2.0)"), "[1.0,2.0)");
    }

    #[test]
    fn test_new_normalizes_version() {
        let dep = Dependency::new("Serilog", "2.10.0", "net6.0", "Api");
        assert_eq!(dep.version, "2.10.0.0");
        assert!(!dep.found_in_registry);
        assert!(dep.children.is_empty());
        assert!(dep.version_cap.is_none());
    }

    #[test]
    fn test_equality_ignores_project_and_framework() {
        let a = Dependency::new("Serilog", "2.10.0", "net6.0", "Api");
        let b = Dependency::new("Serilog", "2.10.0.0", "net472", "Worker")
            .with_version_cap(Some("3.0.0 by Parent (1.0.0.0)".to_string()));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        let a = Dependency::new("Serilog", "2.10.0", "", "Api");
        let b = Dependency::new("serilog", "2.10.0", "", "Api");
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_version_prefers_cap() {
        let dep = Dependency::new("Serilog", "2.10.0", "", "Api");
        assert_eq!(dep.display_version(), "2.10.0.0");

        let capped = dep.with_version_cap(Some("3.0.0 by Parent (1.0.0.0)".to_string()));
        assert_eq!(capped.display_version(), "3.0.0 by Parent (1.0.0.0)");
        assert_eq!(capped.to_string(), "Serilog 3.0.0 by Parent (1.0.0.0)");
    }

    #[test]
    fn test_collect_into_is_preorder() {
        let mut root = Dependency::new("A", "1.0.0", "", "P");
        let mut b = Dependency::new("B", "1.0.0", "", "P");
        b.children.push(Dependency::new("C", "1.0.0", "", "P"));
        root.children.push(b);
        root.children.push(Dependency::new("D", "1.0.0", "", "P"));

        let mut out = Vec::new();
        root.collect_into(&mut out);
        let names: Vec<_> = out.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }
}
