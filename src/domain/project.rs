//! Project-level dependency information

use super::Dependency;
use std::collections::HashSet;

/// Version assumed when a project does not declare one
pub const DEFAULT_PROJECT_VERSION: &str = "1.0.0";

/// Framework reported when a project does not declare one
pub const UNKNOWN_FRAMEWORK: &str = "Unknown";

/// One project of a solution and its package references
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDescriptor {
    /// Descriptor file name without its extension
    pub name: String,
    /// Declared project version
    pub version: String,
    /// Declared target framework, or [`UNKNOWN_FRAMEWORK`]
    pub framework_version: String,
    /// Direct package references; children are filled in by the resolver
    pub dependencies: Vec<Dependency>,
}

impl ProjectDescriptor {
    /// Creates a project with no dependencies
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        framework_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            framework_version: framework_version.into(),
            dependencies: Vec::new(),
        }
    }

    /// Adds a direct dependency (builder pattern)
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Every dependency reachable from the direct references, one entry per
    /// distinct name and version, sorted by name.
    ///
    /// The first occurrence in depth-first order wins, and entries with the
    /// same name keep that order.
    pub fn flattened_dependencies(&self) -> Vec<&Dependency> {
        let mut all = Vec::new();
        for dependency in &self.dependencies {
            dependency.collect_into(&mut all);
        }
        let mut flattened = dedup(all);
        flattened.sort_by(|a, b| a.name.cmp(&b.name));
        flattened
    }
}

/// Removes repeated name and version pairs, keeping the first occurrence
pub(crate) fn dedup<'a>(dependencies: Vec<&'a Dependency>) -> Vec<&'a Dependency> {
    let mut seen = HashSet::new();
    dependencies
        .into_iter()
        .filter(|d| seen.insert((d.name.as_str(), d.version.as_str())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(name: &str, version: &str, project: &str) -> Dependency {
        Dependency::new(name, version, "net6.0", project)
    }

    #[test]
    fn test_new_project_is_empty() {
        let project = ProjectDescriptor::new("Api", DEFAULT_PROJECT_VERSION, UNKNOWN_FRAMEWORK);
        assert_eq!(project.name, "Api");
        assert_eq!(project.version, "1.0.0");
        assert_eq!(project.framework_version, "Unknown");
        assert!(project.flattened_dependencies().is_empty());
    }

    #[test]
    fn test_flattened_sorted_by_name() {
        let mut alpha = dep("Alpha", "2.0", "Api");
        alpha.children.push(dep("Beta", "1.0", "Api"));
        let project = ProjectDescriptor::new("Api", "1.0.0", "net6.0")
            .with_dependency(dep("Zeta", "1.0", "Api"))
            .with_dependency(alpha);

        let names: Vec<_> = project
            .flattened_dependencies()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn test_flattened_nested_zeta_alpha() {
        let mut zeta = dep("Zeta", "1.0", "Api");
        zeta.children.push(dep("Alpha", "2.0", "Api"));
        let project = ProjectDescriptor::new("Api", "1.0.0", "net6.0").with_dependency(zeta);

        let names: Vec<_> = project
            .flattened_dependencies()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_flattened_dedups_by_name_and_version() {
        let mut a = dep("A", "1.0.0", "Api");
        a.children.push(dep("Shared", "4.0.0", "Api"));
        let mut b = dep("B", "1.0.0", "Other");
        b.children.push(dep("Shared", "4.0.0", "Other"));
        let project = ProjectDescriptor::new("Api", "1.0.0", "net6.0")
            .with_dependency(a)
            .with_dependency(b);

        let flattened = project.flattened_dependencies();
        assert_eq!(flattened.len(), 3);
        let shared: Vec<_> = flattened.iter().filter(|d| d.name == "Shared").collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].project, "Api");
    }

    #[test]
    fn test_flattened_keeps_distinct_versions_in_traversal_order() {
        let mut a = dep("A", "1.0.0", "Api");
        a.children.push(dep("Shared", "5.0.0", "Api"));
        let project = ProjectDescriptor::new("Api", "1.0.0", "net6.0")
            .with_dependency(a)
            .with_dependency(dep("Shared", "4.0.0", "Api"));

        let versions: Vec<_> = project
            .flattened_dependencies()
            .iter()
            .filter(|d| d.name == "Shared")
            .map(|d| d.version.as_str())
            .collect();
        assert_eq!(versions, vec!["5.0.0.0", "4.0.0.0"]);
    }
}
