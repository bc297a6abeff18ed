//! In-memory package registry
//!
//! Serves a fixed set of packages without network access. Used for offline
//! runs and by the resolver tests.

use crate::error::RegistryError;
use crate::registry::{
    NuGetVersion, PackageDependency, PackageIdentity, PackageRegistry, ResolvedPackage,
    TargetFramework, VersionRange,
};
use async_trait::async_trait;

#[derive(Debug, Clone)]
struct Entry {
    identity: PackageIdentity,
    dependencies: Vec<PackageDependency>,
}

/// Registry backed by a list of packages
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    entries: Vec<Entry>,
}

impl InMemoryRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package version with `(id, range)` dependencies (builder pattern).
    ///
    /// Unparseable ranges accept every version.
    pub fn with_package(mut self, id: &str, version: &str, dependencies: &[(&str, &str)]) -> Self {
        let dependencies = dependencies
            .iter()
            .map(|(dep_id, range)| {
                PackageDependency::new(*dep_id, VersionRange::parse(range).unwrap_or_default())
            })
            .collect();
        self.entries.push(Entry {
            identity: PackageIdentity::parse(id, version),
            dependencies,
        });
        self
    }

    /// Number of package versions held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no package is held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn matching<'a>(&'a self, package_id: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.identity.id.eq_ignore_ascii_case(package_id))
    }
}

#[async_trait]
impl PackageRegistry for InMemoryRegistry {
    fn registry_name(&self) -> &str {
        "in-memory"
    }

    async fn resolve_package(
        &self,
        identity: &PackageIdentity,
        _framework: &TargetFramework,
    ) -> Result<Option<ResolvedPackage>, RegistryError> {
        let Some(version) = &identity.version else {
            return Ok(None);
        };
        Ok(self
            .matching(&identity.id)
            .find(|e| e.identity.version.as_ref() == Some(version))
            .map(|e| ResolvedPackage {
                identity: e.identity.clone(),
                dependencies: e.dependencies.clone(),
            }))
    }

    async fn query_versions(
        &self,
        package_id: &str,
        include_prerelease: bool,
    ) -> Result<Vec<PackageIdentity>, RegistryError> {
        Ok(self
            .matching(package_id)
            .filter(|e| {
                include_prerelease
                    || !e
                        .identity
                        .version
                        .as_ref()
                        .is_some_and(NuGetVersion::is_prerelease)
            })
            .map(|e| e.identity.clone())
            .collect())
    }
}
