//! Per-run caching decorator for package registries
//!
//! The same package is typically requested by many parents across many
//! projects; every lookup after the first is answered from memory.

use crate::error::RegistryError;
use crate::registry::{PackageIdentity, PackageRegistry, ResolvedPackage, TargetFramework};
use async_trait::async_trait;
use dashmap::DashMap;

/// Key for exact package lookups
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct ResolveKey {
    package_id: String,
    version: String,
    framework: String,
}

impl ResolveKey {
    fn new(identity: &PackageIdentity, framework: &TargetFramework) -> Self {
        Self {
            package_id: identity.id.to_lowercase(),
            version: identity.version_string(),
            framework: framework.to_string(),
        }
    }
}

/// Key for version listings
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct VersionsKey {
    package_id: String,
    include_prerelease: bool,
}

/// Wraps a `PackageRegistry` and memoizes successful answers.
///
/// Errors are not cached, so a transient failure is retried on the next
/// request for the same key.
pub struct CachingRegistry<R: PackageRegistry> {
    inner: R,
    resolved: DashMap<ResolveKey, Option<ResolvedPackage>>,
    versions: DashMap<VersionsKey, Vec<PackageIdentity>>,
}

impl<R: PackageRegistry> CachingRegistry<R> {
    /// Creates a new caching registry wrapping the given inner registry
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            resolved: DashMap::new(),
            versions: DashMap::new(),
        }
    }

    /// The wrapped registry
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of cached entries across both lookups
    pub fn cache_size(&self) -> usize {
        self.resolved.len() + self.versions.len()
    }
}

#[async_trait]
impl<R: PackageRegistry> PackageRegistry for CachingRegistry<R> {
    fn registry_name(&self) -> &str {
        self.inner.registry_name()
    }

    async fn resolve_package(
        &self,
        identity: &PackageIdentity,
        framework: &TargetFramework,
    ) -> Result<Option<ResolvedPackage>, RegistryError> {
        let key = ResolveKey::new(identity, framework);
        if let Some(cached) = self.resolved.get(&key) {
            return Ok(cached.clone());
        }

        let resolved = self.inner.resolve_package(identity, framework).await?;
        self.resolved.insert(key, resolved.clone());
        Ok(resolved)
    }

    async fn query_versions(
        &self,
        package_id: &str,
        include_prerelease: bool,
    ) -> Result<Vec<PackageIdentity>, RegistryError> {
        let key = VersionsKey {
            package_id: package_id.to_lowercase(),
            include_prerelease,
        };
        if let Some(cached) = self.versions.get(&key) {
            return Ok(cached.clone());
        }

        let versions = self.inner.query_versions(package_id, include_prerelease).await?;
        self.versions.insert(key, versions.clone());
        Ok(versions)
    }
}
