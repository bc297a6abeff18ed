//! Package registry access
//!
//! This module provides:
//! - The `PackageRegistry` trait the resolver queries
//! - NuGet versions, version ranges and target frameworks
//! - HTTP client shared foundation with retry logic
//! - NuGet v3 protocol adapter
//! - Per-run caching decorator
//! - In-memory registry for offline use

mod cache;
mod client;
mod framework;
mod memory;
mod nuget;
mod version;

pub use cache::CachingRegistry;
pub use client::{HttpClient, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use framework::{FrameworkVersion, TargetFramework};
pub use memory::InMemoryRegistry;
pub use nuget::{NuGetRegistry, DEFAULT_SOURCE};
pub use version::{NuGetVersion, VersionRange};

use crate::error::{ConfigError, RegistryError};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Default number of retries for a failed request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Settings for the remote package source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// NuGet v3 service index URL
    pub source: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries for timeouts, network errors and rate limiting
    pub max_retries: u32,
    /// User-Agent header
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Checks that the source is an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.starts_with("https://") || self.source.starts_with("http://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidSource {
                url: self.source.clone(),
                message: "expected an http(s) URL to a NuGet v3 service index".to_string(),
            })
        }
    }

    /// Build a cached NuGet v3 registry for this source
    pub fn build(&self) -> Result<CachingRegistry<NuGetRegistry>, RegistryError> {
        let client = HttpClient::with_config(self.timeout, &self.user_agent)?
            .with_max_retries(self.max_retries);
        Ok(CachingRegistry::new(NuGetRegistry::new(client, &self.source)))
    }
}

/// A package id with an optional version.
///
/// The version is `None` when the declared version string could not be
/// parsed; such an identity never matches a registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    /// Package id as declared
    pub id: String,
    /// Parsed version, if any
    pub version: Option<NuGetVersion>,
}

impl PackageIdentity {
    /// Creates a new identity
    pub fn new(id: impl Into<String>, version: Option<NuGetVersion>) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }

    /// Creates an identity from a version string, falling back to unspecified
    pub fn parse(id: impl Into<String>, version: &str) -> Self {
        Self::new(id, NuGetVersion::parse(version))
    }

    /// Normalized version string, empty when unspecified
    pub fn version_string(&self) -> String {
        self.version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}", self.id, version),
            None => write!(f, "{} (unspecified)", self.id),
        }
    }
}

/// A dependency declared by a package: an id and the versions it accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDependency {
    /// Dependency package id
    pub id: String,
    /// Acceptable versions
    pub range: VersionRange,
}

impl PackageDependency {
    /// Creates a new package dependency
    pub fn new(id: impl Into<String>, range: VersionRange) -> Self {
        Self {
            id: id.into(),
            range,
        }
    }
}

/// A package version found in the registry together with the dependencies
/// it declares for the requested framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Canonical id and version as reported by the registry
    pub identity: PackageIdentity,
    /// Declared dependencies, in registry order
    pub dependencies: Vec<PackageDependency>,
}

/// Trait for package registries
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Human-readable name of the registry (used in messages)
    fn registry_name(&self) -> &str;

    /// Look up one exact package version and its dependencies for `framework`.
    ///
    /// Returns `Ok(None)` when the registry has no such package version.
    async fn resolve_package(
        &self,
        identity: &PackageIdentity,
        framework: &TargetFramework,
    ) -> Result<Option<ResolvedPackage>, RegistryError>;

    /// All known versions of a package, in no particular order
    async fn query_versions(
        &self,
        package_id: &str,
        include_prerelease: bool,
    ) -> Result<Vec<PackageIdentity>, RegistryError>;
}
