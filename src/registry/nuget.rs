//! NuGet v3 protocol adapter
//!
//! Resolves packages through the registration resource of a NuGet v3 feed.
//! API endpoints:
//! - service index: https://api.nuget.org/v3/index.json
//! - registration index: {RegistrationsBaseUrl}/{lowercase id}/index.json

use crate::error::RegistryError;
use crate::registry::{
    HttpClient, NuGetVersion, PackageDependency, PackageIdentity, PackageRegistry,
    ResolvedPackage, TargetFramework, VersionRange,
};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Default package source (nuget.org service index)
pub const DEFAULT_SOURCE: &str = "https://api.nuget.org/v3/index.json";

/// Registration resource types, most preferred first
const REGISTRATION_TYPES: [&str; 4] = [
    "RegistrationsBaseUrl/3.6.0",
    "RegistrationsBaseUrl/3.4.0",
    "RegistrationsBaseUrl/3.0.0-rc",
    "RegistrationsBaseUrl",
];

/// Service index document
#[derive(Debug, Deserialize)]
struct ServiceIndex {
    #[serde(default)]
    resources: Vec<ServiceResource>,
}

/// One resource of the service index
#[derive(Debug, Deserialize)]
struct ServiceResource {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    resource_type: OneOrMany,
}

/// `@type` is a string on nuget.org but an array on some feeds
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn contains(&self, value: &str) -> bool {
        match self {
            OneOrMany::One(s) => s == value,
            OneOrMany::Many(all) => all.iter().any(|s| s == value),
        }
    }
}

/// Registration index: a list of pages
#[derive(Debug, Deserialize)]
struct RegistrationIndex {
    #[serde(default)]
    items: Vec<RegistrationPage>,
}

/// A registration page; `items` is absent when the page must be fetched separately
#[derive(Debug, Deserialize)]
struct RegistrationPage {
    #[serde(rename = "@id")]
    id: String,
    items: Option<Vec<RegistrationLeaf>>,
}

/// One package version
#[derive(Debug, Deserialize)]
struct RegistrationLeaf {
    #[serde(rename = "catalogEntry")]
    catalog_entry: CatalogEntry,
}

/// Package version metadata
#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    id: String,
    version: String,
    #[serde(default)]
    listed: Option<bool>,
    #[serde(rename = "dependencyGroups", default)]
    dependency_groups: Vec<DependencyGroup>,
}

/// Dependencies declared for one target framework
#[derive(Debug, Clone, Deserialize)]
struct DependencyGroup {
    #[serde(rename = "targetFramework", default)]
    target_framework: Option<String>,
    #[serde(default)]
    dependencies: Option<Vec<RegistryDependency>>,
}

/// A declared dependency
#[derive(Debug, Clone, Deserialize)]
struct RegistryDependency {
    id: String,
    #[serde(default)]
    range: Option<String>,
}

impl CatalogEntry {
    fn is_listed(&self) -> bool {
        self.listed.unwrap_or(true)
    }

    fn parsed_version(&self) -> Option<NuGetVersion> {
        NuGetVersion::parse(&self.version)
    }

    /// Convert to a resolved package using the group nearest to `framework`
    fn to_resolved(&self, framework: &TargetFramework) -> ResolvedPackage {
        let groups: Vec<(TargetFramework, &DependencyGroup)> = self
            .dependency_groups
            .iter()
            .map(|g| {
                let moniker = g.target_framework.as_deref().unwrap_or_default();
                (TargetFramework::parse(moniker), g)
            })
            .collect();

        let dependencies = framework
            .select_nearest(groups.iter().map(|(f, g)| (f, *g)))
            .and_then(|group| group.dependencies.as_ref())
            .map(|deps| {
                deps.iter()
                    .map(|d| {
                        let raw = d.range.as_deref().unwrap_or_default();
                        let range = VersionRange::parse(raw).unwrap_or_else(|| {
                            debug!(package = %d.id, range = raw, "unparseable range, accepting all versions");
                            VersionRange::all()
                        });
                        PackageDependency::new(&d.id, range)
                    })
                    .collect()
            })
            .unwrap_or_default();

        ResolvedPackage {
            identity: PackageIdentity::new(&self.id, self.parsed_version()),
            dependencies,
        }
    }
}

/// Pick the registration base URL from a service index
fn registration_base(index: &ServiceIndex) -> Option<&str> {
    REGISTRATION_TYPES.iter().find_map(|wanted| {
        index
            .resources
            .iter()
            .find(|r| r.resource_type.contains(wanted))
            .map(|r| r.id.as_str())
    })
}

/// Build the registration index URL for a package
fn registration_url(base: &str, package_id: &str) -> String {
    format!(
        "{}/{}/index.json",
        base.trim_end_matches('/'),
        package_id.to_lowercase()
    )
}

/// NuGet v3 registry adapter
///
/// Registration entries are kept per lowercase package id, so resolving a
/// package after listing its versions reuses the same download.
pub struct NuGetRegistry {
    client: HttpClient,
    source: String,
    registration_base: OnceCell<String>,
    entries: DashMap<String, Arc<Vec<CatalogEntry>>>,
}

impl NuGetRegistry {
    /// Create an adapter for the feed whose service index is at `source`
    pub fn new(client: HttpClient, source: impl Into<String>) -> Self {
        Self {
            client,
            source: source.into(),
            registration_base: OnceCell::new(),
            entries: DashMap::new(),
        }
    }

    /// Create an adapter for nuget.org
    pub fn nuget_org(client: HttpClient) -> Self {
        Self::new(client, DEFAULT_SOURCE)
    }

    /// Service index URL
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Registration base URL, read from the service index once per run
    async fn registration_base(&self) -> Result<&str, RegistryError> {
        let base = self
            .registration_base
            .get_or_try_init(|| async {
                debug!(source = %self.source, "reading service index");
                let index: ServiceIndex = self
                    .client
                    .get_json(&self.source, "", &self.source)
                    .await?;
                let base = registration_base(&index)
                    .map(str::to_string)
                    .ok_or_else(|| RegistryError::ServiceIndex {
                        source_url: self.source.clone(),
                        resource: "RegistrationsBaseUrl".to_string(),
                    })?;
                Ok::<String, RegistryError>(base)
            })
            .await?;
        Ok(base.as_str())
    }

    /// Every catalog entry of a package; empty if the feed does not know it
    async fn catalog_entries(
        &self,
        package_id: &str,
    ) -> Result<Arc<Vec<CatalogEntry>>, RegistryError> {
        let key = package_id.to_lowercase();
        if let Some(cached) = self.entries.get(&key) {
            return Ok(Arc::clone(cached.value()));
        }

        let entries = Arc::new(self.fetch_catalog_entries(package_id).await?);
        self.entries.insert(key, Arc::clone(&entries));
        Ok(entries)
    }

    async fn fetch_catalog_entries(
        &self,
        package_id: &str,
    ) -> Result<Vec<CatalogEntry>, RegistryError> {
        let base = self.registration_base().await?;
        let url = registration_url(base, package_id);

        let index: RegistrationIndex =
            match self.client.get_json(&url, package_id, &self.source).await {
                Ok(index) => index,
                Err(RegistryError::PackageNotFound { .. }) => {
                    debug!(package = package_id, "not in registration index");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(e),
            };

        let mut entries = Vec::new();
        for page in index.items {
            let leaves = match page.items {
                Some(leaves) => leaves,
                None => {
                    let page: RegistrationPage = self
                        .client
                        .get_json(&page.id, package_id, &self.source)
                        .await?;
                    page.items.unwrap_or_default()
                }
            };
            entries.extend(leaves.into_iter().map(|leaf| leaf.catalog_entry));
        }
        Ok(entries)
    }
}

#[async_trait]
impl PackageRegistry for NuGetRegistry {
    fn registry_name(&self) -> &str {
        &self.source
    }

    async fn resolve_package(
        &self,
        identity: &PackageIdentity,
        framework: &TargetFramework,
    ) -> Result<Option<ResolvedPackage>, RegistryError> {
        let Some(version) = &identity.version else {
            return Ok(None);
        };

        let entries = self.catalog_entries(&identity.id).await?;
        let resolved = entries
            .iter()
            .find(|entry| entry.parsed_version().as_ref() == Some(version))
            .map(|entry| entry.to_resolved(framework));
        Ok(resolved)
    }

    async fn query_versions(
        &self,
        package_id: &str,
        include_prerelease: bool,
    ) -> Result<Vec<PackageIdentity>, RegistryError> {
        let entries = self.catalog_entries(package_id).await?;
        Ok(entries
            .iter()
            .filter(|entry| entry.is_listed())
            .filter_map(|entry| {
                let version = entry.parsed_version()?;
                (include_prerelease || !version.is_prerelease())
                    .then(|| PackageIdentity::new(&entry.id, Some(version)))
            })
            .collect())
    }
}
