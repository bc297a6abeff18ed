//! Registry-backed project resolution
//!
//! [`RegistryProjectReader`] wraps another [`ProjectReader`]: it reads the
//! project through the inner reader, merges the legacy `packages.config`
//! entries, then expands every direct reference into its transitive closure.
//!
//! Expansion is depth-first and sequential. For each declared dependency of a
//! package the highest version satisfying the declared range is chosen, then
//! looked up again for its canonical id and version. Missing packages and
//! unsatisfiable ranges are reported to the [`DiagnosticSink`] and skipped;
//! registry failures abort the run.

mod selection;

pub use selection::{select_highest, version_cap};

use crate::diagnostics::{DiagnosticSink, Warning};
use crate::domain::{Dependency, ProjectDescriptor};
use crate::error::AppError;
use crate::manifest::{read_packages_config, ProjectReader};
use crate::registry::{PackageDependency, PackageIdentity, PackageRegistry, TargetFramework};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Resolution settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Consider prerelease versions when choosing a child version
    pub include_prerelease: bool,
}

/// Name and version of every package between a project and the node being expanded
type Ancestors = Vec<(String, String)>;

/// A `ProjectReader` that resolves dependencies against a package registry
pub struct RegistryProjectReader<R: ProjectReader> {
    inner: R,
    registry: Arc<dyn PackageRegistry>,
    diagnostics: Arc<dyn DiagnosticSink>,
    config: ResolverConfig,
}

impl<R: ProjectReader> RegistryProjectReader<R> {
    /// Wraps `inner`, resolving against `registry` and reporting to `diagnostics`
    pub fn new(
        inner: R,
        registry: Arc<dyn PackageRegistry>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            inner,
            registry,
            diagnostics,
            config: ResolverConfig::default(),
        }
    }

    /// Sets the resolution settings (builder pattern)
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve `dependency` and populate its children recursively
    fn expand<'a>(
        &'a self,
        dependency: &'a mut Dependency,
        ancestors: &'a mut Ancestors,
    ) -> BoxFuture<'a, Result<(), AppError>> {
        async move {
            let identity = PackageIdentity::parse(&dependency.name, &dependency.version);
            let framework = TargetFramework::parse(&dependency.framework);

            let Some(resolved) = self.registry.resolve_package(&identity, &framework).await? else {
                dependency.found_in_registry = false;
                self.diagnostics.warn(Warning::UnresolvedPackage {
                    package: dependency.name.clone(),
                    version: dependency.version.clone(),
                    project: dependency.project.clone(),
                });
                return Ok(());
            };

            dependency.found_in_registry = true;
            debug!(
                package = %dependency.name,
                version = %dependency.version,
                framework = %framework,
                declared = resolved.dependencies.len(),
                "expanding"
            );

            ancestors.push((dependency.name.clone(), dependency.version.clone()));
            for declared in &resolved.dependencies {
                self.expand_declared(dependency, declared, &framework, &mut *ancestors)
                    .await?;
            }
            ancestors.pop();
            Ok(())
        }
        .boxed()
    }

    /// Choose, build and expand the child for one declared dependency of `parent`
    async fn expand_declared(
        &self,
        parent: &mut Dependency,
        declared: &PackageDependency,
        framework: &TargetFramework,
        ancestors: &mut Ancestors,
    ) -> Result<(), AppError> {
        let candidates = self
            .registry
            .query_versions(&declared.id, self.config.include_prerelease)
            .await?;

        let Some(selected) = select_highest(candidates, &declared.range) else {
            self.diagnostics.warn(Warning::UnsatisfiableRange {
                package: declared.id.clone(),
                range: declared.range.to_string(),
                required_by: parent.name.clone(),
                required_by_version: parent.version.clone(),
                project: parent.project.clone(),
            });
            return Ok(());
        };

        // The canonical lookup decides the node's id and version formatting
        let canonical = self.registry.resolve_package(&selected, framework).await?;
        let identity = canonical.as_ref().map_or(&selected, |c| &c.identity);

        let mut child = Dependency::new(
            identity.id.as_str(),
            &identity.version_string(),
            parent.framework.as_str(),
            parent.project.as_str(),
        )
        .with_version_cap(version_cap(&declared.range, parent));

        if ancestors.iter().any(|(name, version)| child.is(name, version)) {
            self.diagnostics.warn(Warning::CycleDetected {
                package: child.name.clone(),
                version: child.version.clone(),
                required_by: parent.name.clone(),
                project: parent.project.clone(),
            });
            child.found_in_registry = canonical.is_some();
            parent.children.push(child);
            return Ok(());
        }

        self.expand(&mut child, ancestors).await?;
        parent.children.push(child);
        Ok(())
    }
}

#[async_trait]
impl<R: ProjectReader> ProjectReader for RegistryProjectReader<R> {
    async fn read_project(&self, path: &Path) -> Result<ProjectDescriptor, AppError> {
        let mut project = self.inner.read_project(path).await?;

        if let Some(legacy) =
            read_packages_config(path, &project.framework_version, &project.name)?
        {
            debug!(project = %project.name, count = legacy.len(), "merging packages.config");
            project.dependencies.extend(legacy);
        }

        let mut ancestors = Ancestors::new();
        for dependency in &mut project.dependencies {
            self.expand(dependency, &mut ancestors).await?;
        }
        Ok(project)
    }
}
