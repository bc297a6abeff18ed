//! Project descriptor (.csproj) reader
//!
//! Handles both SDK-style and legacy MSBuild projects:
//! - `ItemGroup > PackageReference` with the version as an attribute or a
//!   nested `<Version>` element
//! - `PropertyGroup > TargetFramework` (modern) or `TargetFrameworkVersion` (legacy)
//! - `PropertyGroup > Version`

use super::xml::{parse_document, Element};
use super::ProjectReader;
use crate::domain::{Dependency, ProjectDescriptor, DEFAULT_PROJECT_VERSION, UNKNOWN_FRAMEWORK};
use crate::error::{AppError, InputError};
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

const ITEM_GROUP: &str = "ItemGroup";
const PACKAGE_REFERENCE: &str = "PackageReference";
const PROPERTY_GROUP: &str = "PropertyGroup";
const TARGET_FRAMEWORK: &str = "TargetFramework";
const TARGET_FRAMEWORK_VERSION: &str = "TargetFrameworkVersion";
const VERSION: &str = "Version";
const INCLUDE: &str = "Include";

/// Reads project descriptors from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlProjectReader;

impl XmlProjectReader {
    /// Creates a new reader
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProjectReader for XmlProjectReader {
    async fn read_project(&self, path: &Path) -> Result<ProjectDescriptor, AppError> {
        let content = InputError::read_to_string(path)?;
        let name = project_name(path);
        let project = parse_project(&name, &content)
            .map_err(|message| InputError::malformed(path, message))?;
        debug!(
            project = %project.name,
            framework = %project.framework_version,
            references = project.dependencies.len(),
            "read project descriptor"
        );
        Ok(project)
    }
}

/// Project name: the descriptor file name without its extension
pub fn project_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse descriptor content into a project with direct references only
pub fn parse_project(name: &str, content: &str) -> Result<ProjectDescriptor, String> {
    let root = parse_document(content)?;

    let framework = framework(&root);
    let version = property(&root, VERSION)
        .map(|v| v.text().to_string())
        .unwrap_or_else(|| DEFAULT_PROJECT_VERSION.to_string());

    let dependency_framework = framework.clone().unwrap_or_default();
    let mut project = ProjectDescriptor::new(
        name,
        version,
        framework.unwrap_or_else(|| UNKNOWN_FRAMEWORK.to_string()),
    );

    for reference in root
        .children_named(ITEM_GROUP)
        .flat_map(|group| group.children_named(PACKAGE_REFERENCE))
    {
        // `<PackageReference Update="..."/>` only adjusts metadata of an existing item
        let Some(id) = reference.attribute(INCLUDE) else {
            continue;
        };
        let version = reference
            .attribute(VERSION)
            .or_else(|| reference.child(VERSION).map(Element::text))
            .unwrap_or_default();
        project
            .dependencies
            .push(Dependency::new(id, version, dependency_framework.as_str(), name));
    }

    Ok(project)
}

/// First property with this name across all property groups
fn property<'a>(root: &'a Element, name: &'a str) -> Option<&'a Element> {
    root.children_named(PROPERTY_GROUP)
        .flat_map(|group| group.children_named(name))
        .next()
}

/// Declared framework; the modern property wins over the legacy one
fn framework(root: &Element) -> Option<String> {
    property(root, TARGET_FRAMEWORK)
        .or_else(|| property(root, TARGET_FRAMEWORK_VERSION))
        .map(|e| e.text().to_string())
}
