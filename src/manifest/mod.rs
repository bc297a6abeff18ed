//! Solution and project file reading
//!
//! This module provides functionality to:
//! - Extract project paths from a solution file
//! - Read a project descriptor's framework, version and package references
//! - Read the legacy `packages.config` manifest beside a project

mod packages_config;
mod project_file;
mod solution;
mod xml;

pub use packages_config::{parse_packages_config, read_packages_config, PACKAGES_CONFIG};
pub use project_file::{parse_project, project_name, XmlProjectReader};
pub use solution::{project_paths, read_solution};

use crate::domain::ProjectDescriptor;
use crate::error::AppError;
use async_trait::async_trait;
use std::path::Path;

/// Reads one project descriptor into a [`ProjectDescriptor`].
///
/// Implementations may wrap one another; the registry-backed resolver is a
/// `ProjectReader` that delegates to an inner reader and expands the result.
#[async_trait]
pub trait ProjectReader: Send + Sync {
    /// Read the project at `path`
    async fn read_project(&self, path: &Path) -> Result<ProjectDescriptor, AppError>;
}
