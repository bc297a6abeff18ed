//! Core domain models for nuget-tree
//!
//! This module contains the dependency graph types shared by the readers,
//! the resolver and the report writer:
//! - `Dependency`: one package reference and its resolved children
//! - `ProjectDescriptor`: one project of a solution and its direct references

mod dependency;
mod project;

pub use dependency::{normalize_version, Dependency};
pub use project::{ProjectDescriptor, DEFAULT_PROJECT_VERSION, UNKNOWN_FRAMEWORK};
pub(crate) use project::dedup;
