//! nuget-tree - NuGet dependency tree library
//!
//! This library reads the projects of a .NET solution, resolves each
//! project's package references transitively against a NuGet v3 feed and
//! renders the result as reports:
//! - full dependency tree
//! - flattened and top-level lists
//! - projects grouped by target framework
//! - packages used at conflicting versions

pub mod cli;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod resolve;
