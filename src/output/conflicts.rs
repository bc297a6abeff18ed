//! Conflicts report
//!
//! All projects' flattened dependencies are pooled, repeated name and version
//! pairs dropped, and the rest grouped by package name. Only names present at
//! more than one version are printed.

use super::ReportWriter;
use crate::domain::{dedup, Dependency, ProjectDescriptor};
use std::io::{self, Write};

pub(super) fn write_conflicts(
    writer: &ReportWriter,
    projects: &[ProjectDescriptor],
    out: &mut dyn Write,
) -> io::Result<()> {
    let pooled: Vec<&Dependency> = projects
        .iter()
        .flat_map(ProjectDescriptor::flattened_dependencies)
        .collect();

    let mut groups: Vec<(&str, Vec<&Dependency>)> = Vec::new();
    for dependency in dedup(pooled) {
        match groups.iter_mut().find(|(name, _)| *name == dependency.name) {
            Some((_, versions)) => versions.push(dependency),
            None => groups.push((dependency.name.as_str(), vec![dependency])),
        }
    }

    for (name, versions) in groups.into_iter().filter(|(_, v)| v.len() > 1) {
        writeln!(out, "{}", writer.header(name.to_string()))?;
        for dependency in versions {
            write!(out, "   {} ==> {}", dependency.version, dependency.project)?;
            if let Some(cap) = &dependency.version_cap {
                write!(out, " (limited: {})", writer.cap(cap))?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
