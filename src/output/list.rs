//! Flat and top-level reports

use super::ReportWriter;
use crate::domain::{Dependency, ProjectDescriptor};
use std::io::{self, Write};

/// `<project> <framework>` followed by the flattened dependency list
pub(super) fn write_flat(
    writer: &ReportWriter,
    projects: &[ProjectDescriptor],
    out: &mut dyn Write,
) -> io::Result<()> {
    for project in projects {
        write_list(writer, project, project.flattened_dependencies(), out)?;
    }
    Ok(())
}

/// `<project> <framework>` followed by the direct references only
pub(super) fn write_top_level(
    writer: &ReportWriter,
    projects: &[ProjectDescriptor],
    out: &mut dyn Write,
) -> io::Result<()> {
    for project in projects {
        write_list(writer, project, project.dependencies.iter().collect(), out)?;
    }
    Ok(())
}

fn write_list(
    writer: &ReportWriter,
    project: &ProjectDescriptor,
    dependencies: Vec<&Dependency>,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        writer.header(format!("{} {}", project.name, project.framework_version))
    )?;
    for dependency in dependencies {
        writer.write_dependency_line(dependency, 1, out)?;
    }
    Ok(())
}
