//! Tree report

use super::ReportWriter;
use crate::domain::{Dependency, ProjectDescriptor};
use std::io::{self, Write};

/// `<project> <version>` followed by every dependency, indented by depth
pub(super) fn write_tree(
    writer: &ReportWriter,
    projects: &[ProjectDescriptor],
    out: &mut dyn Write,
) -> io::Result<()> {
    for project in projects {
        writeln!(
            out,
            "{}",
            writer.header(format!("{} {}", project.name, project.version))
        )?;
        for dependency in &project.dependencies {
            write_subtree(writer, dependency, 1, out)?;
        }
    }
    Ok(())
}

fn write_subtree(
    writer: &ReportWriter,
    dependency: &Dependency,
    level: usize,
    out: &mut dyn Write,
) -> io::Result<()> {
    writer.write_dependency_line(dependency, level, out)?;
    for child in &dependency.children {
        write_subtree(writer, child, level + 1, out)?;
    }
    Ok(())
}
