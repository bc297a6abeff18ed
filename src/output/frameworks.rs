//! Frameworks report

use super::ReportWriter;
use crate::domain::ProjectDescriptor;
use std::io::{self, Write};

/// Each framework, in order of first appearance, with its projects sorted by name
pub(super) fn write_frameworks(
    writer: &ReportWriter,
    projects: &[ProjectDescriptor],
    out: &mut dyn Write,
) -> io::Result<()> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for project in projects {
        let framework = project.framework_version.as_str();
        match groups.iter_mut().find(|(name, _)| *name == framework) {
            Some((_, members)) => members.push(project.name.as_str()),
            None => groups.push((framework, vec![project.name.as_str()])),
        }
    }

    for (framework, mut members) in groups {
        members.sort();
        writeln!(out, "{}", writer.header(framework.to_string()))?;
        for member in members {
            writeln!(out, "   {}", member)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::domain::ProjectDescriptor;
    use crate::output::{OutputFormat, ReportWriter};

    #[test]
    fn test_frameworks_output() {
        let projects = vec![
            ProjectDescriptor::new("Web", "1.0.0", "net6.0"),
            ProjectDescriptor::new("Shared", "1.0.0", "netstandard2.0"),
            ProjectDescriptor::new("Api", "1.0.0", "net6.0"),
            ProjectDescriptor::new("Legacy", "1.0.0", "Unknown"),
        ];
        let text = ReportWriter::new().render_to_string(&projects, OutputFormat::Frameworks);
        assert_eq!(
            text,
            "\n\
net6.0\n   Api\n   Web\n\
netstandard2.0\n   Shared\n\
Unknown\n   Legacy\n"
        );
    }
}
