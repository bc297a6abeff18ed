//! Report rendering
//!
//! This module provides:
//! - Tree output: every project with its full dependency tree
//! - Flat output: every project with its flattened dependency list
//! - Top-level output: every project with its direct references only
//! - Frameworks output: projects grouped by target framework
//! - Conflicts output: packages resolved at more than one version
//!
//! Rendering is a pure function of the project list; the same input always
//! produces the same text.

mod conflicts;
mod frameworks;
mod list;
mod tree;

use crate::domain::{Dependency, ProjectDescriptor};
use colored::Colorize;
use std::io::{self, Write};

/// Report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// No output
    #[default]
    None,
    /// Full dependency tree per project
    Tree,
    /// Flattened dependencies per project
    Flat,
    /// Direct references per project
    TopLevel,
    /// Projects grouped by framework
    Frameworks,
    /// Packages used at different versions
    Conflicts,
}

impl OutputFormat {
    /// Every report format, in the order they are rendered
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Tree,
        OutputFormat::Flat,
        OutputFormat::TopLevel,
        OutputFormat::Frameworks,
        OutputFormat::Conflicts,
    ];
}

/// Renders resolved projects as text
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportWriter {
    color: bool,
}

impl ReportWriter {
    /// Create a writer without colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with color option
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    /// Render `projects` in `format`. Every report except `None` starts with
    /// an empty line.
    pub fn render(
        &self,
        projects: &[ProjectDescriptor],
        format: OutputFormat,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        if format == OutputFormat::None {
            return Ok(());
        }
        writeln!(out)?;
        match format {
            OutputFormat::None => Ok(()),
            OutputFormat::Tree => tree::write_tree(self, projects, out),
            OutputFormat::Flat => list::write_flat(self, projects, out),
            OutputFormat::TopLevel => list::write_top_level(self, projects, out),
            OutputFormat::Frameworks => frameworks::write_frameworks(self, projects, out),
            OutputFormat::Conflicts => conflicts::write_conflicts(self, projects, out),
        }
    }

    /// Render into a string
    pub fn render_to_string(&self, projects: &[ProjectDescriptor], format: OutputFormat) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.render(projects, format, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn header(&self, text: String) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text
        }
    }

    fn package_name(&self, dependency: &Dependency) -> String {
        if self.color && !dependency.found_in_registry {
            dependency.name.red().to_string()
        } else {
            dependency.name.clone()
        }
    }

    fn cap(&self, cap: &str) -> String {
        if self.color {
            cap.yellow().to_string()
        } else {
            cap.to_string()
        }
    }

    /// One dependency line: `-` repeated three times per level, then name and
    /// the cap annotation or version
    fn write_dependency_line(
        &self,
        dependency: &Dependency,
        level: usize,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let version = match &dependency.version_cap {
            Some(cap) => self.cap(cap),
            None => dependency.version.clone(),
        };
        writeln!(
            out,
            "{}{} {}",
            "-".repeat(level * 3),
            self.package_name(dependency),
            version
        )
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{Dependency, ProjectDescriptor};

    pub fn dep(name: &str, version: &str, project: &str) -> Dependency {
        let mut dependency = Dependency::new(name, version, "net6.0", project);
        dependency.found_in_registry = true;
        dependency
    }

    /// Two projects sharing `Newtonsoft.Json` at different versions
    pub fn projects() -> Vec<ProjectDescriptor> {
        let mut logging = dep("Serilog", "2.10.0", "Api");
        let mut json = dep("Newtonsoft.Json", "12.0.1", "Api")
            .with_version_cap(Some("13.0.0 by Serilog (2.10.0.0)".to_string()));
        json.children.push(dep("System.Memory", "4.5.4", "Api"));
        logging.children.push(json);

        let api = ProjectDescriptor::new("Api", "2.0.0", "net6.0").with_dependency(logging);
        let core = ProjectDescriptor::new("Core", "1.0.0", "netstandard2.0")
            .with_dependency(dep("Newtonsoft.Json", "13.0.1", "Core"));
        vec![api, core]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::projects;
    use super::*;

    #[test]
    fn test_none_renders_nothing() {
        let writer = ReportWriter::new();
        assert_eq!(writer.render_to_string(&projects(), OutputFormat::None), "");
    }

    #[test]
    fn test_reports_start_with_empty_line() {
        let writer = ReportWriter::new();
        for format in OutputFormat::ALL {
            let text = writer.render_to_string(&projects(), format);
            assert!(text.starts_with('\n'), "{:?} did not start with a newline", format);
        }
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let writer = ReportWriter::new();
        let projects = projects();
        for format in OutputFormat::ALL {
            assert_eq!(
                writer.render_to_string(&projects, format),
                writer.render_to_string(&projects, format)
            );
        }
    }

    #[test]
    fn test_empty_project_list() {
        let writer = ReportWriter::new();
        assert_eq!(writer.render_to_string(&[], OutputFormat::Tree), "\n");
        assert_eq!(writer.render_to_string(&[], OutputFormat::Conflicts), "\n");
    }

    #[test]
    fn test_color_marks_missing_packages() {
        colored::control::set_override(true);
        let mut missing = Dependency::new("Missing", "1.0.0", "", "Api");
        missing.found_in_registry = false;
        let projects = vec![ProjectDescriptor::new("Api", "1.0.0", "net6.0").with_dependency(missing)];

        let plain = ReportWriter::new().render_to_string(&projects, OutputFormat::TopLevel);
        let colored = ReportWriter::with_color(true).render_to_string(&projects, OutputFormat::TopLevel);
        colored::control::unset_override();

        assert!(plain.contains("---Missing 1.0.0.0"));
        assert!(!plain.contains('\u{1b}'));
        assert!(colored.contains('\u{1b}'));
    }
}
