//! Solution processing
//!
//! Workflow: read solution → read and resolve each project → sort → render.
//! Projects are processed one at a time. A malformed project descriptor is
//! logged and aborts the run.

use crate::domain::ProjectDescriptor;
use crate::error::{AppError, InputError};
use crate::manifest::{project_name, read_solution, ProjectReader};
use crate::output::{OutputFormat, ReportWriter};
use crate::progress::Progress;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Drives a run over one solution file
pub struct SolutionProcessor {
    /// Reads (and usually resolves) each project
    reader: Box<dyn ProjectReader>,
    /// Renders the reports
    writer: ReportWriter,
    /// Whether to show a spinner while resolving
    show_progress: bool,
}

impl SolutionProcessor {
    /// Create a processor without progress display
    pub fn new(reader: impl ProjectReader + 'static, writer: ReportWriter) -> Self {
        Self {
            reader: Box::new(reader),
            writer,
            show_progress: false,
        }
    }

    /// Enable or disable the spinner (builder pattern)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Read every project of the solution, render each of `formats` to `out`
    /// in the given order, and return the projects sorted by name.
    pub async fn process(
        &self,
        solution: &Path,
        formats: &[OutputFormat],
        out: &mut dyn Write,
    ) -> Result<Vec<ProjectDescriptor>, AppError> {
        let paths = read_solution(solution)?;
        debug!(solution = %solution.display(), projects = paths.len(), "read solution");

        let mut progress = Progress::new(self.show_progress);
        let result = self.read_projects(&paths, &mut progress).await;
        progress.finish_and_clear();
        let mut projects = result?;

        projects.sort_by(|a, b| a.name.cmp(&b.name));

        for format in formats {
            self.writer.render(&projects, *format, out)?;
        }
        out.flush()?;

        Ok(projects)
    }

    async fn read_projects(
        &self,
        paths: &[PathBuf],
        progress: &mut Progress,
    ) -> Result<Vec<ProjectDescriptor>, AppError> {
        let mut projects = Vec::with_capacity(paths.len());
        for path in paths {
            progress.spinner(&format!("Resolving {}", project_name(path)));
            match self.reader.read_project(path).await {
                Ok(project) => projects.push(project),
                Err(e @ AppError::Input(InputError::Malformed { .. })) => {
                    error!(path = %path.display(), "{}", e);
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(projects)
    }
}
