//! Solution (.sln) file parsing
//!
//! A solution lists its projects as quoted relative paths, e.g.
//! `Project("{...}") = "Api", "src\Api\Api.csproj", "{...}"`.

use crate::error::InputError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PROJECT_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+\.csproj)""#).unwrap());

/// Relative project paths in the order they appear, with `/` separators
pub fn project_paths(content: &str) -> Vec<String> {
    PROJECT_PATH_RE
        .captures_iter(content)
        .map(|caps| caps[1].replace('\\', "/"))
        .collect()
}

/// Read a solution and resolve its project paths against its directory
pub fn read_solution(solution_path: &Path) -> Result<Vec<PathBuf>, InputError> {
    if !solution_path.is_file() {
        return Err(InputError::not_found(solution_path));
    }
    let content = InputError::read_to_string(solution_path)?;
    let base = solution_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(project_paths(&content)
        .into_iter()
        .map(|relative| base.join(relative))
        .collect())
}
