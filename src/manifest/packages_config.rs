//! Legacy `packages.config` manifest
//!
//! ```xml
//! <packages>
//!   <package id="Newtonsoft.Json" version="12.0.3" targetFramework="net472" />
//! </packages>
//! ```

use super::xml::parse_document;
use crate::domain::Dependency;
use crate::error::InputError;
use std::path::Path;

/// Conventional file name, looked up next to the project descriptor
pub const PACKAGES_CONFIG: &str = "packages.config";

/// Parse manifest content into dependencies for `project` under `framework`.
///
/// `<package>` entries without an `id` are skipped.
pub fn parse_packages_config(
    content: &str,
    framework: &str,
    project: &str,
) -> Result<Vec<Dependency>, String> {
    let root = parse_document(content)?;
    Ok(root
        .children_named("package")
        .filter_map(|package| {
            let id = package.attribute("id")?;
            let version = package.attribute("version").unwrap_or_default();
            Some(Dependency::new(id, version, framework, project))
        })
        .collect())
}

/// Read the manifest beside the descriptor at `project_path`, if there is one
pub fn read_packages_config(
    project_path: &Path,
    framework: &str,
    project: &str,
) -> Result<Option<Vec<Dependency>>, InputError> {
    let path = project_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(PACKAGES_CONFIG);
    if !path.is_file() {
        return Ok(None);
    }

    let content = InputError::read_to_string(&path)?;
    parse_packages_config(&content, framework, project)
        .map(Some)
        .map_err(|message| InputError::malformed(&path, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="Newtonsoft.Json" version="12.0.3" targetFramework="net472" />
  <package version="1.0.0" />
  <package id="EntityFramework" version="6.4.4" targetFramework="net472" />
</packages>"#;

    #[test]
    fn test_parse_packages_config() {
        let deps = parse_packages_config(MANIFEST, "v4.7.2", "Legacy").unwrap();

        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "Newtonsoft.Json");
        assert_eq!(deps[0].version, "12.0.3.0");
        assert_eq!(deps[0].framework, "v4.7.2");
        assert_eq!(deps[0].project, "Legacy");
        assert_eq!(deps[1].name, "EntityFramework");
    }

    #[test]
    fn test_parse_empty_manifest() {
        let deps = parse_packages_config("<packages />", "", "Legacy").unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn test_read_absent_manifest() {
        let temp = TempDir::new().unwrap();
        let result = read_packages_config(&temp.path().join("Legacy.csproj"), "", "Legacy").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_manifest_beside_project() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PACKAGES_CONFIG), MANIFEST).unwrap();

        let deps = read_packages_config(&temp.path().join("Legacy.csproj"), "v4.7.2", "Legacy")
            .unwrap()
            .unwrap();
        assert_eq!(deps.len(), 2);
    }

    #[test]
    fn test_read_malformed_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PACKAGES_CONFIG), "<packages>").unwrap();

        let err = read_packages_config(&temp.path().join("Legacy.csproj"), "", "Legacy").unwrap_err();
        assert!(matches!(err, InputError::Malformed { .. }));
    }
}
