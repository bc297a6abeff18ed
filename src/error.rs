//! Application error types using thiserror
//!
//! Error hierarchy:
//! - InputError: missing or malformed solution, project and packages.config files
//! - RegistryError: Issues with package registry communication
//! - ConfigError: Issues with CLI configuration
//! - Output: failures writing a report

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Solution and project file related errors
    #[error(transparent)]
    Input(#[from] InputError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing a report failed
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors related to reading solution and project files
#[derive(Error, Debug)]
pub enum InputError {
    /// Solution or project file not found
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read an existing file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not the expected XML structure
    #[error("failed to parse XML in {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry}")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry}")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// The service index does not advertise a usable resource
    #[error("service index {source_url} has no {resource} resource")]
    ServiceIndex {
        source_url: String,
        resource: String,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No solution path given
    #[error("you must provide a path to a solution file")]
    MissingSolution,

    /// No report format selected
    #[error("you must provide at least one output")]
    NoOutputSelected,

    /// Package source URL cannot be used
    #[error("invalid package source '{url}': {message}")]
    InvalidSource { url: String, message: String },
}

impl InputError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        InputError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InputError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Malformed error
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        InputError::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Reads a file, mapping a missing file to `NotFound`
    pub fn read_to_string(path: &std::path::Path) -> Result<String, InputError> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => InputError::not_found(path),
            _ => InputError::read_error(path, e),
        })
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl AppError {
    /// Returns true for errors caused by how the tool was invoked
    pub fn is_usage_error(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_not_found() {
        let err = InputError::not_found("/path/to/App.sln");
        let msg = format!("{}", err);
        assert!(msg.contains("file not found"));
        assert!(msg.contains("App.sln"));
    }

    #[test]
    fn test_input_error_malformed() {
        let err = InputError::malformed("/path/to/App.csproj", "unexpected end of file");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse XML"));
        assert!(msg.contains("App.csproj"));
        assert!(msg.contains("unexpected end of file"));
    }

    #[test]
    fn test_read_to_string_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = InputError::read_to_string(&dir.path().join("missing.csproj")).unwrap_err();
        assert!(matches!(err, InputError::NotFound { .. }));
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("Newtonsoft.Json", "nuget.org");
        let msg = format!("{}", err);
        assert!(msg.contains("package 'Newtonsoft.Json' not found"));
        assert!(msg.contains("nuget.org"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("Serilog", "nuget.org", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_registry_error_rate_limit() {
        let err = RegistryError::rate_limit_exceeded("nuget.org");
        let msg = format!("{}", err);
        assert!(msg.contains("rate limit exceeded"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("Serilog", "nuget.org");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("Serilog"));
    }

    #[test]
    fn test_service_index_error() {
        let err = RegistryError::ServiceIndex {
            source_url: "https://example.test/v3/index.json".to_string(),
            resource: "RegistrationsBaseUrl".to_string(),
        };
        assert!(err.to_string().contains("has no RegistrationsBaseUrl resource"));
    }

    #[test]
    fn test_config_errors() {
        assert!(ConfigError::MissingSolution
            .to_string()
            .contains("path to a solution file"));
        assert!(ConfigError::NoOutputSelected
            .to_string()
            .contains("at least one output"));
    }

    #[test]
    fn test_app_error_from_input_error() {
        let app_err: AppError = InputError::not_found("/path").into();
        assert!(app_err.to_string().contains("file not found"));
        assert!(!app_err.is_usage_error());
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::MissingSolution.into();
        assert!(app_err.is_usage_error());
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let app_err: AppError = RegistryError::package_not_found("pkg", "nuget.org").into();
        assert!(app_err.to_string().contains("package 'pkg' not found"));
    }
}
