//! Soft warnings raised while resolving dependencies
//!
//! A missing package, an unsatisfiable version range or a dependency cycle
//! does not stop a run. The resolver reports them to a [`DiagnosticSink`]
//! and carries on.

use std::fmt;
use std::sync::Mutex;

/// A non-fatal condition encountered during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The registry has no entry for this exact package and version
    UnresolvedPackage {
        package: String,
        version: String,
        project: String,
    },
    /// No registry version satisfies a declared range; the entry is dropped
    UnsatisfiableRange {
        package: String,
        range: String,
        required_by: String,
        required_by_version: String,
        project: String,
    },
    /// The package already appears among its own ancestors; it is not expanded
    CycleDetected {
        package: String,
        version: String,
        required_by: String,
        project: String,
    },
}

impl Warning {
    /// The package the warning is about
    pub fn package(&self) -> &str {
        match self {
            Warning::UnresolvedPackage { package, .. }
            | Warning::UnsatisfiableRange { package, .. }
            | Warning::CycleDetected { package, .. } => package,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnresolvedPackage {
                package,
                version,
                project,
            } => write!(
                f,
                "Package not available in source(s): {} {}. Required by {}",
                package, version, project
            ),
            Warning::UnsatisfiableRange {
                package,
                range,
                required_by,
                required_by_version,
                project,
            } => write!(
                f,
                "Package not available in source(s): {} {}. Required by {} {} from {}",
                package, range, required_by, required_by_version, project
            ),
            Warning::CycleDetected {
                package,
                version,
                required_by,
                project,
            } => write!(
                f,
                "Dependency cycle: {} {} is already an ancestor of {} in {}; not expanded",
                package, version, required_by, project
            ),
        }
    }
}

/// Receives warnings raised during resolution
pub trait DiagnosticSink: Send + Sync {
    /// Report a warning
    fn warn(&self, warning: Warning);
}

/// Sink that forwards warnings to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, warning: Warning) {
        tracing::warn!(package = warning.package(), "{}", warning);
    }
}

/// Sink that records warnings so callers can inspect them afterwards
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: Mutex<Vec<Warning>>,
}

impl CollectingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings recorded so far
    pub fn warnings(&self) -> Vec<Warning> {
        match self.warnings.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of warnings recorded so far
    pub fn len(&self) -> usize {
        self.warnings().len()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&self, warning: Warning) {
        match self.warnings.lock() {
            Ok(mut guard) => guard.push(warning),
            Err(poisoned) => poisoned.into_inner().push(warning),
        }
    }
}
