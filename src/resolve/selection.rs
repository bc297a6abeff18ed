//! Child version selection

use crate::domain::Dependency;
use crate::registry::{PackageIdentity, VersionRange};

/// Highest candidate whose version satisfies `range`.
///
/// Candidates without a parsed version never satisfy a range.
pub fn select_highest(
    candidates: Vec<PackageIdentity>,
    range: &VersionRange,
) -> Option<PackageIdentity> {
    let mut satisfying: Vec<PackageIdentity> = candidates
        .into_iter()
        .filter(|c| c.version.as_ref().is_some_and(|v| range.satisfies(v)))
        .collect();
    satisfying.sort_by(|a, b| a.version.cmp(&b.version));
    satisfying.pop()
}

/// Annotation recorded on a child whose range has an upper bound:
/// `<max> by <parent name> (<parent version>)`
pub fn version_cap(range: &VersionRange, parent: &Dependency) -> Option<String> {
    range
        .max_version()
        .map(|max| format!("{} by {} ({})", max, parent.name, parent.version))
}
