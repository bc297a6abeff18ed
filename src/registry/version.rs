//! NuGet versions and version ranges
//!
//! NuGet versions have up to four numeric components and an optional
//! SemVer 2.0 style release label. Ranges use interval notation:
//! - `1.0` means `1.0 <= x`
//! - `[1.0]` means `x == 1.0`
//! - `(1.0,)` means `1.0 < x`
//! - `[1.0,2.0)` means `1.0 <= x < 2.0`
//! - `(,2.0]` means `x <= 2.0`

use std::cmp::Ordering;
use std::fmt;

/// A parsed NuGet package version
#[derive(Debug, Clone)]
pub struct NuGetVersion {
    major: u64,
    minor: u64,
    patch: u64,
    revision: u64,
    release_labels: Vec<String>,
}

impl NuGetVersion {
    /// Creates a release version from numeric components
    pub fn new(major: u64, minor: u64, patch: u64, revision: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision,
            release_labels: Vec::new(),
        }
    }

    /// Parse a version string, returning `None` if it is not a valid version
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        // Build metadata never affects identity
        let without_metadata = input.split_once('+').map_or(input, |(v, _)| v);
        let (numbers, release) = match without_metadata.split_once('-') {
            Some((numbers, release)) => (numbers, Some(release)),
            None => (without_metadata, None),
        };

        let parts: Vec<&str> = numbers.split('.').collect();
        if parts.is_empty() || parts.len() > 4 {
            return None;
        }
        let mut components = [0u64; 4];
        for (slot, part) in components.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            *slot = part.parse().ok()?;
        }

        let release_labels = match release {
            Some(release) => {
                let labels: Vec<String> = release.split('.').map(str::to_string).collect();
                let valid = labels.iter().all(|label| {
                    !label.is_empty()
                        && label
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '-')
                });
                if !valid {
                    return None;
                }
                labels
            }
            None => Vec::new(),
        };

        Some(Self {
            major: components[0],
            minor: components[1],
            patch: components[2],
            revision: components[3],
            release_labels,
        })
    }

    /// Returns true if the version carries a release label
    pub fn is_prerelease(&self) -> bool {
        !self.release_labels.is_empty()
    }

    fn numbers(&self) -> (u64, u64, u64, u64) {
        (self.major, self.minor, self.patch, self.revision)
    }
}

/// Compare release labels identifier by identifier
fn compare_release_labels(a: &[String], b: &[String]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        // A stable release sorts above any prerelease
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    for (left, right) in a.iter().zip(b) {
        let ordering = match (left.parse::<u64>(), right.parse::<u64>()) {
            (Ok(l), Ok(r)) => l.cmp(&r),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => left.to_ascii_lowercase().cmp(&right.to_ascii_lowercase()),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

impl Ord for NuGetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numbers()
            .cmp(&other.numbers())
            .then_with(|| compare_release_labels(&self.release_labels, &other.release_labels))
    }
}

impl PartialOrd for NuGetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NuGetVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NuGetVersion {}

impl fmt::Display for NuGetVersion {
    /// Normalized form: the revision is only shown when non-zero
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.revision > 0 {
            write!(f, ".{}", self.revision)?;
        }
        if self.is_prerelease() {
            write!(f, "-{}", self.release_labels.join("."))?;
        }
        Ok(())
    }
}

/// A NuGet version range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    min: Option<NuGetVersion>,
    min_inclusive: bool,
    max: Option<NuGetVersion>,
    max_inclusive: bool,
}

impl VersionRange {
    /// The range that every version satisfies
    pub fn all() -> Self {
        Self {
            min: None,
            min_inclusive: false,
            max: None,
            max_inclusive: false,
        }
    }

    /// The range `[version, )`
    pub fn at_least(version: NuGetVersion) -> Self {
        Self {
            min: Some(version),
            min_inclusive: true,
            max: None,
            max_inclusive: false,
        }
    }

    /// The range `[version]`
    pub fn exactly(version: NuGetVersion) -> Self {
        Self {
            min: Some(version.clone()),
            min_inclusive: true,
            max: Some(version),
            max_inclusive: true,
        }
    }

    /// Parse a range in NuGet interval notation; an empty string is [`VersionRange::all`]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Some(Self::all());
        }

        let first = input.chars().next()?;
        if first != '[' && first != '(' {
            return NuGetVersion::parse(input).map(Self::at_least);
        }

        let last = input.chars().last()?;
        if input.len() < 2 || (last != ']' && last != ')') {
            return None;
        }
        let min_inclusive = first == '[';
        let max_inclusive = last == ']';
        let inner = &input[1..input.len() - 1];

        let Some((low, high)) = inner.split_once(',') else {
            // Single version form is only valid as an exact match
            if !(min_inclusive && max_inclusive) {
                return None;
            }
            return NuGetVersion::parse(inner).map(Self::exactly);
        };

        let bound = |text: &str| -> Option<Option<NuGetVersion>> {
            let text = text.trim();
            if text.is_empty() {
                Some(None)
            } else {
                NuGetVersion::parse(text).map(Some)
            }
        };
        let min = bound(low)?;
        let max = bound(high)?;
        if min.is_none() && max.is_none() && inner.trim() != "," {
            return None;
        }

        Some(Self {
            min,
            min_inclusive,
            max,
            max_inclusive,
        })
    }

    /// Returns true if `version` falls within this range
    pub fn satisfies(&self, version: &NuGetVersion) -> bool {
        let above_min = match &self.min {
            Some(min) if self.min_inclusive => version >= min,
            Some(min) => version > min,
            None => true,
        };
        let below_max = match &self.max {
            Some(max) if self.max_inclusive => version <= max,
            Some(max) => version < max,
            None => true,
        };
        above_min && below_max
    }

    /// Upper bound of the range, if it has one
    pub fn max_version(&self) -> Option<&NuGetVersion> {
        self.max.as_ref()
    }

    /// Lower bound of the range, if it has one
    pub fn min_version(&self) -> Option<&NuGetVersion> {
        self.min.as_ref()
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(min), Some(max)) = (&self.min, &self.max) {
            if self.min_inclusive && self.max_inclusive && min == max {
                return write!(f, "[{}]", min);
            }
        }
        let open = if self.min_inclusive { '[' } else { '(' };
        let close = if self.max_inclusive { ']' } else { ')' };
        let min = self.min.as_ref().map(ToString::to_string).unwrap_or_default();
        let max = self.max.as_ref().map(ToString::to_string).unwrap_or_default();
        write!(f, "{}{}, {}{}", open, min, max, close)
    }
}
