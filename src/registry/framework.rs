//! Target framework monikers and nearest dependency group selection
//!
//! Project files name frameworks with short folder names (`net472`,
//! `net6.0`, `netstandard2.0`) or, for legacy projects, a bare version
//! (`v4.7.2`). Registry dependency groups use the long form
//! (`.NETFramework4.7.2`, `.NETStandard2.0`).

use std::fmt;

/// Dotted framework version, missing components are zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameworkVersion(pub u32, pub u32, pub u32);

impl FrameworkVersion {
    /// Parse `4.7.2` or `4.8`
    fn dotted(text: &str) -> Option<Self> {
        let mut parts = [0u32; 3];
        let pieces: Vec<&str> = text.split('.').collect();
        if pieces.is_empty() || pieces.len() > 4 {
            return None;
        }
        for (slot, piece) in parts.iter_mut().zip(&pieces) {
            *slot = piece.parse().ok()?;
        }
        Some(Self(parts[0], parts[1], parts[2]))
    }

    /// Parse the compact form used by .NET Framework folders: `472` is 4.7.2
    fn compact(text: &str) -> Option<Self> {
        if text.is_empty() || text.len() > 3 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digit = |i: usize| -> u32 {
            text.as_bytes()
                .get(i)
                .map(|b| u32::from(b - b'0'))
                .unwrap_or(0)
        };
        Some(Self(digit(0), digit(1), digit(2)))
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0, self.1)?;
        if self.2 > 0 {
            write!(f, ".{}", self.2)?;
        }
        Ok(())
    }
}

/// A target framework
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetFramework {
    /// No framework known; every dependency group is acceptable
    Any,
    /// .NET Framework (`net472`, `v4.7.2`)
    NetFramework(FrameworkVersion),
    /// .NET Core and .NET 5+ (`netcoreapp3.1`, `net6.0`)
    NetCoreApp(FrameworkVersion),
    /// .NET Standard (`netstandard2.0`)
    NetStandard(FrameworkVersion),
    /// Anything else, matched by name only
    Other(String),
}

impl TargetFramework {
    /// Parse a framework moniker. Empty and `Unknown` mean [`TargetFramework::Any`].
    pub fn parse(moniker: &str) -> Self {
        let trimmed = moniker.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("unknown")
            || trimmed.eq_ignore_ascii_case("any")
        {
            return TargetFramework::Any;
        }

        let lower = trimmed.to_ascii_lowercase().replace(",version=v", "");
        // Platform suffix (net6.0-windows) does not change compatibility here
        let lower = lower.split('-').next().unwrap_or_default().to_string();

        Self::parse_lowercase(&lower).unwrap_or_else(|| TargetFramework::Other(trimmed.to_string()))
    }

    fn parse_lowercase(lower: &str) -> Option<Self> {
        if let Some(rest) = lower.strip_prefix(".netframework") {
            return FrameworkVersion::dotted(rest).map(TargetFramework::NetFramework);
        }
        if let Some(rest) = lower
            .strip_prefix(".netstandard")
            .or_else(|| lower.strip_prefix("netstandard"))
        {
            return FrameworkVersion::dotted(rest).map(TargetFramework::NetStandard);
        }
        if let Some(rest) = lower
            .strip_prefix(".netcoreapp")
            .or_else(|| lower.strip_prefix("netcoreapp"))
        {
            return FrameworkVersion::dotted(rest).map(TargetFramework::NetCoreApp);
        }
        if let Some(rest) = lower.strip_prefix('v') {
            return FrameworkVersion::dotted(rest).map(TargetFramework::NetFramework);
        }
        if let Some(rest) = lower.strip_prefix("net") {
            if rest.contains('.') {
                let version = FrameworkVersion::dotted(rest)?;
                return Some(if version.0 >= 5 {
                    TargetFramework::NetCoreApp(version)
                } else {
                    TargetFramework::NetFramework(version)
                });
            }
            return FrameworkVersion::compact(rest).map(TargetFramework::NetFramework);
        }
        None
    }

    /// Highest .NET Standard version this framework can consume
    fn supported_netstandard(&self) -> Option<FrameworkVersion> {
        match self {
            TargetFramework::NetCoreApp(v) if *v >= FrameworkVersion(3, 0, 0) => {
                Some(FrameworkVersion(2, 1, 0))
            }
            TargetFramework::NetCoreApp(v) if *v >= FrameworkVersion(2, 0, 0) => {
                Some(FrameworkVersion(2, 0, 0))
            }
            TargetFramework::NetCoreApp(_) => Some(FrameworkVersion(1, 6, 0)),
            TargetFramework::NetFramework(v) if *v >= FrameworkVersion(4, 6, 1) => {
                Some(FrameworkVersion(2, 0, 0))
            }
            TargetFramework::NetFramework(v) if *v >= FrameworkVersion(4, 6, 0) => {
                Some(FrameworkVersion(1, 3, 0))
            }
            TargetFramework::NetFramework(v) if *v >= FrameworkVersion(4, 5, 1) => {
                Some(FrameworkVersion(1, 2, 0))
            }
            TargetFramework::NetFramework(v) if *v >= FrameworkVersion(4, 5, 0) => {
                Some(FrameworkVersion(1, 1, 0))
            }
            TargetFramework::NetStandard(v) => Some(*v),
            _ => None,
        }
    }

    /// Preference of `candidate` for a project targeting `self`, `None` if incompatible.
    /// Higher is better.
    fn rank(&self, candidate: &TargetFramework) -> Option<(u8, FrameworkVersion)> {
        use TargetFramework::*;

        match (self, candidate) {
            (Any, Any) => Some((3, FrameworkVersion::default())),
            (Any, NetStandard(v)) => Some((2, *v)),
            (Any, _) => Some((0, FrameworkVersion::default())),
            (_, Any) => Some((1, FrameworkVersion::default())),
            (NetFramework(t), NetFramework(c))
            | (NetCoreApp(t), NetCoreApp(c))
            | (NetStandard(t), NetStandard(c))
                if c <= t =>
            {
                Some((3, *c))
            }
            (NetFramework(_) | NetCoreApp(_), NetStandard(c)) => self
                .supported_netstandard()
                .filter(|max| c <= max)
                .map(|_| (2, *c)),
            (Other(t), Other(c)) if t.eq_ignore_ascii_case(c) => {
                Some((3, FrameworkVersion::default()))
            }
            _ => None,
        }
    }

    /// Pick the dependency group nearest to this framework.
    ///
    /// Same-family groups win over .NET Standard groups, which win over the
    /// framework-less group; within a tier the highest compatible version
    /// wins and ties keep the first group. For [`TargetFramework::Any`] the
    /// framework-less group wins, then the highest .NET Standard group, then
    /// the first group.
    pub fn select_nearest<'a, T>(
        &self,
        groups: impl IntoIterator<Item = (&'a TargetFramework, T)>,
    ) -> Option<T> {
        let mut best: Option<((u8, FrameworkVersion), T)> = None;
        for (framework, group) in groups {
            let Some(rank) = self.rank(framework) else {
                continue;
            };
            let better = match &best {
                Some((best_rank, _)) => rank > *best_rank,
                None => true,
            };
            if better {
                best = Some((rank, group));
            }
        }
        best.map(|(_, group)| group)
    }
}

impl fmt::Display for TargetFramework {
    /// Short folder name
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFramework::Any => write!(f, "any"),
            TargetFramework::NetFramework(v) => {
                write!(f, "net{}{}", v.0, v.1)?;
                if v.2 > 0 {
                    write!(f, "{}", v.2)?;
                }
                Ok(())
            }
            TargetFramework::NetCoreApp(v) if v.0 >= 5 => write!(f, "net{}", v),
            TargetFramework::NetCoreApp(v) => write!(f, "netcoreapp{}", v),
            TargetFramework::NetStandard(v) => write!(f, "netstandard{}", v),
            TargetFramework::Other(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tf(s: &str) -> TargetFramework {
        TargetFramework::parse(s)
    }

    #[test]
    fn test_parse_short_names() {
        assert_eq!(tf("net472"), TargetFramework::NetFramework(FrameworkVersion(4, 7, 2)));
        assert_eq!(tf("net48"), TargetFramework::NetFramework(FrameworkVersion(4, 8, 0)));
        assert_eq!(tf("net6.0"), TargetFramework::NetCoreApp(FrameworkVersion(6, 0, 0)));
        assert_eq!(
            tf("net8.0-windows"),
            TargetFramework::NetCoreApp(FrameworkVersion(8, 0, 0))
        );
        assert_eq!(
            tf("netcoreapp3.1"),
            TargetFramework::NetCoreApp(FrameworkVersion(3, 1, 0))
        );
        assert_eq!(
            tf("netstandard2.0"),
            TargetFramework::NetStandard(FrameworkVersion(2, 0, 0))
        );
    }

    #[test]
    fn test_parse_long_and_legacy_names() {
        assert_eq!(
            tf(".NETFramework4.6.1"),
            TargetFramework::NetFramework(FrameworkVersion(4, 6, 1))
        );
        assert_eq!(
            tf(".NETFramework,Version=v4.5"),
            TargetFramework::NetFramework(FrameworkVersion(4, 5, 0))
        );
        assert_eq!(
            tf(".NETStandard1.3"),
            TargetFramework::NetStandard(FrameworkVersion(1, 3, 0))
        );
        assert_eq!(
            tf(".NETCoreApp3.1"),
            TargetFramework::NetCoreApp(FrameworkVersion(3, 1, 0))
        );
        assert_eq!(tf("v4.7.2"), TargetFramework::NetFramework(FrameworkVersion(4, 7, 2)));
    }

    #[test]
    fn test_parse_any_and_other() {
        assert_eq!(tf(""), TargetFramework::Any);
        assert_eq!(tf("Unknown"), TargetFramework::Any);
        assert_eq!(tf("MonoAndroid10"), TargetFramework::Other("MonoAndroid10".to_string()));
    }

    #[test]
    fn test_display_short_names() {
        assert_eq!(tf("net472").to_string(), "net472");
        assert_eq!(tf(".NETFramework4.8").to_string(), "net48");
        assert_eq!(tf("net6.0").to_string(), "net6.0");
        assert_eq!(tf(".NETCoreApp3.1").to_string(), "netcoreapp3.1");
        assert_eq!(tf(".NETStandard2.0").to_string(), "netstandard2.0");
        assert_eq!(TargetFramework::Any.to_string(), "any");
    }

    fn groups() -> Vec<(TargetFramework, &'static str)> {
        vec![
            (tf(".NETFramework4.5"), "net45"),
            (tf(".NETStandard1.3"), "ns13"),
            (tf(".NETStandard2.0"), "ns20"),
            (tf("net6.0"), "net6"),
        ]
    }

    fn nearest(target: &str, groups: &[(TargetFramework, &'static str)]) -> Option<&'static str> {
        tf(target).select_nearest(groups.iter().map(|(f, g)| (f, *g)))
    }

    #[test]
    fn test_select_same_family() {
        assert_eq!(nearest("net8.0", &groups()), Some("net6"));
        assert_eq!(nearest("net472", &groups()), Some("net45"));
    }

    #[test]
    fn test_select_netstandard_fallback() {
        assert_eq!(nearest("netcoreapp3.1", &groups()), Some("ns20"));
        assert_eq!(nearest("netstandard1.6", &groups()), Some("ns13"));
    }

    #[test]
    fn test_select_netstandard_respects_support_table() {
        let groups = vec![(tf(".NETStandard2.0"), "ns20"), (tf(".NETStandard1.1"), "ns11")];
        assert_eq!(nearest("net46", &groups), Some("ns11"));
        assert_eq!(nearest("net461", &groups), Some("ns20"));
    }

    #[test]
    fn test_select_frameworkless_group() {
        let groups = vec![(TargetFramework::Any, "plain"), (tf("net6.0"), "net6")];
        assert_eq!(nearest("net472", &groups), Some("plain"));
        assert_eq!(nearest("net6.0", &groups), Some("net6"));
    }

    #[test]
    fn test_select_for_any_target() {
        let groups = vec![(tf("net6.0"), "net6"), (tf(".NETStandard2.0"), "ns20")];
        assert_eq!(nearest("", &groups), Some("ns20"));

        let groups = vec![(tf("net6.0"), "net6"), (TargetFramework::Any, "plain")];
        assert_eq!(nearest("", &groups), Some("plain"));
    }

    #[test]
    fn test_select_incompatible() {
        let groups = vec![(tf("net8.0"), "net8")];
        assert_eq!(nearest("net6.0", &groups), None);
        assert_eq!(nearest("net472", &groups), None);
    }
}
