//! CLI argument parsing module for nuget-tree

use crate::error::ConfigError;
use crate::output::OutputFormat;
use crate::registry::{RegistryConfig, DEFAULT_SOURCE};
use crate::resolve::ResolverConfig;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Parse a timeout given in whole seconds
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", s))?;
    if secs == 0 {
        return Err("timeout must be at least one second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Single-dash spellings kept from the classic tool, with their long forms
const LEGACY_FLAGS: [(&str, &str); 2] = [("-nr", "--nr"), ("-fv", "--fv")];

/// Rewrite `-nr` and `-fv` to their long forms.
///
/// clap would otherwise read them as clustered short flags (`-n -r`).
pub fn expand_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            LEGACY_FLAGS
                .iter()
                .find(|(legacy, _)| arg == *legacy)
                .map(|(_, long)| OsString::from(*long))
                .unwrap_or(arg)
        })
        .collect()
}

/// NuGet dependency tree reporter
#[derive(Parser, Debug, Clone)]
#[command(
    name = "nuget-tree",
    version,
    about = "Show the resolved NuGet dependencies of every project in a solution"
)]
pub struct CliArgs {
    /// Path to the solution (.sln) file
    pub solution: Option<PathBuf>,

    // Report formats
    /// Show packages resolved at more than one version across projects
    #[arg(short, long)]
    pub conflicts: bool,

    /// Show each project's flattened dependency list
    #[arg(short, long)]
    pub flat: bool,

    /// Show each project's full dependency tree
    #[arg(short, long)]
    pub tree: bool,

    /// Show each project's direct references only (also -nr)
    #[arg(short = 'n', long, visible_alias = "nr")]
    pub top_level: bool,

    /// Group projects by target framework (also -fv)
    #[arg(short = 'w', long, visible_alias = "fv")]
    pub frameworks: bool,

    // Registry options
    /// NuGet v3 service index URL
    #[arg(long, default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Consider prerelease versions when resolving dependencies
    #[arg(long)]
    pub prerelease: bool,

    /// Timeout for registry requests, in seconds
    #[arg(long, value_parser = parse_timeout, default_value = "30")]
    pub timeout: Duration,

    // General options
    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - errors only, no progress
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Parse the process arguments, accepting the legacy `-nr` and `-fv`
    pub fn parse_args() -> Self {
        Self::parse_from(expand_legacy_flags(std::env::args_os()))
    }

    /// Selected report formats in rendering order
    pub fn formats(&self) -> Vec<OutputFormat> {
        [
            (self.tree, OutputFormat::Tree),
            (self.flat, OutputFormat::Flat),
            (self.top_level, OutputFormat::TopLevel),
            (self.frameworks, OutputFormat::Frameworks),
            (self.conflicts, OutputFormat::Conflicts),
        ]
        .into_iter()
        .filter_map(|(selected, format)| selected.then_some(format))
        .collect()
    }

    /// Check the arguments, returning the solution path and the formats
    pub fn validate(&self) -> Result<(PathBuf, Vec<OutputFormat>), ConfigError> {
        let solution = self
            .solution
            .clone()
            .ok_or(ConfigError::MissingSolution)?;
        let formats = self.formats();
        if formats.is_empty() {
            return Err(ConfigError::NoOutputSelected);
        }
        self.registry_config().validate()?;
        Ok((solution, formats))
    }

    /// Registry settings from the command line
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            source: self.source.clone(),
            timeout: self.timeout,
            ..RegistryConfig::default()
        }
    }

    /// Resolver settings from the command line
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            include_prerelease: self.prerelease,
        }
    }

    /// Maximum level for the tracing subscriber
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        }
    }

    /// Whether to show the progress spinner
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Whether to color report output
    pub fn color(&self) -> bool {
        !self.no_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["nuget-tree"]);
        assert!(args.solution.is_none());
        assert!(args.formats().is_empty());
        assert_eq!(args.source, DEFAULT_SOURCE);
        assert_eq!(args.timeout, Duration::from_secs(30));
        assert!(!args.prerelease);
        assert!(args.color());
        assert!(args.show_progress());
        assert_eq!(args.log_level(), Level::WARN);
    }

    #[test]
    fn test_solution_argument() {
        let args = CliArgs::parse_from(["nuget-tree", "App.sln", "-t"]);
        assert_eq!(args.solution, Some(PathBuf::from("App.sln")));
    }

    #[test]
    fn test_short_format_flags() {
        let args = CliArgs::parse_from(["nuget-tree", "App.sln", "-c", "-f", "-t", "-n", "-w"]);
        assert_eq!(args.formats(), OutputFormat::ALL.to_vec());
    }

    #[test]
    fn test_long_format_flags_and_aliases() {
        let args = CliArgs::parse_from(["nuget-tree", "App.sln", "--nr", "--fv"]);
        assert_eq!(
            args.formats(),
            vec![OutputFormat::TopLevel, OutputFormat::Frameworks]
        );

        let args = CliArgs::parse_from(["nuget-tree", "App.sln", "--top-level", "--conflicts"]);
        assert_eq!(
            args.formats(),
            vec![OutputFormat::TopLevel, OutputFormat::Conflicts]
        );
    }

    #[test]
    fn test_legacy_single_dash_flags() {
        assert!(CliArgs::try_parse_from(["nuget-tree", "App.sln", "-nr"]).is_err());

        let args = CliArgs::parse_from(expand_legacy_flags([
            "nuget-tree", "App.sln", "-nr", "-fv", "-t",
        ]));
        assert_eq!(
            args.formats(),
            vec![
                OutputFormat::Tree,
                OutputFormat::TopLevel,
                OutputFormat::Frameworks
            ]
        );
    }

    #[test]
    fn test_expand_legacy_flags_leaves_other_args() {
        let args = expand_legacy_flags(["nuget-tree", "-nr.sln", "-n", "--fv"]);
        assert_eq!(args, vec!["nuget-tree", "-nr.sln", "-n", "--fv"]);
    }

    #[test]
    fn test_formats_in_fixed_order() {
        let args = CliArgs::parse_from(["nuget-tree", "App.sln", "--conflicts", "--tree"]);
        assert_eq!(
            args.formats(),
            vec![OutputFormat::Tree, OutputFormat::Conflicts]
        );
    }

    #[test]
    fn test_validate_missing_solution() {
        let args = CliArgs::parse_from(["nuget-tree", "-t"]);
        assert!(matches!(args.validate(), Err(ConfigError::MissingSolution)));
    }

    #[test]
    fn test_validate_no_output() {
        let args = CliArgs::parse_from(["nuget-tree", "App.sln"]);
        assert!(matches!(args.validate(), Err(ConfigError::NoOutputSelected)));
    }

    #[test]
    fn test_validate_bad_source() {
        let args = CliArgs::parse_from(["nuget-tree", "App.sln", "-t", "--source", "feed"]);
        assert!(matches!(
            args.validate(),
            Err(ConfigError::InvalidSource { .. })
        ));
    }

    #[test]
    fn test_validate_ok() {
        let args = CliArgs::parse_from(["nuget-tree", "App.sln", "-f"]);
        let (solution, formats) = args.validate().unwrap();
        assert_eq!(solution, PathBuf::from("App.sln"));
        assert_eq!(formats, vec![OutputFormat::Flat]);
    }

    #[test]
    fn test_registry_and_resolver_config() {
        let args = CliArgs::parse_from([
            "nuget-tree",
            "App.sln",
            "-t",
            "--source",
            "https://feed.test/v3/index.json",
            "--timeout",
            "5",
            "--prerelease",
        ]);
        let registry = args.registry_config();
        assert_eq!(registry.source, "https://feed.test/v3/index.json");
        assert_eq!(registry.timeout, Duration::from_secs(5));
        assert_eq!(registry.max_retries, 3);
        assert!(args.resolver_config().include_prerelease);
    }

    #[test]
    fn test_verbosity_flags() {
        let args = CliArgs::parse_from(["nuget-tree", "--verbose"]);
        assert_eq!(args.log_level(), Level::DEBUG);

        let args = CliArgs::parse_from(["nuget-tree", "-q"]);
        assert_eq!(args.log_level(), Level::ERROR);
        assert!(!args.show_progress());
    }

    #[test]
    fn test_no_color_flag() {
        let args = CliArgs::parse_from(["nuget-tree", "--no-color"]);
        assert!(!args.color());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("10").unwrap(), Duration::from_secs(10));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("ten").is_err());
        assert!(CliArgs::try_parse_from(["nuget-tree", "--timeout", "abc"]).is_err());
    }
}
