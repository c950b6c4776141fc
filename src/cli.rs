// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `testdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "testdag",
    version,
    about = "Gate test jobs on their prerequisites and detect output file races.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job manifest (TOML).
    #[arg(long, value_name = "PATH", default_value = "Testdag.toml")]
    pub manifest: String,

    /// Whitespace-separated caveats to ignore ("prereq" or "all" disables
    /// prerequisite gating). Overrides `[options].ignored_caveats`.
    #[arg(long, value_name = "CAVEATS")]
    pub ignore_caveats: Option<String>,

    /// Number of jobs to run at once. Overrides `[options].jobs`.
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TESTDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print tiers, dependents and current gate verdicts without running.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::parse_from(["testdag"]);
        assert_eq!(args.manifest, "Testdag.toml");
        assert!(args.ignore_caveats.is_none());
        assert!(args.jobs.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn overrides() {
        let args = CliArgs::parse_from([
            "testdag",
            "--manifest",
            "tests/Testdag.toml",
            "--ignore-caveats",
            "prereq heavy",
            "-j",
            "4",
            "--log-level",
            "debug",
            "--dry-run",
        ]);
        assert_eq!(args.manifest, "tests/Testdag.toml");
        assert_eq!(args.ignore_caveats.as_deref(), Some("prereq heavy"));
        assert_eq!(args.jobs, Some(4));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(args.dry_run);
    }
}
