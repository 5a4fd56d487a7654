// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI is a plain struct and clap generates the
// parsing, --help and --version from the field attributes.
//
// Example:
//   site-mirror https://example.com --depth 2 --output ./mirror
// =============================================================================

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use site_mirror::config::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_OUTPUT_DIR, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use site_mirror::MirrorConfig;

#[derive(Parser, Debug)]
#[command(
    name = "site-mirror",
    version,
    about = "Mirror a website to local files",
    long_about = "site-mirror downloads a page and everything it links to on the same host, \
                  writes each file under the output directory, and keeps following links \
                  up to the given depth."
)]
pub struct Cli {
    /// Website URL to mirror (e.g., https://example.com)
    pub url: String,

    /// Directory the mirrored files are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Maximum link depth to follow (0 = only the starting page)
    #[arg(short, long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub depth: usize,

    /// Number of concurrent downloads
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Don't fetch or honour robots.txt
    #[arg(long)]
    pub ignore_robots: bool,

    /// How robots.txt is interpreted when it is honoured
    #[arg(long, value_enum, default_value_t = RobotsMode::Rules)]
    pub robots_mode: RobotsMode,

    /// Capacity of the shared task queue
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Print the run summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RobotsMode {
    /// Honour User-agent / Allow / Disallow rules
    Rules,
    /// Request robots.txt but allow every URL
    Permissive,
}

impl Cli {
    pub fn to_config(&self) -> MirrorConfig {
        MirrorConfig {
            base_url: self.url.clone(),
            output_dir: self.output.clone(),
            max_depth: self.depth,
            concurrency: self.concurrency,
            timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
            respect_robots: !self.ignore_robots,
            queue_capacity: self.queue_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["site-mirror", "https://example.com"]);
        let config = cli.to_config();

        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, "WebMirror/1.0");
        assert!(config.respect_robots);
        assert_eq!(cli.robots_mode, RobotsMode::Rules);
        assert!(!cli.json);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "site-mirror",
            "https://example.com",
            "--output",
            "out",
            "--depth",
            "1",
            "--concurrency",
            "8",
            "--timeout",
            "5",
            "--ignore-robots",
            "--robots-mode",
            "permissive",
            "--json",
        ]);
        let config = cli.to_config();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.max_depth, 1);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.respect_robots);
        assert_eq!(cli.robots_mode, RobotsMode::Permissive);
        assert!(cli.json);
    }
}
