// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, filtered by RUST_LOG, written to stderr)
// 3. Build the mirror, wire Ctrl-C to its cancellation token, run it
// 4. Print a summary and exit with the right code:
//      0   = run completed (even if some URLs failed)
//      1   = setup failed (bad URL, robots.txt unreachable, output dir...)
//      130 = interrupted with Ctrl-C
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, RobotsMode};
use site_mirror::{Mirror, RobotsRules, RunReport};

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `--json` output on stdout stays machine-readable
fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = cli.to_config();

    let mut mirror = Mirror::new(config.clone()).context("failed to set up the mirror")?;
    if cli.robots_mode == RobotsMode::Rules {
        mirror = mirror.with_robots(RobotsRules::new(&config.user_agent));
    }

    let cancel = mirror.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping workers");
            cancel.cancel();
        }
    });

    let report = mirror
        .run()
        .await
        .with_context(|| format!("mirroring {} failed", config.base_url))?;

    print_report(&report, cli.json)?;

    Ok(if report.cancelled { 130 } else { 0 })
}

// Prints the report either as a table or JSON
fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &RunReport) {
    println!();
    println!("📊 Summary:");
    println!("   💾 Saved: {} ({} bytes)", report.persisted, report.bytes_written);
    println!(
        "   ⏭️  Skipped: {} (visited {}, robots {}, too deep {})",
        report.skipped(),
        report.skipped_visited,
        report.skipped_robots,
        report.skipped_depth
    );
    println!(
        "   ❌ Failed: {} (download {}, save {})",
        report.failed(),
        report.fetch_failed,
        report.persist_failed
    );
    println!("   🔗 Unique URLs seen: {}", report.visited);

    if report.cancelled {
        println!("   ⚠️  Interrupted before the crawl finished");
    }
}
