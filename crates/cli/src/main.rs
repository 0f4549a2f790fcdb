//! ECS space metric CLI
//!
//! Runs the schedulable-containers estimate locally with an explicit
//! profile and region, inspects footprints and per-instance headroom,
//! and can act as a periodic exporter.

mod api;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, run, watch};
use context::Context;
use std::path::PathBuf;

/// ECS space metric CLI
#[derive(Parser)]
#[command(name = "esm")]
#[command(author, version, about = "CLI for the ECS Space Metric", long_about = None)]
pub struct Cli {
    /// Named AWS profile (requires --region)
    #[arg(long, env = "ESM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// AWS region (requires --profile)
    #[arg(long, env = "ESM_REGION", global = true)]
    pub region: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate and publish the metric for a cluster once
    Run {
        /// Cluster name or ARN
        #[arg(long, short)]
        cluster: String,

        /// Log the metric instead of sending it to CloudWatch
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the largest container footprint on a cluster
    Footprint {
        #[arg(long, short)]
        cluster: String,
    },

    /// Show per-instance schedulable capacity
    Headroom {
        #[arg(long, short)]
        cluster: String,
    },

    /// Estimate capacity offline from a JSON cluster snapshot
    Estimate {
        /// Path to the snapshot file
        #[arg(long, short)]
        snapshot: PathBuf,

        /// Cluster in the snapshot (defaults to the one it contains)
        #[arg(long, short)]
        cluster: Option<String>,
    },

    /// Re-run the estimate on an interval and serve /healthz and /metrics
    Watch {
        #[arg(long, short)]
        cluster: String,

        /// Seconds between runs
        #[arg(long, default_value = "60")]
        interval: u64,

        /// Port for the health/metrics server
        #[arg(long, default_value = "9102")]
        port: u16,

        /// Where each data point goes
        #[arg(long, default_value = "cloud-watch")]
        sink: watch::Sink,

        /// Log each data point instead of publishing it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let tracing = cli.verbose || matches!(cli.command, Commands::Watch { .. });
    let ctx = Context::new(cli.profile, cli.region, cli.format, tracing)?;

    match cli.command {
        Commands::Run { cluster, dry_run } => {
            run::run_once(&ctx, &cluster, dry_run).await?;
        }
        Commands::Footprint { cluster } => {
            inspect::show_footprint(&ctx, &cluster).await?;
        }
        Commands::Headroom { cluster } => {
            inspect::show_headroom(&ctx, &cluster).await?;
        }
        Commands::Estimate { snapshot, cluster } => {
            inspect::estimate_snapshot(&ctx, &snapshot, cluster).await?;
        }
        Commands::Watch {
            cluster,
            interval,
            port,
            sink,
            dry_run,
        } => {
            let options = watch::WatchOptions {
                interval_secs: interval,
                port,
                sink,
                dry_run,
            };
            watch::watch(&ctx, &cluster, options).await?;
        }
    }

    Ok(())
}
