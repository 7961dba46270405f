//! Beatplan command-line tool.

mod config;
mod error;
mod output;
mod rule;
mod session;

use std::path::PathBuf;

use beatplan_core::{
    expand, materialize, replay_if_online, BeatDraft, BeatRef, Clock, Connectivity, FixedClock,
    Operation, ReplayReport, SubmitReport, SystemClock, WriteQueue,
};
use beatplan_fjall::FjallQueue;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::{load_config, resolve_backend, resolve_queue_path};
use crate::output::{render, OutputFormat};
use crate::rule::RuleArgs;
use crate::session::{open_writer, AnyBackend};

#[derive(Parser)]
#[command(name = "bp")]
#[command(about = "Beat planning: recurring visit plans for field sales", long_about = None)]
struct Cli {
    /// Path to the offline write queue
    #[arg(long, global = true)]
    queue: Option<PathBuf>,

    /// Queue writes instead of sending them to the backend
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the plans a rule would produce, without saving anything
    Preview {
        #[command(flatten)]
        rule: RuleArgs,

        /// First day of the plan (default: today)
        #[arg(long)]
        anchor: Option<NaiveDate>,

        /// Beat name shown on each plan
        #[arg(long, default_value = "preview")]
        name: String,

        /// Retailer id; repeat for several
        #[arg(long = "retailer", required = true)]
        retailers: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Create a beat and persist its plans
    Create {
        /// Beat name
        #[arg(long)]
        name: String,

        /// Owner (sales rep) id
        #[arg(long)]
        owner: String,

        /// Retailer id; repeat for several
        #[arg(long = "retailer")]
        retailers: Vec<String>,

        #[command(flatten)]
        rule: RuleArgs,

        /// First day of the plan (default: today)
        #[arg(long)]
        anchor: Option<NaiveDate>,
    },

    /// Mark a beat active
    Activate { beat_id: Uuid },

    /// Mark a beat inactive
    Deactivate { beat_id: Uuid },

    /// Replay queued writes to the backend
    Sync,

    /// List queued writes
    Queue,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("warn,beatplan_core=info,beatplan_fjall=info,beatplan_remote=info,bp=info")
        }))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config()?;
    let queue_path = resolve_queue_path(cli.queue, &config);
    let force_offline = forces_offline(&cli.command, cli.offline, &config);

    match cli.command {
        Command::Preview {
            rule,
            anchor,
            name,
            retailers,
            format,
        } => {
            let rule = rule.to_rule()?;
            let anchor = anchor.unwrap_or_else(|| SystemClock.today());
            let beat = BeatRef {
                id: Uuid::nil(),
                name,
            };

            let plans = expand(&rule, anchor, &beat, &retailers)?;
            print!("{}", render(&plans, format)?);
        }
        Command::Create {
            name,
            owner,
            retailers,
            rule,
            anchor,
        } => {
            let draft = BeatDraft {
                name,
                owner_id: owner,
                retailer_ids: retailers,
                rule: rule.to_rule()?,
            };
            let clock = FixedClock(anchor.unwrap_or_else(|| SystemClock.today()));
            let new_beat = materialize(&draft, &clock)?;

            let backend = AnyBackend::from_settings(resolve_backend(&config, env_var));
            let writer = open_writer(backend, &queue_path, force_offline).await?;
            let report = writer.submit(&new_beat.operations()).await?;

            println!("beat {} ({} plans)", new_beat.beat.id, new_beat.plans.len());
            print_report(report);
        }
        Command::Activate { beat_id } => {
            set_active(&config, &queue_path, force_offline, beat_id, true).await?;
        }
        Command::Deactivate { beat_id } => {
            set_active(&config, &queue_path, force_offline, beat_id, false).await?;
        }
        Command::Sync => {
            let backend = AnyBackend::from_settings(resolve_backend(&config, env_var));
            if !backend.is_configured() {
                return Err(error::BpError::BackendNotConfigured.into());
            }
            let writer = open_writer(backend, &queue_path, force_offline).await?;
            let report =
                replay_if_online(writer.connectivity(), writer.queue(), writer.backend()).await?;

            println!("{}", sync_summary(writer.connectivity().is_online(), &report));
        }
        Command::Queue => {
            let queue = FjallQueue::open(&queue_path)?;
            print!("{}", render(&queue.pending()?, OutputFormat::Json)?);
        }
    }

    Ok(())
}

async fn set_active(
    config: &config::Config,
    queue_path: &std::path::Path,
    force_offline: bool,
    beat_id: Uuid,
    active: bool,
) -> anyhow::Result<()> {
    let backend = AnyBackend::from_settings(resolve_backend(config, env_var));
    let writer = open_writer(backend, queue_path, force_offline).await?;
    let report = writer
        .submit(&[Operation::SetBeatActive { beat_id, active }])
        .await?;
    print_report(report);
    Ok(())
}

/// Config-level `offline` does not apply to `sync`; only `--offline` defers it.
fn forces_offline(command: &Command, cli_offline: bool, config: &config::Config) -> bool {
    cli_offline || (config.offline && !matches!(command, Command::Sync))
}

fn sync_summary(online: bool, report: &ReplayReport) -> String {
    if online {
        format!("replayed {} writes", report.applied)
    } else {
        format!("offline: {} writes still queued", report.remaining)
    }
}

fn print_report(report: SubmitReport) {
    match report {
        SubmitReport::Written { count } => println!("saved {count} writes"),
        SubmitReport::Queued { count } => println!("offline: queued {count} writes for sync"),
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> config::Config {
        config::Config {
            offline: true,
            ..Default::default()
        }
    }

    #[test]
    fn preview_requires_a_retailer() {
        let parsed = Cli::try_parse_from(["bp", "preview", "--frequency", "daily"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "bp",
            "preview",
            "--frequency",
            "daily",
            "--retailer",
            "r-1",
        ]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn sync_ignores_config_offline() {
        let config = offline_config();
        assert!(!forces_offline(&Command::Sync, false, &config));
        assert!(forces_offline(&Command::Sync, true, &config));
        assert!(forces_offline(&Command::Queue, false, &config));
        assert!(!forces_offline(&Command::Queue, false, &config::Config::default()));
    }

    #[test]
    fn sync_summary_reports_offline_with_empty_queue() {
        let empty = ReplayReport {
            applied: 0,
            remaining: 0,
        };
        assert_eq!(sync_summary(false, &empty), "offline: 0 writes still queued");
        assert_eq!(sync_summary(true, &empty), "replayed 0 writes");

        let partial = ReplayReport {
            applied: 2,
            remaining: 1,
        };
        assert_eq!(sync_summary(true, &partial), "replayed 2 writes");
    }
}
