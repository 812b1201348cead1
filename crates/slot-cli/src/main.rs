//! `slotfinder`: compute free time and common meeting slots from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # One participant's free time within a range (busy periods from stdin)
//! echo '[{"start":"2025-08-01T09:00:00Z","end":"2025-08-01T10:00:00Z"}]' \
//!   | slotfinder free --start 2025-08-01 --end 2025-08-02
//!
//! # Common windows for a {participant: [free periods]} map, at least 30 min
//! slotfinder common -i participants.json --min-duration 30
//!
//! # Full invite planning against a JSON store, saving the participant's
//! # calendar-derived free time
//! slotfinder --tz Asia/Tokyo plan -i request.json --busy busy.json \
//!   --store store.json --persist
//! ```

mod config;
mod files;

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::freebusy::free_intervals;
use slot_engine::parse::{
    parse_busy_json, parse_free_periods, parse_range, RawPeriod, SkippedEntry,
};
use slot_engine::planner::{candidate_slots, plan_invite, RawInviteRequest};
use slot_engine::ports::{MemoryStore, StaticCalendar};
use slot_engine::TimeInterval;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::CliConfig;
use crate::files::{load_calendar, JsonFileStore};

#[derive(Parser)]
#[command(
    name = "slotfinder",
    version,
    about = "Find meeting slots where every participant is free"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference timezone for bare dates and date labels (IANA name)
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one participant's free intervals within a range
    Free {
        /// JSON array of busy {start, end} periods (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Range start (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Range end (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        end: String,
    },
    /// Intersect a {participant: [free periods]} map into numbered slots
    Common {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Minimum slot length in minutes
        #[arg(long)]
        min_duration: Option<i64>,
    },
    /// Plan an invite from a request file, a calendar and a submission store
    Plan {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// The requesting participant's busy periods (JSON array)
        #[arg(long)]
        busy: Option<PathBuf>,
        /// JSON submission store (in-memory if omitted)
        #[arg(long)]
        store: Option<PathBuf>,
        /// Save the participant's calendar-derived free time to the store
        #[arg(long, requires = "store")]
        persist: bool,
    },
}

#[derive(Serialize)]
struct FreeOutput {
    free: Vec<TimeInterval>,
    skipped: Vec<SkippedEntry>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = CliConfig::load(cli.config.as_deref())?;
    let tz = config.timezone(cli.tz.as_deref())?;

    let json = match cli.command {
        Commands::Free { input, start, end } => {
            let raw = read_input(input.as_deref())?;
            let report = parse_busy_json("input", &raw, tz).context("Invalid busy periods")?;
            let range = parse_range(&start, &end, tz).context("Invalid range")?;

            let output = FreeOutput {
                free: free_intervals(&range, &report.time_intervals()),
                skipped: report.skipped,
            };
            serde_json::to_string_pretty(&output)?
        }
        Commands::Common {
            input,
            min_duration,
        } => {
            let raw = read_input(input.as_deref())?;
            let map: BTreeMap<String, Vec<RawPeriod>> =
                serde_json::from_str(&raw).context("Invalid participants JSON")?;

            let free_by_participant: BTreeMap<String, Vec<TimeInterval>> = map
                .iter()
                .map(|(participant, periods)| {
                    let report = parse_free_periods(participant, periods, tz);
                    (participant.clone(), report.time_intervals())
                })
                .collect();

            let min = config.min_duration(min_duration);
            let slots = candidate_slots(&free_by_participant, min, tz);
            serde_json::to_string_pretty(&slots)?
        }
        Commands::Plan {
            input,
            busy,
            store,
            persist,
        } => {
            let raw = read_input(input.as_deref())?;
            let file: RawInviteRequest =
                serde_json::from_str(&raw).context("Invalid request JSON")?;
            let mut request = file
                .resolve(tz, config.min_duration(None))
                .context("Invalid event period")?;
            request.persist = persist;

            let calendar = match busy.as_deref() {
                Some(path) => load_calendar(path, &request.participant_id)?,
                None => StaticCalendar::new(),
            };

            let outcome = match store.as_deref() {
                Some(path) => {
                    let store = JsonFileStore::open(path)?;
                    plan_invite(&request, tz, &calendar, &store)
                }
                None => plan_invite(&request, tz, &calendar, &MemoryStore::new()),
            }
            .context("Failed to plan invite")?;

            if outcome.skipped_busy > 0 || outcome.skipped_stored > 0 {
                tracing::warn!(
                    skipped_busy = outcome.skipped_busy,
                    skipped_stored = outcome.skipped_stored,
                    "some entries could not be decoded and were ignored"
                );
            }
            serde_json::to_string_pretty(&outcome.response)?
        }
    };

    write_output(cli.output.as_deref(), &json)
}

/// Install a compact stderr logger. `RUST_LOG` overrides the default filter.
fn init_logger(verbose: bool) {
    let default = if verbose {
        "slot_engine=debug,slotfinder=debug"
    } else {
        "slot_engine=warn,slotfinder=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(Path::new(path), content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
