use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tally", version, about = "Reconcile tally and dispatcher weights")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the acceptable difference threshold, in kilograms.
    #[arg(long, global = true)]
    pub threshold: Option<f64>,
    /// Override timezone (IANA name).
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override log level (e.g. debug, info, warn).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the log entries of a snapshot.
    Log {
        snapshot: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Tally vs. dispatcher totals per classification, with status.
    Summary {
        snapshot: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Bags logged against the required allocation.
    Progress {
        snapshot: PathBuf,
        /// Restrict to one session.
        #[arg(long)]
        session: Option<i64>,
    },
    /// Export bags per customer as CSV.
    Export {
        snapshot: PathBuf,
        /// First session date, inclusive (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last session date, inclusive (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        customer: Option<i64>,
        #[arg(long)]
        plant: Option<i64>,
        /// Explicit sessions; when given, the other filters are ignored.
        #[arg(long = "session")]
        sessions: Vec<i64>,
        /// Output file, stdout when missing.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Move entries to another ongoing session and write the updated snapshot.
    Transfer {
        snapshot: PathBuf,
        /// Entry to move; repeat for more.
        #[arg(long = "entry", required = true)]
        entries: Vec<i64>,
        /// Target session id.
        #[arg(long)]
        to: i64,
        /// Output file, stdout when missing.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check the weight classification catalog for overlaps and duplicates.
    Check { snapshot: PathBuf },
}

#[derive(Debug, Default, Args)]
pub struct ViewArgs {
    /// Restrict to one session.
    #[arg(long)]
    pub session: Option<i64>,
    /// `tally` or `dispatcher`.
    #[arg(long)]
    pub role: Option<String>,
    /// Weight classification id.
    #[arg(long)]
    pub class: Option<i64>,
    /// `Dressed`, `Byproduct`, `Frozen` or their codes.
    #[arg(long)]
    pub category: Option<String>,
    /// `time`, `class`, `weight` or `id`.
    #[arg(long)]
    pub sort: Option<String>,
    /// `asc` or `desc`.
    #[arg(long)]
    pub order: Option<String>,
}
