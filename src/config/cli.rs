use crate::config::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "santa-cycle")]
#[command(about = "Draw a single gift-giving cycle for a group, honoring restrictions and past years")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Solve the group and record the assignments
    Solve(SolveArgs),
    /// Show recorded assignments
    History(HistoryArgs),
    /// Show who each participant may currently give to
    Candidates(SourceArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Roster file (.toml or .csv)
    #[arg(short, long)]
    pub roster: Option<PathBuf>,

    /// Assignment history file (.json)
    #[arg(long)]
    pub history: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct SolveArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Year to record, defaults to the current year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Seed for a reproducible draw
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Solve without writing history
    #[arg(long)]
    pub dry_run: bool,

    /// Also write giver/receiver pairs to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only show this year
    #[arg(short, long)]
    pub year: Option<i32>,
}
