//! Command-line interface for xpt
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::store::StateStore;

mod reset;
mod reward;
mod session;
mod stats;
mod task;

/// xpt - Gamified Task Tracker
///
/// Earn XP by completing tasks, spend it on rewards, and keep the streak
/// alive. All state lives in flat files in a local data directory.
#[derive(Parser, Debug)]
#[command(name = "xpt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "XPT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task definitions (things that earn XP)
    #[command(subcommand)]
    Task(TaskCommands),

    /// Reward definitions (things that cost XP)
    #[command(subcommand)]
    Reward(RewardCommands),

    /// Complete a task and earn its XP
    Done {
        /// Task id, unique id prefix, or exact name
        task: String,
    },

    /// Purchase a reward with accumulated XP
    Buy {
        /// Reward id, unique id prefix, or exact name
        reward: String,
    },

    /// Show the current XP balance
    Balance,

    /// Show activity for one day
    Day {
        /// Date as YYYY-MM-DD (defaults to today)
        date: Option<String>,
    },

    /// Show the current streak of consecutive earning days
    Streak,

    /// Show totals, per-task breakdown, and recent activity
    Stats,

    /// Show per-day earned/spent totals for a month
    Calendar {
        /// Month as YYYY-MM (defaults to the current month)
        month: Option<String>,
    },

    /// Remove the most recent log entry
    Undo,

    /// Clear stored data (log, tasks, rewards, or all)
    Reset {
        /// Scope: log, tasks, rewards, or all
        scope: String,

        /// Confirm the destructive reset
        #[arg(long)]
        yes: bool,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Define a new task
    Add {
        /// Task name
        name: String,

        /// XP earned per completion
        #[arg(long, allow_negative_numbers = true)]
        xp: i64,
    },

    /// Redefine an existing task
    Edit {
        /// Task id, unique id prefix, or exact name
        task: String,

        /// New task name
        #[arg(long)]
        name: Option<String>,

        /// New XP value
        #[arg(long, allow_negative_numbers = true)]
        xp: Option<i64>,
    },

    /// Delete a task (history keeps its name)
    Rm {
        /// Task id, unique id prefix, or exact name
        task: String,
    },

    /// List defined tasks
    Ls,
}

/// Reward subcommands
#[derive(Subcommand, Debug)]
pub enum RewardCommands {
    /// Define a new reward
    Add {
        /// Reward name
        name: String,

        /// XP cost per purchase
        #[arg(long, allow_negative_numbers = true)]
        cost: i64,
    },

    /// Redefine an existing reward
    Edit {
        /// Reward id, unique id prefix, or exact name
        reward: String,

        /// New reward name
        #[arg(long)]
        name: Option<String>,

        /// New XP cost
        #[arg(long, allow_negative_numbers = true)]
        cost: Option<i64>,
    },

    /// Delete a reward (history keeps its name)
    Rm {
        /// Reward id, unique id prefix, or exact name
        reward: String,
    },

    /// List defined rewards
    Ls,
}

/// Resolve the data directory: flag/env first, then the platform default
pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(dir);
    }
    let dirs = directories::ProjectDirs::from("", "", "xpt").ok_or_else(|| {
        Error::OperationFailed(
            "could not determine a data directory; pass --data-dir".to_string(),
        )
    })?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Open the state store for a command invocation
pub(crate) fn open_store(data_dir: Option<PathBuf>) -> Result<StateStore> {
    let dir = resolve_data_dir(data_dir)?;
    let storage = Storage::new(dir.clone());
    storage.init()?;
    let config = Config::load_from_dir(&dir);
    StateStore::load(storage, config)
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let json = self.json;
        let quiet = self.quiet;
        match self.command {
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add { name, xp } => task::run_add(task::AddOptions {
                    name,
                    xp,
                    data_dir: self.data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Edit { task, name, xp } => task::run_edit(task::EditOptions {
                    task,
                    name,
                    xp,
                    data_dir: self.data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Rm { task } => task::run_rm(task::RmOptions {
                    task,
                    data_dir: self.data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Ls => task::run_ls(task::LsOptions {
                    data_dir: self.data_dir,
                    json,
                    quiet,
                }),
            },
            Commands::Reward(cmd) => match cmd {
                RewardCommands::Add { name, cost } => reward::run_add(reward::AddOptions {
                    name,
                    cost,
                    data_dir: self.data_dir,
                    json,
                    quiet,
                }),
                RewardCommands::Edit { reward, name, cost } => {
                    reward::run_edit(reward::EditOptions {
                        reward,
                        name,
                        cost,
                        data_dir: self.data_dir,
                        json,
                        quiet,
                    })
                }
                RewardCommands::Rm { reward } => reward::run_rm(reward::RmOptions {
                    reward,
                    data_dir: self.data_dir,
                    json,
                    quiet,
                }),
                RewardCommands::Ls => reward::run_ls(reward::LsOptions {
                    data_dir: self.data_dir,
                    json,
                    quiet,
                }),
            },
            Commands::Done { task } => session::run_done(session::DoneOptions {
                task,
                data_dir: self.data_dir,
                json,
                quiet,
            }),
            Commands::Buy { reward } => session::run_buy(session::BuyOptions {
                reward,
                data_dir: self.data_dir,
                json,
                quiet,
            }),
            Commands::Balance => stats::run_balance(stats::BalanceOptions {
                data_dir: self.data_dir,
                json,
                quiet,
            }),
            Commands::Day { date } => stats::run_day(stats::DayOptions {
                date,
                data_dir: self.data_dir,
                json,
                quiet,
            }),
            Commands::Streak => stats::run_streak(stats::StreakOptions {
                data_dir: self.data_dir,
                json,
                quiet,
            }),
            Commands::Stats => stats::run_stats(stats::StatsOptions {
                data_dir: self.data_dir,
                json,
                quiet,
            }),
            Commands::Calendar { month } => stats::run_calendar(stats::CalendarOptions {
                month,
                data_dir: self.data_dir,
                json,
                quiet,
            }),
            Commands::Undo => reset::run_undo(reset::UndoOptions {
                data_dir: self.data_dir,
                json,
                quiet,
            }),
            Commands::Reset { scope, yes } => reset::run_reset(reset::ResetOptions {
                scope,
                yes,
                data_dir: self.data_dir,
                json,
                quiet,
            }),
        }
    }
}
