//! xpt undo / reset command implementations
//!
//! `undo` drops the most recent log entry; `reset` clears whole collections.
//! Both rewrite the affected files atomically.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::Transaction;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::ResetScope;

/// Options for the undo command
pub struct UndoOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the reset command
pub struct ResetOptions {
    pub scope: String,
    pub yes: bool,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct UndoReport {
    undone: Transaction,
    balance: i64,
}

#[derive(serde::Serialize)]
struct ResetReport {
    scope: ResetScope,
    tasks: usize,
    rewards: usize,
    log_entries: usize,
}

pub fn run_undo(options: UndoOptions) -> Result<()> {
    let mut store = super::open_store(options.data_dir)?;
    let undone = store.undo_last()?;

    let report = UndoReport {
        balance: store.balance(),
        undone,
    };

    let mut human = HumanOutput::new(format!(
        "xpt undo: removed {} {} ({:+} XP)",
        report.undone.kind, report.undone.reference_name, report.undone.amount
    ));
    human.push_summary("balance", report.balance.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "undo",
        &report,
        Some(&human),
    )
}

pub fn run_reset(options: ResetOptions) -> Result<()> {
    let scope: ResetScope = options.scope.parse()?;
    if !options.yes {
        return Err(Error::InvalidArgument(
            "reset is destructive; pass --yes to confirm".to_string(),
        ));
    }

    let mut store = super::open_store(options.data_dir)?;
    store.reset(scope)?;

    let report = ResetReport {
        scope,
        tasks: store.tasks().len(),
        rewards: store.rewards().len(),
        log_entries: store.log().len(),
    };

    let mut human = HumanOutput::new(format!("xpt reset: cleared {}", options.scope.trim()));
    human.push_summary("tasks", report.tasks.to_string());
    human.push_summary("rewards", report.rewards.to_string());
    human.push_summary("log entries", report.log_entries.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "reset",
        &report,
        Some(&human),
    )
}
