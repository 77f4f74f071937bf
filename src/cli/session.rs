//! xpt done / buy command implementations
//!
//! `done` completes a task and earns its XP; `buy` purchases a reward and
//! spends it. Both append to the transaction log.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for the done command
pub struct DoneOptions {
    pub task: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the buy command
pub struct BuyOptions {
    pub reward: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct EarnReport {
    task_id: String,
    reference_name: String,
    amount: i64,
    timestamp: DateTime<Local>,
    balance: i64,
    streak: u32,
}

#[derive(serde::Serialize)]
struct SpendReport {
    reward_id: String,
    reference_name: String,
    cost: i64,
    timestamp: DateTime<Local>,
    balance: i64,
}

pub fn run_done(options: DoneOptions) -> Result<()> {
    let mut store = super::open_store(options.data_dir)?;
    let id = store.resolve_task(&options.task)?;
    let tx = store.complete_task(&id)?;

    let report = EarnReport {
        task_id: id,
        reference_name: tx.reference_name.clone(),
        amount: tx.amount,
        timestamp: tx.timestamp,
        balance: store.balance(),
        streak: store.streak(),
    };

    let mut human = HumanOutput::new(format!(
        "xpt done: +{} XP for {}",
        report.amount, report.reference_name
    ));
    human.push_summary("balance", report.balance.to_string());
    human.push_summary("streak", format!("{} day(s)", report.streak));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "done",
        &report,
        Some(&human),
    )
}

pub fn run_buy(options: BuyOptions) -> Result<()> {
    let mut store = super::open_store(options.data_dir)?;
    let id = store.resolve_reward(&options.reward)?;
    let tx = store.purchase_reward(&id)?;

    let report = SpendReport {
        reward_id: id,
        reference_name: tx.reference_name.clone(),
        cost: -tx.amount,
        timestamp: tx.timestamp,
        balance: store.balance(),
    };

    let mut human = HumanOutput::new(format!(
        "xpt buy: -{} XP for {}",
        report.cost, report.reference_name
    ));
    human.push_summary("balance", report.balance.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "buy",
        &report,
        Some(&human),
    )
}
