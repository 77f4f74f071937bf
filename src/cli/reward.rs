//! xpt reward subcommands
//!
//! Create, redefine, delete, and list reward definitions.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::Reward;
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for `reward add`
pub struct AddOptions {
    pub name: String,
    pub cost: i64,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `reward edit`
pub struct EditOptions {
    pub reward: String,
    pub name: Option<String>,
    pub cost: Option<i64>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `reward rm`
pub struct RmOptions {
    pub reward: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `reward ls`
pub struct LsOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct RewardReport {
    id: String,
    name: String,
    cost: i64,
}

impl From<&Reward> for RewardReport {
    fn from(reward: &Reward) -> Self {
        Self {
            id: reward.id.clone(),
            name: reward.name.clone(),
            cost: reward.cost,
        }
    }
}

#[derive(serde::Serialize)]
struct ListReport {
    rewards: Vec<RewardReport>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut store = super::open_store(options.data_dir)?;
    let reward = store.add_reward(&options.name, options.cost)?;
    let report = RewardReport::from(&reward);

    let mut human = HumanOutput::new(format!("xpt reward add: {}", report.name));
    human.push_summary("id", report.id.clone());
    human.push_summary("cost", report.cost.to_string());
    human.push_next_step(format!("xpt buy {}", report.id));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "reward add",
        &report,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut store = super::open_store(options.data_dir)?;
    let id = store.resolve_reward(&options.reward)?;
    let reward = store.update_reward(&id, options.name.as_deref(), options.cost)?;
    let report = RewardReport::from(&reward);

    let mut human = HumanOutput::new(format!("xpt reward edit: {}", report.id));
    human.push_summary("name", report.name.clone());
    human.push_summary("cost", report.cost.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "reward edit",
        &report,
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut store = super::open_store(options.data_dir)?;
    let id = store.resolve_reward(&options.reward)?;
    let removed = store.remove_reward(&id)?;
    let report = RewardReport::from(&removed);

    let mut human = HumanOutput::new(format!("xpt reward rm: {}", removed.name));
    human.push_summary("id", removed.id.clone());
    human.push_detail("logged purchases keep the reward name in the history".to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "reward rm",
        &report,
        Some(&human),
    )
}

pub fn run_ls(options: LsOptions) -> Result<()> {
    let store = super::open_store(options.data_dir)?;
    let report = ListReport {
        rewards: store.rewards().iter().map(RewardReport::from).collect(),
    };

    let mut human = HumanOutput::new(format!(
        "xpt reward ls: {} reward(s)",
        report.rewards.len()
    ));
    for reward in &report.rewards {
        human.push_detail(format!(
            "{}  {}  {} XP",
            reward.id, reward.name, reward.cost
        ));
    }
    if report.rewards.is_empty() {
        human.push_next_step("xpt reward add <name> --cost <n>");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "reward ls",
        &report,
        Some(&human),
    )
}
