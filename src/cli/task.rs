//! xpt task subcommands
//!
//! Create, redefine, delete, and list task definitions.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::Task;
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for `task add`
pub struct AddOptions {
    pub name: String,
    pub xp: i64,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `task edit`
pub struct EditOptions {
    pub task: String,
    pub name: Option<String>,
    pub xp: Option<i64>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `task rm`
pub struct RmOptions {
    pub task: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for `task ls`
pub struct LsOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct TaskReport {
    id: String,
    name: String,
    xp_value: i64,
}

impl From<&Task> for TaskReport {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            xp_value: task.xp_value,
        }
    }
}

#[derive(serde::Serialize)]
struct ListReport {
    tasks: Vec<TaskReport>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut store = super::open_store(options.data_dir)?;
    let task = store.add_task(&options.name, options.xp)?;
    let report = TaskReport::from(&task);

    let mut human = HumanOutput::new(format!("xpt task add: {}", report.name));
    human.push_summary("id", report.id.clone());
    human.push_summary("xp", report.xp_value.to_string());
    human.push_next_step(format!("xpt done {}", report.id));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task add",
        &report,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut store = super::open_store(options.data_dir)?;
    let id = store.resolve_task(&options.task)?;
    let task = store.update_task(&id, options.name.as_deref(), options.xp)?;
    let report = TaskReport::from(&task);

    let mut human = HumanOutput::new(format!("xpt task edit: {}", report.id));
    human.push_summary("name", report.name.clone());
    human.push_summary("xp", report.xp_value.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task edit",
        &report,
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut store = super::open_store(options.data_dir)?;
    let id = store.resolve_task(&options.task)?;
    let removed = store.remove_task(&id)?;
    let report = TaskReport::from(&removed);

    let mut human = HumanOutput::new(format!("xpt task rm: {}", removed.name));
    human.push_summary("id", removed.id.clone());
    human.push_detail("logged completions keep the task name in the history".to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task rm",
        &report,
        Some(&human),
    )
}

pub fn run_ls(options: LsOptions) -> Result<()> {
    let store = super::open_store(options.data_dir)?;
    let report = ListReport {
        tasks: store.tasks().iter().map(TaskReport::from).collect(),
    };

    let mut human = HumanOutput::new(format!("xpt task ls: {} task(s)", report.tasks.len()));
    for task in &report.tasks {
        human.push_detail(format!("{}  {}  {} XP", task.id, task.name, task.xp_value));
    }
    if report.tasks.is_empty() {
        human.push_next_step("xpt task add <name> --xp <n>");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task ls",
        &report,
        Some(&human),
    )
}
