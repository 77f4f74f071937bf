use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{DateTime, Local};
use serde_json::Value;
use tempfile::TempDir;
use xpt::model::Transaction;

/// Isolated data directory for one test, driving the binary through
/// the XPT_DATA_DIR environment variable.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = xpt_cmd();
        cmd.env("XPT_DATA_DIR", self.dir.path());
        cmd
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn rewards_file(&self) -> PathBuf {
        self.dir.path().join("rewards.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.dir.path().join("xp_log.jsonl")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.dir.path().join("xpt.toml"), contents).expect("write xpt.toml");
    }

    /// Seed the transaction log directly, bypassing the CLI
    pub fn seed_log(&self, transactions: &[Transaction]) {
        let mut content = String::new();
        for tx in transactions {
            content.push_str(&serde_json::to_string(tx).expect("serialize transaction"));
            content.push('\n');
        }
        fs::write(self.log_file(), content).expect("write xp_log.jsonl");
    }

    /// Run `task add` and return the new task id
    pub fn add_task(&self, name: &str, xp: i64) -> String {
        let output = self
            .cmd()
            .args(["task", "add", name, "--xp", &xp.to_string(), "--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("task add json");
        value["data"]["id"].as_str().expect("task id").to_string()
    }

    /// Run `reward add` and return the new reward id
    pub fn add_reward(&self, name: &str, cost: i64) -> String {
        let output = self
            .cmd()
            .args(["reward", "add", name, "--cost", &cost.to_string(), "--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("reward add json");
        value["data"]["id"].as_str().expect("reward id").to_string()
    }

    /// Run a command with `--json` and parse the envelope
    pub fn json(&self, args: &[&str]) -> Value {
        let mut full_args: Vec<&str> = args.to_vec();
        full_args.push("--json");
        let output = self
            .cmd()
            .args(&full_args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    /// Current balance as reported by the CLI
    pub fn balance(&self) -> i64 {
        self.json(&["balance"])["data"]["balance"]
            .as_i64()
            .expect("balance")
    }
}

pub fn xpt_cmd() -> Command {
    Command::cargo_bin("xpt").expect("xpt binary")
}

/// A local timestamp `days` days before today, at the given hour
pub fn days_ago(days: i64, hour: u32) -> DateTime<Local> {
    let date = Local::now().date_naive() - chrono::Duration::days(days);
    date.and_hms_opt(hour, 0, 0)
        .expect("valid time")
        .and_local_timezone(Local)
        .earliest()
        .expect("local timestamp")
}
