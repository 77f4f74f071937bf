//! The State Store: loads, mutates, and persists the three collections
//! (tasks, rewards, transaction log) and computes derived views.
//!
//! The store is an explicit value passed to each operation; persistence is
//! an explicit side effect after each mutation. No operation mutates state
//! on a failed precondition (a rejected purchase leaves the balance and the
//! log untouched).

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    generate_id, validate_name, validate_points, Reward, RewardList, Task, TaskList, Transaction,
    TransactionKind,
};
use crate::storage::Storage;

/// In-memory snapshot of all persisted state
#[derive(Debug)]
pub struct StateStore {
    storage: Storage,
    config: Config,
    tasks: TaskList,
    rewards: RewardList,
    log: Vec<Transaction>,
}

/// Which collections a reset clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetScope {
    Log,
    Tasks,
    Rewards,
    All,
}

impl FromStr for ResetScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "log" => Ok(ResetScope::Log),
            "tasks" => Ok(ResetScope::Tasks),
            "rewards" => Ok(ResetScope::Rewards),
            "all" => Ok(ResetScope::All),
            other => Err(Error::InvalidArgument(format!(
                "invalid reset scope '{other}' (expected log|tasks|rewards|all)"
            ))),
        }
    }
}

/// Earned/spent totals for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub earned: i64,
    pub spent: i64,
}

/// Per-day activity for one calendar month
#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DaySummary>,
    pub earned: i64,
    pub spent: i64,
}

impl StateStore {
    /// Load a snapshot of all collections from storage.
    ///
    /// Fails soft: absent or unparsable collection files load as empty
    /// collections (with a warning); only real IO failures propagate.
    pub fn load(storage: Storage, config: Config) -> Result<Self> {
        let tasks = storage.load_tasks();
        let rewards = storage.load_rewards();
        let log = storage.load_log()?;
        Ok(Self {
            storage,
            config,
            tasks,
            rewards,
            log,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks.tasks
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.rewards.rewards
    }

    pub fn log(&self) -> &[Transaction] {
        &self.log
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Task/reward definition
    // =========================================================================

    /// Define a new task; returns the stored record
    pub fn add_task(&mut self, name: &str, xp_value: i64) -> Result<Task> {
        let name = validate_name(name)?;
        let xp_value = validate_points("xp_value", xp_value)?;

        let id = generate_id(
            &self.config.ids.task_prefix,
            self.config.ids.min_len,
            &self.tasks.ids(),
        );
        let task = Task { id, name, xp_value };
        self.tasks.tasks.push(task.clone());
        self.tasks.validate()?;
        self.storage.save_tasks(&self.tasks)?;

        Ok(task)
    }

    /// Redefine an existing task (name and/or xp_value)
    pub fn update_task(
        &mut self,
        task_id: &str,
        name: Option<&str>,
        xp_value: Option<i64>,
    ) -> Result<Task> {
        let name = name.map(validate_name).transpose()?;
        let xp_value = xp_value
            .map(|v| validate_points("xp_value", v))
            .transpose()?;

        let task = self
            .tasks
            .find_mut(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        if let Some(name) = name {
            task.name = name;
        }
        if let Some(xp_value) = xp_value {
            task.xp_value = xp_value;
        }
        let updated = task.clone();
        self.storage.save_tasks(&self.tasks)?;

        Ok(updated)
    }

    /// Remove a task. Historical transactions are untouched: they carry the
    /// task name as free text, decoupled from the deleted id.
    pub fn remove_task(&mut self, task_id: &str) -> Result<Task> {
        let removed = self
            .tasks
            .remove(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        self.storage.save_tasks(&self.tasks)?;
        Ok(removed)
    }

    /// Define a new reward; returns the stored record
    pub fn add_reward(&mut self, name: &str, cost: i64) -> Result<Reward> {
        let name = validate_name(name)?;
        let cost = validate_points("cost", cost)?;

        let id = generate_id(
            &self.config.ids.reward_prefix,
            self.config.ids.min_len,
            &self.rewards.ids(),
        );
        let reward = Reward { id, name, cost };
        self.rewards.rewards.push(reward.clone());
        self.rewards.validate()?;
        self.storage.save_rewards(&self.rewards)?;

        Ok(reward)
    }

    /// Redefine an existing reward (name and/or cost)
    pub fn update_reward(
        &mut self,
        reward_id: &str,
        name: Option<&str>,
        cost: Option<i64>,
    ) -> Result<Reward> {
        let name = name.map(validate_name).transpose()?;
        let cost = cost.map(|v| validate_points("cost", v)).transpose()?;

        let reward = self
            .rewards
            .find_mut(reward_id)
            .ok_or_else(|| Error::RewardNotFound(reward_id.to_string()))?;
        if let Some(name) = name {
            reward.name = name;
        }
        if let Some(cost) = cost {
            reward.cost = cost;
        }
        let updated = reward.clone();
        self.storage.save_rewards(&self.rewards)?;

        Ok(updated)
    }

    /// Remove a reward, leaving historical transactions untouched
    pub fn remove_reward(&mut self, reward_id: &str) -> Result<Reward> {
        let removed = self
            .rewards
            .remove(reward_id)
            .ok_or_else(|| Error::RewardNotFound(reward_id.to_string()))?;
        self.storage.save_rewards(&self.rewards)?;
        Ok(removed)
    }

    // =========================================================================
    // Earning and spending
    // =========================================================================

    /// Complete a task: append an EARN transaction worth its xp_value
    pub fn complete_task(&mut self, task_id: &str) -> Result<Transaction> {
        self.complete_task_at(task_id, Local::now())
    }

    /// Complete a task with an explicit timestamp
    pub fn complete_task_at(&mut self, task_id: &str, at: DateTime<Local>) -> Result<Transaction> {
        let task = self
            .tasks
            .find(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

        let tx = Transaction::earn(task.name.clone(), task.xp_value, at);
        self.storage.append_transaction(&tx)?;
        self.log.push(tx.clone());
        Ok(tx)
    }

    /// Purchase a reward: append a SPEND transaction for its cost.
    ///
    /// Rejected with InsufficientFunds when the cost exceeds the current
    /// balance; nothing is recorded on rejection.
    pub fn purchase_reward(&mut self, reward_id: &str) -> Result<Transaction> {
        self.purchase_reward_at(reward_id, Local::now())
    }

    /// Purchase a reward with an explicit timestamp
    pub fn purchase_reward_at(
        &mut self,
        reward_id: &str,
        at: DateTime<Local>,
    ) -> Result<Transaction> {
        let reward = self
            .rewards
            .find(reward_id)
            .ok_or_else(|| Error::RewardNotFound(reward_id.to_string()))?;

        let balance = self.balance();
        if reward.cost > balance {
            return Err(Error::InsufficientFunds {
                cost: reward.cost,
                balance,
            });
        }

        let tx = Transaction::spend(reward.name.clone(), reward.cost, at);
        self.storage.append_transaction(&tx)?;
        self.log.push(tx.clone());
        Ok(tx)
    }

    /// Remove the most recent transaction and rewrite the log
    pub fn undo_last(&mut self) -> Result<Transaction> {
        let last = self
            .log
            .pop()
            .ok_or_else(|| Error::InvalidArgument("no transactions to undo".to_string()))?;
        self.storage.save_log(&self.log)?;
        Ok(last)
    }

    /// Clear the given collections and persist the empty state
    pub fn reset(&mut self, scope: ResetScope) -> Result<()> {
        if matches!(scope, ResetScope::Log | ResetScope::All) {
            self.log.clear();
            self.storage.save_log(&self.log)?;
        }
        if matches!(scope, ResetScope::Tasks | ResetScope::All) {
            self.tasks.tasks.clear();
            self.storage.save_tasks(&self.tasks)?;
        }
        if matches!(scope, ResetScope::Rewards | ResetScope::All) {
            self.rewards.rewards.clear();
            self.storage.save_rewards(&self.rewards)?;
        }
        Ok(())
    }

    // =========================================================================
    // Derived views (read-only)
    // =========================================================================

    /// Current balance: the running sum of the transaction log.
    ///
    /// Always recomputed; never stored, so it cannot drift from the log.
    pub fn balance(&self) -> i64 {
        self.log.iter().map(|tx| tx.amount).sum()
    }

    /// Transactions on the given local calendar day, chronological order
    pub fn activity_for_day(&self, date: NaiveDate) -> Vec<&Transaction> {
        self.log.iter().filter(|tx| tx.day() == date).collect()
    }

    /// Consecutive calendar days with at least one EARN transaction,
    /// walking backward from today; stops at the first gap
    pub fn streak(&self) -> u32 {
        self.streak_as_of(Local::now().date_naive())
    }

    /// Streak relative to an explicit "today"
    pub fn streak_as_of(&self, today: NaiveDate) -> u32 {
        let earn_days: HashSet<NaiveDate> = self
            .log
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Earn)
            .map(Transaction::day)
            .collect();

        let mut streak = 0;
        let mut day = today;
        while earn_days.contains(&day) {
            streak += 1;
            day -= Duration::days(1);
        }
        streak
    }

    /// Total EARN amount per reference name, largest first
    pub fn earned_by_task(&self) -> Vec<(String, i64)> {
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for tx in &self.log {
            if tx.kind == TransactionKind::Earn {
                *totals.entry(tx.reference_name.clone()).or_insert(0) += tx.amount;
            }
        }
        let mut entries: Vec<(String, i64)> = totals.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// The last `limit` transactions, newest first
    pub fn recent_activity(&self, limit: usize) -> Vec<&Transaction> {
        self.log.iter().rev().take(limit).collect()
    }

    /// Per-day earned/spent totals for one calendar month
    pub fn month_summary(&self, year: i32, month: u32) -> Result<MonthSummary> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidArgument(format!(
                "invalid month: {month} (expected 1-12)"
            )));
        }

        let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();
        for tx in &self.log {
            let day = tx.day();
            if day.year() != year || day.month() != month {
                continue;
            }
            let entry = days.entry(day).or_insert(DaySummary {
                date: day,
                earned: 0,
                spent: 0,
            });
            match tx.kind {
                TransactionKind::Earn => entry.earned += tx.amount,
                TransactionKind::Spend => entry.spent += -tx.amount,
            }
        }

        let days: Vec<DaySummary> = days.into_values().collect();
        let earned = days.iter().map(|d| d.earned).sum();
        let spent = days.iter().map(|d| d.spent).sum();

        Ok(MonthSummary {
            year,
            month,
            days,
            earned,
            spent,
        })
    }

    // =========================================================================
    // Selector resolution (id, unique id prefix, or exact name)
    // =========================================================================

    /// Resolve a task selector to a task id
    pub fn resolve_task(&self, selector: &str) -> Result<String> {
        let entries = self
            .tasks
            .tasks
            .iter()
            .map(|t| (t.id.as_str(), t.name.as_str()));
        match resolve(selector, entries, "task") {
            Some(result) => result,
            None => Err(Error::TaskNotFound(selector.to_string())),
        }
    }

    /// Resolve a reward selector to a reward id
    pub fn resolve_reward(&self, selector: &str) -> Result<String> {
        let entries = self
            .rewards
            .rewards
            .iter()
            .map(|r| (r.id.as_str(), r.name.as_str()));
        match resolve(selector, entries, "reward") {
            Some(result) => result,
            None => Err(Error::RewardNotFound(selector.to_string())),
        }
    }
}

fn resolve<'a>(
    selector: &str,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
    noun: &str,
) -> Option<Result<String>> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Some(Err(Error::InvalidArgument(format!(
            "{noun} selector cannot be empty"
        ))));
    }

    let mut by_name: Vec<&str> = Vec::new();
    let mut by_prefix: Vec<&str> = Vec::new();
    for (id, name) in entries {
        if id == trimmed {
            return Some(Ok(id.to_string()));
        }
        if name == trimmed {
            by_name.push(id);
        } else if id.starts_with(trimmed) {
            by_prefix.push(id);
        }
    }

    for candidates in [by_name, by_prefix] {
        match candidates.len() {
            0 => continue,
            1 => return Some(Ok(candidates[0].to_string())),
            _ => {
                return Some(Err(Error::InvalidArgument(format!(
                    "ambiguous {noun} selector '{}': {}",
                    trimmed,
                    candidates.join(", ")
                ))))
            }
        }
    }

    None
}
