//! Data model for xpt.
//!
//! Tasks and rewards are user-defined catalogs; the transaction log is the
//! append-only history of XP earned and spent. The balance is always derived
//! from the log, never stored.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

const ULID_TIME_LEN: usize = 10;
const ULID_RANDOM_LEN: usize = 16;

/// A user-defined task worth a fixed amount of XP on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id within the task collection
    pub id: String,
    /// Display name, recorded on transactions at completion time
    pub name: String,
    /// XP earned per completion (non-negative)
    pub xp_value: i64,
}

/// A user-defined reward purchasable with accumulated XP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Unique id within the reward collection
    pub id: String,
    /// Display name, recorded on transactions at purchase time
    pub name: String,
    /// XP cost per purchase (non-negative)
    pub cost: i64,
}

/// Direction of a logged transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Earn,
    Spend,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Earn => write!(f, "earn"),
            TransactionKind::Spend => write!(f, "spend"),
        }
    }
}

/// One entry in the XP log.
///
/// `reference_name` is the task or reward name at the time of the action,
/// free text deliberately decoupled from the (possibly later deleted) id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: DateTime<Local>,
    pub kind: TransactionKind,
    pub reference_name: String,
    /// Positive for earn, negative for spend
    pub amount: i64,
}

impl Transaction {
    pub fn earn(reference_name: impl Into<String>, xp_value: i64, at: DateTime<Local>) -> Self {
        Self {
            timestamp: at,
            kind: TransactionKind::Earn,
            reference_name: reference_name.into(),
            amount: xp_value,
        }
    }

    pub fn spend(reference_name: impl Into<String>, cost: i64, at: DateTime<Local>) -> Self {
        Self {
            timestamp: at,
            kind: TransactionKind::Spend,
            reference_name: reference_name.into(),
            amount: -cost,
        }
    }

    /// Local calendar day this transaction falls on
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Persisted task collection (`tasks.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

/// Persisted reward collection (`rewards.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardList {
    pub rewards: Vec<Reward>,
}

impl TaskList {
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    pub fn ids(&self) -> HashSet<String> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }

    /// Validate collection invariants (unique ids)
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id.clone()) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate task id: {}",
                    task.id
                )));
            }
        }
        Ok(())
    }
}

impl RewardList {
    pub fn find(&self, id: &str) -> Option<&Reward> {
        self.rewards.iter().find(|r| r.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Reward> {
        self.rewards.iter_mut().find(|r| r.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Reward> {
        let idx = self.rewards.iter().position(|r| r.id == id)?;
        Some(self.rewards.remove(idx))
    }

    pub fn ids(&self) -> HashSet<String> {
        self.rewards.iter().map(|r| r.id.clone()).collect()
    }

    /// Validate collection invariants (unique ids)
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for reward in &self.rewards {
            if !seen.insert(reward.id.clone()) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate reward id: {}",
                    reward.id
                )));
            }
        }
        Ok(())
    }
}

/// Validate and normalize a task/reward name
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Validate a non-negative XP amount (xp_value or cost)
pub fn validate_points(field: &str, value: i64) -> Result<i64> {
    if value < 0 {
        return Err(Error::InvalidArgument(format!(
            "{field} must be >= 0, got {value}"
        )));
    }
    Ok(value)
}

/// Generate a fresh `<prefix>-<suffix>` id unique against `existing`.
///
/// The suffix is taken from the random part of a fresh ULID, at the
/// configured minimum length, lengthening only when repeated collisions
/// suggest the short space is crowded.
pub fn generate_id(prefix: &str, min_len: usize, existing: &HashSet<String>) -> String {
    let mut len = min_len.clamp(1, ULID_RANDOM_LEN);
    let mut attempts = 0;
    loop {
        let base = Ulid::new().to_string().to_lowercase();
        let random_part = &base[ULID_TIME_LEN..ULID_TIME_LEN + ULID_RANDOM_LEN];
        let candidate = format!("{}-{}", prefix, &random_part[..len]);
        if !existing.contains(&candidate) {
            return candidate;
        }
        attempts += 1;
        if attempts >= 8 && len < ULID_RANDOM_LEN {
            len += 1;
            attempts = 0;
        }
    }
}
