//! xpt - Gamified Task Tracker Library
//!
//! This library provides the core functionality for the xpt CLI tool:
//! a single-user, local task and habit tracker that converts completed
//! tasks into experience points (XP) and lets the user spend them on
//! self-defined rewards.
//!
//! # Core Concepts
//!
//! - **Tasks**: User-defined activities worth a fixed XP value
//! - **Rewards**: User-defined items purchasable with accumulated XP
//! - **Transaction Log**: Append-only history of XP earned and spent
//! - **Balance**: Always derived from the log, never stored
//! - **Streak**: Consecutive calendar days with at least one completed task
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `xpt.toml`
//! - `error`: Error types and result aliases
//! - `model`: Task, reward, and transaction records
//! - `store`: The State Store (load, mutate, persist, derived views)
//! - `storage`: Flat-file persistence and atomic writes
//! - `output`: Human and JSON output formatting

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
