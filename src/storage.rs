//! Storage layer for xpt
//!
//! All state lives in a single data directory:
//!
//! ```text
//! <data-dir>/
//!   xpt.toml        # Optional configuration
//!   tasks.json      # Task collection
//!   rewards.json    # Reward collection
//!   xp_log.jsonl    # Transaction log, one record per line, ascending
//! ```
//!
//! Collection files are written atomically (temp file + rename) so an
//! interrupted process never leaves a truncated file. The log is appended
//! in place for normal operation and rewritten atomically for undo/reset.
//!
//! There is no file locking: xpt assumes a single process holds the data
//! directory at a time. Concurrent invocations are last-write-wins and may
//! lose updates.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::model::{RewardList, TaskList, Transaction};

/// Task collection file name
pub const TASKS_FILE: &str = "tasks.json";
/// Reward collection file name
pub const REWARDS_FILE: &str = "rewards.json";
/// Transaction log file name
pub const LOG_FILE: &str = "xp_log.jsonl";
/// Configuration file name
pub const CONFIG_FILE: &str = "xpt.toml";

/// Storage manager for the xpt data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Create a storage manager rooted at the given data directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Path to the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to the task collection file
    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    /// Path to the reward collection file
    pub fn rewards_file(&self) -> PathBuf {
        self.data_dir.join(REWARDS_FILE)
    }

    /// Path to the transaction log file
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Path to the configuration file
    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Create the data directory if it does not exist
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    // =========================================================================
    // File I/O helpers (atomic writes for safety)
    // =========================================================================

    /// Write JSON data atomically (write to temp, then rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        self.write_atomic(path, json.as_bytes())
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Write data atomically using temp file + rename
    ///
    /// The file is either fully written or not at all; an interrupted write
    /// leaves the previous contents intact.
    pub fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Append a record to a JSONL file
    ///
    /// Note: appends are not atomic, but a torn final line is rejected (and
    /// skipped) on the next load rather than corrupting earlier records.
    pub fn append_jsonl<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(record)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        writeln!(file, "{}", json)?;
        file.sync_all()?;

        Ok(())
    }

    /// Read all records from a JSONL file, skipping malformed lines
    ///
    /// Malformed entries are rejected with a warning rather than silently
    /// coerced or allowed to fail the whole load. Lines are read as raw
    /// bytes so a torn write that leaves invalid UTF-8 only loses that
    /// line, not the whole file.
    pub fn read_jsonl_lossy<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (lineno, raw) in reader.split(b'\n').enumerate() {
            let raw = raw?;
            let line = match std::str::from_utf8(&raw) {
                Ok(line) => line,
                Err(err) => {
                    warn!(
                        file = %path.display(),
                        line = lineno + 1,
                        %err,
                        "skipping non-UTF-8 log line"
                    );
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(
                        file = %path.display(),
                        line = lineno + 1,
                        %err,
                        "skipping malformed log entry"
                    );
                }
            }
        }

        Ok(records)
    }

    // =========================================================================
    // Collection load/save (fail-soft on load)
    // =========================================================================

    /// Load the task collection; absent or unparsable files yield an empty
    /// collection with a warning instead of failing the whole load
    pub fn load_tasks(&self) -> TaskList {
        self.load_collection(&self.tasks_file())
    }

    /// Load the reward collection (fail-soft, see [`Storage::load_tasks`])
    pub fn load_rewards(&self) -> RewardList {
        self.load_collection(&self.rewards_file())
    }

    fn load_collection<T: DeserializeOwned + Default>(&self, path: &Path) -> T {
        if !path.exists() {
            return T::default();
        }
        match self.read_json(path) {
            Ok(data) => data,
            Err(err) => {
                warn!(
                    file = %path.display(),
                    %err,
                    "unparsable collection file, starting empty"
                );
                T::default()
            }
        }
    }

    /// Load the transaction log, skipping malformed lines
    pub fn load_log(&self) -> Result<Vec<Transaction>> {
        self.read_jsonl_lossy(&self.log_file())
    }

    /// Save the task collection atomically
    pub fn save_tasks(&self, tasks: &TaskList) -> Result<()> {
        self.write_json(&self.tasks_file(), tasks)
    }

    /// Save the reward collection atomically
    pub fn save_rewards(&self, rewards: &RewardList) -> Result<()> {
        self.write_json(&self.rewards_file(), rewards)
    }

    /// Append a single transaction to the log
    pub fn append_transaction(&self, tx: &Transaction) -> Result<()> {
        self.append_jsonl(&self.log_file(), tx)
    }

    /// Rewrite the whole transaction log atomically (undo/reset paths)
    pub fn save_log(&self, log: &[Transaction]) -> Result<()> {
        let path = self.log_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut buf = Vec::new();
        for tx in log {
            let json = serde_json::to_string(tx)?;
            buf.extend_from_slice(json.as_bytes());
            buf.push(b'\n');
        }

        self.write_atomic(&path, &buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, Transaction};
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn storage() -> (TempDir, Storage) {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        storage.init().unwrap();
        (temp, storage)
    }

    #[test]
    fn storage_paths() {
        let (temp, storage) = storage();
        assert_eq!(storage.tasks_file(), temp.path().join("tasks.json"));
        assert_eq!(storage.rewards_file(), temp.path().join("rewards.json"));
        assert_eq!(storage.log_file(), temp.path().join("xp_log.jsonl"));
        assert_eq!(storage.config_file(), temp.path().join("xpt.toml"));
    }

    #[test]
    fn atomic_json_round_trip() {
        let (_temp, storage) = storage();

        let list = TaskList {
            tasks: vec![Task {
                id: "t-abcd".into(),
                name: "Read".into(),
                xp_value: 10,
            }],
        };
        storage.save_tasks(&list).unwrap();

        let read_back = storage.load_tasks();
        assert_eq!(read_back.tasks.len(), 1);
        assert_eq!(read_back.tasks[0].name, "Read");
        // No leftover temp file after the rename
        assert!(!storage.tasks_file().with_extension("tmp").exists());
    }

    #[test]
    fn missing_collections_load_empty() {
        let (_temp, storage) = storage();
        assert!(storage.load_tasks().tasks.is_empty());
        assert!(storage.load_rewards().rewards.is_empty());
        assert!(storage.load_log().unwrap().is_empty());
    }

    #[test]
    fn unparsable_collection_loads_empty() {
        let (_temp, storage) = storage();
        fs::write(storage.tasks_file(), "{not json").unwrap();
        assert!(storage.load_tasks().tasks.is_empty());
    }

    #[test]
    fn log_append_and_load_preserve_order() {
        let (_temp, storage) = storage();
        let base = Local.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();

        for (i, name) in ["Read", "Run", "Write"].iter().enumerate() {
            let tx = Transaction::earn(*name, 10, base + chrono::Duration::hours(i as i64));
            storage.append_transaction(&tx).unwrap();
        }

        let log = storage.load_log().unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].reference_name, "Read");
        assert_eq!(log[2].reference_name, "Write");
    }

    #[test]
    fn malformed_log_lines_are_skipped() {
        let (_temp, storage) = storage();
        let tx = Transaction::earn("Read", 10, Local.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap());
        storage.append_transaction(&tx).unwrap();

        // Simulate a torn write and a wrong-typed record
        let mut content = fs::read_to_string(storage.log_file()).unwrap();
        content.push_str("{\"timestamp\": \"2026-08-01\"\n");
        content.push_str("{\"timestamp\": 12, \"kind\": \"earn\", \"reference_name\": 3, \"amount\": \"x\"}\n");
        fs::write(storage.log_file(), content).unwrap();

        let log = storage.load_log().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].reference_name, "Read");
    }

    #[test]
    fn non_utf8_log_lines_are_skipped() {
        let (_temp, storage) = storage();
        let tx = Transaction::earn("Read", 10, Local.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap());
        storage.append_transaction(&tx).unwrap();

        // Simulate a torn write that left raw garbage bytes
        let mut content = fs::read(storage.log_file()).unwrap();
        content.extend_from_slice(b"\xff\xfe\xfd\n");
        fs::write(storage.log_file(), content).unwrap();

        let log = storage.load_log().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].reference_name, "Read");
    }

    #[test]
    fn save_log_rewrites_atomically() {
        let (_temp, storage) = storage();
        let base = Local.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        let log = vec![
            Transaction::earn("Read", 10, base),
            Transaction::spend("Coffee", 5, base + chrono::Duration::hours(1)),
        ];
        storage.save_log(&log).unwrap();

        let read_back = storage.load_log().unwrap();
        assert_eq!(read_back, log);

        storage.save_log(&log[..1]).unwrap();
        assert_eq!(storage.load_log().unwrap().len(), 1);
    }
}
