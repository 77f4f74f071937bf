//! Error types for xpt
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task/reward, invalid config)
//! - 3: Blocked by policy (purchase exceeds balance)
//! - 4: Operation failed (storage unreadable/unwritable, bad data)

use thiserror::Error;

/// Exit codes for the xpt CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for xpt operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Reward not found: {0}")]
    RewardNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Policy blocks (exit code 3)
    #[error("Insufficient XP: balance is {balance}, reward costs {cost}")]
    InsufficientFunds { cost: i64, balance: i64 },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::TaskNotFound(_)
            | Error::RewardNotFound(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::InsufficientFunds { .. } => exit_codes::POLICY_BLOCKED,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error envelopes, if any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::InsufficientFunds { cost, balance } => Some(serde_json::json!({
                "cost": cost,
                "balance": balance,
            })),
            _ => None,
        }
    }
}

/// Result type alias for xpt operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_category() {
        assert_eq!(
            Error::TaskNotFound("t-abcd".into()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            Error::RewardNotFound("r-abcd".into()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            Error::InvalidArgument("empty name".into()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            Error::InsufficientFunds {
                cost: 10,
                balance: 4
            }
            .exit_code(),
            exit_codes::POLICY_BLOCKED
        );
        assert_eq!(
            Error::OperationFailed("boom".into()).exit_code(),
            exit_codes::OPERATION_FAILED
        );
    }

    #[test]
    fn insufficient_funds_carries_details() {
        let err = Error::InsufficientFunds {
            cost: 10,
            balance: 4,
        };
        let details = err.details().expect("details");
        assert_eq!(details["cost"], 10);
        assert_eq!(details["balance"], 4);
        assert!(Error::TaskNotFound("t-x".into()).details().is_none());
    }
}
