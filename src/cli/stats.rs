//! xpt display commands: balance, day, streak, stats, calendar
//!
//! Read-only views derived from the transaction log.

use std::path::PathBuf;

use chrono::{DateTime, Datelike, Local, NaiveDate};

use crate::error::{Error, Result};
use crate::model::{Transaction, TransactionKind};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::MonthSummary;

/// Options for the balance command
pub struct BalanceOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the day command
pub struct DayOptions {
    pub date: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the streak command
pub struct StreakOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the stats command
pub struct StatsOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the calendar command
pub struct CalendarOptions {
    pub month: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct EntryView {
    timestamp: DateTime<Local>,
    kind: TransactionKind,
    reference_name: String,
    amount: i64,
}

impl From<&Transaction> for EntryView {
    fn from(tx: &Transaction) -> Self {
        Self {
            timestamp: tx.timestamp,
            kind: tx.kind,
            reference_name: tx.reference_name.clone(),
            amount: tx.amount,
        }
    }
}

impl EntryView {
    fn human_line(&self, with_date: bool) -> String {
        let time = if with_date {
            self.timestamp.format("%Y-%m-%d %H:%M").to_string()
        } else {
            self.timestamp.format("%H:%M").to_string()
        };
        format!(
            "{}  {}  {}  {:+}",
            time, self.kind, self.reference_name, self.amount
        )
    }
}

#[derive(serde::Serialize)]
struct BalanceReport {
    balance: i64,
}

#[derive(serde::Serialize)]
struct DayReport {
    date: NaiveDate,
    entries: Vec<EntryView>,
    earned: i64,
    spent: i64,
}

#[derive(serde::Serialize)]
struct StreakReport {
    streak: u32,
}

#[derive(serde::Serialize)]
struct TaskTotal {
    name: String,
    earned: i64,
}

#[derive(serde::Serialize)]
struct StatsReport {
    balance: i64,
    earned: i64,
    spent: i64,
    by_task: Vec<TaskTotal>,
    recent: Vec<EntryView>,
}

pub fn run_balance(options: BalanceOptions) -> Result<()> {
    let store = super::open_store(options.data_dir)?;
    let report = BalanceReport {
        balance: store.balance(),
    };

    let human = HumanOutput::new(format!("Balance: {} XP", report.balance));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "balance",
        &report,
        Some(&human),
    )
}

pub fn run_day(options: DayOptions) -> Result<()> {
    let date = match options.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };

    let store = super::open_store(options.data_dir)?;
    let entries: Vec<EntryView> = store
        .activity_for_day(date)
        .into_iter()
        .map(EntryView::from)
        .collect();
    let earned = entries.iter().filter(|e| e.amount > 0).map(|e| e.amount).sum();
    let spent = entries
        .iter()
        .filter(|e| e.amount < 0)
        .map(|e| -e.amount)
        .sum();

    let report = DayReport {
        date,
        entries,
        earned,
        spent,
    };

    let mut human = HumanOutput::new(format!("xpt day: {}", report.date));
    human.push_summary("earned", report.earned.to_string());
    human.push_summary("spent", report.spent.to_string());
    for entry in &report.entries {
        human.push_detail(entry.human_line(false));
    }
    if report.entries.is_empty() {
        human.push_detail("no activity recorded".to_string());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "day",
        &report,
        Some(&human),
    )
}

pub fn run_streak(options: StreakOptions) -> Result<()> {
    let store = super::open_store(options.data_dir)?;
    let report = StreakReport {
        streak: store.streak(),
    };

    let human = HumanOutput::new(format!("Streak: {} day(s)", report.streak));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "streak",
        &report,
        Some(&human),
    )
}

pub fn run_stats(options: StatsOptions) -> Result<()> {
    let store = super::open_store(options.data_dir)?;

    let earned = store
        .log()
        .iter()
        .filter(|tx| tx.amount > 0)
        .map(|tx| tx.amount)
        .sum();
    let spent = store
        .log()
        .iter()
        .filter(|tx| tx.amount < 0)
        .map(|tx| -tx.amount)
        .sum();
    let by_task = store
        .earned_by_task()
        .into_iter()
        .map(|(name, earned)| TaskTotal { name, earned })
        .collect();
    let recent = store
        .recent_activity(store.config().display.recent_limit)
        .into_iter()
        .map(EntryView::from)
        .collect();

    let report = StatsReport {
        balance: store.balance(),
        earned,
        spent,
        by_task,
        recent,
    };

    let mut human = HumanOutput::new("xpt stats");
    human.push_summary("balance", report.balance.to_string());
    human.push_summary("earned", report.earned.to_string());
    human.push_summary("spent", report.spent.to_string());
    for total in &report.by_task {
        human.push_detail(format!("{}  {} XP earned", total.name, total.earned));
    }
    for entry in &report.recent {
        human.push_detail(entry.human_line(true));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats",
        &report,
        Some(&human),
    )
}

pub fn run_calendar(options: CalendarOptions) -> Result<()> {
    let (year, month) = match options.month.as_deref() {
        Some(raw) => parse_month(raw)?,
        None => {
            let today = Local::now().date_naive();
            (today.year(), today.month())
        }
    };

    let store = super::open_store(options.data_dir)?;
    let report: MonthSummary = store.month_summary(year, month)?;

    let mut human = HumanOutput::new(format!("xpt calendar: {year}-{month:02}"));
    human.push_summary("earned", report.earned.to_string());
    human.push_summary("spent", report.spent.to_string());
    for day in &report.days {
        human.push_detail(format!(
            "{}  earned {}  spent {}",
            day.date, day.earned, day.spent
        ));
    }
    if report.days.is_empty() {
        human.push_detail("no activity recorded".to_string());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "calendar",
        &report,
        Some(&human),
    )
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidArgument(format!("invalid date '{raw}' (expected YYYY-MM-DD)")))
}

fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let trimmed = raw.trim();
    let invalid =
        || Error::InvalidArgument(format!("invalid month '{raw}' (expected YYYY-MM)"));

    let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_days() {
        assert_eq!(
            parse_date("2026-08-23").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
        );
        assert!(parse_date("23/08/2026").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }

    #[test]
    fn parse_month_accepts_year_month() {
        assert_eq!(parse_month("2026-08").unwrap(), (2026, 8));
        assert_eq!(parse_month(" 2026-1 ").unwrap(), (2026, 1));
        assert!(parse_month("2026").is_err());
        assert!(parse_month("2026-0").is_err());
        assert!(parse_month("2026-13").is_err());
    }
}
