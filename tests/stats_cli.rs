mod support;

use chrono::Datelike;
use predicates::str::contains;
use support::{days_ago, TestHome};
use xpt::model::Transaction;

#[test]
fn streak_counts_today_and_yesterday_but_stops_at_gap() {
    let home = TestHome::new();
    home.seed_log(&[
        Transaction::earn("Read", 10, days_ago(3, 9)),
        Transaction::earn("Read", 10, days_ago(1, 9)),
        Transaction::earn("Run", 25, days_ago(0, 8)),
    ]);

    let value = home.json(&["streak"]);
    assert_eq!(value["data"]["streak"], 2);
}

#[test]
fn streak_is_zero_without_an_earn_today() {
    let home = TestHome::new();
    home.seed_log(&[Transaction::earn("Read", 10, days_ago(1, 9))]);

    let value = home.json(&["streak"]);
    assert_eq!(value["data"]["streak"], 0);
}

#[test]
fn day_filters_to_one_calendar_day_in_order() {
    let home = TestHome::new();
    home.seed_log(&[
        Transaction::earn("Read", 10, days_ago(1, 9)),
        Transaction::earn("Read", 10, days_ago(0, 8)),
        Transaction::spend("Coffee", 5, days_ago(0, 12)),
    ]);

    let today = days_ago(0, 0).date_naive().to_string();
    let value = home.json(&["day", &today]);
    let entries = value["data"]["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["kind"], "earn");
    assert_eq!(entries[1]["kind"], "spend");
    assert_eq!(value["data"]["earned"], 10);
    assert_eq!(value["data"]["spent"], 5);
}

#[test]
fn day_rejects_malformed_dates() {
    let home = TestHome::new();
    home.cmd()
        .args(["day", "23/08/2026"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("invalid date"));
}

#[test]
fn stats_reports_totals_and_per_task_breakdown() {
    let home = TestHome::new();
    home.seed_log(&[
        Transaction::earn("Read", 10, days_ago(2, 9)),
        Transaction::earn("Read", 10, days_ago(1, 9)),
        Transaction::earn("Run", 25, days_ago(1, 18)),
        Transaction::spend("Coffee", 5, days_ago(0, 8)),
    ]);

    let value = home.json(&["stats"]);
    assert_eq!(value["data"]["balance"], 40);
    assert_eq!(value["data"]["earned"], 45);
    assert_eq!(value["data"]["spent"], 5);

    let by_task = value["data"]["by_task"].as_array().expect("by_task");
    assert_eq!(by_task[0]["name"], "Run");
    assert_eq!(by_task[0]["earned"], 25);
    assert_eq!(by_task[1]["name"], "Read");
    assert_eq!(by_task[1]["earned"], 20);

    let recent = value["data"]["recent"].as_array().expect("recent");
    assert_eq!(recent.len(), 4);
    // Newest first
    assert_eq!(recent[0]["kind"], "spend");
}

#[test]
fn stats_recent_limit_comes_from_config() {
    let home = TestHome::new();
    home.write_config("[display]\nrecent_limit = 2\n");
    home.seed_log(&[
        Transaction::earn("Read", 10, days_ago(2, 9)),
        Transaction::earn("Read", 10, days_ago(1, 9)),
        Transaction::earn("Read", 10, days_ago(0, 9)),
    ]);

    let value = home.json(&["stats"]);
    assert_eq!(value["data"]["recent"].as_array().unwrap().len(), 2);
}

#[test]
fn calendar_sums_each_day_of_the_month() {
    let home = TestHome::new();
    let first = days_ago(0, 9)
        .date_naive()
        .with_day(1)
        .expect("first of month");
    let ts = |day, hour| {
        first
            .with_day(day)
            .expect("valid day")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
            .and_local_timezone(chrono::Local)
            .single()
            .expect("local timestamp")
    };

    home.seed_log(&[
        Transaction::earn("Read", 10, ts(1, 9)),
        Transaction::earn("Run", 25, ts(1, 18)),
        Transaction::spend("Coffee", 5, ts(2, 8)),
    ]);

    let month = first.format("%Y-%m").to_string();
    let value = home.json(&["calendar", &month]);
    let days = value["data"]["days"].as_array().expect("days");
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["earned"], 35);
    assert_eq!(days[0]["spent"], 0);
    assert_eq!(days[1]["earned"], 0);
    assert_eq!(days[1]["spent"], 5);
    assert_eq!(value["data"]["earned"], 35);
    assert_eq!(value["data"]["spent"], 5);
}

#[test]
fn calendar_rejects_malformed_months() {
    let home = TestHome::new();
    home.cmd()
        .args(["calendar", "2026-13"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("invalid month"));
}

#[test]
fn malformed_log_lines_are_skipped_on_load() {
    let home = TestHome::new();
    home.seed_log(&[Transaction::earn("Read", 10, days_ago(0, 9))]);

    let mut raw = std::fs::read_to_string(home.log_file()).unwrap();
    raw.push_str("{torn line\n");
    std::fs::write(home.log_file(), raw).unwrap();

    assert_eq!(home.balance(), 10);
}

#[test]
fn non_utf8_log_lines_are_skipped_on_load() {
    let home = TestHome::new();
    home.seed_log(&[Transaction::earn("Read", 10, days_ago(0, 9))]);

    let mut raw = std::fs::read(home.log_file()).unwrap();
    raw.extend_from_slice(b"\xff\xfe\xfd\n");
    std::fs::write(home.log_file(), raw).unwrap();

    assert_eq!(home.balance(), 10);
}
