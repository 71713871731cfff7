// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use buddysplit::application::SplitService;
use buddysplit::domain::{Amount, ExpenseRecord, ParticipantSet};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a test service backed by a temporary data file
pub fn test_service() -> Result<(SplitService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = SplitService::open(data_path(&temp_dir))?;
    Ok((service, temp_dir))
}

/// Path of the data file inside a test directory
pub fn data_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("buddysplit.json")
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn participants(names: &[&str]) -> ParticipantSet {
    names.iter().collect()
}

pub fn expense(payer: &str, amount: Amount, names: &[&str]) -> ExpenseRecord {
    ExpenseRecord::new(payer, amount, "test", participants(names), Utc::now())
}

pub fn assert_close(actual: Amount, expected: Amount) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Test fixture: a weekend trip shared by four friends
pub struct WeekendTrip;

impl WeekendTrip {
    pub fn record(service: &mut SplitService) -> Result<()> {
        service.record_expense(
            "Al",
            240.0,
            "Cabin",
            participants(&["Al", "Bo", "Cy", "Dee"]),
            parse_date("2024-06-01"),
        )?;
        service.record_expense(
            "Bo",
            60.0,
            "Groceries",
            participants(&["Al", "Bo", "Cy", "Dee"]),
            parse_date("2024-06-01"),
        )?;
        service.record_expense(
            "Cy",
            45.0,
            "Fuel",
            participants(&["Al", "Cy", "Dee"]),
            parse_date("2024-06-02"),
        )?;
        service.record_expense(
            "Dee",
            20.0,
            "Coffee for Al and Bo",
            participants(&["Al", "Bo"]),
            parse_date("2024-06-02"),
        )?;
        Ok(())
    }
}
