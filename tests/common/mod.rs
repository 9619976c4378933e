#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use stage_budget::{
    domain::{ExpenseCategory, ExpenseRecord},
    storage::{CsvStorage, PersistenceGateway},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_root() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates a storage backend and gateway sharing one isolated directory.
pub fn setup_gateway(root: &Path, stages: &[&str]) -> (PersistenceGateway, CsvStorage) {
    let storage = CsvStorage::new(Some(root.to_path_buf())).expect("create csv storage");
    let gateway = PersistenceGateway::new(
        Box::new(storage.clone()),
        stages.iter().map(|stage| stage.to_string()).collect(),
    );
    (gateway, storage)
}

pub fn expense(date: (i32, u32, u32), stage: &str, cost: Decimal) -> ExpenseRecord {
    ExpenseRecord::new(
        NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date"),
        format!("{stage} work"),
        stage,
        ExpenseCategory::Service,
        "YUMA",
        cost,
    )
}
