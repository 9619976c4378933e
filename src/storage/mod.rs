//! Durable storage for the stage catalog, the expense ledger, and project
//! settings.

pub mod csv_backend;
pub mod gateway;

use crate::{
    domain::{ExpenseLedger, ExpenseRecord, ProjectSettings, Stage, StageCatalog},
    errors::Result,
};

/// Rows recovered from a durable resource plus a note for every row that had
/// to be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport<T> {
    pub items: Vec<T>,
    pub warnings: Vec<String>,
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Abstraction over persistence backends.
///
/// `load_*` return `Ok(None)` when the resource does not exist yet, and
/// `StorageRead` when it exists but cannot be read as a whole. Individual bad
/// rows are skipped and reported through `LoadReport::warnings`. Every `save_*`
/// fully overwrites its resource.
pub trait StorageBackend: Send + Sync {
    fn load_catalog(&self) -> Result<Option<LoadReport<Stage>>>;
    fn save_catalog(&self, catalog: &StageCatalog) -> Result<()>;
    fn load_ledger(&self) -> Result<Option<LoadReport<ExpenseRecord>>>;
    fn save_ledger(&self, ledger: &ExpenseLedger) -> Result<()>;
    fn load_project(&self) -> Result<Option<ProjectSettings>>;
    fn save_project(&self, project: &ProjectSettings) -> Result<()>;
}

pub use csv_backend::CsvStorage;
pub use gateway::{LoadOutcome, PersistenceGateway};
