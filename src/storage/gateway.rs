use crate::{
    core::state::EngineState,
    domain::{ExpenseLedger, ProjectSettings, StageCatalog},
    errors::Result,
};

use super::StorageBackend;

/// Engine state hydrated from storage plus every recoverable problem met
/// while reading it.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub state: EngineState,
    pub warnings: Vec<String>,
}

impl StageCatalog {
    /// Loads stored estimates on top of the known stage list.
    ///
    /// Known stages come first, in the given order; stored stages outside that
    /// list follow in file order. A missing resource yields a zeroed catalog,
    /// an unreadable one falls back to it with a warning.
    pub fn load(storage: &dyn StorageBackend, known_stages: &[String]) -> (Self, Vec<String>) {
        let mut catalog = StageCatalog::with_stages(known_stages.iter().cloned());
        let mut warnings = Vec::new();
        match storage.load_catalog() {
            Ok(Some(report)) => {
                warnings.extend(report.warnings);
                for stage in report.items {
                    if !catalog.contains(&stage.name) {
                        tracing::debug!(stage = %stage.name, "stored stage outside configured list");
                    }
                    if let Err(err) = catalog.insert_stage(&stage.name, stage.estimated_cost) {
                        tracing::warn!(stage = %stage.name, error = %err, "stored estimate skipped");
                        warnings.push(format!("skipped stored estimate: {err}"));
                    }
                }
            }
            Ok(None) => {
                tracing::info!("no stored catalog; starting with zero estimates");
            }
            Err(err) => {
                tracing::warn!(error = %err, "catalog unreadable; using zero estimates");
                warnings.push(err.to_string());
            }
        }
        (catalog, warnings)
    }

    pub fn save(&self, storage: &dyn StorageBackend) -> Result<()> {
        storage.save_catalog(self)
    }
}

impl ExpenseLedger {
    /// Loads every readable record and rebuilds the stage totals from them.
    /// Records the ledger refuses, such as ones whose cost would overflow a
    /// total, are skipped with a warning.
    pub fn load(storage: &dyn StorageBackend) -> (Self, Vec<String>) {
        match storage.load_ledger() {
            Ok(Some(report)) => {
                let mut ledger = ExpenseLedger::new();
                let mut warnings = report.warnings;
                for record in report.items {
                    let stage = record.stage.clone();
                    if let Err(err) = ledger.add(record) {
                        tracing::warn!(stage = %stage, error = %err, "stored expense skipped");
                        warnings.push(format!("skipped stored expense: {err}"));
                    }
                }
                (ledger, warnings)
            }
            Ok(None) => {
                tracing::info!("no stored ledger; starting empty");
                (ExpenseLedger::new(), Vec::new())
            }
            Err(err) => {
                tracing::warn!(error = %err, "ledger unreadable; starting empty");
                (ExpenseLedger::new(), vec![err.to_string()])
            }
        }
    }

    pub fn save(&self, storage: &dyn StorageBackend) -> Result<()> {
        storage.save_ledger(self)
    }
}

/// Moves engine state between memory and a storage backend.
///
/// Catalog, ledger, and project settings are separate resources written
/// independently; a failure between two saves leaves them out of step until
/// the caller retries.
pub struct PersistenceGateway {
    storage: Box<dyn StorageBackend>,
    known_stages: Vec<String>,
}

impl PersistenceGateway {
    pub fn new(storage: Box<dyn StorageBackend>, known_stages: Vec<String>) -> Self {
        Self {
            storage,
            known_stages,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Never fails: missing or unreadable resources are replaced by defaults.
    pub fn load_all(&self) -> LoadOutcome {
        let (catalog, mut warnings) = StageCatalog::load(self.storage(), &self.known_stages);
        let (ledger, ledger_warnings) = ExpenseLedger::load(self.storage());
        warnings.extend(ledger_warnings);
        let project = match self.storage.load_project() {
            Ok(project) => project.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "project settings unreadable; using defaults");
                warnings.push(err.to_string());
                ProjectSettings::default()
            }
        };
        tracing::info!(
            stages = catalog.len(),
            records = ledger.len(),
            warnings = warnings.len(),
            "engine state loaded"
        );
        LoadOutcome {
            state: EngineState::with_project(catalog, ledger, project),
            warnings,
        }
    }

    pub fn save_catalog(&self, catalog: &StageCatalog) -> Result<()> {
        catalog.save(self.storage())
    }

    pub fn save_ledger(&self, ledger: &ExpenseLedger) -> Result<()> {
        ledger.save(self.storage())
    }

    pub fn save_project(&self, project: &ProjectSettings) -> Result<()> {
        self.storage.save_project(project)
    }

    /// Writes every resource; stops at the first failure.
    pub fn save_all(&self, state: &EngineState) -> Result<()> {
        self.save_catalog(&state.catalog)?;
        self.save_ledger(&state.ledger)?;
        self.save_project(&state.project)
    }
}
