use crate::{
    domain::{Amount, ExpenseRecord},
    errors::Result,
    storage::PersistenceGateway,
};

use super::{data_quality::{data_quality_issues, DataQualityIssue}, state::EngineState};

/// Facade that pairs one engine state with its persistence gateway.
///
/// Every mutation is applied in memory first and then the touched resource is
/// saved. When the save fails the error is returned and memory stays ahead of
/// disk; calling `save_all` retries every resource.
pub struct ProjectSession {
    state: EngineState,
    gateway: PersistenceGateway,
    load_warnings: Vec<String>,
}

impl ProjectSession {
    pub fn open(gateway: PersistenceGateway) -> Self {
        let outcome = gateway.load_all();
        Self {
            state: outcome.state,
            gateway,
            load_warnings: outcome.warnings,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn reload(&mut self) {
        let outcome = self.gateway.load_all();
        self.state = outcome.state;
        self.load_warnings = outcome.warnings;
    }

    pub fn record_expense(&mut self, record: ExpenseRecord) -> Result<()> {
        self.state.add_expense(record)?;
        self.gateway.save_ledger(&self.state.ledger)
    }

    pub fn update_estimate(&mut self, stage_name: &str, amount: Amount) -> Result<()> {
        self.state.update_estimate(stage_name, amount)?;
        self.gateway.save_catalog(&self.state.catalog)
    }

    pub fn set_sale_value(&mut self, amount: Amount) -> Result<()> {
        self.state.set_sale_value(amount)?;
        self.gateway.save_project(&self.state.project)
    }

    pub fn save_all(&self) -> Result<()> {
        self.gateway.save_all(&self.state)
    }

    pub fn data_quality(&self, suppliers: &[String]) -> Vec<DataQualityIssue> {
        data_quality_issues(&self.state, suppliers)
    }
}
