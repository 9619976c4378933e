use crate::{
    domain::{
        amount::ensure_non_negative, Amount, ExpenseLedger, ExpenseRecord, ProjectSettings,
        StageCatalog,
    },
    errors::Result,
};

use super::variance::VarianceCalculator;

/// Everything a single session works on. Passed explicitly to every engine
/// operation; there is no process-wide copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    pub catalog: StageCatalog,
    pub ledger: ExpenseLedger,
    pub project: ProjectSettings,
}

impl EngineState {
    pub fn new(catalog: StageCatalog, ledger: ExpenseLedger) -> Self {
        Self::with_project(catalog, ledger, ProjectSettings::default())
    }

    pub fn with_project(
        catalog: StageCatalog,
        ledger: ExpenseLedger,
        project: ProjectSettings,
    ) -> Self {
        Self {
            catalog,
            ledger,
            project,
        }
    }

    pub fn variance(&self) -> VarianceCalculator<'_> {
        VarianceCalculator::new(&self.catalog, &self.ledger)
    }

    pub fn add_expense(&mut self, record: ExpenseRecord) -> Result<()> {
        self.ledger.add(record)
    }

    pub fn update_estimate(&mut self, stage_name: &str, amount: Amount) -> Result<()> {
        self.catalog.update_estimate(stage_name, amount)
    }

    pub fn sale_value(&self) -> Amount {
        self.project.sale_value
    }

    pub fn set_sale_value(&mut self, amount: Amount) -> Result<()> {
        ensure_non_negative("sale value", amount)?;
        self.project.sale_value = amount;
        Ok(())
    }
}
