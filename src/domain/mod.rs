//! Stage and expense models plus the in-memory catalog and ledger.

pub mod amount;
pub mod expense;
pub mod ledger;
pub mod project;
pub mod stage;

pub use amount::{parse_amount, Amount};
pub use expense::{parse_date, ExpenseCategory, ExpenseRecord};
pub use ledger::ExpenseLedger;
pub use project::ProjectSettings;
pub use stage::{Stage, StageCatalog};
