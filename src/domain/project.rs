use serde::{Deserialize, Serialize};

use super::amount::Amount;

/// Project-wide values that do not belong to any stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Contracted revenue for the whole project.
    #[serde(default)]
    pub sale_value: Amount,
}

impl ProjectSettings {
    pub fn new(sale_value: Amount) -> Self {
        Self { sale_value }
    }
}
