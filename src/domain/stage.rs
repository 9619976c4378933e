use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{BudgetError, Result};

use super::amount::{ensure_non_negative, Amount};

/// One phase of the project and its current estimated cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub estimated_cost: Amount,
}

impl Stage {
    pub fn new(name: impl Into<String>, estimated_cost: Amount) -> Self {
        Self {
            name: name.into(),
            estimated_cost,
        }
    }
}

/// Ordered set of known stages. Stage names are unique; catalog order is the
/// order reports are rendered in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageCatalog {
    stages: Vec<Stage>,
}

/// Canonical form of a stage name; every lookup and insert goes through it.
pub fn normalize_stage_name(name: &str) -> &str {
    name.trim()
}

impl StageCatalog {
    /// Builds a catalog with every named stage estimated at zero. Duplicate
    /// and blank names are dropped.
    pub fn with_stages<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for name in names {
            // Zero estimates cannot overflow; only blank names are refused.
            let _ = catalog.insert_stage(&name.into(), Decimal::ZERO);
        }
        catalog
    }

    pub fn from_estimates<I, S>(estimates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Amount)>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for (name, amount) in estimates {
            catalog.insert_stage(&name.into(), amount)?;
        }
        Ok(catalog)
    }

    /// Adds a stage at the end of the catalog, or overwrites the estimate of
    /// an existing one.
    pub(crate) fn insert_stage(&mut self, name: &str, estimated_cost: Amount) -> Result<()> {
        let name = normalize_stage_name(name);
        if name.is_empty() {
            return Err(BudgetError::validation("stage name is required"));
        }
        ensure_non_negative(&format!("estimate for `{name}`"), estimated_cost)?;
        self.ensure_total_fits(name, estimated_cost)?;
        match self.stages.iter_mut().find(|stage| stage.name == name) {
            Some(existing) => existing.estimated_cost = estimated_cost,
            None => self.stages.push(Stage::new(name, estimated_cost)),
        }
        Ok(())
    }

    pub fn update_estimate(&mut self, stage_name: &str, new_amount: Amount) -> Result<()> {
        ensure_non_negative("estimated cost", new_amount)?;
        let name = normalize_stage_name(stage_name);
        if !self.contains(name) {
            return Err(BudgetError::validation(format!("unknown stage `{name}`")));
        }
        self.ensure_total_fits(name, new_amount)?;
        if let Some(stage) = self.stages.iter_mut().find(|stage| stage.name == name) {
            tracing::debug!(stage = name, previous = %stage.estimated_cost, new = %new_amount, "estimate updated");
            stage.estimated_cost = new_amount;
        }
        Ok(())
    }

    pub fn get_estimate(&self, stage_name: &str) -> Amount {
        self.stage(stage_name)
            .map(|stage| stage.estimated_cost)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn stage(&self, stage_name: &str) -> Option<&Stage> {
        let name = normalize_stage_name(stage_name);
        self.stages.iter().find(|stage| stage.name == name)
    }

    pub fn contains(&self, stage_name: &str) -> bool {
        self.stage(stage_name).is_some()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|stage| stage.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Keeps the sum of all estimates representable, so any subset of them
    /// can be added up without overflow.
    fn ensure_total_fits(&self, name: &str, amount: Amount) -> Result<()> {
        self.stages
            .iter()
            .filter(|stage| stage.name != name)
            .try_fold(amount, |total, stage| total.checked_add(stage.estimated_cost))
            .map(|_| ())
            .ok_or_else(|| {
                BudgetError::validation(format!(
                    "estimate for `{name}` would push the catalog total out of range"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_catalog_is_zeroed_and_ordered() {
        let catalog = StageCatalog::with_stages(["Foundation", "Framing", "Foundation", " "]);
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["Foundation", "Framing"]);
        assert_eq!(catalog.get_estimate("Framing"), Decimal::ZERO);
    }

    #[test]
    fn update_estimate_overwrites_latest_value() {
        let mut catalog = StageCatalog::with_stages(["Foundation"]);
        catalog.update_estimate("Foundation", dec!(1000)).unwrap();
        catalog.update_estimate("Foundation", dec!(1500.50)).unwrap();
        assert_eq!(catalog.get_estimate("Foundation"), dec!(1500.50));
    }

    #[test]
    fn update_estimate_rejects_negative_and_unknown() {
        let mut catalog = StageCatalog::with_stages(["Foundation"]);
        let err = catalog
            .update_estimate("Foundation", dec!(-1))
            .expect_err("negative estimate should fail");
        assert!(err.is_validation());
        assert!(catalog.update_estimate("Roofing", dec!(10)).is_err());
        assert_eq!(catalog.get_estimate("Foundation"), Decimal::ZERO);
    }

    #[test]
    fn unknown_stage_estimate_is_zero() {
        let catalog = StageCatalog::default();
        assert_eq!(catalog.get_estimate("Anything"), Decimal::ZERO);
    }

    #[test]
    fn from_estimates_validates_amounts() {
        assert!(StageCatalog::from_estimates([("Foundation", dec!(-5))]).is_err());
        let catalog =
            StageCatalog::from_estimates([("Foundation", dec!(1000)), ("Framing", dec!(2000))])
                .unwrap();
        assert_eq!(catalog.get_estimate("Framing"), dec!(2000));
    }

    #[test]
    fn stage_names_are_matched_after_trimming() {
        let mut catalog = StageCatalog::with_stages([" Foundation "]);
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["Foundation"]);
        catalog.update_estimate("Foundation  ", dec!(75)).unwrap();
        assert_eq!(catalog.get_estimate(" Foundation"), dec!(75));
        assert!(catalog.contains("\tFoundation"));
    }

    #[test]
    fn estimates_whose_sum_overflows_are_rejected() {
        let mut catalog =
            StageCatalog::from_estimates([("Foundation", Decimal::MAX), ("Framing", dec!(0))])
                .unwrap();
        let err = catalog
            .update_estimate("Framing", dec!(1))
            .expect_err("catalog total would overflow");
        assert!(err.is_validation());
        assert_eq!(catalog.get_estimate("Framing"), Decimal::ZERO);
        // Replacing the large estimate itself is still allowed.
        catalog.update_estimate("Foundation", dec!(1)).unwrap();
        catalog.update_estimate("Framing", dec!(1)).unwrap();
    }
}
