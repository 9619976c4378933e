//! Engine state, variance computations, and the persisting session facade.

pub mod data_quality;
pub mod session;
pub mod state;
pub mod variance;

pub use data_quality::{data_quality_issues, DataQualityIssue};
pub use session::ProjectSession;
pub use state::EngineState;
pub use variance::{
    BurndownPoint, ProjectTotals, SeriesKind, StageVariance, VarianceCalculator,
};
