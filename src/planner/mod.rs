pub mod constants;
pub mod interpret;
pub mod optimizer;

pub use constants::*;
pub use interpret::{Tolerances, audit, interpret, suppress_noise};
pub use optimizer::{DietOptimizer, PlanOutcome};
