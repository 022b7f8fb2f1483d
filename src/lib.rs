pub mod cli;
pub mod data;
pub mod error;
pub mod interface;
pub mod milp;
pub mod models;
pub mod planner;
pub mod solver;

pub use error::{DietError, Result};
pub use milp::{DietRules, Model, build};
pub use models::{Food, NutrientBound, NutritionDataset, SolveStatus, SolvedPlan};
pub use planner::{DietOptimizer, PlanOutcome};
pub use solver::{GoodLpSolver, SolverAdapter};
