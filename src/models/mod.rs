pub mod dataset;
pub mod food;
pub mod plan;

pub use dataset::{NutritionDataset, RawFoodRow, RawTable};
pub use food::{Food, NutrientBound};
pub use plan::{AuditFinding, FoodServing, NutrientTotal, SolveStatus, SolvedPlan};
