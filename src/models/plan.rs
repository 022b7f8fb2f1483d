use serde::Serialize;

/// Outcome of one solve as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The solver failed, timed out, or was never run.
    NotSolved,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::NotSolved => "Not Solved",
        };
        f.write_str(s)
    }
}

/// Servings chosen for one food.
#[derive(Debug, Clone, Serialize)]
pub struct FoodServing {
    pub food: String,

    /// Servings after noise suppression; never negative.
    pub servings: f64,

    /// Value of the selection indicator in the same assignment.
    pub selected: bool,

    /// servings × unit cost.
    pub cost: f64,
}

/// Achieved amount of one nutrient next to its declared limits.
#[derive(Debug, Clone, Serialize)]
pub struct NutrientTotal {
    pub nutrient: String,
    pub total: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub within_bounds: bool,
}

/// Something the post-solve cross-check disagrees with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditFinding {
    BoundViolation {
        nutrient: String,
        total: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// A food has servings while its selection indicator is off.
    LinkageViolation { food: String, servings: f64 },
    /// Solver-reported objective differs from the recomputed total cost.
    ObjectiveMismatch { reported: f64, recomputed: f64 },
}

impl std::fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditFinding::BoundViolation {
                nutrient,
                total,
                min,
                max,
            } => write!(
                f,
                "{} total {:.4} outside [{}, {}]",
                nutrient,
                total,
                min.map_or("-".to_string(), |v| v.to_string()),
                max.map_or("-".to_string(), |v| v.to_string())
            ),
            AuditFinding::LinkageViolation { food, servings } => {
                write!(f, "{} has {:.4} servings but is not selected", food, servings)
            }
            AuditFinding::ObjectiveMismatch {
                reported,
                recomputed,
            } => write!(
                f,
                "solver objective {:.6} differs from recomputed cost {:.6}",
                reported, recomputed
            ),
        }
    }
}

/// Terminal artifact of a successful solve.
#[derive(Debug, Clone, Serialize)]
pub struct SolvedPlan {
    pub status: SolveStatus,

    /// Recomputed from servings × unit cost.
    pub total_cost: f64,

    /// Objective as reported by the solver.
    pub objective_value: f64,

    /// One entry per food, in dataset order, including zero servings.
    pub servings: Vec<FoodServing>,

    /// One entry per nutrient, in dataset order.
    pub nutrient_totals: Vec<NutrientTotal>,

    pub audit: Vec<AuditFinding>,
}

impl SolvedPlan {
    /// Foods with a positive serving count: the shopping list.
    pub fn foods_to_buy(&self) -> impl Iterator<Item = &FoodServing> {
        self.servings.iter().filter(|s| s.servings > 0.0)
    }

    pub fn servings_of(&self, food: &str) -> Option<f64> {
        self.servings
            .iter()
            .find(|s| s.food == food)
            .map(|s| s.servings)
    }

    pub fn is_selected(&self, food: &str) -> bool {
        self.servings.iter().any(|s| s.food == food && s.selected)
    }

    pub fn nutrient_total(&self, nutrient: &str) -> Option<&NutrientTotal> {
        self.nutrient_totals.iter().find(|t| t.nutrient == nutrient)
    }

    /// True when the cross-check found nothing.
    pub fn is_consistent(&self) -> bool {
        self.audit.is_empty()
    }
}
