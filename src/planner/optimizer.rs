use tracing::{info, warn};

use crate::error::Result;
use crate::milp::{DietRules, build};
use crate::models::{NutritionDataset, RawTable, SolveStatus, SolvedPlan};
use crate::planner::interpret::{Tolerances, interpret};
use crate::solver::{SolverAdapter, SolverStatus};

/// Result of one optimisation run.
///
/// A model with no feasible (or no bounded) plan is a normal outcome, not an
/// error.
#[derive(Debug, Clone)]
pub enum PlanOutcome {
    Solved(SolvedPlan),
    Unsolved {
        status: SolveStatus,
        detail: Option<String>,
    },
}

impl PlanOutcome {
    pub fn status(&self) -> SolveStatus {
        match self {
            PlanOutcome::Solved(plan) => plan.status,
            PlanOutcome::Unsolved { status, .. } => *status,
        }
    }

    pub fn plan(&self) -> Option<&SolvedPlan> {
        match self {
            PlanOutcome::Solved(plan) => Some(plan),
            PlanOutcome::Unsolved { .. } => None,
        }
    }

    pub fn into_plan(self) -> Option<SolvedPlan> {
        match self {
            PlanOutcome::Solved(plan) => Some(plan),
            PlanOutcome::Unsolved { .. } => None,
        }
    }
}

/// Runs validate → build → solve → interpret with one solver and rule set.
///
/// Every call builds a fresh model; nothing is shared between runs.
pub struct DietOptimizer<S> {
    solver: S,
    rules: DietRules,
    tolerances: Tolerances,
}

impl<S: SolverAdapter> DietOptimizer<S> {
    pub fn new(solver: S, rules: DietRules) -> Self {
        Self {
            solver,
            rules,
            tolerances: Tolerances::default(),
        }
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Validate a raw table, then optimise it.
    pub fn optimize_table(&self, table: RawTable) -> Result<PlanOutcome> {
        let dataset = NutritionDataset::from_table(table)?;
        info!(
            "Validated {} foods and {} nutrients",
            dataset.len(),
            dataset.nutrients().len()
        );
        self.optimize(&dataset)
    }

    pub fn optimize(&self, dataset: &NutritionDataset) -> Result<PlanOutcome> {
        let model = build(dataset, &self.rules)?;

        info!("Solving with {}...", self.solver.name());
        let output = self.solver.solve(&model);

        let outcome = match output.status {
            SolverStatus::Optimal => PlanOutcome::Solved(interpret(
                dataset,
                &model,
                &output,
                &self.tolerances,
            )?),
            SolverStatus::Infeasible => PlanOutcome::Unsolved {
                status: SolveStatus::Infeasible,
                detail: None,
            },
            SolverStatus::Unbounded => PlanOutcome::Unsolved {
                status: SolveStatus::Unbounded,
                detail: None,
            },
            SolverStatus::Error(message) => {
                warn!("Solver failed: {}", message);
                PlanOutcome::Unsolved {
                    status: SolveStatus::NotSolved,
                    detail: Some(message),
                }
            }
        };

        match &outcome {
            PlanOutcome::Solved(plan) => info!(
                "Status: {}, total cost {:.4}, {} foods",
                plan.status,
                plan.total_cost,
                plan.foods_to_buy().count()
            ),
            PlanOutcome::Unsolved { status, .. } => info!("Status: {}", status),
        }
        Ok(outcome)
    }
}
