use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DietError, Result};
use crate::milp::Model;
use crate::models::{
    AuditFinding, FoodServing, NutrientTotal, NutritionDataset, SolveStatus, SolvedPlan,
};
use crate::planner::constants::{
    BOUND_EPSILON, OBJECTIVE_EPSILON, SELECTION_THRESHOLD, SERVING_EPSILON,
};
use crate::solver::{SolverOutput, SolverStatus};

/// Numerical slack used when reading solver output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Servings below this magnitude are reported as zero.
    pub serving_epsilon: f64,
    /// Relative slack for nutrient totals against their bounds.
    pub bound_epsilon: f64,
    /// Relative slack between solver objective and recomputed cost.
    pub objective_epsilon: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            serving_epsilon: SERVING_EPSILON,
            bound_epsilon: BOUND_EPSILON,
            objective_epsilon: OBJECTIVE_EPSILON,
        }
    }
}

impl From<&SolverStatus> for SolveStatus {
    fn from(status: &SolverStatus) -> Self {
        match status {
            SolverStatus::Optimal => SolveStatus::Optimal,
            SolverStatus::Infeasible => SolveStatus::Infeasible,
            SolverStatus::Unbounded => SolveStatus::Unbounded,
            SolverStatus::Error(_) => SolveStatus::NotSolved,
        }
    }
}

/// Zero out solver noise and clamp tiny negatives.
#[inline]
pub fn suppress_noise(value: f64, epsilon: f64) -> f64 {
    if value.abs() < epsilon { 0.0 } else { value.max(0.0) }
}

/// Turn a solver assignment back into servings, cost and nutrient totals.
///
/// Totals and cost are recomputed from the servings rather than read from the
/// solver, then audited against the bounds the model was built with.
pub fn interpret(
    dataset: &NutritionDataset,
    model: &Model,
    output: &SolverOutput,
    tolerances: &Tolerances,
) -> Result<SolvedPlan> {
    let mut servings = Vec::with_capacity(dataset.len());
    for (i, food) in dataset.foods().iter().enumerate() {
        let (Some(serving_var), Some(selection_var)) = (model.serving_var(i), model.selection_var(i))
        else {
            return Err(DietError::unknown_food(&food.name));
        };
        let amount = suppress_noise(output.assignment.value(serving_var), tolerances.serving_epsilon);
        servings.push(FoodServing {
            food: food.name.clone(),
            servings: amount,
            selected: output.assignment.value(selection_var) > SELECTION_THRESHOLD,
            cost: amount * food.cost,
        });
    }

    let mut nutrient_totals = Vec::with_capacity(model.bounds().len());
    for bound in model.bounds() {
        let column = dataset.nutrient_column(&bound.nutrient)?;
        let total: f64 = column
            .iter()
            .zip(&servings)
            .map(|(amount, s)| amount * s.servings)
            .sum();
        nutrient_totals.push(NutrientTotal {
            nutrient: bound.nutrient.clone(),
            total,
            min: bound.min,
            max: bound.max,
            within_bounds: bound.admits(total, tolerances.bound_epsilon),
        });
    }

    let total_cost: f64 = servings.iter().map(|s| s.cost).sum();
    let mut plan = SolvedPlan {
        status: SolveStatus::from(&output.status),
        total_cost,
        objective_value: output.objective_value,
        servings,
        nutrient_totals,
        audit: Vec::new(),
    };
    plan.audit = audit(&plan, tolerances);
    for finding in &plan.audit {
        warn!("Plan audit: {}", finding);
    }

    Ok(plan)
}

/// Cross-check a plan: bounds, serving/selection linkage, and objective.
pub fn audit(plan: &SolvedPlan, tolerances: &Tolerances) -> Vec<AuditFinding> {
    let mut findings: Vec<AuditFinding> = plan
        .nutrient_totals
        .iter()
        .filter(|t| !t.within_bounds)
        .map(|t| AuditFinding::BoundViolation {
            nutrient: t.nutrient.clone(),
            total: t.total,
            min: t.min,
            max: t.max,
        })
        .collect();

    findings.extend(
        plan.servings
            .iter()
            .filter(|s| s.servings > 0.0 && !s.selected)
            .map(|s| AuditFinding::LinkageViolation {
                food: s.food.clone(),
                servings: s.servings,
            }),
    );

    let slack = tolerances.objective_epsilon * plan.total_cost.abs().max(1.0);
    if plan.objective_value.is_finite() && (plan.objective_value - plan.total_cost).abs() > slack {
        findings.push(AuditFinding::ObjectiveMismatch {
            reported: plan.objective_value,
            recomputed: plan.total_cost,
        });
    }

    findings
}
