use good_lp::solvers::microlp::microlp;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    variable,
};
use tracing::debug;

use crate::milp::{LinearExpr, Model, Relation, VarKind};
use crate::solver::{SolverAdapter, SolverOutput, SolverStatus};

/// Tolerance for constraints whose left-hand side has no terms.
const CONSTANT_ROW_TOLERANCE: f64 = 1e-9;

/// [`SolverAdapter`] backed by `good_lp` and its pure-Rust `microlp` engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl SolverAdapter for GoodLpSolver {
    fn solve(&self, model: &Model) -> SolverOutput {
        // microlp cannot take an empty row; decide those here
        for row in model.constraints().iter().filter(|c| c.expr.is_empty()) {
            if !row.relation.holds(0.0, row.rhs, CONSTANT_ROW_TOLERANCE) {
                debug!("Constant constraint {} can never hold", row);
                return SolverOutput::unsolved(SolverStatus::Infeasible);
            }
        }

        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = model
            .variables()
            .iter()
            .map(|def| {
                let definition = variable().name(def.name.as_str());
                let definition = match def.kind {
                    VarKind::Binary => definition.binary(),
                    VarKind::Continuous => match def.upper {
                        Some(upper) => definition.min(def.lower).max(upper),
                        None => definition.min(def.lower),
                    },
                };
                vars.add(definition)
            })
            .collect();

        let objective = to_expression(model.objective(), &handles);
        let mut problem = vars.minimise(objective).using(microlp);
        for row in model.constraints().iter().filter(|c| !c.expr.is_empty()) {
            let lhs = to_expression(&row.expr, &handles);
            problem = problem.with(match row.relation {
                Relation::LessEq => constraint::leq(lhs, row.rhs),
                Relation::GreaterEq => constraint::geq(lhs, row.rhs),
                Relation::Equal => constraint::eq(lhs, row.rhs),
            });
        }

        match problem.solve() {
            Ok(solution) => {
                let values = handles.iter().map(|h| solution.value(*h)).collect();
                SolverOutput::optimal(model, values)
            }
            Err(ResolutionError::Infeasible) => SolverOutput::unsolved(SolverStatus::Infeasible),
            Err(ResolutionError::Unbounded) => SolverOutput::unsolved(SolverStatus::Unbounded),
            Err(other) => SolverOutput::error(other.to_string()),
        }
    }

    fn name(&self) -> &str {
        "good_lp/microlp"
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::default();
    for (var, coefficient) in expr.terms() {
        out += handles[var.index()] * *coefficient;
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::milp::{DietRules, build};
    use crate::models::{Food, NutrientBound, NutritionDataset};

    fn dataset(x_min: f64, x_max: f64) -> NutritionDataset {
        let food = |name: &str, cost: f64, x: f64| {
            let mut nutrients = HashMap::new();
            nutrients.insert("X".to_string(), x);
            Food::new(name, cost, nutrients)
        };
        NutritionDataset::new(
            vec![food("A", 1.0, 10.0), food("B", 2.0, 5.0)],
            vec![NutrientBound::new("X", Some(x_min), Some(x_max))],
        )
        .unwrap()
    }

    #[test]
    fn test_solves_cheapest_food() {
        let ds = dataset(20.0, 100.0);
        let model = build(&ds, &DietRules::default()).unwrap();
        let out = GoodLpSolver.solve(&model);
        assert_eq!(out.status, SolverStatus::Optimal);
        assert!((out.objective_value - 2.0).abs() < 1e-6);
        assert!((out.assignment.value(model.serving_var(0).unwrap()) - 2.0).abs() < 1e-6);
        assert!(out.assignment.value(model.serving_var(1).unwrap()).abs() < 1e-6);
    }

    #[test]
    fn test_reports_infeasible() {
        let ds = dataset(20.0, 10.0);
        let model = build(&ds, &DietRules::default()).unwrap();
        let out = GoodLpSolver.solve(&model);
        assert_eq!(out.status, SolverStatus::Infeasible);
        assert!(out.assignment.is_empty());
    }

    #[test]
    fn test_constant_row_short_circuits() {
        let mut nutrients = HashMap::new();
        nutrients.insert("X".to_string(), 0.0);
        let ds = NutritionDataset::new(
            vec![Food::new("Water", 0.0, nutrients)],
            vec![NutrientBound::new("X", Some(1.0), None)],
        )
        .unwrap();
        let model = build(&ds, &DietRules::default()).unwrap();
        assert!(model.constraint("Min_X").unwrap().expr.is_empty());
        assert_eq!(GoodLpSolver.solve(&model).status, SolverStatus::Infeasible);
    }
}
