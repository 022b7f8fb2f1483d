use serde::Serialize;

use crate::error::{DietError, Result};
use crate::milp::model::{DecisionVariables, LinearConstraint, LinearExpr, Relation, VarId, variable_label};
use crate::models::NutritionDataset;

/// Tag carried by every encoded constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FamilyKind {
    NutrientMin,
    NutrientMax,
    MinServingIfSelected,
    MaxServingLinkedToSelection,
    MutualExclusion,
    MinimumVariety,
}

/// One logical rule, before it is lowered to linear rows.
///
/// Foods are referenced by their index in the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintFamily {
    /// Σ amount·serving >= min
    NutrientMin { nutrient: String, min: f64 },
    /// Σ amount·serving <= max
    NutrientMax { nutrient: String, max: f64 },
    /// serving >= threshold·selected
    MinServingIfSelected { food: usize, threshold: f64 },
    /// serving <= big_m·selected
    MaxServingLinkedToSelection { food: usize, big_m: f64 },
    /// selected(first) + selected(second) == 1
    MutualExclusion { first: usize, second: usize },
    /// Σ selected over `foods` >= minimum
    MinimumVariety {
        label: String,
        foods: Vec<usize>,
        minimum: u32,
    },
}

impl ConstraintFamily {
    pub fn kind(&self) -> FamilyKind {
        match self {
            ConstraintFamily::NutrientMin { .. } => FamilyKind::NutrientMin,
            ConstraintFamily::NutrientMax { .. } => FamilyKind::NutrientMax,
            ConstraintFamily::MinServingIfSelected { .. } => FamilyKind::MinServingIfSelected,
            ConstraintFamily::MaxServingLinkedToSelection { .. } => {
                FamilyKind::MaxServingLinkedToSelection
            }
            ConstraintFamily::MutualExclusion { .. } => FamilyKind::MutualExclusion,
            ConstraintFamily::MinimumVariety { .. } => FamilyKind::MinimumVariety,
        }
    }

    /// Lower the rule to linear constraints over `vars`.
    pub fn encode(
        &self,
        dataset: &NutritionDataset,
        vars: &DecisionVariables,
    ) -> Result<Vec<LinearConstraint>> {
        let kind = self.kind();
        let row = |name: String, expr: LinearExpr, relation: Relation, rhs: f64| LinearConstraint {
            name,
            family: kind,
            expr,
            relation,
            rhs,
        };

        let constraint = match self {
            ConstraintFamily::NutrientMin { nutrient, min } => row(
                format!("Min_{}", nutrient),
                nutrient_sum(dataset, vars, nutrient)?,
                Relation::GreaterEq,
                *min,
            ),
            ConstraintFamily::NutrientMax { nutrient, max } => row(
                format!("Max_{}", nutrient),
                nutrient_sum(dataset, vars, nutrient)?,
                Relation::LessEq,
                *max,
            ),
            ConstraintFamily::MinServingIfSelected { food, threshold } => {
                let expr = LinearExpr::new()
                    .term(serving(vars, *food)?, 1.0)
                    .term(selection(vars, *food)?, -threshold);
                row(
                    format!("Min_serving_{}", food_label(dataset, *food)?),
                    expr,
                    Relation::GreaterEq,
                    0.0,
                )
            }
            ConstraintFamily::MaxServingLinkedToSelection { food, big_m } => {
                let expr = LinearExpr::new()
                    .term(serving(vars, *food)?, 1.0)
                    .term(selection(vars, *food)?, -big_m);
                row(
                    format!("Max_serving_{}", food_label(dataset, *food)?),
                    expr,
                    Relation::LessEq,
                    0.0,
                )
            }
            ConstraintFamily::MutualExclusion { first, second } => {
                let expr = LinearExpr::new()
                    .term(selection(vars, *first)?, 1.0)
                    .term(selection(vars, *second)?, 1.0);
                row(
                    format!(
                        "{}_XOR_{}",
                        food_label(dataset, *first)?,
                        food_label(dataset, *second)?
                    ),
                    expr,
                    Relation::Equal,
                    1.0,
                )
            }
            ConstraintFamily::MinimumVariety {
                label,
                foods,
                minimum,
            } => {
                let expr = foods
                    .iter()
                    .map(|f| selection(vars, *f).map(|v| (v, 1.0)))
                    .collect::<Result<LinearExpr>>()?;
                row(
                    format!("Min_{}_Variety", variable_label(label)),
                    expr,
                    Relation::GreaterEq,
                    f64::from(*minimum),
                )
            }
        };

        Ok(vec![constraint])
    }
}

fn nutrient_sum(
    dataset: &NutritionDataset,
    vars: &DecisionVariables,
    nutrient: &str,
) -> Result<LinearExpr> {
    let column = dataset.nutrient_column(nutrient)?;
    column
        .into_iter()
        .enumerate()
        .map(|(food, amount)| serving(vars, food).map(|v| (v, amount)))
        .collect()
}

fn serving(vars: &DecisionVariables, food: usize) -> Result<VarId> {
    vars.servings
        .get(food)
        .copied()
        .ok_or_else(|| DietError::unknown_food(&format!("#{}", food)))
}

fn selection(vars: &DecisionVariables, food: usize) -> Result<VarId> {
    vars.selections
        .get(food)
        .copied()
        .ok_or_else(|| DietError::unknown_food(&format!("#{}", food)))
}

fn food_label(dataset: &NutritionDataset, food: usize) -> Result<String> {
    dataset
        .foods()
        .get(food)
        .map(|f| variable_label(&f.name))
        .ok_or_else(|| DietError::unknown_food(&format!("#{}", food)))
}
