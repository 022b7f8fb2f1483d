use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::{DietError, Result};
use crate::milp::families::ConstraintFamily;
use crate::milp::model::{LinearExpr, Model};
use crate::milp::rules::{BigM, DietRules};
use crate::models::{NutrientBound, NutritionDataset};

/// Build the cost-minimising MILP for `dataset` under `rules`.
///
/// Rules naming foods that are not in the dataset are skipped; rules naming
/// nutrients that are not in the dataset fail with `UnresolvedReference`.
pub fn build(dataset: &NutritionDataset, rules: &DietRules) -> Result<Model> {
    rules.validate()?;
    let bounds = resolve_bounds(dataset, rules)?;

    let mut model = Model::for_dataset(dataset);
    let objective: LinearExpr = dataset
        .foods()
        .iter()
        .zip(&model.decisions().servings)
        .map(|(food, var)| (*var, food.cost))
        .collect();
    model.set_objective(objective);

    let families = plan_families(dataset, rules, &bounds);
    for family in families {
        let rows = family.encode(dataset, model.decisions())?;
        for row in rows {
            debug!("{}", row);
            model.add_constraint(row);
        }
        model.record_family(family);
    }
    model.set_bounds(bounds);

    info!(
        "Built model: {} foods, {} variables, {} constraints",
        dataset.len(),
        model.num_variables(),
        model.constraints().len()
    );
    Ok(model)
}

/// Dataset bounds with rule overrides applied, in dataset nutrient order.
pub fn resolve_bounds(dataset: &NutritionDataset, rules: &DietRules) -> Result<Vec<NutrientBound>> {
    for nutrient in &rules.required_nutrients {
        if !dataset.has_nutrient(nutrient) {
            return Err(DietError::UnresolvedReference {
                nutrient: nutrient.clone(),
                context: "required nutrients".to_string(),
            });
        }
    }

    let mut bounds = dataset
        .nutrients()
        .iter()
        .map(|n| dataset.declared_bound(n).cloned())
        .collect::<Result<Vec<_>>>()?;

    for over in &rules.bound_overrides {
        let slot = bounds
            .iter_mut()
            .find(|b| b.nutrient == over.nutrient)
            .ok_or_else(|| DietError::UnresolvedReference {
                nutrient: over.nutrient.clone(),
                context: "bound override".to_string(),
            })?;
        debug!(
            "Override {}: [{:?}, {:?}] -> [{:?}, {:?}]",
            over.nutrient, slot.min, slot.max, over.min, over.max
        );
        *slot = over.clone();
    }

    Ok(bounds)
}

/// Every constraint family the rules call for, in encoding order:
/// nutrient bounds, selection linkage, exclusions, variety.
pub fn plan_families(
    dataset: &NutritionDataset,
    rules: &DietRules,
    bounds: &[NutrientBound],
) -> Vec<ConstraintFamily> {
    let mut families = Vec::new();

    for bound in bounds {
        if let Some(min) = bound.min {
            families.push(ConstraintFamily::NutrientMin {
                nutrient: bound.nutrient.clone(),
                min,
            });
        }
        if let Some(max) = bound.max {
            families.push(ConstraintFamily::NutrientMax {
                nutrient: bound.nutrient.clone(),
                max,
            });
        }
    }

    let threshold = rules.min_serving.effective_threshold();
    let big_ms = big_m_per_food(dataset, bounds, rules.big_m);
    for (food, big_m) in big_ms.into_iter().enumerate() {
        if threshold > 0.0 {
            families.push(ConstraintFamily::MinServingIfSelected { food, threshold });
        }
        families.push(ConstraintFamily::MaxServingLinkedToSelection { food, big_m });
    }

    for pair in &rules.mutual_exclusion {
        match (resolve_food(dataset, &pair.0), resolve_food(dataset, &pair.1)) {
            (Some(first), Some(second)) => {
                families.push(ConstraintFamily::MutualExclusion { first, second });
            }
            _ => debug!(
                "Skipping exclusion '{}' / '{}': not both foods are in the dataset",
                pair.0, pair.1
            ),
        }
    }

    for rule in &rules.minimum_variety {
        let mut seen = HashSet::new();
        let present: Vec<usize> = rule
            .foods
            .iter()
            .filter_map(|name| resolve_food(dataset, name))
            .filter(|i| seen.insert(*i))
            .collect();

        info!(
            "{} variety: {} of {} listed foods available",
            rule.label,
            present.len(),
            rule.foods.len()
        );
        if present.is_empty() || rule.minimum == 0 {
            continue;
        }
        if present.len() < rule.minimum as usize {
            warn!(
                "{} variety needs {} foods but only {} are available; the model will be infeasible",
                rule.label,
                rule.minimum,
                present.len()
            );
        }
        families.push(ConstraintFamily::MinimumVariety {
            label: rule.label.clone(),
            foods: present,
            minimum: rule.minimum,
        });
    }

    families
}

/// Big-M for every food, in dataset order.
///
/// With [`BigM::Derived`], a nutrient maximum `hi` caps servings of food `f`
/// at `hi / amount(f)` when `amount(f) > 0` and no food has a negative amount
/// of that nutrient. The smallest cap wins; foods without one use the
/// fallback.
pub fn big_m_per_food(dataset: &NutritionDataset, bounds: &[NutrientBound], big_m: BigM) -> Vec<f64> {
    let fallback = match big_m {
        BigM::Fixed { value } => return vec![value; dataset.len()],
        BigM::Derived { fallback } => fallback,
    };

    let mut caps: Vec<Option<f64>> = vec![None; dataset.len()];
    for bound in bounds {
        let Some(hi) = bound.max else { continue };
        let Ok(column) = dataset.nutrient_column(&bound.nutrient) else { continue };
        if column.iter().any(|a| *a < 0.0) {
            continue;
        }
        for (cap, amount) in caps.iter_mut().zip(&column) {
            if *amount > 0.0 {
                let limit = (hi / amount).max(0.0);
                *cap = Some(cap.map_or(limit, |c| c.min(limit)));
            }
        }
    }

    caps.into_iter()
        .zip(dataset.foods())
        .map(|(cap, food)| {
            let m = cap.unwrap_or(fallback);
            debug!("Big-M for {}: {}", food.name, m);
            m
        })
        .collect()
}

fn resolve_food(dataset: &NutritionDataset, name: &str) -> Option<usize> {
    let found = dataset.food_index(name);
    if found.is_none() {
        match dataset.closest_food(name) {
            Some(close) => warn!("Rule food '{}' not in dataset (did you mean '{}'?)", name, close),
            None => debug!("Rule food '{}' not in dataset", name),
        }
    }
    found
}
