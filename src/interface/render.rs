use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{NutritionDataset, SolveStatus, SolvedPlan};
use crate::planner::PlanOutcome;

fn bound_text(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{}", v))
}

/// Print the outcome of a run: status, cost, shopping list and nutrient totals.
pub fn display_report(outcome: &PlanOutcome) {
    println!("Optimized model - Minimize cost");
    println!("Status: {}", outcome.status());

    match outcome {
        PlanOutcome::Solved(plan) => display_plan(plan),
        PlanOutcome::Unsolved { status, detail } => {
            println!("{}", unsolved_message(*status));
            if let Some(detail) = detail {
                println!("Solver: {}", detail);
            }
        }
    }
}

/// Line shown when no plan came back.
fn unsolved_message(status: SolveStatus) -> &'static str {
    match status {
        SolveStatus::Infeasible => "No feasible diet under these constraints.",
        SolveStatus::Unbounded => "The model is unbounded; check for negative costs or missing bounds.",
        SolveStatus::NotSolved => "The solver failed before reaching a verdict.",
        SolveStatus::Optimal => "The solver reported an optimum without a plan.",
    }
}

/// Print a solved plan.
pub fn display_plan(plan: &SolvedPlan) {
    println!("Total Cost: ${:.2} per day", plan.total_cost);

    println!();
    println!("Foods to buy:");
    let width = plan
        .foods_to_buy()
        .map(|s| s.food.len())
        .max()
        .unwrap_or(10);
    for item in plan.foods_to_buy() {
        println!(
            "  {:<width$}  {:>8.2} servings  ${:.2}",
            item.food,
            item.servings,
            item.cost,
            width = width
        );
    }

    println!();
    println!("Nutrient Totals:");
    let width = plan
        .nutrient_totals
        .iter()
        .map(|t| t.nutrient.len())
        .max()
        .unwrap_or(10);
    for total in &plan.nutrient_totals {
        let flag = if total.within_bounds { "" } else { "  [out of bounds]" };
        println!(
            "  {:<width$}  {:>10.2} (Min: {}, Max: {}){}",
            total.nutrient,
            total.total,
            bound_text(total.min),
            bound_text(total.max),
            flag,
            width = width
        );
    }

    if !plan.audit.is_empty() {
        println!();
        println!("--- Audit ---");
        for finding in &plan.audit {
            println!("  {}", finding);
        }
    }
    println!();
}

/// Print the foods, nutrients and bounds of a dataset without solving.
pub fn display_dataset_summary(dataset: &NutritionDataset) {
    println!();
    println!("=== Foods ({} items) ===", dataset.len());
    for food in dataset.foods() {
        let serving = food.serving_size.as_deref().unwrap_or("-");
        println!("  {} - ${:.2} per {}", food.name, food.cost, serving);
    }

    println!();
    println!("=== Nutrient Bounds ({} nutrients) ===", dataset.nutrients().len());
    for nutrient in dataset.nutrients() {
        if let Ok(bound) = dataset.declared_bound(nutrient) {
            println!(
                "  {} (Min: {}, Max: {})",
                nutrient,
                bound_text(bound.min),
                bound_text(bound.max)
            );
        }
    }
    println!();
}

/// Build the JSON report handed to presentation layers.
pub fn report_json(outcome: &PlanOutcome) -> serde_json::Value {
    match outcome {
        PlanOutcome::Solved(plan) => {
            let foods: Vec<serde_json::Value> = plan
                .foods_to_buy()
                .map(|s| serde_json::json!({ "food": s.food, "servings": s.servings }))
                .collect();
            serde_json::json!({
                "status": plan.status,
                "total_cost": plan.total_cost,
                "foods": foods,
                "nutrients": plan.nutrient_totals,
                "audit": plan.audit,
            })
        }
        PlanOutcome::Unsolved { status, detail } => serde_json::json!({
            "status": status,
            "detail": detail,
        }),
    }
}

/// Write the JSON report to a file.
pub fn write_report_json(outcome: &PlanOutcome, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&report_json(outcome))?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodServing, NutrientTotal};

    fn plan() -> SolvedPlan {
        SolvedPlan {
            status: SolveStatus::Optimal,
            total_cost: 2.0,
            objective_value: 2.0,
            servings: vec![
                FoodServing {
                    food: "A".to_string(),
                    servings: 2.0,
                    selected: true,
                    cost: 2.0,
                },
                FoodServing {
                    food: "B".to_string(),
                    servings: 0.0,
                    selected: false,
                    cost: 0.0,
                },
            ],
            nutrient_totals: vec![NutrientTotal {
                nutrient: "X".to_string(),
                total: 20.0,
                min: Some(20.0),
                max: None,
                within_bounds: true,
            }],
            audit: Vec::new(),
        }
    }

    #[test]
    fn test_report_json_lists_only_bought_foods() {
        let json = report_json(&PlanOutcome::Solved(plan()));
        assert_eq!(json["status"], "Optimal");
        assert_eq!(json["foods"].as_array().unwrap().len(), 1);
        assert_eq!(json["foods"][0]["food"], "A");
        assert_eq!(json["nutrients"][0]["max"], serde_json::Value::Null);
    }

    #[test]
    fn test_report_json_unsolved() {
        let outcome = PlanOutcome::Unsolved {
            status: SolveStatus::Infeasible,
            detail: None,
        };
        let json = report_json(&outcome);
        assert_eq!(json["status"], "Infeasible");
        assert!(json.get("foods").is_none());
    }

    #[test]
    fn test_unsolved_message_separates_infeasible_from_failure() {
        assert_eq!(
            unsolved_message(SolveStatus::Infeasible),
            "No feasible diet under these constraints."
        );
        assert!(unsolved_message(SolveStatus::Unbounded).contains("unbounded"));

        let failure = unsolved_message(SolveStatus::NotSolved);
        assert!(failure.contains("solver failed"));
        assert!(!failure.contains("feasible"));
        assert!(!unsolved_message(SolveStatus::Unbounded).contains("feasible"));
    }

    #[test]
    fn test_bound_text() {
        assert_eq!(bound_text(None), "-");
        assert_eq!(bound_text(Some(2500.0)), "2500");
        assert_eq!(bound_text(Some(0.5)), "0.5");
    }
}
