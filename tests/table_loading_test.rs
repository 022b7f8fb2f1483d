#[macro_use]
extern crate assert_float_eq;

use std::io::Write;

use tempfile::NamedTempFile;

use diet_optimizer_rs::data::{OptimizerConfig, TableLayout, load_config, load_table, save_config};
use diet_optimizer_rs::error::DietError;
use diet_optimizer_rs::interface::{report_json, write_report_json};
use diet_optimizer_rs::milp::{BigM, DietRules, FamilyKind, build};
use diet_optimizer_rs::models::{NutritionDataset, SolveStatus};
use diet_optimizer_rs::planner::DietOptimizer;
use diet_optimizer_rs::solver::GoodLpSolver;

/// A cut-down diet table in the classic layout, labelled bound rows at the end.
const DIET_TABLE: &str = "\
Foods,Price/ Serving,Serving Size,Calories,Protein g,Vit_C IU
Frozen Broccoli,0.16,10 Oz Pkg,73.8,8,160.2
\"Celery, Raw\",0.04,1 Stalk,6.4,0.3,2.8
Oatmeal,0.11,1 Cup,145.1,6.1,0
Roasted Chicken,0.84,1 lb chicken,277.4,42.2,0
Poached Eggs,0.08,Lrg Egg,74.5,6.2,0
\"Hotdog, Plain\",0.31,1 Hotdog,242.1,10.4,0
White Tuna in Water,0.69,3 Oz,115.6,22.7,0
Oranges,0.15,1 Fruit,61.6,1.2,69.7
,,,,,
Minimum daily intake,,,1500,60,50
Maximum daily intake,,,2500,100,
";

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn load(content: &str) -> NutritionDataset {
    let file = write_temp(content);
    let raw = load_table(file.path(), &TableLayout::default()).unwrap();
    NutritionDataset::from_table(raw).unwrap()
}

#[test]
fn test_table_is_typed_and_bounds_resolved() {
    let dataset = load(DIET_TABLE);

    assert_eq!(dataset.len(), 8);
    assert_eq!(dataset.nutrients(), ["Calories", "Protein g", "Vit_C IU"]);
    assert_float_absolute_eq!(dataset.cost("Celery, Raw").unwrap(), 0.04, 1e-12);
    assert_float_absolute_eq!(dataset.nutrient_value("Oatmeal", "Vit_C IU").unwrap(), 0.0, 1e-12);

    let vit_c = dataset.declared_bound("Vit_C IU").unwrap();
    assert_eq!(vit_c.min, Some(50.0));
    assert_eq!(vit_c.max, None);
    assert_eq!(dataset.bound("Vit_C IU").unwrap().1, f64::INFINITY);
}

#[test]
fn test_classic_rules_end_to_end() {
    let dataset = load(DIET_TABLE);
    let rules = DietRules::classic();

    let model = build(&dataset, &rules).unwrap();
    assert!(model.constraint("Celery__Raw_XOR_Frozen_Broccoli").is_some());
    assert_eq!(model.constraints_of(FamilyKind::MinimumVariety).count(), 1);
    assert!(model.constraint("Min_Meat_Variety").is_some());
    // Vit_C has no maximum
    assert!(model.constraint("Min_Vit_C IU").is_some());
    assert!(model.constraint("Max_Vit_C IU").is_none());

    let optimizer = DietOptimizer::new(GoodLpSolver, rules);
    let plan = optimizer.optimize(&dataset).unwrap().into_plan().unwrap();

    assert_eq!(plan.status, SolveStatus::Optimal);
    assert!(plan.is_consistent(), "audit findings: {:?}", plan.audit);
    assert!(plan.is_selected("Celery, Raw") ^ plan.is_selected("Frozen Broccoli"));

    let meats = ["Roasted Chicken", "Poached Eggs", "Hotdog, Plain", "White Tuna in Water"]
        .iter()
        .filter(|f| plan.is_selected(f))
        .count();
    assert!(meats >= 3, "only {} meat dishes", meats);

    let calories = plan.nutrient_total("Calories").unwrap();
    assert!(calories.total >= 1500.0 - 1e-3 && calories.total <= 2500.0 + 1e-3);
}

#[test]
fn test_report_json_written_to_disk() {
    let dataset = load(DIET_TABLE);
    let outcome = DietOptimizer::new(GoodLpSolver, DietRules::default())
        .optimize(&dataset)
        .unwrap();

    let out = NamedTempFile::new().unwrap();
    write_report_json(&outcome, out.path()).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.path()).unwrap()).unwrap();
    assert_eq!(written, report_json(&outcome));
    assert_eq!(written["status"], "Optimal");
    assert_eq!(written["nutrients"].as_array().unwrap().len(), 3);
}

#[test]
fn test_bad_cell_is_reported_with_location() {
    let table = "\
Foods,Price/ Serving,Calories
Oatmeal,0.11,lots
Minimum,,1500
Maximum,,2500
";
    let file = write_temp(table);
    let raw = load_table(file.path(), &TableLayout::default()).unwrap();
    let err = NutritionDataset::from_table(raw).unwrap_err();

    assert!(matches!(err, DietError::InvalidData { .. }));
    let message = err.to_string();
    assert!(message.contains("row 1"), "{}", message);
    assert!(message.contains("Calories"), "{}", message);
}

#[test]
fn test_config_round_trip_drives_the_solve() {
    let config = OptimizerConfig {
        rules: DietRules::default()
            .with_exclusion("Celery, Raw", "Frozen Broccoli")
            .with_big_m(BigM::Fixed { value: 50.0 }),
        solve_timeout_secs: Some(30),
        ..Default::default()
    };
    let file = NamedTempFile::new().unwrap();
    save_config(file.path(), &config).unwrap();

    let loaded = load_config(file.path()).unwrap();
    assert_eq!(loaded, config);

    let dataset = load(DIET_TABLE);
    let plan = DietOptimizer::new(GoodLpSolver, loaded.rules)
        .with_tolerances(loaded.tolerances)
        .optimize(&dataset)
        .unwrap()
        .into_plan()
        .unwrap();
    assert!(plan.servings.iter().all(|s| s.servings <= 50.0 + 1e-6));
}

#[test]
fn test_invalid_rules_in_config_are_rejected() {
    let file = write_temp(r#"{"rules": {"mutual_exclusion": [["Oatmeal", "Oatmeal"]]}}"#);
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, DietError::InvalidRule(_)));
}

#[test]
fn test_config_layout_reads_custom_columns() {
    let config = write_temp(r#"{"layout": {"food_column": "Item", "cost_column": "Cost"}}"#);
    let table = write_temp("Item,Cost,Fiber g\nOats,0.2,4\nMinimum,,10\nMaximum,,40\n");

    let layout = load_config(config.path()).unwrap().layout;
    assert_eq!(layout.serving_column, "Serving Size");
    let dataset = NutritionDataset::from_table(load_table(table.path(), &layout).unwrap()).unwrap();
    assert_eq!(dataset.food_names(), ["Oats"]);
    assert_eq!(dataset.nutrients(), ["Fiber g"]);

    // the default layout cannot find the food column
    assert!(load_table(table.path(), &TableLayout::default()).is_err());
}
