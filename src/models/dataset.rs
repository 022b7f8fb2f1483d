use std::collections::{HashMap, HashSet};

use crate::error::{DietError, Result};
use crate::models::food::{Food, NutrientBound};

/// One food row exactly as delivered by a loader, before coercion.
#[derive(Debug, Clone, Default)]
pub struct RawFoodRow {
    /// 1-based position in the source table body, used in error messages.
    pub row: usize,
    pub name: String,
    pub cost: String,
    pub serving_size: String,
    /// One cell per entry of [`RawTable::nutrient_columns`].
    pub nutrients: Vec<String>,
}

/// Uncoerced diet table: food rows plus the two bound rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub cost_column: String,
    pub nutrient_columns: Vec<String>,
    pub rows: Vec<RawFoodRow>,
    pub minimum: Vec<String>,
    pub maximum: Vec<String>,
}

/// Validated, immutable foods and nutrient bounds.
///
/// Every food declares exactly the nutrients that carry a bound.
#[derive(Debug, Clone)]
pub struct NutritionDataset {
    foods: Vec<Food>,
    nutrients: Vec<String>,
    bounds: HashMap<String, NutrientBound>,
    index: HashMap<String, usize>,
}

impl NutritionDataset {
    /// Build from already-typed foods and bounds. Nutrient order follows `bounds`.
    pub fn new(foods: Vec<Food>, bounds: Vec<NutrientBound>) -> Result<Self> {
        if foods.is_empty() {
            return Err(DietError::invalid_data("dataset", "no food rows"));
        }

        let mut nutrients = Vec::with_capacity(bounds.len());
        let mut bound_map = HashMap::with_capacity(bounds.len());
        for bound in bounds {
            for (side, value) in [("minimum", bound.min), ("maximum", bound.max)] {
                if value.is_some_and(|v| !v.is_finite()) {
                    return Err(DietError::invalid_data(
                        format!("{} bound of '{}'", side, bound.nutrient),
                        "not a finite number",
                    ));
                }
            }
            if bound_map.contains_key(&bound.nutrient) {
                return Err(DietError::invalid_data(
                    format!("nutrient '{}'", bound.nutrient),
                    "declared more than once",
                ));
            }
            nutrients.push(bound.nutrient.clone());
            bound_map.insert(bound.nutrient.clone(), bound);
        }

        let mut index = HashMap::with_capacity(foods.len());
        for (i, food) in foods.iter().enumerate() {
            validate_food(food, &bound_map)?;
            if index.insert(food.name.clone(), i).is_some() {
                return Err(DietError::invalid_data(
                    format!("food '{}'", food.name),
                    "duplicate food identifier",
                ));
            }
        }

        Ok(Self {
            foods,
            nutrients,
            bounds: bound_map,
            index,
        })
    }

    /// Coerce and validate a raw table.
    pub fn from_table(table: RawTable) -> Result<Self> {
        let width = table.nutrient_columns.len();
        let mut seen = HashSet::new();
        for column in &table.nutrient_columns {
            if column.trim().is_empty() {
                return Err(DietError::invalid_data("header", "empty nutrient column name"));
            }
            if !seen.insert(column.as_str()) {
                return Err(DietError::invalid_data(
                    format!("column '{}'", column),
                    "duplicate nutrient column",
                ));
            }
        }

        let bounds = table
            .nutrient_columns
            .iter()
            .enumerate()
            .map(|(i, nutrient)| {
                NutrientBound::new(
                    nutrient.clone(),
                    parse_bound_cell(table.minimum.get(i)),
                    parse_bound_cell(table.maximum.get(i)),
                )
            })
            .collect();

        let mut foods = Vec::with_capacity(table.rows.len());
        for row in table.rows {
            let name = row.name.trim();
            if name.is_empty() {
                return Err(DietError::invalid_cell(row.row, "food", "missing food identifier"));
            }
            if row.nutrients.len() > width {
                return Err(DietError::invalid_data(
                    format!("row {}", row.row),
                    format!("{} nutrient cells for {} columns", row.nutrients.len(), width),
                ));
            }

            let cost = parse_cost(&row.cost, row.row, &table.cost_column)?;
            let mut nutrients = HashMap::with_capacity(width);
            for (i, column) in table.nutrient_columns.iter().enumerate() {
                let cell = row.nutrients.get(i).map(String::as_str).unwrap_or("");
                nutrients.insert(column.clone(), parse_nutrient_cell(cell, row.row, column)?);
            }

            let serving_size = row.serving_size.trim();
            foods.push(Food {
                name: name.to_string(),
                cost,
                serving_size: (!serving_size.is_empty()).then(|| serving_size.to_string()),
                nutrients,
            });
        }

        Self::new(foods, bounds)
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn food_names(&self) -> Vec<&str> {
        self.foods.iter().map(|f| f.name.as_str()).collect()
    }

    /// Nutrient names in table order.
    pub fn nutrients(&self) -> &[String] {
        &self.nutrients
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    pub fn food_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_nutrient(&self, nutrient: &str) -> bool {
        self.bounds.contains_key(nutrient)
    }

    pub fn food(&self, name: &str) -> Result<&Food> {
        self.food_index(name)
            .map(|i| &self.foods[i])
            .ok_or_else(|| DietError::unknown_food(name))
    }

    pub fn cost(&self, food: &str) -> Result<f64> {
        self.food(food).map(|f| f.cost)
    }

    pub fn nutrient_value(&self, food: &str, nutrient: &str) -> Result<f64> {
        let food = self.food(food)?;
        food.nutrient(nutrient)
            .ok_or_else(|| DietError::unknown_nutrient(nutrient))
    }

    /// (min, max) with absent sides as 0 and +infinity.
    pub fn bound(&self, nutrient: &str) -> Result<(f64, f64)> {
        self.declared_bound(nutrient)
            .map(|b| (b.effective_min(), b.effective_max()))
    }

    /// The bound exactly as declared, absent sides preserved.
    pub fn declared_bound(&self, nutrient: &str) -> Result<&NutrientBound> {
        self.bounds
            .get(nutrient)
            .ok_or_else(|| DietError::unknown_nutrient(nutrient))
    }

    /// Per-serving amounts of `nutrient` for every food, in food order.
    pub fn nutrient_column(&self, nutrient: &str) -> Result<Vec<f64>> {
        if !self.has_nutrient(nutrient) {
            return Err(DietError::unknown_nutrient(nutrient));
        }
        self.foods
            .iter()
            .map(|f| {
                f.nutrient(nutrient)
                    .ok_or_else(|| DietError::unknown_nutrient(nutrient))
            })
            .collect()
    }

    /// Closest food name by Jaro-Winkler similarity, for "did you mean" hints.
    pub fn closest_food(&self, name: &str) -> Option<&str> {
        self.foods
            .iter()
            .map(|f| (f.name.as_str(), strsim::jaro_winkler(name, &f.name)))
            .filter(|(_, score)| *score >= 0.85)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, _)| n)
    }
}

fn validate_food(food: &Food, bounds: &HashMap<String, NutrientBound>) -> Result<()> {
    let location = || format!("food '{}'", food.name);

    if food.name.trim().is_empty() {
        return Err(DietError::invalid_data("food", "missing food identifier"));
    }
    if !food.cost.is_finite() || food.cost < 0.0 {
        return Err(DietError::invalid_data(
            location(),
            format!("cost must be a non-negative number, got {}", food.cost),
        ));
    }
    for (nutrient, value) in &food.nutrients {
        if !bounds.contains_key(nutrient) {
            return Err(DietError::invalid_data(
                location(),
                format!("nutrient '{}' has no declared bound", nutrient),
            ));
        }
        if !value.is_finite() {
            return Err(DietError::invalid_data(
                location(),
                format!("nutrient '{}' is not a finite number", nutrient),
            ));
        }
    }
    if let Some(missing) = bounds.keys().find(|n| !food.nutrients.contains_key(*n)) {
        return Err(DietError::invalid_data(
            location(),
            format!("missing nutrient '{}'", missing),
        ));
    }
    Ok(())
}

fn parse_cost(cell: &str, row: usize, column: &str) -> Result<f64> {
    let trimmed = cell.trim();
    let cost: f64 = trimmed
        .parse()
        .map_err(|_| DietError::invalid_cell(row, column, format!("'{}' is not a number", trimmed)))?;
    if !cost.is_finite() || cost < 0.0 {
        return Err(DietError::invalid_cell(
            row,
            column,
            format!("cost must be a non-negative number, got {}", trimmed),
        ));
    }
    Ok(cost)
}

/// Empty nutrient cells count as zero; anything else must be a real number.
fn parse_nutrient_cell(cell: &str, row: usize, column: &str) -> Result<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DietError::invalid_cell(
            row,
            column,
            format!("'{}' is not a real number", trimmed),
        )),
    }
}

/// Bound cells that are empty or non-numeric mean "no limit".
fn parse_bound_cell(cell: Option<&String>) -> Option<f64> {
    cell.and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
