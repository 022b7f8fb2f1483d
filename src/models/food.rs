use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A purchasable food with its unit cost and per-serving nutrient amounts.
///
/// Nutrient amounts carry no sign assumption; some tables use negative
/// offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub name: String,

    /// Price of one serving.
    pub cost: f64,

    /// Informational label such as "1/2 Cup". Never used in constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,

    pub nutrients: HashMap<String, f64>,
}

impl Food {
    pub fn new(name: impl Into<String>, cost: f64, nutrients: HashMap<String, f64>) -> Self {
        Self {
            name: name.into(),
            cost,
            serving_size: None,
            nutrients,
        }
    }

    /// Amount of `nutrient` in one serving, if the food declares it.
    #[inline]
    pub fn nutrient(&self, nutrient: &str) -> Option<f64> {
        self.nutrients.get(nutrient).copied()
    }
}

/// Declared lower and upper limits for one nutrient.
///
/// A missing side is "no limit": it never becomes a constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientBound {
    pub nutrient: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NutrientBound {
    pub fn new(nutrient: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            nutrient: nutrient.into(),
            min,
            max,
        }
    }

    /// Minimum with absent treated as 0.
    #[inline]
    pub fn effective_min(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    /// Maximum with absent treated as +infinity.
    #[inline]
    pub fn effective_max(&self) -> f64 {
        self.max.unwrap_or(f64::INFINITY)
    }

    /// Whether `value` respects every declared side.
    ///
    /// Slack is `epsilon` scaled by the bound magnitude (at least 1), so large
    /// totals such as calories tolerate the same relative solver noise.
    pub fn admits(&self, value: f64, epsilon: f64) -> bool {
        let slack = |b: f64| epsilon * b.abs().max(1.0);
        let above_min = self.min.map_or(true, |lo| value >= lo - slack(lo));
        let below_max = self.max.map_or(true, |hi| value <= hi + slack(hi));
        above_min && below_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_food() -> Food {
        let mut nutrients = HashMap::new();
        nutrients.insert("Calories".to_string(), 72.2);
        nutrients.insert("Protein g".to_string(), 1.8);
        Food::new("Peanut Butter", 0.07, nutrients)
    }

    #[test]
    fn test_nutrient_lookup() {
        let food = sample_food();
        assert!((food.nutrient("Protein g").unwrap() - 1.8).abs() < 1e-9);
        assert!(food.nutrient("Sodium mg").is_none());
    }

    #[test]
    fn test_effective_bounds() {
        let open = NutrientBound::new("Iron mg", None, None);
        assert_eq!(open.effective_min(), 0.0);
        assert!(open.effective_max().is_infinite());

        let closed = NutrientBound::new("Iron mg", Some(10.0), Some(40.0));
        assert_eq!(closed.effective_min(), 10.0);
        assert_eq!(closed.effective_max(), 40.0);
    }

    #[test]
    fn test_admits_respects_declared_sides_only() {
        let bound = NutrientBound::new("Sodium mg", None, Some(2000.0));
        assert!(bound.admits(-5.0, 1e-6));
        assert!(bound.admits(2000.0000001, 1e-6));
        assert!(!bound.admits(2001.0, 1e-6));

        let floor = NutrientBound::new("Protein g", Some(0.0), None);
        assert!(!floor.admits(-0.1, 1e-6));
    }
}
