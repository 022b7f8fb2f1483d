use serde::{Deserialize, Serialize};

use crate::error::{DietError, Result};
use crate::models::NutrientBound;
use crate::planner::constants::{
    CLASSIC_EXCLUSIVE_PAIR, DEFAULT_BIG_M, DEFAULT_MIN_SERVING, MEAT_POULTRY_FISH_EGGS,
    MIN_MEAT_VARIETY,
};

/// "If a food is chosen, buy at least `threshold` servings of it."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinServingRule {
    pub enabled: bool,
    pub threshold: f64,
}

impl Default for MinServingRule {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_MIN_SERVING,
        }
    }
}

impl MinServingRule {
    /// Threshold actually encoded; 0 when the rule is off.
    pub fn effective_threshold(&self) -> f64 {
        if self.enabled { self.threshold } else { 0.0 }
    }
}

/// How the big-M of the serving/selection linkage is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BigM {
    /// Per food, the tightest serving cap implied by nutrient maxima,
    /// or `fallback` when no maximum caps the food.
    Derived { fallback: f64 },
    /// The same constant for every food.
    Fixed { value: f64 },
}

impl Default for BigM {
    fn default() -> Self {
        BigM::Derived {
            fallback: DEFAULT_BIG_M,
        }
    }
}

impl BigM {
    pub fn constant(&self) -> f64 {
        match self {
            BigM::Derived { fallback } => *fallback,
            BigM::Fixed { value } => *value,
        }
    }
}

/// Exactly one of the two foods must be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusivePair(pub String, pub String);

/// At least `minimum` distinct foods of `foods` must be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarietyRule {
    pub label: String,
    pub foods: Vec<String>,
    pub minimum: u32,
}

/// Optional constraint families applied on top of the nutrient bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietRules {
    pub min_serving: MinServingRule,
    pub big_m: BigM,
    pub mutual_exclusion: Vec<ExclusivePair>,
    pub minimum_variety: Vec<VarietyRule>,

    /// Replace the dataset's bound for these nutrients.
    pub bound_overrides: Vec<NutrientBound>,

    /// Nutrients that must exist in the dataset for the model to be meaningful.
    pub required_nutrients: Vec<String>,
}

impl DietRules {
    /// The classic diet-table rules: celery xor broccoli, and three
    /// different meat/poultry/fish/egg dishes.
    pub fn classic() -> Self {
        DietRules::default()
            .with_exclusion(CLASSIC_EXCLUSIVE_PAIR.0, CLASSIC_EXCLUSIVE_PAIR.1)
            .with_variety("Meat", MEAT_POULTRY_FISH_EGGS.iter().copied(), MIN_MEAT_VARIETY)
    }

    pub fn with_exclusion(mut self, first: &str, second: &str) -> Self {
        self.mutual_exclusion
            .push(ExclusivePair(first.to_string(), second.to_string()));
        self
    }

    pub fn with_variety<'a>(
        mut self,
        label: &str,
        foods: impl IntoIterator<Item = &'a str>,
        minimum: u32,
    ) -> Self {
        self.minimum_variety.push(VarietyRule {
            label: label.to_string(),
            foods: foods.into_iter().map(str::to_string).collect(),
            minimum,
        });
        self
    }

    pub fn with_min_serving(mut self, threshold: f64) -> Self {
        self.min_serving = MinServingRule {
            enabled: true,
            threshold,
        };
        self
    }

    pub fn without_min_serving(mut self) -> Self {
        self.min_serving.enabled = false;
        self
    }

    pub fn with_big_m(mut self, big_m: BigM) -> Self {
        self.big_m = big_m;
        self
    }

    pub fn with_bound_override(mut self, bound: NutrientBound) -> Self {
        self.bound_overrides.push(bound);
        self
    }

    pub fn requiring_nutrient(mut self, nutrient: &str) -> Self {
        self.required_nutrients.push(nutrient.to_string());
        self
    }

    /// Reject rule values that could never form a sensible model.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.min_serving.threshold;
        if self.min_serving.enabled && (!threshold.is_finite() || threshold < 0.0) {
            return Err(DietError::InvalidRule(format!(
                "minimum serving threshold must be a non-negative number, got {}",
                threshold
            )));
        }

        let m = self.big_m.constant();
        if !m.is_finite() || m <= 0.0 {
            return Err(DietError::InvalidRule(format!(
                "big-M must be a positive number, got {}",
                m
            )));
        }

        if let Some(pair) = self.mutual_exclusion.iter().find(|p| p.0 == p.1) {
            return Err(DietError::InvalidRule(format!(
                "'{}' cannot be mutually exclusive with itself",
                pair.0
            )));
        }

        for bound in &self.bound_overrides {
            if [bound.min, bound.max]
                .into_iter()
                .flatten()
                .any(|v| !v.is_finite())
            {
                return Err(DietError::InvalidRule(format!(
                    "override for '{}' is not a finite number",
                    bound.nutrient
                )));
            }
        }

        Ok(())
    }
}
