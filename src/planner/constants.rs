/// Minimum servings of a food once it is selected.
pub const DEFAULT_MIN_SERVING: f64 = 0.1;

/// Big-M used when no nutrient maximum bounds a food's servings.
pub const DEFAULT_BIG_M: f64 = 1000.0;

/// Solver values with magnitude below this are treated as exactly zero.
pub const SERVING_EPSILON: f64 = 1e-6;

/// Relative slack when checking recomputed totals against bounds.
pub const BOUND_EPSILON: f64 = 1e-4;

/// Relative slack when comparing solver objective with recomputed cost.
pub const OBJECTIVE_EPSILON: f64 = 1e-4;

/// Binary values above this count as "selected".
pub const SELECTION_THRESHOLD: f64 = 0.5;

// ─────────────────────────────────────────────────────────────────────────────
// Classic diet table rules
// ─────────────────────────────────────────────────────────────────────────────

/// Exactly one of these two vegetables must be on the plan.
pub const CLASSIC_EXCLUSIVE_PAIR: (&str, &str) = ("Celery, Raw", "Frozen Broccoli");

/// Meat, poultry, fish and egg dishes of the classic diet table.
pub const MEAT_POULTRY_FISH_EGGS: &[&str] = &[
    "Roasted Chicken",
    "Poached Eggs",
    "Scrambled Eggs",
    "Bologna,Turkey",
    "Frankfurter, Beef",
    "Ham,Sliced,Extralean",
    "Kielbasa,Prk",
    "Hamburger W/Toppings",
    "Hotdog, Plain",
    "Pork",
    "Sardines in Oil",
    "White Tuna in Water",
    "Chicknoodl Soup",
    "Splt Pea&Hamsoup",
    "Vegetbeef Soup",
    "Neweng Clamchwd",
    "New E Clamchwd,W/Mlk",
    "Beanbacn Soup,W/Watr",
];

/// Distinct meat/poultry/fish/egg foods required by the classic rules.
pub const MIN_MEAT_VARIETY: u32 = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Table layout
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_FOOD_COLUMN: &str = "Foods";
pub const DEFAULT_COST_COLUMN: &str = "Price/ Serving";
pub const DEFAULT_SERVING_COLUMN: &str = "Serving Size";

/// Food-column labels marking the bound rows (matched case-insensitively as prefixes).
pub const MINIMUM_ROW_LABEL: &str = "minimum";
pub const MAXIMUM_ROW_LABEL: &str = "maximum";
