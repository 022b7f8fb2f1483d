use std::fmt;

use crate::milp::families::{ConstraintFamily, FamilyKind};
use crate::models::{NutrientBound, NutritionDataset};

/// Handle of a variable inside one [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Continuous,
    Binary,
}

/// Declaration of one decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: Option<f64>,
}

/// Sum of `coefficient × variable` terms. Zero coefficients are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coefficient × var`, returning the expression for chaining.
    pub fn term(mut self, var: VarId, coefficient: f64) -> Self {
        self.push(var, coefficient);
        self
    }

    pub fn push(&mut self, var: VarId, coefficient: f64) {
        if coefficient != 0.0 {
            self.terms.push((var, coefficient));
        }
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Combined coefficient of `var` (0 if absent).
    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| *v == var)
            .map(|(_, c)| c)
            .sum()
    }

    /// Value of the expression under `values`, indexed by [`VarId::index`].
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpr::new();
        for (var, coefficient) in iter {
            expr.push(var, coefficient);
        }
        expr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

impl Relation {
    /// Whether `lhs <relation> rhs` holds within `tolerance`.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Relation::LessEq => lhs <= rhs + tolerance,
            Relation::GreaterEq => lhs >= rhs - tolerance,
            Relation::Equal => (lhs - rhs).abs() <= tolerance,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Relation::LessEq => "<=",
            Relation::GreaterEq => ">=",
            Relation::Equal => "==",
        }
    }
}

/// `expr <relation> rhs`, tagged with the family that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub family: FamilyKind,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.relation
            .holds(self.expr.evaluate(values), self.rhs, tolerance)
    }
}

/// Per-food serving and selection variables, indexed like the dataset's foods.
#[derive(Debug, Clone, Default)]
pub struct DecisionVariables {
    pub servings: Vec<VarId>,
    pub selections: Vec<VarId>,
}

/// A minimisation MILP over food servings and selection indicators.
#[derive(Debug, Clone)]
pub struct Model {
    variables: Vec<VariableDef>,
    objective: LinearExpr,
    constraints: Vec<LinearConstraint>,
    decisions: DecisionVariables,
    families: Vec<ConstraintFamily>,
    bounds: Vec<NutrientBound>,
}

impl Model {
    /// Fresh model with one continuous serving variable (>= 0) and one binary
    /// selection variable per food, and no constraints yet.
    pub fn for_dataset(dataset: &NutritionDataset) -> Self {
        let mut model = Model {
            variables: Vec::with_capacity(dataset.len() * 2),
            objective: LinearExpr::new(),
            constraints: Vec::new(),
            decisions: DecisionVariables::default(),
            families: Vec::new(),
            bounds: Vec::new(),
        };

        for food in dataset.foods() {
            let label = variable_label(&food.name);
            let serving = model.add_variable(VariableDef {
                name: label.clone(),
                kind: VarKind::Continuous,
                lower: 0.0,
                upper: None,
            });
            let selection = model.add_variable(VariableDef {
                name: format!("Selected_{}", label),
                kind: VarKind::Binary,
                lower: 0.0,
                upper: Some(1.0),
            });
            model.decisions.servings.push(serving);
            model.decisions.selections.push(selection);
        }

        model
    }

    pub fn add_variable(&mut self, def: VariableDef) -> VarId {
        self.variables.push(def);
        VarId(self.variables.len() - 1)
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub(crate) fn record_family(&mut self, family: ConstraintFamily) {
        self.families.push(family);
    }

    pub(crate) fn set_bounds(&mut self, bounds: Vec<NutrientBound>) {
        self.bounds = bounds;
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn constraints_of(&self, family: FamilyKind) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter().filter(move |c| c.family == family)
    }

    pub fn decisions(&self) -> &DecisionVariables {
        &self.decisions
    }

    pub fn serving_var(&self, food: usize) -> Option<VarId> {
        self.decisions.servings.get(food).copied()
    }

    pub fn selection_var(&self, food: usize) -> Option<VarId> {
        self.decisions.selections.get(food).copied()
    }

    /// Constraint families that were encoded, in encoding order.
    pub fn families(&self) -> &[ConstraintFamily] {
        &self.families
    }

    /// Nutrient bounds in force, after overrides.
    pub fn bounds(&self) -> &[NutrientBound] {
        &self.bounds
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        if self.expr.is_empty() {
            write!(f, " 0")?;
        }
        for (i, (var, coefficient)) in self.expr.terms().iter().enumerate() {
            let sign = if *coefficient < 0.0 { "-" } else if i > 0 { "+" } else { "" };
            write!(f, " {}{}·x{}", sign, coefficient.abs(), var.index())?;
        }
        write!(f, " {} {}", self.relation.symbol(), self.rhs)
    }
}

/// Identifier-safe rendering of a food name: spaces, slashes and commas become `_`.
pub fn variable_label(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, ' ' | '/' | ',') { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_skips_zero_terms() {
        let expr = LinearExpr::new()
            .term(VarId(0), 2.0)
            .term(VarId(1), 0.0)
            .term(VarId(2), -1.5);
        assert_eq!(expr.terms().len(), 2);
        assert_eq!(expr.coefficient(VarId(1)), 0.0);
        assert_eq!(expr.coefficient(VarId(2)), -1.5);
    }

    #[test]
    fn test_expr_evaluate() {
        let expr: LinearExpr = vec![(VarId(0), 2.0), (VarId(2), 3.0)].into_iter().collect();
        assert!((expr.evaluate(&[1.0, 100.0, 0.5]) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_relation_holds() {
        assert!(Relation::LessEq.holds(1.0, 1.0, 0.0));
        assert!(!Relation::GreaterEq.holds(0.9, 1.0, 0.01));
        assert!(Relation::Equal.holds(1.0000001, 1.0, 1e-6));
    }

    #[test]
    fn test_variable_label() {
        assert_eq!(variable_label("Hamburger W/Toppings"), "Hamburger_W_Toppings");
        assert_eq!(variable_label("Celery, Raw"), "Celery__Raw");
    }

    #[test]
    fn test_constraint_display() {
        let c = LinearConstraint {
            name: "Min_Calories".to_string(),
            family: FamilyKind::NutrientMin,
            expr: LinearExpr::new().term(VarId(0), 10.0).term(VarId(2), -5.0),
            relation: Relation::GreaterEq,
            rhs: 20.0,
        };
        assert_eq!(c.to_string(), "Min_Calories: 10·x0 -5·x2 >= 20");
    }
}
