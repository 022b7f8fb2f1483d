//! MILP construction: decision variables, constraint families and the
//! rules that select them.

pub mod builder;
pub mod families;
pub mod model;
pub mod rules;

pub use builder::{big_m_per_food, build, plan_families, resolve_bounds};
pub use families::{ConstraintFamily, FamilyKind};
pub use model::{
    DecisionVariables, LinearConstraint, LinearExpr, Model, Relation, VarId, VarKind, VariableDef,
};
pub use rules::{BigM, DietRules, ExclusivePair, MinServingRule, VarietyRule};
