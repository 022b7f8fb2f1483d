//! The seam between model construction and a numerical MILP engine.

pub mod lp;
pub mod timeout;

pub use lp::GoodLpSolver;
pub use timeout::TimeoutSolver;

use crate::milp::{Model, VarId};

/// Raw solver verdict. Every variant except `Optimal` is terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error(String),
}

/// Variable values indexed by [`VarId::index`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment(Vec<f64>);

impl Assignment {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Value of `var`; variables the solver did not report read as 0.
    pub fn value(&self, var: VarId) -> f64 {
        self.0.get(var.index()).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutput {
    pub status: SolverStatus,
    pub assignment: Assignment,
    pub objective_value: f64,
}

impl SolverOutput {
    /// Optimal output; the objective is evaluated from `values`.
    pub fn optimal(model: &Model, values: Vec<f64>) -> Self {
        let objective_value = model.objective().evaluate(&values);
        Self {
            status: SolverStatus::Optimal,
            assignment: Assignment::new(values),
            objective_value,
        }
    }

    /// Non-success output carrying no assignment.
    pub fn unsolved(status: SolverStatus) -> Self {
        Self {
            status,
            assignment: Assignment::default(),
            objective_value: f64::NAN,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::unsolved(SolverStatus::Error(message.into()))
    }
}

/// Anything that can solve a [`Model`].
///
/// Implementations report infeasibility, unboundedness and internal failures
/// through [`SolverStatus`]; they never panic on a well-formed model.
pub trait SolverAdapter {
    fn solve(&self, model: &Model) -> SolverOutput;

    fn name(&self) -> &str {
        "solver"
    }
}

impl<S: SolverAdapter + ?Sized> SolverAdapter for Box<S> {
    fn solve(&self, model: &Model) -> SolverOutput {
        (**self).solve(model)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: SolverAdapter + ?Sized> SolverAdapter for &S {
    fn solve(&self, model: &Model) -> SolverOutput {
        (**self).solve(model)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
