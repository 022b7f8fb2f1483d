use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::milp::Model;
use crate::solver::{SolverAdapter, SolverOutput};

/// Runs the inner solver on a helper thread and gives up after `limit`.
///
/// A timed-out solve is reported as `SolverStatus::Error`. The helper thread
/// is detached, not interrupted: it finishes in the background and its result
/// is dropped.
#[derive(Debug)]
pub struct TimeoutSolver<S> {
    inner: Arc<S>,
    limit: Duration,
}

impl<S> TimeoutSolver<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            limit,
        }
    }
}

impl<S: SolverAdapter + Send + Sync + 'static> SolverAdapter for TimeoutSolver<S> {
    fn solve(&self, model: &Model) -> SolverOutput {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let model = model.clone();

        let spawned = thread::Builder::new()
            .name("milp-solve".to_string())
            .spawn(move || {
                // receiver is gone after a timeout; nothing left to report to
                let _ = tx.send(inner.solve(&model));
            });
        if let Err(e) = spawned {
            return SolverOutput::error(format!("could not start solver thread: {}", e));
        }

        match rx.recv_timeout(self.limit) {
            Ok(output) => output,
            Err(RecvTimeoutError::Timeout) => {
                warn!("{} did not finish within {:?}", self.inner.name(), self.limit);
                SolverOutput::error(format!("solve exceeded the {:?} time limit", self.limit))
            }
            Err(RecvTimeoutError::Disconnected) => {
                SolverOutput::error("solver thread ended without a result")
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::milp::{DietRules, build};
    use crate::models::{Food, NutrientBound, NutritionDataset};
    use crate::solver::{GoodLpSolver, SolverStatus};

    struct SlowSolver(Duration);

    impl SolverAdapter for SlowSolver {
        fn solve(&self, model: &Model) -> SolverOutput {
            thread::sleep(self.0);
            SolverOutput::optimal(model, vec![0.0; model.num_variables()])
        }
    }

    struct PanickingSolver;

    impl SolverAdapter for PanickingSolver {
        fn solve(&self, _model: &Model) -> SolverOutput {
            panic!("engine crashed");
        }
    }

    fn model() -> Model {
        let mut nutrients = HashMap::new();
        nutrients.insert("X".to_string(), 10.0);
        let ds = NutritionDataset::new(
            vec![Food::new("A", 1.0, nutrients)],
            vec![NutrientBound::new("X", Some(20.0), None)],
        )
        .unwrap();
        build(&ds, &DietRules::default()).unwrap()
    }

    #[test]
    fn test_fast_solve_passes_through() {
        let solver = TimeoutSolver::new(GoodLpSolver, Duration::from_secs(30));
        let out = solver.solve(&model());
        assert_eq!(out.status, SolverStatus::Optimal);
        assert!((out.objective_value - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_slow_solve_times_out() {
        let solver = TimeoutSolver::new(SlowSolver(Duration::from_millis(500)), Duration::from_millis(20));
        let out = solver.solve(&model());
        assert!(matches!(out.status, SolverStatus::Error(ref m) if m.contains("time limit")));
        assert!(out.assignment.is_empty());
    }

    #[test]
    fn test_crashed_solver_is_an_error() {
        let solver = TimeoutSolver::new(PanickingSolver, Duration::from_secs(5));
        let out = solver.solve(&model());
        assert!(matches!(out.status, SolverStatus::Error(_)));
    }
}
