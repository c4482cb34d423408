// Selection Solver Adapter
// Implements the SolverService interface for the external knapsack executable

use crate::domain::{
    models::{InvocationOutput, SelectionRequest, SelectionResult, SolverInvocation},
    solver_service::{ProcessRunner, Result, SolverError, SolverService},
    value_objects::{SelectionLayout, SolverKind},
};
use crate::solver::protocol;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SelectionSolverConfig {
    pub executable: PathBuf,
    pub layout: SelectionLayout,
    pub working_dir: Option<PathBuf>,
    /// Reject ids that were not offered or were returned twice
    pub validate_subset: bool,
}

pub struct SelectionSolver {
    config: SelectionSolverConfig,
    runner: Arc<dyn ProcessRunner>,
}

impl SelectionSolver {
    pub fn new(config: SelectionSolverConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    fn check_subset(&self, request: &SelectionRequest, result: &SelectionResult) -> Result<()> {
        let offered: HashSet<i64> = request.candidates.iter().map(|c| c.id).collect();
        let mut seen = HashSet::new();
        let mut unknown = Vec::new();
        let mut duplicated = Vec::new();

        for &id in &result.selected_ids {
            if !offered.contains(&id) {
                unknown.push(id);
            } else if !seen.insert(id) {
                duplicated.push(id);
            }
        }

        if unknown.is_empty() && duplicated.is_empty() {
            Ok(())
        } else {
            Err(SolverError::UnexpectedSelection {
                unknown,
                duplicated,
            })
        }
    }
}

impl SolverService for SelectionSolver {
    type Request = SelectionRequest;
    type Output = SelectionResult;

    fn name(&self) -> &str {
        match self.config.layout {
            SelectionLayout::Weighted => "0/1 Knapsack",
            SelectionLayout::Dimensional => "0/1 Knapsack (weight + volume)",
        }
    }

    fn kind(&self) -> SolverKind {
        SolverKind::Selection
    }

    fn executable(&self) -> &Path {
        &self.config.executable
    }

    fn protocol(&self) -> &str {
        protocol::SELECTION_PROTOCOL
    }

    fn runner(&self) -> &Arc<dyn ProcessRunner> {
        &self.runner
    }

    fn validate(&self, request: &SelectionRequest) -> Result<()> {
        let mut errors = Vec::new();
        let dimensional = self.config.layout == SelectionLayout::Dimensional;

        if request.capacity == 0 {
            errors.push("capacity must be positive".to_string());
        }

        if dimensional && !matches!(request.max_volume, Some(v) if v > 0) {
            errors.push("a positive volume limit is required".to_string());
        }

        if request.candidates.is_empty() {
            errors.push("at least one candidate is required".to_string());
        }

        let mut ids = HashSet::new();
        for candidate in &request.candidates {
            if !ids.insert(candidate.id) {
                errors.push(format!("candidate {} appears more than once", candidate.id));
            }
            if candidate.weight == 0 {
                errors.push(format!("candidate {} has no weight", candidate.id));
            }
            if candidate.value == 0 {
                errors.push(format!("candidate {} has no value", candidate.id));
            }
            if dimensional && !matches!(candidate.volume, Some(v) if v > 0) {
                errors.push(format!("candidate {} has no volume", candidate.id));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidRequest(errors.join("; ")))
        }
    }

    fn build_invocation(&self, request: &SelectionRequest) -> SolverInvocation {
        let args = protocol::selection_arguments(
            self.config.layout,
            request.capacity,
            request.max_volume,
            &request.candidates,
        );

        SolverInvocation::new(&self.config.executable, args)
            .with_current_dir(self.config.working_dir.clone())
    }

    fn decode(
        &self,
        request: &SelectionRequest,
        output: &InvocationOutput,
    ) -> Result<SelectionResult> {
        let result = protocol::parse_selection_output(&output.stdout)?.with_elapsed(output.elapsed);

        if self.config.validate_subset {
            self.check_subset(request, &result)?;
        }

        debug!(
            candidates = request.num_candidates(),
            selected = result.selected_ids.len(),
            "decoded selection"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryCandidate, ErrorKind, FailureReason};
    use crate::solver::testing::ScriptedRunner;

    fn config(layout: SelectionLayout, validate_subset: bool) -> SelectionSolverConfig {
        SelectionSolverConfig {
            executable: PathBuf::from("./dist/knapsack"),
            layout,
            working_dir: None,
            validate_subset,
        }
    }

    fn request() -> SelectionRequest {
        SelectionRequest::new(
            50,
            vec![
                DeliveryCandidate::new(1, 10, 60),
                DeliveryCandidate::new(3, 20, 100),
                DeliveryCandidate::new(7, 30, 120),
            ],
        )
    }

    #[tokio::test]
    async fn solves_selection_with_flat_arguments() {
        let runner = Arc::new(ScriptedRunner::replying(InvocationOutput::success("3 7\n")));
        let solver = SelectionSolver::new(config(SelectionLayout::Weighted, true), runner.clone());

        let result = solver.solve(&request()).await.unwrap();
        assert_eq!(result.selected_ids, vec![3, 7]);

        let invocation = runner.last_invocation().unwrap();
        assert_eq!(
            invocation.args,
            vec!["50", "3", "1", "10", "60", "3", "20", "100", "7", "30", "120"]
        );
    }

    #[tokio::test]
    async fn empty_output_means_nothing_fits() {
        let runner = Arc::new(ScriptedRunner::replying(InvocationOutput::success("")));
        let solver = SelectionSolver::new(config(SelectionLayout::Weighted, true), runner);

        assert!(solver.solve(&request()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_id_is_flagged() {
        let runner = Arc::new(ScriptedRunner::replying(InvocationOutput::success("1 42\n")));
        let solver = SelectionSolver::new(config(SelectionLayout::Weighted, true), runner);

        match solver.solve(&request()).await.unwrap_err() {
            SolverError::UnexpectedSelection {
                unknown,
                duplicated,
            } => {
                assert_eq!(unknown, vec![42]);
                assert!(duplicated.is_empty());
            }
            other => panic!("expected unexpected selection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_id_is_flagged() {
        let runner = Arc::new(ScriptedRunner::replying(InvocationOutput::success("3 3\n")));
        let solver = SelectionSolver::new(config(SelectionLayout::Weighted, true), runner);

        let err = solver.solve(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentResult);
    }

    #[tokio::test]
    async fn subset_check_can_be_disabled() {
        let runner = Arc::new(ScriptedRunner::replying(InvocationOutput::success("42\n")));
        let solver = SelectionSolver::new(config(SelectionLayout::Weighted, false), runner);

        assert_eq!(solver.solve(&request()).await.unwrap().selected_ids, vec![42]);
    }

    #[tokio::test]
    async fn stderr_rejection_propagates() {
        let runner = Arc::new(ScriptedRunner::failing(FailureReason::StderrOutput {
            stderr: "Error: Item 3 has negative weight or value.\n".to_string(),
        }));
        let solver = SelectionSolver::new(config(SelectionLayout::Weighted, true), runner);

        let err = solver.solve(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Solver);
        assert!(err.to_string().contains("negative weight"));
    }

    #[tokio::test]
    async fn preconditions_checked_before_spawning() {
        let runner = Arc::new(ScriptedRunner::replying(InvocationOutput::success("")));
        let solver = SelectionSolver::new(config(SelectionLayout::Weighted, true), runner.clone());

        let empty = SelectionRequest::new(10, vec![]);
        let zero_capacity = SelectionRequest::new(0, vec![DeliveryCandidate::new(1, 1, 1)]);
        let repeated = SelectionRequest::new(
            10,
            vec![DeliveryCandidate::new(1, 1, 1), DeliveryCandidate::new(1, 2, 2)],
        );
        let weightless = SelectionRequest::new(10, vec![DeliveryCandidate::new(1, 0, 1)]);

        for request in [empty, zero_capacity, repeated, weightless] {
            let err = solver.solve(&request).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        }
        assert_eq!(runner.calls(), 0);
    }

    #[tokio::test]
    async fn dimensional_layout_requires_volumes() {
        let runner = Arc::new(ScriptedRunner::replying(InvocationOutput::success("5\n")));
        let solver =
            SelectionSolver::new(config(SelectionLayout::Dimensional, true), runner.clone());

        let missing = SelectionRequest::new(10, vec![DeliveryCandidate::new(5, 2, 3)]);
        let err = solver.solve(&missing).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let complete =
            SelectionRequest::new(10, vec![DeliveryCandidate::new(5, 2, 3).with_volume(4)])
                .with_max_volume(6);
        assert_eq!(solver.solve(&complete).await.unwrap().selected_ids, vec![5]);
        assert_eq!(
            runner.last_invocation().unwrap().args,
            vec!["10", "6", "1", "5", "2", "4", "3"]
        );
    }

    #[tokio::test]
    async fn selection_is_subset_of_candidates() {
        let replies = ["", "1", "7 1", "1 3 7"];

        for stdout in replies {
            let runner = Arc::new(ScriptedRunner::replying(InvocationOutput::success(stdout)));
            let solver = SelectionSolver::new(config(SelectionLayout::Weighted, true), runner);
            let request = request();

            let result = solver.solve(&request).await.unwrap();
            assert!(result.selected_ids.iter().all(|id| request.contains(*id)));
        }
    }
}
