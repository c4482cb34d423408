use crate::config::Settings;
use crate::domain::{
    models::{RouteRequest, RouteResult, SelectionRequest, SelectionResult, SolverInfo},
    solver_service::{ProcessRunner, SolverService},
};
use crate::process::{AdmissionControl, ProcessGateway};
use crate::solver::{RouteSolver, SelectionSolver};
use std::sync::Arc;
use tracing::info;

pub type DynRouteSolver = Arc<dyn SolverService<Request = RouteRequest, Output = RouteResult>>;
pub type DynSelectionSolver =
    Arc<dyn SolverService<Request = SelectionRequest, Output = SelectionResult>>;

/// Factory for creating solver adapters that share one process gateway
pub struct SolverFactory {
    settings: Settings,
    runner: Arc<dyn ProcessRunner>,
}

impl SolverFactory {
    /// Build the gateway and admission limits described by `settings`
    pub fn from_settings(settings: Settings) -> Self {
        let admission = Arc::new(AdmissionControl::new(
            settings.gateway.max_concurrent,
            settings.gateway.max_queued,
        ));
        let max_concurrent = admission.max_concurrent();
        let gateway = ProcessGateway::new(settings.gateway_config()).with_admission(admission);

        info!(
            max_concurrent,
            max_queued = settings.gateway.max_queued,
            timeout = ?settings.gateway.timeout(),
            stderr_policy = ?settings.gateway.stderr_policy,
            "solver gateway ready"
        );

        Self::with_runner(settings, Arc::new(gateway))
    }

    /// Use a custom runner instead of spawning real processes
    pub fn with_runner(settings: Settings, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { settings, runner }
    }

    pub fn route_solver(&self) -> DynRouteSolver {
        Arc::new(RouteSolver::new(
            self.settings.route_config(),
            Arc::clone(&self.runner),
        ))
    }

    pub fn selection_solver(&self) -> DynSelectionSolver {
        Arc::new(SelectionSolver::new(
            self.settings.selection_config(),
            Arc::clone(&self.runner),
        ))
    }

    pub fn available_solvers(&self) -> Vec<SolverInfo> {
        vec![self.route_solver().info(), self.selection_solver().info()]
    }
}
