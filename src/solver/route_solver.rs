// Route Solver Adapter
// Implements the SolverService interface for the external shortest-path executable

use crate::domain::{
    models::{InvocationOutput, RouteRequest, RouteResult, SolverInvocation},
    solver_service::{ProcessRunner, Result, SolverError, SolverService},
    value_objects::SolverKind,
};
use crate::solver::protocol::{self, MapFiles};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RouteSolverConfig {
    pub executable: PathBuf,
    pub graph_file: PathBuf,
    pub heuristic_file: PathBuf,
    pub city_mapping_file: PathBuf,
    pub working_dir: Option<PathBuf>,
    /// Reject routes that do not start at the source and end at the destination
    pub verify_endpoints: bool,
}

pub struct RouteSolver {
    config: RouteSolverConfig,
    runner: Arc<dyn ProcessRunner>,
}

impl RouteSolver {
    pub fn new(config: RouteSolverConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    fn check_endpoints(&self, request: &RouteRequest, route: &RouteResult) -> Result<()> {
        if !route.is_route_found() {
            return Ok(());
        }

        let origin = route.origin().unwrap_or_default();
        let terminus = route.terminus().unwrap_or_default();
        if origin != request.source || terminus != request.destination {
            return Err(SolverError::EndpointMismatch {
                expected: format!("{} -> {}", request.source, request.destination),
                found: format!("{} -> {}", origin, terminus),
            });
        }

        Ok(())
    }
}

impl SolverService for RouteSolver {
    type Request = RouteRequest;
    type Output = RouteResult;

    fn name(&self) -> &str {
        "A* Route"
    }

    fn kind(&self) -> SolverKind {
        SolverKind::Route
    }

    fn executable(&self) -> &Path {
        &self.config.executable
    }

    fn protocol(&self) -> &str {
        protocol::ROUTE_PROTOCOL
    }

    fn runner(&self) -> &Arc<dyn ProcessRunner> {
        &self.runner
    }

    fn validate(&self, request: &RouteRequest) -> Result<()> {
        let mut errors = Vec::new();

        if request.source.trim().is_empty() {
            errors.push("source must not be empty".to_string());
        }
        if request.destination.trim().is_empty() {
            errors.push("destination must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidRequest(errors.join("; ")))
        }
    }

    fn build_invocation(&self, request: &RouteRequest) -> SolverInvocation {
        let maps = MapFiles {
            graph: &self.config.graph_file,
            heuristic: &self.config.heuristic_file,
            city_mapping: &self.config.city_mapping_file,
        };
        let args = protocol::route_arguments(maps, &request.source, &request.destination);

        SolverInvocation::new(&self.config.executable, args)
            .with_current_dir(self.config.working_dir.clone())
    }

    fn decode(&self, request: &RouteRequest, output: &InvocationOutput) -> Result<RouteResult> {
        let route = protocol::parse_route_output(&output.stdout)?.with_elapsed(output.elapsed);

        if self.config.verify_endpoints {
            self.check_endpoints(request, &route)?;
        }

        debug!(
            source = %request.source,
            destination = %request.destination,
            waypoints = route.waypoints.len(),
            legs = route.legs.len(),
            "decoded route"
        );

        Ok(route)
    }
}
