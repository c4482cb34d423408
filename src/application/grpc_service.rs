use tonic::{Request, Response, Status};
use tracing::{info, warn};

use super::mappers::{self, delivopt};
use crate::domain::{models::SolverInfo, solver_service::SolverService};
use crate::solver::{DynRouteSolver, DynSelectionSolver, SolverFactory};

/// gRPC service implementation
pub struct GrpcDeliveryOptimizerService {
    route: DynRouteSolver,
    selection: DynSelectionSolver,
    solvers: Vec<SolverInfo>,
}

impl GrpcDeliveryOptimizerService {
    pub fn new(factory: &SolverFactory) -> Self {
        Self {
            route: factory.route_solver(),
            selection: factory.selection_solver(),
            solvers: factory.available_solvers(),
        }
    }
}

#[tonic::async_trait]
impl delivopt::delivery_optimizer_server::DeliveryOptimizer for GrpcDeliveryOptimizerService {
    async fn suggest_route(
        &self,
        request: Request<delivopt::RouteRequest>,
    ) -> Result<Response<delivopt::RouteResponse>, Status> {
        let route_request = mappers::proto_to_domain_route(request.into_inner());
        info!(
            source = %route_request.source,
            destination = %route_request.destination,
            solver = self.route.name(),
            "suggesting route"
        );

        let route = self.route.solve(&route_request).await.map_err(|e| {
            warn!(error = %e, kind = %e.kind(), "route suggestion failed");
            mappers::solver_error_to_status(&e)
        })?;

        if !route.is_route_found() {
            info!(
                source = %route_request.source,
                destination = %route_request.destination,
                "no route found"
            );
        }

        Ok(Response::new(mappers::domain_to_proto_route(route)))
    }

    async fn select_deliveries(
        &self,
        request: Request<delivopt::SelectionRequest>,
    ) -> Result<Response<delivopt::SelectionResponse>, Status> {
        let selection_request = mappers::proto_to_domain_selection(request.into_inner());
        info!(
            capacity = selection_request.capacity,
            candidates = selection_request.num_candidates(),
            solver = self.selection.name(),
            "selecting deliveries"
        );

        let selection = self.selection.solve(&selection_request).await.map_err(|e| {
            warn!(error = %e, kind = %e.kind(), "delivery selection failed");
            mappers::solver_error_to_status(&e)
        })?;

        info!(selected = selection.selected_ids.len(), "deliveries selected");

        Ok(Response::new(mappers::domain_to_proto_selection(selection)))
    }

    async fn get_available_solvers(
        &self,
        _request: Request<delivopt::Empty>,
    ) -> Result<Response<delivopt::AvailableSolvers>, Status> {
        let solvers = self
            .solvers
            .iter()
            .cloned()
            .map(mappers::domain_to_proto_solver_info)
            .collect();

        Ok(Response::new(delivopt::AvailableSolvers { solvers }))
    }
}
