// Mappers: Convert between gRPC protobuf types and domain models
// This keeps protobuf dependencies isolated from business logic (Dependency Inversion)

use crate::domain::{
    models::{
        DeliveryCandidate, RouteRequest, RouteResult, SelectionRequest, SelectionResult,
        SolverInfo,
    },
    solver_service::SolverError,
};
use tonic::Status;

pub mod delivopt {
    tonic::include_proto!("delivopt");
}

use delivopt as proto;

/// Convert protobuf RouteRequest to domain RouteRequest
pub fn proto_to_domain_route(proto_req: proto::RouteRequest) -> RouteRequest {
    RouteRequest::new(proto_req.source, proto_req.destination)
}

/// Convert protobuf DeliveryCandidate to domain DeliveryCandidate
pub fn proto_to_domain_candidate(proto_candidate: &proto::DeliveryCandidate) -> DeliveryCandidate {
    DeliveryCandidate {
        id: proto_candidate.id,
        weight: proto_candidate.weight,
        value: proto_candidate.value,
        volume: proto_candidate.volume,
    }
}

/// Convert protobuf SelectionRequest to domain SelectionRequest
pub fn proto_to_domain_selection(proto_req: proto::SelectionRequest) -> SelectionRequest {
    SelectionRequest {
        capacity: proto_req.capacity,
        max_volume: proto_req.volume,
        candidates: proto_req
            .candidates
            .iter()
            .map(proto_to_domain_candidate)
            .collect(),
    }
}

/// Convert domain RouteResult to protobuf RouteResponse
pub fn domain_to_proto_route(route: RouteResult) -> proto::RouteResponse {
    proto::RouteResponse {
        found: route.is_route_found(),
        solve_time_ms: route.elapsed.as_secs_f64() * 1000.0,
        waypoints: route.waypoints,
        legs: route.legs,
    }
}

/// Convert domain SelectionResult to protobuf SelectionResponse
pub fn domain_to_proto_selection(selection: SelectionResult) -> proto::SelectionResponse {
    proto::SelectionResponse {
        solve_time_ms: selection.elapsed.as_secs_f64() * 1000.0,
        selected_ids: selection.selected_ids,
    }
}

pub fn domain_to_proto_solver_info(info: SolverInfo) -> proto::SolverInfo {
    proto::SolverInfo {
        name: info.name,
        kind: info.kind.to_string(),
        executable: info.executable.display().to_string(),
        protocol: info.protocol,
    }
}

/// Pick the gRPC status a client sees for a failed solve
pub fn solver_error_to_status(err: &SolverError) -> Status {
    let message = err.to_string();
    match err {
        SolverError::InvalidRequest(_) => Status::invalid_argument(message),
        SolverError::SolverFailure { .. } => Status::failed_precondition(message),
        SolverError::Spawn { .. } => Status::unavailable(message),
        SolverError::Timeout { .. } => Status::deadline_exceeded(message),
        SolverError::Overloaded { .. } => Status::resource_exhausted(message),
        SolverError::Parse(_)
        | SolverError::EndpointMismatch { .. }
        | SolverError::UnexpectedSelection { .. } => Status::internal(message),
    }
}
