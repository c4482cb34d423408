// Domain layer: Request/result models and solver contracts
pub mod domain;

// Process layer: Subprocess execution and admission control
pub mod process;

// Solver adapters: Argument layouts and output grammars of the external executables
pub mod solver;

// Configuration: TOML settings with environment overrides
pub mod config;

// Application layer: gRPC façade
#[cfg(feature = "server")]
pub mod application;

// Infrastructure layer: External concerns (gRPC server)
#[cfg(feature = "server")]
pub mod infrastructure;

// Re-export commonly used types
pub use domain::{
    DeliveryCandidate, ErrorKind, FailureReason, InvocationOutput, ProcessRunner, RouteRequest,
    RouteResult, SelectionLayout, SelectionRequest, SelectionResult, SolverError, SolverInfo,
    SolverInvocation, SolverKind, SolverService, StderrPolicy,
};

pub use process::{AdmissionControl, GatewayConfig, ProcessGateway};
pub use solver::{RouteSolver, SelectionSolver, SolverFactory};

#[cfg(feature = "server")]
pub use application::GrpcDeliveryOptimizerService;

#[cfg(feature = "server")]
pub use infrastructure::{start_server, ServerConfig};
