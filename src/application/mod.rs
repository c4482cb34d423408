// Application layer: gRPC façade over the solver adapters

pub mod grpc_service;
pub mod mappers;

pub use grpc_service::GrpcDeliveryOptimizerService;
