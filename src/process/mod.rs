// Process layer: subprocess execution and admission control

pub mod admission;
pub mod gateway;

pub use admission::AdmissionControl;
pub use gateway::{classify, GatewayConfig, ProcessGateway};
