// Infrastructure: Server setup and configuration
// Single Responsibility: Manage server lifecycle and configuration

use std::net::SocketAddr;
use tonic::transport::Server;
use tracing::info;

use crate::application::mappers::delivopt::delivery_optimizer_server::DeliveryOptimizerServer;
use crate::application::GrpcDeliveryOptimizerService;
use crate::solver::SolverFactory;

pub struct ServerConfig {
    pub address: SocketAddr,
    pub factory: SolverFactory,
}

impl ServerConfig {
    pub fn new(address: SocketAddr, factory: SolverFactory) -> Self {
        Self { address, factory }
    }
}

/// Serve until Ctrl-C; in-flight solver children are killed when their
/// requests are dropped.
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = GrpcDeliveryOptimizerService::new(&config.factory);

    log_banner(&config);

    Server::builder()
        .add_service(DeliveryOptimizerServer::new(service))
        .serve_with_shutdown(config.address, shutdown_signal())
        .await?;

    info!("delivopt server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

fn log_banner(config: &ServerConfig) {
    info!(address = %config.address, "delivopt delivery optimizer listening");
    for solver in config.factory.available_solvers() {
        info!(
            kind = %solver.kind,
            name = %solver.name,
            executable = %solver.executable.display(),
            protocol = %solver.protocol,
            "solver registered"
        );
    }
}
