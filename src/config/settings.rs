//! Service settings, deserialized from TOML.

use crate::domain::value_objects::{SelectionLayout, StderrPolicy};
use crate::process::GatewayConfig;
use crate::solver::{RouteSolverConfig, SelectionSolverConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub gateway: GatewaySettings,
    pub route: RouteSettings,
    pub selection: SelectionSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:50051".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `delivopt=debug`
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Per-invocation deadline; 0 disables it
    pub timeout_ms: u64,
    pub max_concurrent: usize,
    pub max_queued: usize,
    pub stderr_policy: StderrPolicy,
    /// Directory solvers run in; map file paths are relative to it
    pub working_dir: Option<PathBuf>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_concurrent: 8,
            max_queued: 64,
            stderr_policy: StderrPolicy::Reject,
            working_dir: None,
        }
    }
}

impl GatewaySettings {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    pub executable: PathBuf,
    pub graph_file: PathBuf,
    pub heuristic_file: PathBuf,
    pub city_mapping_file: PathBuf,
    pub verify_endpoints: bool,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("./dist/a_star"),
            graph_file: PathBuf::from("./paths/graph.txt"),
            heuristic_file: PathBuf::from("./paths/heuristic.txt"),
            city_mapping_file: PathBuf::from("./paths/city_mapping.txt"),
            verify_endpoints: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    pub executable: PathBuf,
    pub layout: SelectionLayout,
    pub validate_subset: bool,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("./dist/knapsack"),
            layout: SelectionLayout::Weighted,
            validate_subset: true,
        }
    }
}

impl Settings {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::default()
            .with_timeout(self.gateway.timeout())
            .with_stderr_policy(self.gateway.stderr_policy)
    }

    pub fn route_config(&self) -> RouteSolverConfig {
        RouteSolverConfig {
            executable: self.route.executable.clone(),
            graph_file: self.route.graph_file.clone(),
            heuristic_file: self.route.heuristic_file.clone(),
            city_mapping_file: self.route.city_mapping_file.clone(),
            working_dir: self.gateway.working_dir.clone(),
            verify_endpoints: self.route.verify_endpoints,
        }
    }

    pub fn selection_config(&self) -> SelectionSolverConfig {
        SelectionSolverConfig {
            executable: self.selection.executable.clone(),
            layout: self.selection.layout,
            working_dir: self.gateway.working_dir.clone(),
            validate_subset: self.selection.validate_subset,
        }
    }
}
