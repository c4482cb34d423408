use super::value_objects::SolverKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One run of an external solver executable.
///
/// Consumed by value when handed to a [`ProcessRunner`](super::ProcessRunner),
/// so an invocation can never be replayed or shared between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl SolverInvocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            current_dir: None,
        }
    }

    pub fn with_current_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.current_dir = dir;
        self
    }

    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

/// Everything captured from a process that terminated cleanly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl InvocationOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
            elapsed: Duration::ZERO,
        }
    }
}

/// Route suggestion request between two map nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub source: String,
    pub destination: String,
}

impl RouteRequest {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Route decoded from the routing solver's output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteResult {
    pub waypoints: Vec<String>,
    /// Lines mentioning "via", in the order the solver printed them
    pub legs: Vec<String>,
    pub elapsed: Duration,
}

impl RouteResult {
    pub fn new(waypoints: Vec<String>, legs: Vec<String>) -> Self {
        Self {
            waypoints,
            legs,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// A usable route needs at least a start and an end
    pub fn is_route_found(&self) -> bool {
        self.waypoints.len() >= 2
    }

    pub fn origin(&self) -> Option<&str> {
        self.waypoints.first().map(String::as_str)
    }

    pub fn terminus(&self) -> Option<&str> {
        self.waypoints.last().map(String::as_str)
    }
}

/// Delivery eligible for capacity-constrained selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryCandidate {
    pub id: i64,
    pub weight: u64,
    pub value: u64,
    pub volume: Option<u64>,
}

impl DeliveryCandidate {
    pub fn new(id: i64, weight: u64, value: u64) -> Self {
        Self {
            id,
            weight,
            value,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Packing problem handed to the selection solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRequest {
    pub capacity: u64,
    pub max_volume: Option<u64>,
    pub candidates: Vec<DeliveryCandidate>,
}

impl SelectionRequest {
    pub fn new(capacity: u64, candidates: Vec<DeliveryCandidate>) -> Self {
        Self {
            capacity,
            max_volume: None,
            candidates,
        }
    }

    pub fn with_max_volume(mut self, max_volume: u64) -> Self {
        self.max_volume = Some(max_volume);
        self
    }

    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.candidates.iter().any(|c| c.id == id)
    }
}

/// Identifiers chosen by the selection solver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    pub selected_ids: Vec<i64>,
    pub elapsed: Duration,
}

impl SelectionResult {
    pub fn new(selected_ids: Vec<i64>) -> Self {
        Self {
            selected_ids,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty()
    }
}

/// Description of a configured solver adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverInfo {
    pub name: String,
    pub kind: SolverKind,
    pub executable: PathBuf,
    pub protocol: String,
}

impl SolverInfo {
    pub fn new(
        name: impl Into<String>,
        kind: SolverKind,
        executable: &Path,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            executable: executable.to_path_buf(),
            protocol: protocol.into(),
        }
    }
}
