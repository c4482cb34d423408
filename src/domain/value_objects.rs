// Domain value objects representing core business concepts

use serde::Deserialize;
use std::fmt;

/// Optimization problem an external solver is responsible for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    /// Shortest path between two map nodes
    Route,
    /// Capacity-constrained choice of deliveries
    Selection,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::Route => write!(f, "route"),
            SolverKind::Selection => write!(f, "selection"),
        }
    }
}

/// How the gateway treats bytes written to stderr by a solver that exited 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StderrPolicy {
    /// Any stderr output rejects the invocation
    #[default]
    Reject,
    /// Stderr is captured and returned, the exit code alone decides
    Tolerate,
}

/// Positional argument layout understood by the selection solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionLayout {
    /// `capacity count (id weight value)*`
    #[default]
    Weighted,
    /// `capacity max_volume count (id weight volume value)*`
    Dimensional,
}

impl SelectionLayout {
    /// Number of positional arguments emitted per candidate
    pub fn fields_per_candidate(&self) -> usize {
        match self {
            SelectionLayout::Weighted => 3,
            SelectionLayout::Dimensional => 4,
        }
    }
}

impl fmt::Display for SelectionLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionLayout::Weighted => write!(f, "weighted"),
            SelectionLayout::Dimensional => write!(f, "dimensional"),
        }
    }
}

/// Coarse classification of a failed solve, used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Executable missing or could not be started
    Spawn,
    /// Solver ran but rejected the problem (non-zero exit or stderr output)
    Solver,
    /// Solver output did not follow the wire protocol
    Parse,
    /// Deadline expired and the process was killed
    Timeout,
    /// Too many invocations waiting for a slot
    Overloaded,
    /// Request failed a precondition before anything was spawned
    InvalidRequest,
    /// Output was well formed but inconsistent with the request
    InconsistentResult,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Spawn => write!(f, "Spawn Failure"),
            ErrorKind::Solver => write!(f, "Solver Failure"),
            ErrorKind::Parse => write!(f, "Parse Failure"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::Overloaded => write!(f, "Overloaded"),
            ErrorKind::InvalidRequest => write!(f, "Invalid Request"),
            ErrorKind::InconsistentResult => write!(f, "Inconsistent Result"),
        }
    }
}
