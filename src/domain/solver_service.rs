// Domain service interfaces for delegating problems to external solvers
// Adapters and the process gateway meet here; neither depends on the other directly

use super::models::{InvocationOutput, SolverInfo, SolverInvocation};
use super::value_objects::{ErrorKind, SolverKind};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Why a solver that did start was considered to have failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Process exited with a code other than 0
    NonZeroExit { code: i32, stderr: String },
    /// Process was terminated by a signal
    Signaled { stderr: String },
    /// Process exited 0 but wrote to stderr
    StderrOutput { stderr: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NonZeroExit { code, stderr } if stderr.is_empty() => {
                write!(f, "exited with code {}", code)
            }
            FailureReason::NonZeroExit { code, stderr } => {
                write!(f, "exited with code {}: {}", code, stderr.trim())
            }
            FailureReason::Signaled { .. } => write!(f, "terminated by signal"),
            FailureReason::StderrOutput { stderr } => {
                write!(f, "wrote to stderr: {}", stderr.trim())
            }
        }
    }
}

/// Error types for solver orchestration
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Solver '{program}' {reason}")]
    SolverFailure {
        program: String,
        reason: FailureReason,
    },

    #[error("Unexpected solver output: {0}")]
    Parse(String),

    #[error("Solver '{program}' did not finish within {after:?}")]
    Timeout { program: String, after: Duration },

    #[error("Too many pending solver invocations (limit {limit})")]
    Overloaded { limit: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Route runs {found} but {expected} was requested")]
    EndpointMismatch { expected: String, found: String },

    #[error("Selection returned unknown ids {unknown:?} and duplicated ids {duplicated:?}")]
    UnexpectedSelection {
        unknown: Vec<i64>,
        duplicated: Vec<i64>,
    },
}

impl SolverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolverError::Spawn { .. } => ErrorKind::Spawn,
            SolverError::SolverFailure { .. } => ErrorKind::Solver,
            SolverError::Parse(_) => ErrorKind::Parse,
            SolverError::Timeout { .. } => ErrorKind::Timeout,
            SolverError::Overloaded { .. } => ErrorKind::Overloaded,
            SolverError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            SolverError::EndpointMismatch { .. } | SolverError::UnexpectedSelection { .. } => {
                ErrorKind::InconsistentResult
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Runs one invocation to completion and reports a single outcome.
///
/// `Ok` is only returned for a clean exit; every other termination is
/// already classified as a [`SolverError`].
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, invocation: SolverInvocation) -> Result<InvocationOutput>;
}

/// Adapter between a typed request and one external solver executable.
///
/// Implementors describe the argument layout and the output grammar; the
/// provided [`solve`](SolverService::solve) wires them through a runner.
#[async_trait]
pub trait SolverService: Send + Sync {
    type Request: Send + Sync;
    type Output: Send;

    /// Get the name of this solver adapter
    fn name(&self) -> &str;

    fn kind(&self) -> SolverKind;

    /// Path to the executable this adapter spawns
    fn executable(&self) -> &Path;

    /// Version tag of the argument/output protocol this adapter speaks
    fn protocol(&self) -> &str;

    fn runner(&self) -> &Arc<dyn ProcessRunner>;

    /// Reject requests that must not reach the solver
    fn validate(&self, request: &Self::Request) -> Result<()>;

    fn build_invocation(&self, request: &Self::Request) -> SolverInvocation;

    /// Turn a clean exit into a typed result
    fn decode(&self, request: &Self::Request, output: &InvocationOutput) -> Result<Self::Output>;

    /// Validate, run and decode a request
    async fn solve(&self, request: &Self::Request) -> Result<Self::Output> {
        self.validate(request)?;

        let invocation = self.build_invocation(request);
        let output = self.runner().run(invocation).await?;

        self.decode(request, &output)
    }

    fn info(&self) -> SolverInfo {
        SolverInfo::new(self.name(), self.kind(), self.executable(), self.protocol())
    }
}
