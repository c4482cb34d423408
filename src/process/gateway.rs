// Process Invocation Gateway
// Spawns one solver executable, drains both output streams and classifies the exit

use crate::domain::{
    models::{InvocationOutput, SolverInvocation},
    solver_service::{FailureReason, ProcessRunner, Result, SolverError},
    value_objects::StderrPolicy,
};
use crate::process::AdmissionControl;
use async_trait::async_trait;
use futures::future;
use std::fmt;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Time granted to the stream readers after the process has exited
const DRAIN_WINDOW: Duration = Duration::from_millis(100);

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => write!(f, "stdout"),
            StreamKind::Stderr => write!(f, "stderr"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Kill the process and fail once this elapses; `None` waits forever
    pub timeout: Option<Duration>,
    pub stderr_policy: StderrPolicy,
}

impl GatewayConfig {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_stderr_policy(mut self, policy: StderrPolicy) -> Self {
        self.stderr_policy = policy;
        self
    }
}

/// Runs solver executables as child processes
pub struct ProcessGateway {
    config: GatewayConfig,
    admission: Option<Arc<AdmissionControl>>,
}

impl ProcessGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            admission: None,
        }
    }

    /// Gate every run behind a shared concurrency limit
    pub fn with_admission(mut self, admission: Arc<AdmissionControl>) -> Self {
        self.admission = Some(admission);
        self
    }

    async fn execute(&self, invocation: SolverInvocation) -> Result<InvocationOutput> {
        let program = invocation.program_name();

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        let started = Instant::now();
        let mut child = command.spawn().map_err(|source| {
            warn!(program = %program, error = %source, "failed to spawn solver");
            SolverError::Spawn {
                program: program.clone(),
                source,
            }
        })?;

        debug!(
            program = %program,
            pid = ?child.id(),
            args = ?invocation.args,
            "spawned solver"
        );

        let stdout = StreamDrain::spawn(child.stdout.take(), StreamKind::Stdout);
        let stderr = StreamDrain::spawn(child.stderr.take(), StreamKind::Stderr);

        let waited = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(waited) => waited,
                Err(_) => {
                    warn!(program = %program, timeout = ?limit, "solver timed out, killing");
                    if let Err(e) = child.kill().await {
                        warn!(program = %program, error = %e, "failed to kill solver");
                    }
                    stdout.abort();
                    stderr.abort();
                    return Err(SolverError::Timeout {
                        program,
                        after: limit,
                    });
                }
            },
            None => child.wait().await,
        };

        let status = waited.map_err(|source| {
            warn!(program = %program, error = %source, "failed to wait for solver");
            SolverError::Spawn {
                program: program.clone(),
                source,
            }
        })?;

        let (stdout, stderr) = future::join(stdout.finish(), stderr.finish()).await;

        let output = InvocationOutput {
            stdout,
            stderr,
            exit_code: status.code(),
            elapsed: started.elapsed(),
        };

        debug!(
            program = %program,
            exit_code = ?output.exit_code,
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            elapsed_ms = output.elapsed.as_millis() as u64,
            "solver exited"
        );

        classify(&program, output, self.config.stderr_policy).inspect_err(|e| {
            warn!(program = %program, error = %e, "solver invocation failed");
        })
    }
}

impl Default for ProcessGateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}

#[async_trait]
impl ProcessRunner for ProcessGateway {
    async fn run(&self, invocation: SolverInvocation) -> Result<InvocationOutput> {
        let _permit = match &self.admission {
            Some(admission) => Some(admission.admit().await?),
            None => None,
        };

        self.execute(invocation).await
    }
}

/// Decide the outcome of a finished process.
///
/// A non-zero exit wins over anything buffered on stdout; stderr output only
/// matters after a zero exit, and only under [`StderrPolicy::Reject`].
pub fn classify(
    program: &str,
    output: InvocationOutput,
    policy: StderrPolicy,
) -> Result<InvocationOutput> {
    let reason = match output.exit_code {
        Some(0) if policy == StderrPolicy::Reject && !output.stderr.is_empty() => {
            FailureReason::StderrOutput {
                stderr: output.stderr,
            }
        }
        Some(0) => return Ok(output),
        Some(code) => FailureReason::NonZeroExit {
            code,
            stderr: output.stderr,
        },
        None => FailureReason::Signaled {
            stderr: output.stderr,
        },
    };

    Err(SolverError::SolverFailure {
        program: program.to_string(),
        reason,
    })
}

/// Accumulates one child stream until EOF.
///
/// The buffer is shared so whatever arrived before the drain window closes
/// survives even if a descendant keeps the pipe open.
struct StreamDrain {
    buffer: Arc<Mutex<Vec<u8>>>,
    task: Option<JoinHandle<()>>,
}

impl StreamDrain {
    fn spawn<R>(stream: Option<R>, kind: StreamKind) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let task = stream.map(|mut stream| {
            let sink = Arc::clone(&buffer);
            tokio::spawn(async move {
                let mut chunk = vec![0u8; READ_CHUNK];
                loop {
                    match stream.read(&mut chunk).await {
                        Ok(0) => break,
                        Ok(n) => {
                            lock(&sink).extend_from_slice(&chunk[..n]);
                        }
                        Err(e) => {
                            debug!(stream = %kind, error = %e, "solver stream read failed");
                            break;
                        }
                    }
                }
            })
        });

        Self { buffer, task }
    }

    async fn finish(mut self) -> String {
        if let Some(task) = self.task.as_mut() {
            let _ = tokio::time::timeout(DRAIN_WINDOW, task).await;
        }
        self.abort();

        let bytes = std::mem::take(&mut *lock(&self.buffer));
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn abort(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

fn lock(buffer: &Mutex<Vec<u8>>) -> std::sync::MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
