// In-memory ProcessRunner for adapter tests

use crate::domain::{
    models::{InvocationOutput, SolverInvocation},
    solver_service::{FailureReason, ProcessRunner, Result, SolverError},
};
use async_trait::async_trait;
use std::sync::Mutex;

enum Reply {
    Output(InvocationOutput),
    Failure(FailureReason),
}

/// Answers every invocation with the same canned outcome and records what
/// it was asked to run.
pub struct ScriptedRunner {
    reply: Reply,
    invocations: Mutex<Vec<SolverInvocation>>,
}

impl ScriptedRunner {
    pub fn replying(output: InvocationOutput) -> Self {
        Self::with_reply(Reply::Output(output))
    }

    pub fn failing(reason: FailureReason) -> Self {
        Self::with_reply(Reply::Failure(reason))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    pub fn last_invocation(&self) -> Option<SolverInvocation> {
        self.invocations.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: SolverInvocation) -> Result<InvocationOutput> {
        let program = invocation.program_name();
        self.invocations.lock().unwrap().push(invocation);

        match &self.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::Failure(reason) => Err(SolverError::SolverFailure {
                program,
                reason: reason.clone(),
            }),
        }
    }
}
