//! Scripted in-memory provider for tests.
//!
//! Lets orchestrator and API tests exercise the full submit → poll →
//! resolve pipeline without any network. Behavior is fixed at
//! construction; call counters are observable.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mediaforge_core::job::JobKind;

use crate::error::ProviderError;
use crate::poll::PollPlan;
use crate::provider::{
    GenerationRequest, PollOutcome, Provider, ProviderArtifact, ProviderOutput, TaskHandle,
};

/// What the mock should do after `submit` succeeds.
#[derive(Debug, Clone)]
enum Behavior {
    /// Report `Pending` for `polls_before_success` polls, then succeed.
    SucceedAfter {
        polls_before_success: u32,
        artifacts: Vec<ProviderArtifact>,
    },
    /// Report `Failed` with the given message on the first poll.
    FailWith(String),
    /// Report `Pending` forever (exercises the timeout ceiling).
    NeverComplete,
    /// Refuse the submission itself.
    RejectSubmit(String),
}

/// A scripted [`Provider`] supporting every job kind.
pub struct MockProvider {
    name: &'static str,
    behavior: Behavior,
    plan: PollPlan,
    submit_calls: AtomicU32,
    poll_calls: AtomicU32,
}

impl MockProvider {
    fn with_behavior(name: &'static str, behavior: Behavior) -> Self {
        Self {
            name,
            behavior,
            // Fast plan so tests never sleep meaningfully.
            plan: PollPlan {
                interval: Duration::from_millis(1),
                max_attempts: 50,
            },
            submit_calls: AtomicU32::new(0),
            poll_calls: AtomicU32::new(0),
        }
    }

    /// A provider that succeeds immediately with a single remote PNG.
    pub fn named(name: &'static str) -> Self {
        Self::succeed_after_named(name, 0, vec![ProviderArtifact::Remote {
            url: "https://mock/artifact.png".to_string(),
        }])
    }

    /// Succeed after `polls` pending polls, producing `artifacts`.
    pub fn succeed_after(polls: u32, artifacts: Vec<ProviderArtifact>) -> Self {
        Self::succeed_after_named("mock", polls, artifacts)
    }

    pub fn succeed_after_named(
        name: &'static str,
        polls: u32,
        artifacts: Vec<ProviderArtifact>,
    ) -> Self {
        Self::with_behavior(
            name,
            Behavior::SucceedAfter {
                polls_before_success: polls,
                artifacts,
            },
        )
    }

    /// Report generation failure with `message` on the first poll.
    pub fn fail_with(message: impl Into<String>) -> Self {
        Self::with_behavior("mock", Behavior::FailWith(message.into()))
    }

    /// Stay pending forever.
    pub fn never_complete() -> Self {
        Self::with_behavior("mock", Behavior::NeverComplete)
    }

    /// Refuse every submission.
    pub fn reject_submit(message: impl Into<String>) -> Self {
        Self::with_behavior("mock", Behavior::RejectSubmit(message.into()))
    }

    /// Override the poll plan (e.g. to shrink the attempt ceiling).
    pub fn with_plan(mut self, plan: PollPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> u32 {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, _kind: JobKind) -> bool {
        true
    }

    fn poll_plan(&self) -> PollPlan {
        self.plan
    }

    async fn submit(&self, _request: &GenerationRequest) -> Result<TaskHandle, ProviderError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        if let Behavior::RejectSubmit(ref message) = self.behavior {
            return Err(ProviderError::Rejected {
                status: 400,
                body: message.clone(),
            });
        }

        Ok(TaskHandle {
            provider: self.name.to_string(),
            task_id: format!("mock-task-{}", self.submit_calls()),
        })
    }

    async fn poll(&self, _handle: &TaskHandle) -> Result<PollOutcome, ProviderError> {
        let polls = self.poll_calls.fetch_add(1, Ordering::SeqCst) + 1;

        Ok(match self.behavior {
            Behavior::SucceedAfter {
                polls_before_success,
                ref artifacts,
            } => {
                if polls > polls_before_success {
                    PollOutcome::Succeeded(ProviderOutput {
                        artifacts: artifacts.clone(),
                    })
                } else {
                    PollOutcome::Pending
                }
            }
            Behavior::FailWith(ref message) => PollOutcome::Failed {
                message: message.clone(),
            },
            Behavior::NeverComplete => PollOutcome::Pending,
            Behavior::RejectSubmit(_) => PollOutcome::Pending,
        })
    }
}
