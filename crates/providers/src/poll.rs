//! Bounded poll-loop engine.
//!
//! Every provider wait — image generation, avatar rendering, video
//! synthesis — reuses this single primitive with interval/attempt
//! numbers tuned to the expected latency class. There is no "poll
//! forever" mode: the attempt ceiling converts a task that never
//! completes into a deterministic timeout.

use std::future::Future;
use std::time::Duration;

use crate::error::ProviderError;
use crate::provider::{PollOutcome, ProviderOutput};

/// Poll interval and attempt ceiling for one latency class.
#[derive(Debug, Clone, Copy)]
pub struct PollPlan {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPlan {
    /// Image-class work: 5s × 60 attempts ≈ 5 minutes.
    pub const IMAGE: PollPlan = PollPlan {
        interval: Duration::from_secs(5),
        max_attempts: 60,
    };

    /// Video-class work: 10s × 120 attempts ≈ 20 minutes.
    pub const VIDEO: PollPlan = PollPlan {
        interval: Duration::from_secs(10),
        max_attempts: 120,
    };
}

/// Terminal result of a bounded poll loop.
#[derive(Debug)]
pub enum PollResult {
    Succeeded(ProviderOutput),
    /// The provider reported failure; message preserved verbatim.
    Failed { message: String },
    /// Cancellation was observed between poll attempts.
    Cancelled,
    /// The attempt ceiling was reached without a terminal outcome.
    TimedOut { attempts: u32 },
}

/// Repeatedly poll until a terminal outcome, cancellation, or the
/// attempt ceiling.
///
/// Each iteration: check cancellation, sleep `plan.interval`, check
/// cancellation again, then invoke `poll` once. A `Pending` outcome
/// consumes one attempt; `poll` is invoked at most `plan.max_attempts`
/// times. Cancellation is cooperative — an in-flight poll call is
/// allowed to complete.
///
/// A hard error from `poll` propagates immediately: the provider layer
/// has already done its own transient retry by the time an `Err`
/// surfaces here.
pub async fn poll_until_terminal<P, PFut, C, CFut>(
    mut poll: P,
    plan: PollPlan,
    mut is_cancelled: C,
) -> Result<PollResult, ProviderError>
where
    P: FnMut() -> PFut,
    PFut: Future<Output = Result<PollOutcome, ProviderError>>,
    C: FnMut() -> CFut,
    CFut: Future<Output = bool>,
{
    for attempt in 1..=plan.max_attempts {
        if is_cancelled().await {
            return Ok(PollResult::Cancelled);
        }

        tokio::time::sleep(plan.interval).await;

        if is_cancelled().await {
            return Ok(PollResult::Cancelled);
        }

        match poll().await? {
            PollOutcome::Pending => {
                tracing::trace!(attempt, max_attempts = plan.max_attempts, "Still pending");
            }
            PollOutcome::Succeeded(output) => return Ok(PollResult::Succeeded(output)),
            PollOutcome::Failed { message } => return Ok(PollResult::Failed { message }),
        }
    }

    Ok(PollResult::TimedOut {
        attempts: plan.max_attempts,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
