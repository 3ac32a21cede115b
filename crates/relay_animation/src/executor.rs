//! Drives a chain through the host, one step at a time
//!
//! Two drivers share the same dispatch:
//!
//! - [`run_chain`] chains host completions: each step's completion
//!   dispatches the next step, the last one calls the caller's completion.
//! - [`play_chain`] awaits each step's completion in turn and reports a
//!   [`SequenceOutcome`].
//!
//! Either way step N+1 is only dispatched after step N's completion fired,
//! so no two steps are ever in flight together.

use crate::cancel::CancelToken;
use crate::chain::StepChain;
use crate::defaults::{AnimationType, AnimationValues, SpringValues};
use crate::error::{AnimationError, Result};
use crate::host::{AnimationHost, AnimationRequest, StepCompletion};
use crate::step::{StepAction, StepId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Completion of a whole chain
pub type ChainCompletion = Box<dyn FnOnce(bool) + Send>;

/// What a chain does when a step reports `completed == false`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionPolicy {
    /// Move on to the next step anyway
    #[default]
    Continue,
    /// Stop the chain and report `false` right away
    Halt,
}

/// Result of awaiting a chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceOutcome {
    /// Flag of the last step that ran
    pub completed: bool,
    /// Steps whose completion fired
    pub steps_run: usize,
    /// Index of the interrupted step when the chain halted early
    pub halted_at: Option<usize>,
}

/// Per-run settings shared by both drivers
#[derive(Clone, Debug, Default)]
pub(crate) struct RunSettings {
    pub policy: InterruptionPolicy,
    pub cancel: CancelToken,
}

/// A step taken out of its chain, ready for the host
struct PreparedStep {
    index: usize,
    next: Option<StepId>,
    action: StepAction,
    configuration: AnimationValues,
    spring: SpringValues,
}

impl PreparedStep {
    /// Take what the host needs out of step `id`
    fn take(chain: &mut StepChain, id: StepId, index: usize) -> Option<Self> {
        let step = chain.get_mut(id)?;
        let action: StepAction = match step.take_action() {
            Some(action) => action,
            None => Box::new(|| {}),
        };
        Some(Self {
            index,
            next: step.next(),
            action,
            configuration: step.configuration,
            spring: step.spring,
        })
    }

    fn dispatch(self, host: &dyn AnimationHost, cancel: &CancelToken, completion: StepCompletion) {
        let request = AnimationRequest {
            step: self.index,
            duration: self.configuration.duration,
            delay: self.configuration.delay,
            options: self.configuration.options,
            cancel: cancel.clone(),
        };

        tracing::debug!(
            step = self.index,
            kind = ?self.configuration.kind,
            duration = self.configuration.duration,
            delay = self.configuration.delay,
            "dispatching animation step"
        );

        match self.configuration.kind {
            AnimationType::Regular => host.animate(request, self.action, completion),
            AnimationType::Spring => {
                host.animate_spring(request, self.spring, self.action, completion)
            }
        }
    }
}

/// State moved from one step's completion into the next
struct Run {
    chain: StepChain,
    host: Arc<dyn AnimationHost>,
    settings: RunSettings,
    completion: Option<ChainCompletion>,
}

impl Run {
    fn finish(self, completed: bool) {
        tracing::debug!(completed, steps = self.chain.len(), "animation chain finished");
        if let Some(completion) = self.completion {
            completion(completed);
        }
    }

    /// Step `index` reported `completed`; the next step to dispatch, if any
    fn step_finished(
        self,
        index: usize,
        next: Option<StepId>,
        completed: bool,
    ) -> Option<(Run, StepId, usize)> {
        tracing::trace!(step = index, completed, "animation step completed");
        match next {
            Some(next) if completed || self.settings.policy == InterruptionPolicy::Continue => {
                Some((self, next, index + 1))
            }
            Some(_) => {
                tracing::debug!(step = index, "step interrupted, halting chain");
                self.finish(false);
                None
            }
            None => {
                self.finish(completed);
                None
            }
        }
    }
}

/// Where a step's completion hands the run back to
enum Handoff {
    /// The host has not returned from the dispatch yet
    Dispatching,
    /// Completed inside the dispatch; the dispatching loop takes over
    Inline(Run, bool),
    /// The dispatch returned; the completion resumes the chain itself
    Detached,
}

/// Start a chain with completion chaining. Returns once the first step is
/// dispatched; the rest runs from the host's completions.
pub(crate) fn run_chain(
    chain: StepChain,
    host: Arc<dyn AnimationHost>,
    settings: RunSettings,
    completion: Option<ChainCompletion>,
) {
    let first = chain.first_id();
    let run = Run {
        chain,
        host,
        settings,
        completion,
    };
    advance(run, first, 0);
}

/// Dispatch steps from `id` on. Steps the host completes inline are picked
/// up by the loop, so synchronous hosts don't grow the stack per step.
fn advance(run: Run, id: StepId, index: usize) {
    let mut cursor = Some((run, id, index));

    while let Some((mut run, id, index)) = cursor.take() {
        if run.settings.cancel.is_cancelled() {
            tracing::warn!(step = index, "chain cancelled before step dispatch");
            run.finish(false);
            return;
        }

        let Some(step) = PreparedStep::take(&mut run.chain, id, index) else {
            run.finish(false);
            return;
        };
        let next = step.next;
        let host = Arc::clone(&run.host);
        let cancel = run.settings.cancel.clone();

        let handoff = Arc::new(Mutex::new(Handoff::Dispatching));
        let slot = Arc::clone(&handoff);
        let continuation: StepCompletion = Box::new(move |completed| {
            let mut guard = slot.lock();
            if matches!(*guard, Handoff::Dispatching) {
                *guard = Handoff::Inline(run, completed);
                return;
            }
            drop(guard);
            if let Some((run, next, index)) = run.step_finished(index, next, completed) {
                advance(run, next, index);
            }
        });

        step.dispatch(host.as_ref(), &cancel, continuation);

        let handoff = std::mem::replace(&mut *handoff.lock(), Handoff::Detached);
        if let Handoff::Inline(run, completed) = handoff {
            cursor = run.step_finished(index, next, completed);
        }
    }
}

/// Await every step of `chain` in order
pub(crate) async fn play_chain(
    mut chain: StepChain,
    host: Arc<dyn AnimationHost>,
    settings: RunSettings,
) -> Result<SequenceOutcome> {
    let ids: Vec<StepId> = chain.ids().collect();
    let last_index = ids.len().saturating_sub(1);
    let cancel = settings.cancel;

    let mut outcome = SequenceOutcome {
        completed: true,
        steps_run: 0,
        halted_at: None,
    };

    for (index, id) in ids.into_iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::warn!(step = index, "chain cancelled before step dispatch");
            return Err(AnimationError::Cancelled { step: index });
        }

        let Some(step) = PreparedStep::take(&mut chain, id, index) else {
            continue;
        };

        let (tx, rx) = oneshot::channel();
        step.dispatch(
            host.as_ref(),
            &cancel,
            Box::new(move |completed| {
                // Receiver is gone only if the chain was cancelled meanwhile
                let _ = tx.send(completed);
            }),
        );

        let completed = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!(step = index, "chain cancelled while step was running");
                return Err(AnimationError::Cancelled { step: index });
            }
            result = rx => result.map_err(|_| {
                tracing::warn!(step = index, "host dropped step completion");
                AnimationError::HostDropped { step: index }
            })?,
        };

        tracing::trace!(step = index, completed, "animation step completed");
        outcome.steps_run += 1;
        outcome.completed = completed;

        if !completed && index < last_index && settings.policy == InterruptionPolicy::Halt {
            tracing::debug!(step = index, "step interrupted, halting chain");
            outcome.halted_at = Some(index);
            break;
        }
    }

    Ok(outcome)
}
