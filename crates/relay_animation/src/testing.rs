//! Host that records requests and holds completions until a test fires them

use crate::cancel::CancelToken;
use crate::defaults::SpringValues;
use crate::host::{AnimationHost, AnimationRequest, StepCompletion};
use crate::options::AnimationOptions;
use crate::step::StepAction;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// One recorded host invocation
#[derive(Clone, Debug)]
pub struct HostCall {
    pub step: usize,
    pub duration: f64,
    pub delay: f64,
    pub options: AnimationOptions,
    /// `Some` for spring animations
    pub spring: Option<SpringValues>,
    pub cancel: CancelToken,
}

#[derive(Default)]
struct State {
    calls: Vec<HostCall>,
    pending: VecDeque<StepCompletion>,
}

/// Runs actions on dispatch and keeps completions until [`RecordingHost::complete`]
#[derive(Clone, Default)]
pub struct RecordingHost {
    state: Arc<Mutex<State>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    /// Completions handed out but not fired yet
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Fire the oldest pending completion
    pub fn complete(&self, completed: bool) {
        let completion = self.state.lock().pending.pop_front();
        // Lock released: the completion may dispatch the next step right here
        if let Some(completion) = completion {
            completion(completed);
        }
    }

    /// Yield until at least `count` calls were recorded
    pub async fn wait_for_calls(&self, count: usize) {
        while self.state.lock().calls.len() < count {
            tokio::task::yield_now().await;
        }
    }

    fn record(
        &self,
        request: AnimationRequest,
        spring: Option<SpringValues>,
        action: StepAction,
        completion: StepCompletion,
    ) {
        action();
        let mut state = self.state.lock();
        state.calls.push(HostCall {
            step: request.step,
            duration: request.duration,
            delay: request.delay,
            options: request.options,
            spring,
            cancel: request.cancel,
        });
        state.pending.push_back(completion);
    }
}

impl AnimationHost for RecordingHost {
    fn animate(&self, request: AnimationRequest, action: StepAction, completion: StepCompletion) {
        self.record(request, None, action, completion);
    }

    fn animate_spring(
        &self,
        request: AnimationRequest,
        spring: SpringValues,
        action: StepAction,
        completion: StepCompletion,
    ) {
        self.record(request, Some(spring), action, completion);
    }
}
