//! The host animation primitive
//!
//! A chain never interpolates or renders. Each step is handed to an
//! [`AnimationHost`], which runs the step's action inside an animation of
//! the requested timing and reports back once through the completion.

use crate::cancel::CancelToken;
use crate::defaults::SpringValues;
use crate::options::AnimationOptions;
use crate::step::StepAction;
use std::time::Duration;

/// Single-shot callback taking the host's "ran to completion" flag
pub type StepCompletion = Box<dyn FnOnce(bool) + Send>;

/// Timing of one step as handed to the host
#[derive(Clone, Debug)]
pub struct AnimationRequest {
    /// Position of the step in its chain, starting at 0
    pub step: usize,
    /// Seconds, exactly as configured
    pub duration: f64,
    /// Seconds, exactly as configured
    pub delay: f64,
    pub options: AnimationOptions,
    /// Cancellation of the chain this step belongs to
    pub cancel: CancelToken,
}

impl AnimationRequest {
    /// Duration clamped to a valid `Duration`
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration).unwrap_or(Duration::ZERO)
    }

    /// Delay clamped to a valid `Duration`
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay).unwrap_or(Duration::ZERO)
    }
}

/// The animation capability supplied by the host UI framework.
///
/// Implementations run `action` as the body of the animation and must call
/// `completion` exactly once: with `true` if the animation ran to its end,
/// `false` if it was interrupted. A host that never calls the completion
/// stalls the chain forever.
pub trait AnimationHost: Send + Sync {
    /// Run a regular, curve-driven animation
    fn animate(&self, request: AnimationRequest, action: StepAction, completion: StepCompletion);

    /// Run a spring animation
    fn animate_spring(
        &self,
        request: AnimationRequest,
        spring: SpringValues,
        action: StepAction,
        completion: StepCompletion,
    );
}

impl<H: AnimationHost + ?Sized> AnimationHost for std::sync::Arc<H> {
    fn animate(&self, request: AnimationRequest, action: StepAction, completion: StepCompletion) {
        (**self).animate(request, action, completion)
    }

    fn animate_spring(
        &self,
        request: AnimationRequest,
        spring: SpringValues,
        action: StepAction,
        completion: StepCompletion,
    ) {
        (**self).animate_spring(request, spring, action, completion)
    }
}

/// Host that applies every action at once and completes synchronously.
///
/// Useful where no animation system exists, e.g. headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateHost;

impl AnimationHost for ImmediateHost {
    fn animate(&self, _request: AnimationRequest, action: StepAction, completion: StepCompletion) {
        action();
        completion(true);
    }

    fn animate_spring(
        &self,
        _request: AnimationRequest,
        _spring: SpringValues,
        action: StepAction,
        completion: StepCompletion,
    ) {
        action();
        completion(true);
    }
}
