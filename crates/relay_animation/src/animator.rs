//! Fluent chain builder
//!
//! # Example
//!
//! ```rust
//! use relay_animation::{animate, AnimationCurve, ImmediateHost};
//!
//! animate(|| println!("fade in"))
//!     .with_duration(0.3)
//!     .then_animate(|| println!("slide"))
//!     .after_delay(0.1)
//!     .with_curve(AnimationCurve::Linear)
//!     .then_animate(|| println!("settle"))
//!     .with_spring_damping(0.6)
//!     .completion(ImmediateHost, |completed| println!("done: {completed}"));
//! ```
//!
//! Configuration calls always apply to the step added last. Nothing runs
//! until one of the terminal calls (`run`, `completion`, `play`) consumes the
//! builder.

use crate::cancel::CancelToken;
use crate::chain::StepChain;
use crate::defaults::{AnimationType, Defaults};
use crate::error::Result;
use crate::executor::{self, InterruptionPolicy, RunSettings, SequenceOutcome};
use crate::host::AnimationHost;
use crate::options::{AnimationCurve, AnimationOptions};
use crate::step::AnimationStep;
use std::sync::Arc;

/// Start a chain with a regular animation, seeded from the process-wide defaults
pub fn animate<F>(action: F) -> Animator
where
    F: FnOnce() + Send + 'static,
{
    Animator::new(Defaults::global(), action)
}

/// Start a chain with a spring animation, seeded from the process-wide defaults
pub fn spring_animate<F>(action: F) -> Animator
where
    F: FnOnce() + Send + 'static,
{
    Animator::new_spring(Defaults::global(), action)
}

/// Builder accumulating animation steps
#[must_use = "an Animator does nothing until `run`, `completion` or `play` is called"]
#[derive(Debug)]
pub struct Animator {
    chain: StepChain,
    defaults: Defaults,
    settings: RunSettings,
}

impl Animator {
    /// Start a chain whose steps are seeded from `defaults`
    pub fn new<F>(defaults: &Defaults, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let first = AnimationStep::new(action, &defaults.snapshot());
        Self {
            chain: StepChain::new(first),
            defaults: defaults.clone(),
            settings: RunSettings::default(),
        }
    }

    /// Start a chain whose first step is a spring animation
    pub fn new_spring<F>(defaults: &Defaults, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::new(defaults, action).with_type(AnimationType::Spring)
    }

    /// Add a step that runs after the previous one completes
    pub fn then_animate<F>(mut self, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.chain
            .append(AnimationStep::new(action, &self.defaults.snapshot()));
        self
    }

    /// Duration of the last step, in seconds
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.chain.last_mut().configuration.duration = duration;
        self
    }

    /// Delay of the last step, in seconds
    pub fn after_delay(mut self, delay: f64) -> Self {
        self.chain.last_mut().configuration.delay = delay;
        self
    }

    /// Options of the last step. Replaces every flag, curve included.
    pub fn with_options(mut self, options: AnimationOptions) -> Self {
        self.chain.last_mut().configuration.options = options;
        self
    }

    /// Curve of the last step, keeping its other option flags
    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        let configuration = &mut self.chain.last_mut().configuration;
        configuration.options = configuration.options.with_curve(curve);
        self
    }

    /// Animation type of the last step
    pub fn with_type(mut self, kind: AnimationType) -> Self {
        self.chain.last_mut().configuration.kind = kind;
        self
    }

    /// Spring damping of the last step. Makes it a spring animation.
    pub fn with_spring_damping(mut self, damping: f64) -> Self {
        self.chain.last_mut().spring.damping = damping;
        self.with_type(AnimationType::Spring)
    }

    /// Initial spring velocity of the last step. Makes it a spring animation.
    pub fn with_initial_velocity(mut self, velocity: f64) -> Self {
        self.chain.last_mut().spring.initial_velocity = velocity;
        self.with_type(AnimationType::Spring)
    }

    /// How the chain reacts to an interrupted step
    pub fn with_interruption_policy(mut self, policy: InterruptionPolicy) -> Self {
        self.settings.policy = policy;
        self
    }

    /// Token that stops the chain once cancelled
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.settings.cancel = cancel;
        self
    }

    /// The token this chain observes
    pub fn cancel_token(&self) -> &CancelToken {
        &self.settings.cancel
    }

    pub fn interruption_policy(&self) -> InterruptionPolicy {
        self.settings.policy
    }

    /// The steps built so far
    pub fn chain(&self) -> &StepChain {
        &self.chain
    }

    /// Run the chain without a completion
    pub fn run<H>(self, host: H)
    where
        H: AnimationHost + 'static,
    {
        executor::run_chain(self.chain, Arc::new(host), self.settings, None);
    }

    /// Run the chain and call `completion` once the last step completed.
    ///
    /// `completion` receives the last step's flag, or `false` if the chain
    /// was cancelled or halted on an interrupted step.
    pub fn completion<H, F>(self, host: H, completion: F)
    where
        H: AnimationHost + 'static,
        F: FnOnce(bool) + Send + 'static,
    {
        executor::run_chain(
            self.chain,
            Arc::new(host),
            self.settings,
            Some(Box::new(completion)),
        );
    }

    /// Run the chain, awaiting each step in turn
    pub async fn play<H>(self, host: H) -> Result<SequenceOutcome>
    where
        H: AnimationHost + 'static,
    {
        executor::play_chain(self.chain, Arc::new(host), self.settings).await
    }
}
