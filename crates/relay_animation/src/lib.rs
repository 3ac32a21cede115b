//! Relay Animation Chains
//!
//! Fluent sequencing of view animations over a host animation primitive.
//!
//! # Features
//!
//! - **Fluent Chains**: `animate(..).then_animate(..)` with per-step timing, curve and spring
//! - **Strict Sequencing**: a step starts only after the previous one reported completion
//! - **Snapshot Defaults**: new steps copy the current defaults, later changes don't leak back
//! - **Host Agnostic**: rendering and interpolation stay with the [`AnimationHost`]
//! - **Async Playback**: await a chain step by step, with cancellation

pub mod animator;
pub mod cancel;
pub mod chain;
pub mod defaults;
pub mod easing;
pub mod error;
pub mod executor;
pub mod host;
pub mod options;
pub mod step;

#[cfg(test)]
mod testing;

pub use animator::{animate, spring_animate, Animator};
pub use cancel::CancelToken;
pub use chain::StepChain;
pub use defaults::{
    set_default_curve, set_default_delay, set_default_duration, set_default_initial_velocity,
    set_default_spring_damping, set_default_type, AnimationDefaults, AnimationType,
    AnimationValues, Defaults, SpringValues,
};
pub use easing::{spring_progress, Easing};
pub use error::{AnimationError, Result};
pub use executor::{ChainCompletion, InterruptionPolicy, SequenceOutcome};
pub use host::{AnimationHost, AnimationRequest, ImmediateHost, StepCompletion};
pub use options::{AnimationCurve, AnimationOptions};
pub use step::{AnimationStep, StepAction, StepId};
