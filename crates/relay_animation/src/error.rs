//! Animation chain error types

use thiserror::Error;

/// Errors surfaced by awaiting a chain with [`crate::Animator::play`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// The chain's cancel token fired before or during the step
    #[error("Animation chain cancelled at step {step}")]
    Cancelled { step: usize },

    /// The host dropped a step's completion without calling it
    #[error("Host dropped the completion of step {step}")]
    HostDropped { step: usize },
}

/// Result type for animation chain operations
pub type Result<T> = std::result::Result<T, AnimationError>;
