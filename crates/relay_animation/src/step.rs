//! A single step of an animation chain

use crate::defaults::{AnimationDefaults, AnimationValues, SpringValues};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Key of a step inside its chain
    pub struct StepId;
}

/// Work run by the host inside an animation block
pub type StepAction = Box<dyn FnOnce() + Send>;

/// One unit of animated work plus its configuration
pub struct AnimationStep {
    action: Option<StepAction>,
    pub configuration: AnimationValues,
    pub spring: SpringValues,
    pub(crate) next: Option<StepId>,
}

impl AnimationStep {
    /// Create a step, seeding its configuration from `defaults`
    pub fn new<F>(action: F, defaults: &AnimationDefaults) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            action: Some(Box::new(action)),
            configuration: defaults.values(),
            spring: defaults.spring(),
            next: None,
        }
    }

    pub fn next(&self) -> Option<StepId> {
        self.next
    }

    /// Take the action out for execution. Returns `None` once taken.
    pub(crate) fn take_action(&mut self) -> Option<StepAction> {
        self.action.take()
    }
}

impl fmt::Debug for AnimationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationStep")
            .field("configuration", &self.configuration)
            .field("spring", &self.spring)
            .field("next", &self.next)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
