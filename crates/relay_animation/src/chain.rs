//! Ordered, append-only storage of chain steps
//!
//! Steps live in a slot map and link forward through `next`. The chain keeps
//! the keys of its first and last step, so appending and reaching the tail
//! are constant time. A chain is created around its first step and has no
//! removal operation, so it is never empty and its links never cycle.

use crate::step::{AnimationStep, StepId};
use slotmap::SlotMap;

/// An ordered sequence of animation steps
#[derive(Debug)]
pub struct StepChain {
    steps: SlotMap<StepId, AnimationStep>,
    first: StepId,
    last: StepId,
}

impl StepChain {
    /// Create a chain holding `first` as its only step
    pub fn new(first: AnimationStep) -> Self {
        let mut steps = SlotMap::with_key();
        let id = steps.insert(first);
        Self {
            steps,
            first: id,
            last: id,
        }
    }

    /// Insert `step` after the current tail
    pub fn append(&mut self, mut step: AnimationStep) -> StepId {
        step.next = None;
        let id = self.steps.insert(step);
        self.steps[self.last].next = Some(id);
        self.last = id;
        id
    }

    pub fn first_id(&self) -> StepId {
        self.first
    }

    pub fn last_id(&self) -> StepId {
        self.last
    }

    pub fn first(&self) -> &AnimationStep {
        &self.steps[self.first]
    }

    pub fn last(&self) -> &AnimationStep {
        &self.steps[self.last]
    }

    pub fn last_mut(&mut self) -> &mut AnimationStep {
        &mut self.steps[self.last]
    }

    pub fn get(&self, id: StepId) -> Option<&AnimationStep> {
        self.steps.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: StepId) -> Option<&mut AnimationStep> {
        self.steps.get_mut(id)
    }

    /// Number of steps in the chain
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: a chain is created around its first step
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step keys from first to last
    pub fn ids(&self) -> impl Iterator<Item = StepId> + '_ {
        std::iter::successors(Some(self.first), move |id| self.steps[*id].next)
    }

    /// Steps from first to last
    pub fn iter(&self) -> impl Iterator<Item = &AnimationStep> + '_ {
        self.ids().map(move |id| &self.steps[id])
    }
}
