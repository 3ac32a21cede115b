//! Turning a scene file into an animation chain

use crate::config::{SceneConfig, StepConfig, ViewProperties};
use crate::stage::Stage;
use anyhow::Result;
use relay_animation::{Animator, Defaults};
use std::collections::BTreeMap;

/// Build the chain for `scene`, with actions that mutate `stage`.
///
/// `defaults` should already carry the scene's `[defaults]`.
pub fn build_animator(scene: &SceneConfig, stage: &Stage, defaults: &Defaults) -> Result<Animator> {
    let mut steps = scene.steps.iter().enumerate();
    let Some((_, first)) = steps.next() else {
        anyhow::bail!("Scene `{}` has no steps", scene.scene.name);
    };

    let mut animator = configure(
        Animator::new(defaults, step_action(0, first, stage, &scene.views)?),
        first,
    );
    for (index, step) in steps {
        let action = step_action(index, step, stage, &scene.views)?;
        animator = configure(animator.then_animate(action), step);
    }

    Ok(animator.with_interruption_policy(scene.playback.interruption))
}

/// Apply a step's overrides to the step just added
fn configure(mut animator: Animator, step: &StepConfig) -> Animator {
    if let Some(duration) = step.duration {
        animator = animator.with_duration(duration);
    }
    if let Some(delay) = step.delay {
        animator = animator.after_delay(delay);
    }
    if let Some(curve) = step.curve {
        animator = animator.with_curve(curve);
    }
    if let Some(damping) = step.spring_damping {
        animator = animator.with_spring_damping(damping);
    }
    if let Some(velocity) = step.initial_velocity {
        animator = animator.with_initial_velocity(velocity);
    }
    // Last, so an explicit type wins over the spring setters
    if let Some(kind) = step.kind {
        animator = animator.with_type(kind);
    }
    animator
}

fn step_action(
    index: usize,
    step: &StepConfig,
    stage: &Stage,
    views: &BTreeMap<String, ViewProperties>,
) -> Result<impl FnOnce() + Send + 'static> {
    let mut assignments = Vec::with_capacity(step.set.len());
    for (key, value) in &step.set {
        let Some((view, property)) = key.split_once('.') else {
            anyhow::bail!("Step {index}: `{key}` is not of the form `view.property`");
        };
        let declared = views
            .get(view)
            .is_some_and(|props| props.contains_key(property));
        if !declared {
            anyhow::bail!("Step {index}: `{key}` is not declared under [views]");
        }
        assignments.push((view.to_string(), property.to_string(), *value));
    }

    let stage = stage.clone();
    let reset = step.reset.then(|| views.clone());
    let label = step
        .label
        .clone()
        .unwrap_or_else(|| format!("step {index}"));

    Ok(move || {
        if let Some(views) = reset {
            stage.restore(&views);
        }
        for (view, property, value) in &assignments {
            stage.set(view, property, *value);
        }
        tracing::debug!(step = index, label = label.as_str(), "applied step");
    })
}
