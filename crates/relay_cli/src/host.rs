//! Clock-driven host for playing scenes without a UI toolkit
//!
//! Each step sleeps for its delay, applies its action to the [`Stage`], then
//! walks the changed properties from their old to their new values over the
//! step duration, one frame at a time. Frame values are logged at trace
//! level.

use crate::config::PlaybackConfig;
use crate::stage::{changes, Stage};
use relay_animation::{
    spring_progress, AnimationHost, AnimationRequest, CancelToken, Easing, SpringValues,
    StepAction, StepCompletion,
};
use std::time::Duration;
use tokio::runtime::Handle;

/// How a step's progress is shaped over time
#[derive(Clone, Copy, Debug)]
enum Motion {
    Curve(Easing),
    Spring(SpringValues),
}

impl Motion {
    /// Progress at normalized time `t` of a step lasting `duration` seconds
    fn progress(&self, t: f32, duration: f64) -> f32 {
        match self {
            Motion::Curve(easing) => easing.apply(t),
            Motion::Spring(spring) => spring_progress(
                t,
                spring.damping as f32,
                (spring.initial_velocity * duration) as f32,
            ),
        }
    }
}

/// Plays steps on the tokio timer
pub struct ClockHost {
    handle: Handle,
    stage: Stage,
    time_scale: f64,
    frame_rate: u32,
}

impl ClockHost {
    /// Must be called from within a tokio runtime
    pub fn new(stage: Stage, playback: &PlaybackConfig) -> Self {
        Self {
            handle: Handle::current(),
            stage,
            time_scale: playback.time_scale.max(0.0),
            frame_rate: playback.frame_rate.max(1),
        }
    }

    fn spawn_step(
        &self,
        request: AnimationRequest,
        motion: Motion,
        action: StepAction,
        completion: StepCompletion,
    ) {
        let player = StepPlayer {
            stage: self.stage.clone(),
            time_scale: self.time_scale,
            frame_rate: self.frame_rate,
        };
        self.handle.spawn(async move {
            let completed = player.play(request, motion, action).await;
            completion(completed);
        });
    }
}

impl AnimationHost for ClockHost {
    fn animate(&self, request: AnimationRequest, action: StepAction, completion: StepCompletion) {
        let motion = Motion::Curve(Easing::from(request.options.curve()));
        self.spawn_step(request, motion, action, completion);
    }

    fn animate_spring(
        &self,
        request: AnimationRequest,
        spring: SpringValues,
        action: StepAction,
        completion: StepCompletion,
    ) {
        self.spawn_step(request, Motion::Spring(spring), action, completion);
    }
}

struct StepPlayer {
    stage: Stage,
    time_scale: f64,
    frame_rate: u32,
}

impl StepPlayer {
    /// Returns false if the chain was cancelled before the step finished
    async fn play(self, request: AnimationRequest, motion: Motion, action: StepAction) -> bool {
        let step = request.step;

        if !sleep_unless_cancelled(self.scaled(request.delay()), &request.cancel).await {
            tracing::warn!(step, "step cancelled during delay");
            return false;
        }

        let before = self.stage.snapshot();
        action();
        let changed = changes(&before, &self.stage.snapshot());

        let frames = (request.duration().as_secs_f64() * self.frame_rate as f64).ceil() as u32;
        let frames = frames.max(1);
        let frame_time = self.scaled(request.duration()) / frames;
        tracing::info!(
            step,
            frames,
            changed = changed.len(),
            motion = ?motion,
            "animating step"
        );

        for frame in 1..=frames {
            if !sleep_unless_cancelled(frame_time, &request.cancel).await {
                tracing::warn!(step, frame, "step cancelled mid-animation");
                return false;
            }
            let progress = motion.progress(frame as f32 / frames as f32, request.duration) as f64;
            for ((view, property), from, to) in &changed {
                tracing::trace!(
                    step,
                    frame,
                    view = view.as_str(),
                    property = property.as_str(),
                    value = from + (to - from) * progress,
                );
            }
        }

        true
    }

    /// `duration` times the time scale, saturating at `Duration::MAX`
    fn scaled(&self, duration: Duration) -> Duration {
        Duration::try_from_secs_f64(duration.as_secs_f64() * self.time_scale)
            .unwrap_or(Duration::MAX)
    }
}

/// Sleep for `duration`; false if `cancel` fired first
async fn sleep_unless_cancelled(duration: Duration, cancel: &CancelToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    if duration.is_zero() {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = cancel.cancelled() => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewProperties;
    use parking_lot::Mutex;
    use relay_animation::{AnimationError, Animator, Defaults};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn one_view_stage() -> Stage {
        let mut views: BTreeMap<String, ViewProperties> = BTreeMap::new();
        views.insert("box".to_string(), [("x".to_string(), 0.0)].into_iter().collect());
        Stage::new(views)
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_host_plays_chain_in_order() {
        let stage = one_view_stage();
        let host = ClockHost::new(stage.clone(), &PlaybackConfig::default());
        let defaults = Defaults::default();

        let first = stage.clone();
        let second = stage.clone();
        let seen = Arc::new(Mutex::new(None));
        let seen_by_second = seen.clone();
        let outcome = Animator::new(&defaults, move || first.set("box", "x", 10.0))
            .then_animate(move || {
                *seen_by_second.lock() = second.get("box", "x");
                second.set("box", "x", 20.0);
            })
            .with_spring_damping(0.6)
            .play(host)
            .await
            .unwrap();

        assert!(outcome.completed);
        assert_eq!(outcome.steps_run, 2);
        assert_eq!(*seen.lock(), Some(10.0));
        assert_eq!(stage.get("box", "x"), Some(20.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_host_honours_cancellation() {
        let stage = one_view_stage();
        let host = ClockHost::new(stage.clone(), &PlaybackConfig::default());
        let defaults = Defaults::default();
        let cancel = CancelToken::new();

        let applied = stage.clone();
        let play = tokio::spawn(
            Animator::new(&defaults, move || applied.set("box", "x", 5.0))
                .after_delay(10.0)
                .with_cancel_token(cancel.clone())
                .play(host),
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();

        let result = play.await.unwrap();
        assert_eq!(result, Err(AnimationError::Cancelled { step: 0 }));
        assert_eq!(stage.get("box", "x"), Some(0.0));
    }

    #[test]
    fn test_scaled_saturates_on_huge_time_scale() {
        let player = StepPlayer {
            stage: Stage::default(),
            time_scale: 1e30,
            frame_rate: 60,
        };
        assert_eq!(player.scaled(Duration::from_secs(1)), Duration::MAX);
        assert_eq!(player.scaled(Duration::ZERO), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_time_scale_step_stays_cancellable() {
        let stage = one_view_stage();
        let playback = PlaybackConfig {
            time_scale: 1e30,
            ..PlaybackConfig::default()
        };
        let host = ClockHost::new(stage.clone(), &playback);
        let defaults = Defaults::default();
        let cancel = CancelToken::new();

        let applied = stage.clone();
        let play = tokio::spawn(
            Animator::new(&defaults, move || applied.set("box", "x", 5.0))
                .with_cancel_token(cancel.clone())
                .play(host),
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();

        let result = play.await.unwrap();
        assert_eq!(result, Err(AnimationError::Cancelled { step: 0 }));
        assert_eq!(stage.get("box", "x"), Some(5.0));
    }

    #[test]
    fn test_motion_progress_ends_at_one() {
        let curve = Motion::Curve(Easing::EaseIn);
        let spring = Motion::Spring(SpringValues::default());
        assert_eq!(curve.progress(1.0, 0.4), 1.0);
        assert_eq!(spring.progress(1.0, 0.4), 1.0);
    }
}
