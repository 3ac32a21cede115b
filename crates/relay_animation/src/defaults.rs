//! Step configuration values and the defaults they are seeded from
//!
//! Every new step snapshots the current [`AnimationDefaults`] when it is
//! created. Changing a default later never reaches back into existing
//! steps.
//!
//! Defaults are normally passed explicitly through a [`Defaults`] handle.
//! A process-wide handle ([`Defaults::global`]) and the free
//! `set_default_*` functions cover code that prefers ambient defaults.

use crate::options::{AnimationCurve, AnimationOptions};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Kind of animation a step asks the host for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    /// Interpolated along the step's curve
    #[default]
    Regular,
    /// Driven by the step's spring damping and initial velocity
    Spring,
}

/// Timing configuration of a single step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationValues {
    /// Seconds. Not validated; negative values reach the host as-is.
    pub duration: f64,
    /// Seconds before the animation starts
    pub delay: f64,
    pub options: AnimationOptions,
    pub kind: AnimationType,
}

impl AnimationValues {
    /// Duration as a `Duration`, saturating negative or NaN values to zero
    pub fn duration(&self) -> Duration {
        seconds(self.duration)
    }

    /// Delay as a `Duration`, saturating negative or NaN values to zero
    pub fn delay(&self) -> Duration {
        seconds(self.delay)
    }
}

impl Default for AnimationValues {
    fn default() -> Self {
        Self {
            duration: 0.4,
            delay: 0.0,
            options: AnimationOptions::CURVE_EASE_OUT,
            kind: AnimationType::Regular,
        }
    }
}

/// Spring parameters of a single step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringValues {
    pub damping: f64,
    pub initial_velocity: f64,
}

impl Default for SpringValues {
    fn default() -> Self {
        Self {
            damping: 0.4,
            initial_velocity: 0.2,
        }
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// Values new steps are seeded with
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDefaults {
    /// Seconds
    pub duration: f64,
    /// Seconds
    pub delay: f64,
    pub options: AnimationOptions,
    #[serde(rename = "type")]
    pub kind: AnimationType,
    pub spring_damping: f64,
    pub initial_velocity: f64,
}

impl Default for AnimationDefaults {
    fn default() -> Self {
        let values = AnimationValues::default();
        let spring = SpringValues::default();
        Self {
            duration: values.duration,
            delay: values.delay,
            options: values.options,
            kind: values.kind,
            spring_damping: spring.damping,
            initial_velocity: spring.initial_velocity,
        }
    }
}

impl AnimationDefaults {
    pub fn values(&self) -> AnimationValues {
        AnimationValues {
            duration: self.duration,
            delay: self.delay,
            options: self.options,
            kind: self.kind,
        }
    }

    pub fn spring(&self) -> SpringValues {
        SpringValues {
            damping: self.spring_damping,
            initial_velocity: self.initial_velocity,
        }
    }
}

/// Shared, clonable handle to a set of defaults.
///
/// Clones share the same values. Reads take a shared lock, the setters an
/// exclusive one, so a handle may be used from any thread.
#[derive(Clone, Debug, Default)]
pub struct Defaults {
    inner: Arc<RwLock<AnimationDefaults>>,
}

impl Defaults {
    pub fn new(values: AnimationDefaults) -> Self {
        Self {
            inner: Arc::new(RwLock::new(values)),
        }
    }

    /// The process-wide defaults
    pub fn global() -> &'static Defaults {
        static GLOBAL: OnceLock<Defaults> = OnceLock::new();
        GLOBAL.get_or_init(Defaults::default)
    }

    /// Copy of the current values
    pub fn snapshot(&self) -> AnimationDefaults {
        *self.inner.read()
    }

    /// Replace every value at once
    pub fn replace(&self, values: AnimationDefaults) {
        *self.inner.write() = values;
    }

    pub fn set_default_duration(&self, duration: f64) {
        self.inner.write().duration = duration;
    }

    pub fn set_default_delay(&self, delay: f64) {
        self.inner.write().delay = delay;
    }

    /// Replace the default options with the flags for `curve`
    pub fn set_default_curve(&self, curve: AnimationCurve) {
        self.inner.write().options = AnimationOptions::from_curve(curve);
    }

    pub fn set_default_type(&self, kind: AnimationType) {
        self.inner.write().kind = kind;
    }

    pub fn set_default_spring_damping(&self, damping: f64) {
        self.inner.write().spring_damping = damping;
    }

    pub fn set_default_initial_velocity(&self, velocity: f64) {
        self.inner.write().initial_velocity = velocity;
    }
}

/// Set the process-wide default duration (seconds)
pub fn set_default_duration(duration: f64) {
    Defaults::global().set_default_duration(duration);
}

/// Set the process-wide default delay (seconds)
pub fn set_default_delay(delay: f64) {
    Defaults::global().set_default_delay(delay);
}

/// Set the process-wide default curve
pub fn set_default_curve(curve: AnimationCurve) {
    Defaults::global().set_default_curve(curve);
}

/// Set the process-wide default animation type
pub fn set_default_type(kind: AnimationType) {
    Defaults::global().set_default_type(kind);
}

/// Set the process-wide default spring damping
pub fn set_default_spring_damping(damping: f64) {
    Defaults::global().set_default_spring_damping(damping);
}

/// Set the process-wide default initial spring velocity
pub fn set_default_initial_velocity(velocity: f64) {
    Defaults::global().set_default_initial_velocity(velocity);
}
