//! Easing functions for hosts that interpolate chain steps
//!
//! The chain never interpolates anything itself. Hosts that do (the CLI's
//! clock host, tests) turn a step's [`AnimationCurve`] into an [`Easing`]
//! and sample it per frame; spring steps use [`spring_progress`].

use crate::options::AnimationCurve;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Control points of the bezier backing this easing
    pub fn control_points(&self) -> (f32, f32, f32, f32) {
        match *self {
            Easing::Linear => (0.0, 0.0, 1.0, 1.0),
            Easing::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Easing::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            _ => {
                let (x1, y1, x2, y2) = self.control_points();
                cubic_bezier_ease(t, x1, y1, x2, y2)
            }
        }
    }
}

impl From<AnimationCurve> for Easing {
    fn from(curve: AnimationCurve) -> Self {
        match curve {
            AnimationCurve::EaseInOut => Easing::EaseInOut,
            AnimationCurve::EaseIn => Easing::EaseIn,
            AnimationCurve::EaseOut => Easing::EaseOut,
            AnimationCurve::Linear => Easing::Linear,
        }
    }
}

/// Progress of a damped spring released at rest offset 1 towards 0.
///
/// `t` is normalized to the step duration, `damping` is the damping ratio
/// (1.0 settles without oscillation) and `velocity` the initial velocity in
/// total distances per duration. The spring is tuned to settle at `t == 1`;
/// values above 1.0 are overshoot.
pub fn spring_progress(t: f32, damping: f32, velocity: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let t = t as f64;
    let zeta = (damping as f64).clamp(0.05, 1.0);
    let v0 = velocity as f64;
    // e^(-zeta * omega) ~= 0.001 at the end of the step
    let omega = 6.9 / zeta;

    let offset = if zeta >= 1.0 {
        (1.0 + (omega - v0) * t) * (-omega * t).exp()
    } else {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega * t).exp();
        envelope * ((omega_d * t).cos() + ((zeta * omega - v0) / omega_d) * (omega_d * t).sin())
    };

    (1.0 - offset) as f32
}

/// Cubic bezier easing (CSS timing-function semantics).
///
/// Newton-Raphson first, bisection when the slope flattens out. Runs in f64
/// so frame-rate sampling doesn't jitter.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³ in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for curve in AnimationCurve::ALL {
            let easing = Easing::from(curve);
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_ease_in_lags_ease_out() {
        let early = 0.25;
        assert!(Easing::EaseIn.apply(early) < Easing::Linear.apply(early));
        assert!(Easing::EaseOut.apply(early) > Easing::Linear.apply(early));
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let a = Easing::EaseInOut.apply(0.3);
        let b = Easing::EaseInOut.apply(0.7);
        assert!((a + b - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_spring_settles_at_end() {
        assert_eq!(spring_progress(0.0, 0.4, 0.2), 0.0);
        assert_eq!(spring_progress(1.0, 0.4, 0.2), 1.0);
        assert!((spring_progress(0.99, 1.0, 0.0) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_low_damping_overshoots() {
        let peak = (1..100)
            .map(|i| spring_progress(i as f32 / 100.0, 0.2, 0.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "Underdamped spring should overshoot, peak {peak}");

        let critical = (1..100)
            .map(|i| spring_progress(i as f32 / 100.0, 1.0, 0.0))
            .fold(f32::MIN, f32::max);
        assert!(critical <= 1.0);
    }
}
