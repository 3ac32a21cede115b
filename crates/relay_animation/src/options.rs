//! Animation option flags and timing curves
//!
//! `AnimationOptions` is an opaque bit set handed through to the host
//! primitive untouched. The only part the chain itself understands is the
//! two-bit curve field, which the defaults setters and the scene loader
//! write through [`AnimationCurve`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Timing curve of a regular animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationCurve {
    EaseInOut,
    EaseIn,
    #[default]
    EaseOut,
    Linear,
}

impl AnimationCurve {
    /// All curves, in flag order
    pub const ALL: [AnimationCurve; 4] = [
        AnimationCurve::EaseInOut,
        AnimationCurve::EaseIn,
        AnimationCurve::EaseOut,
        AnimationCurve::Linear,
    ];

    /// Parse a curve name as written in scene files (`ease_in`, `linear`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ease_in_out" => Some(AnimationCurve::EaseInOut),
            "ease_in" => Some(AnimationCurve::EaseIn),
            "ease_out" => Some(AnimationCurve::EaseOut),
            "linear" => Some(AnimationCurve::Linear),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationCurve::EaseInOut => "ease_in_out",
            AnimationCurve::EaseIn => "ease_in",
            AnimationCurve::EaseOut => "ease_out",
            AnimationCurve::Linear => "linear",
        }
    }
}

impl fmt::Display for AnimationCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque option flags passed to the host primitive
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationOptions(u32);

impl AnimationOptions {
    pub const NONE: Self = Self(0);
    pub const LAYOUT_SUBVIEWS: Self = Self(1 << 0);
    pub const ALLOW_USER_INTERACTION: Self = Self(1 << 1);
    pub const BEGIN_FROM_CURRENT_STATE: Self = Self(1 << 2);
    pub const REPEAT: Self = Self(1 << 3);
    pub const AUTOREVERSE: Self = Self(1 << 4);

    // Curve field (bits 16-17). Ease-in-out is the zero value.
    pub const CURVE_EASE_IN_OUT: Self = Self(0);
    pub const CURVE_EASE_IN: Self = Self(1 << 16);
    pub const CURVE_EASE_OUT: Self = Self(2 << 16);
    pub const CURVE_LINEAR: Self = Self(3 << 16);

    const CURVE_MASK: u32 = 3 << 16;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Options carrying only the curve field for `curve`
    pub const fn from_curve(curve: AnimationCurve) -> Self {
        match curve {
            AnimationCurve::EaseInOut => Self::CURVE_EASE_IN_OUT,
            AnimationCurve::EaseIn => Self::CURVE_EASE_IN,
            AnimationCurve::EaseOut => Self::CURVE_EASE_OUT,
            AnimationCurve::Linear => Self::CURVE_LINEAR,
        }
    }

    /// The curve encoded in the curve field
    pub const fn curve(&self) -> AnimationCurve {
        match (self.0 & Self::CURVE_MASK) >> 16 {
            0 => AnimationCurve::EaseInOut,
            1 => AnimationCurve::EaseIn,
            2 => AnimationCurve::EaseOut,
            _ => AnimationCurve::Linear,
        }
    }

    /// Replace the curve field, keeping every other flag
    pub const fn with_curve(self, curve: AnimationCurve) -> Self {
        Self((self.0 & !Self::CURVE_MASK) | Self::from_curve(curve).0)
    }
}

impl From<AnimationCurve> for AnimationOptions {
    fn from(curve: AnimationCurve) -> Self {
        Self::from_curve(curve)
    }
}

impl BitOr for AnimationOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AnimationOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for AnimationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let curve = format!("CURVE_{}", self.curve().name().to_ascii_uppercase());
        let mut flags = vec![curve.as_str()];
        for (flag, name) in [
            (Self::LAYOUT_SUBVIEWS, "LAYOUT_SUBVIEWS"),
            (Self::ALLOW_USER_INTERACTION, "ALLOW_USER_INTERACTION"),
            (Self::BEGIN_FROM_CURRENT_STATE, "BEGIN_FROM_CURRENT_STATE"),
            (Self::REPEAT, "REPEAT"),
            (Self::AUTOREVERSE, "AUTOREVERSE"),
        ] {
            if self.contains(flag) {
                flags.push(name);
            }
        }
        write!(f, "AnimationOptions({})", flags.join(" | "))
    }
}
