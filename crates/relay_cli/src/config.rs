//! Scene file handling (relay.toml)

use anyhow::{Context, Result};
use relay_animation::{AnimationCurve, AnimationType, Defaults, InterruptionPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Properties of one view, by name
pub type ViewProperties = BTreeMap<String, f64>;

/// Top-level scene file
#[derive(Debug, Deserialize, Serialize)]
pub struct SceneConfig {
    pub scene: SceneMeta,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Initial property values of every view the steps may touch
    #[serde(default)]
    pub views: BTreeMap<String, ViewProperties>,
    #[serde(default, rename = "step")]
    pub steps: Vec<StepConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SceneMeta {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Defaults applied before the chain is built
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub delay: f64,
    #[serde(default)]
    pub curve: AnimationCurve,
    #[serde(default, rename = "type")]
    pub kind: AnimationType,
    #[serde(default = "default_spring_damping")]
    pub spring_damping: f64,
    #[serde(default = "default_initial_velocity")]
    pub initial_velocity: f64,
}

fn default_duration() -> f64 {
    0.4
}

fn default_spring_damping() -> f64 {
    0.4
}

fn default_initial_velocity() -> f64 {
    0.2
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            delay: 0.0,
            curve: AnimationCurve::default(),
            kind: AnimationType::default(),
            spring_damping: default_spring_damping(),
            initial_velocity: default_initial_velocity(),
        }
    }
}

impl DefaultsConfig {
    /// Write every value into `defaults`
    pub fn apply(&self, defaults: &Defaults) {
        defaults.set_default_duration(self.duration);
        defaults.set_default_delay(self.delay);
        defaults.set_default_curve(self.curve);
        defaults.set_default_type(self.kind);
        defaults.set_default_spring_damping(self.spring_damping);
        defaults.set_default_initial_velocity(self.initial_velocity);
    }
}

/// How the scene is played back
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub interruption: InterruptionPolicy,
    /// Multiplier on every delay and duration (0.5 plays twice as fast)
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_frame_rate() -> u32 {
    60
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interruption: InterruptionPolicy::default(),
            time_scale: default_time_scale(),
            frame_rate: default_frame_rate(),
        }
    }
}

/// One step of the chain. Unset fields keep the defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StepConfig {
    #[serde(default)]
    pub label: Option<String>,
    /// Property assignments keyed `view.property`
    #[serde(default)]
    pub set: BTreeMap<String, f64>,
    /// Restore every view to its initial values before applying `set`
    #[serde(default)]
    pub reset: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<AnimationCurve>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnimationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spring_damping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_velocity: Option<f64>,
}

impl SceneConfig {
    /// Load a scene from a file, or from `relay.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let scene_path = if path.is_dir() {
            path.join("relay.toml")
        } else {
            path.to_path_buf()
        };

        if !scene_path.exists() {
            anyhow::bail!(
                "No scene found at {}. Run `relay init` to create one.",
                scene_path.display()
            );
        }

        let content = fs::read_to_string(&scene_path)
            .with_context(|| format!("Failed to read {}", scene_path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", scene_path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scene")
    }

    /// Four views spun, stretched, shrunk and reset in sequence
    pub fn demo() -> Self {
        let identity: ViewProperties = [
            ("rotation".to_string(), 0.0),
            ("scale_x".to_string(), 1.0),
            ("scale_y".to_string(), 1.0),
        ]
        .into_iter()
        .collect();

        let views = ["red", "green", "blue", "yellow"]
            .into_iter()
            .map(|name| (name.to_string(), identity.clone()))
            .collect();

        let assign = |pairs: &[(&str, f64)]| -> BTreeMap<String, f64> {
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        };

        let shrink: Vec<(String, f64)> = ["red", "green", "blue", "yellow"]
            .iter()
            .flat_map(|view| {
                [
                    (format!("{view}.scale_x"), 0.5),
                    (format!("{view}.scale_y"), 0.5),
                ]
            })
            .collect();

        let steps = vec![
            StepConfig {
                label: Some("spin red".to_string()),
                set: assign(&[("red.rotation", 180.0)]),
                ..StepConfig::default()
            },
            StepConfig {
                label: Some("spin green back".to_string()),
                set: assign(&[("green.rotation", -180.0)]),
                delay: Some(1.0),
                ..StepConfig::default()
            },
            StepConfig {
                label: Some("stretch blue".to_string()),
                set: assign(&[("blue.scale_x", 1.5)]),
                curve: Some(AnimationCurve::Linear),
                duration: Some(1.0),
                ..StepConfig::default()
            },
            StepConfig {
                label: Some("stretch yellow".to_string()),
                set: assign(&[("yellow.scale_y", 1.5)]),
                curve: Some(AnimationCurve::EaseIn),
                ..StepConfig::default()
            },
            StepConfig {
                label: Some("shrink all".to_string()),
                set: shrink.into_iter().collect(),
                spring_damping: Some(0.5),
                ..StepConfig::default()
            },
            StepConfig {
                label: Some("reset".to_string()),
                reset: true,
                ..StepConfig::default()
            },
        ];

        Self {
            scene: SceneMeta {
                name: "demo".to_string(),
                description: Some("Chained rotations and scales over four views".to_string()),
            },
            defaults: DefaultsConfig::default(),
            playback: PlaybackConfig::default(),
            views,
            steps,
        }
    }
}
