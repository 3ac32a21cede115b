//! Relay CLI
//!
//! Plays animation chain scenes against a clock-driven host.

mod config;
mod host;
mod scene;
mod stage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relay_animation::{CancelToken, Defaults, InterruptionPolicy};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use crate::config::SceneConfig;
use crate::host::ClockHost;
use crate::stage::Stage;

#[derive(Parser)]
#[command(name = "relay", version, about = "Play chained view animations")]
struct Cli {
    /// Log every frame (trace level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a scene
    Play {
        /// Scene file, or a directory containing relay.toml
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Override the scene's time scale
        #[arg(long)]
        time_scale: Option<f64>,
        /// Stop at the first interrupted step
        #[arg(long)]
        halt: bool,
        /// Drive the chain through completion callbacks instead of awaiting steps
        #[arg(long)]
        callbacks: bool,
    },
    /// Write the demo scene
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Overwrite an existing relay.toml
        #[arg(long)]
        force: bool,
    },
    /// Print the defaults a scene resolves to
    Defaults {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose { "trace" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();

    match cli.command {
        Command::Play {
            path,
            time_scale,
            halt,
            callbacks,
        } => play(&path, time_scale, halt, callbacks).await,
        Command::Init { path, force } => init(&path, force),
        Command::Defaults { path } => print_defaults(&path),
    }
}

async fn play(path: &Path, time_scale: Option<f64>, halt: bool, callbacks: bool) -> Result<()> {
    let mut scene = SceneConfig::load(path)?;
    if let Some(scale) = time_scale {
        scene.playback.time_scale = scale;
    }
    if halt {
        scene.playback.interruption = InterruptionPolicy::Halt;
    }
    if !scene.playback.time_scale.is_finite() || scene.playback.time_scale < 0.0 {
        anyhow::bail!("time_scale must be a non-negative number");
    }

    let defaults = Defaults::default();
    scene.defaults.apply(&defaults);

    let stage = Stage::new(scene.views.clone());
    let cancel = CancelToken::new();
    let animator =
        scene::build_animator(&scene, &stage, &defaults)?.with_cancel_token(cancel.clone());
    let host = ClockHost::new(stage.clone(), &scene.playback);

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling chain");
            interrupt.cancel();
        }
    });

    tracing::info!(
        scene = scene.scene.name.as_str(),
        steps = animator.chain().len(),
        "playing scene"
    );

    if callbacks {
        let (tx, rx) = oneshot::channel();
        animator.completion(host, move |completed| {
            let _ = tx.send(completed);
        });
        let completed = rx.await.context("Chain stopped without completing")?;
        tracing::info!(completed, "scene finished");
    } else {
        let outcome = animator.play(host).await?;
        tracing::info!(
            completed = outcome.completed,
            steps_run = outcome.steps_run,
            halted_at = ?outcome.halted_at,
            "scene finished"
        );
    }

    print!("{stage}");
    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let scene_path = path.join("relay.toml");
    if scene_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            scene_path.display()
        );
    }

    fs::write(&scene_path, SceneConfig::demo().to_toml()?)
        .with_context(|| format!("Failed to write {}", scene_path.display()))?;
    tracing::info!(path = %scene_path.display(), "wrote demo scene");
    Ok(())
}

fn print_defaults(path: &Path) -> Result<()> {
    let scene = SceneConfig::load(path)?;
    let defaults = Defaults::default();
    scene.defaults.apply(&defaults);
    let values = defaults.snapshot();

    println!("duration         {:.3}s", values.duration);
    println!("delay            {:.3}s", values.delay);
    println!("curve            {}", values.options.curve());
    println!("type             {:?}", values.kind);
    println!("spring damping   {}", values.spring_damping);
    println!("initial velocity {}", values.initial_velocity);
    println!("interruption     {:?}", scene.playback.interruption);
    Ok(())
}
