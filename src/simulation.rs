//! Simulation plugin: the per-frame step and the systems that feed it.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | Entity records, `Session`, `FireCooldown`, and the owned `Simulation` resource |
//! | [`step`] | The ordered per-frame update and its `StepReport` |
//! | [`spawning`] | Projectile, asteroid and particle-burst constructors |
//! | [`collision`] | Circle overlap test |
//!
//! ## Systems (all in [`FrameSet::Simulate`], chained)
//!
//! 1. [`restart_system`]: honours a pending restart once the session is over.
//! 2. [`playfield_resize_system`]: follows the primary window's logical size.
//! 3. [`simulation_step_system`]: runs one step, persists a new high score, logs.

pub mod collision;
pub mod spawning;
pub mod state;
pub mod step;

pub use state::{
    Asteroid, FireCooldown, Particle, Playfield, Projectile, Session, Ship, Simulation,
};
pub use step::StepReport;

use crate::config::GameConfig;
use crate::input::PendingInput;
use crate::lifecycle::FrameSet;
use crate::save::HighScoreStore;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Requires [`LoopPlugin`](crate::lifecycle::LoopPlugin) for the shared
/// resources and the `FrameSet` ordering.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                restart_system,
                playfield_resize_system,
                simulation_step_system,
            )
                .chain()
                .in_set(FrameSet::Simulate),
        );
    }
}

/// Reset the session in place when the player asked to play again.
///
/// Requests made while the session is still live are discarded.
pub fn restart_system(
    mut sim: ResMut<Simulation>,
    mut input: ResMut<PendingInput>,
    config: Res<GameConfig>,
) {
    if !input.take_restart_request() || !sim.session.game_over {
        return;
    }
    sim.restart(&config, &mut input);
    info!("Session restarted (high score {})", sim.session.high_score);
}

/// Adopt the primary window's size whenever it changes.
pub fn playfield_resize_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sim: ResMut<Simulation>,
    mut input: ResMut<PendingInput>,
    config: Res<GameConfig>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let playfield = Playfield::new(window.width(), window.height());
    if playfield != sim.playfield {
        sim.resize(playfield, &config, &mut input);
    }
}

/// Advance the simulation one frame and act on its report.
pub fn simulation_step_system(
    mut sim: ResMut<Simulation>,
    mut input: ResMut<PendingInput>,
    mut store: ResMut<HighScoreStore>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    let report = sim.step(&config, &mut input, time.elapsed(), &mut rand::thread_rng());

    if let Some(high_score) = report.new_high_score {
        store.save(high_score);
    }
    if report.game_over {
        info!(
            "Game over: final score {} (high score {})",
            sim.session.final_score, sim.session.high_score
        );
    }
}
