//! Game loop lifecycle: `LoopState`, the per-frame `FrameSet` ordering, and
//! the session setup/teardown hooks.
//!
//! ## States
//!
//! | State      | Description                                            |
//! |------------|--------------------------------------------------------|
//! | `Stopped`  | Initial state; no `Simulation` resource exists         |
//! | `Running`  | A `Simulation` exists and is stepped once per frame    |
//!
//! ## Systems (registered by `LoopPlugin`)
//!
//! | System           | Schedule          | Purpose                                  |
//! |------------------|-------------------|------------------------------------------|
//! | `start_session`  | `OnEnter(Running)`| Size the playfield, load the high score, insert `Simulation` |
//! | `stop_session`   | `OnExit(Running)` | Remove `Simulation`; frames stop at once |
//!
//! Transitions are only requested from the opposite state, so a redundant
//! start or stop never reaches these hooks.  `stop_session` tolerates a
//! missing `Simulation` anyway.

use crate::config::GameConfig;
use crate::input::PendingInput;
use crate::save::HighScoreStore;
use crate::simulation::{Playfield, Simulation};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

// ── Loop state ────────────────────────────────────────────────────────────────

/// Whether the frame loop is driving a session.
///
/// Everything in [`FrameSet::Simulate`] and [`FrameSet::Render`] runs under
/// `in_state(LoopState::Running)`, so nothing is stepped or drawn while
/// stopped.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
}

/// Per-frame ordering: input is folded in, the simulation is stepped, and the
/// resulting state is drawn, in that order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Simulate,
    Render,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers [`LoopState`], the [`FrameSet`] ordering and the session hooks.
///
/// Add before any plugin that places systems in a [`FrameSet`].
pub struct LoopPlugin;

impl Plugin for LoopPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<LoopState>()
            .init_resource::<PendingInput>()
            .init_resource::<HighScoreStore>()
            .configure_sets(
                Update,
                (
                    FrameSet::Input,
                    FrameSet::Simulate
                        .run_if(in_state(LoopState::Running))
                        .run_if(resource_exists::<Simulation>),
                    FrameSet::Render
                        .run_if(in_state(LoopState::Running))
                        .run_if(resource_exists::<Simulation>),
                )
                    .chain(),
            )
            .add_systems(OnEnter(LoopState::Running), start_session)
            .add_systems(OnExit(LoopState::Running), stop_session);
    }
}

// ── OnEnter(Running) ──────────────────────────────────────────────────────────

/// Build a fresh [`Simulation`] sized to the primary window.
///
/// Without a window there is nothing to size or draw to; the start is
/// refused and the loop falls back to `Stopped`.
pub fn start_session(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<GameConfig>,
    mut store: ResMut<HighScoreStore>,
    mut input: ResMut<PendingInput>,
    mut next_state: ResMut<NextState<LoopState>>,
) {
    let Ok(window) = windows.single() else {
        warn!("No primary window; staying stopped");
        next_state.set(LoopState::Stopped);
        return;
    };

    let playfield = Playfield::new(window.width(), window.height());
    let high_score = store.load();
    let sim = Simulation::new(&config, playfield, high_score);

    // Stale clicks or key presses from before the start are dropped.
    *input = PendingInput::aimed_at(sim.ship.pos);

    info!(
        "Session started on a {}x{} playfield (high score {})",
        playfield.width, playfield.height, high_score
    );
    commands.insert_resource(sim);
}

// ── OnExit(Running) ───────────────────────────────────────────────────────────

/// Drop the session.  A restart later begins from scratch.
pub fn stop_session(mut commands: Commands, sim: Option<Res<Simulation>>) {
    if let Some(sim) = sim {
        info!(
            "Session stopped at frame {} (score {})",
            sim.frame, sim.session.score
        );
    }
    commands.remove_resource::<Simulation>();
}
