use bevy::prelude::*;
use bevy::window::WindowResolution;
use space_defender::config::{self, GameConfig};
use space_defender::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use space_defender::hud::HudPlugin;
use space_defender::input::PlayerInputPlugin;
use space_defender::lifecycle::LoopPlugin;
use space_defender::rendering::{RenderingPlugin, BACKGROUND_COLOR};
use space_defender::save;
use space_defender::simulation::SimulationPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Space Defender".into(),
                resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        // Compiled defaults; load_game_config overwrites them from
        // assets/game.toml (if present) in the Startup schedule.
        .insert_resource(GameConfig::default())
        // LoopPlugin first: it registers LoopState and the FrameSet ordering.
        .add_plugins(LoopPlugin)
        .add_plugins((PlayerInputPlugin, SimulationPlugin, RenderingPlugin, HudPlugin))
        .add_systems(
            Startup,
            (
                config::load_game_config,
                save::open_high_score_store.after(config::load_game_config),
            ),
        )
        .run();
}
