//! Heads-up display: score line and the stopped / game-over banners.
//!
//! The simulation only exposes score, high score, lives, the game-over flag
//! and the final score; this module turns them into UI text.

use crate::lifecycle::LoopState;
use crate::save::HighScoreStore;
use crate::simulation::{Session, Simulation};
use bevy::prelude::*;
use bevy::text::Justify;

const HUD_FONT_SIZE: f32 = 20.0;
const BANNER_FONT_SIZE: f32 = 28.0;
const HUD_COLOR: Color = Color::srgb(0.95, 0.88, 0.45);
const BANNER_COLOR: Color = Color::srgb(0.0, 212.0 / 255.0, 1.0);

/// Top-left score / high score / lives text.
#[derive(Component)]
pub struct HudLine;

/// Full-screen container of the centred banner; hidden during live play.
#[derive(Component)]
pub struct BannerRoot;

/// Text inside [`BannerRoot`].
#[derive(Component)]
pub struct BannerText;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(Update, hud_display_system);
    }
}

pub fn hud_line(session: &Session) -> String {
    format!(
        "Score: {}   High: {}   Lives: {}",
        session.score, session.high_score, session.lives
    )
}

/// Banner for the current state, or `None` while a session is being played.
pub fn banner_text(state: LoopState, session: Option<&Session>, best: u32) -> Option<String> {
    match (state, session) {
        (LoopState::Running, Some(session)) if session.game_over => Some(format!(
            "GAME OVER\n\nFinal score: {}\nHigh score: {}\n\n\
             Press Enter or click to play again\nEscape for menu",
            session.final_score, session.high_score
        )),
        (LoopState::Running, Some(_)) => None,
        _ => Some(format!(
            "SPACE DEFENDER\n\nHigh score: {best}\n\n\
             Move: mouse, touch, arrows or WASD\nFire: click, tap or Space\n\n\
             Press Enter or click to start\nEscape to quit"
        )),
    }
}

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        Text::new(""),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(HUD_COLOR),
        HudLine,
    ));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BannerRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: BANNER_FONT_SIZE,
                    ..default()
                },
                TextColor(BANNER_COLOR),
                TextLayout::new_with_justify(Justify::Center),
                BannerText,
            ));
        });
}

pub fn hud_display_system(
    sim: Option<Res<Simulation>>,
    state: Res<State<LoopState>>,
    store: Res<HighScoreStore>,
    mut line_query: Query<&mut Text, (With<HudLine>, Without<BannerText>)>,
    mut banner_query: Query<&mut Text, (With<BannerText>, Without<HudLine>)>,
    mut root_query: Query<&mut Visibility, With<BannerRoot>>,
) {
    let session = sim.as_ref().map(|sim| &sim.session);

    let line = session.map(hud_line).unwrap_or_default();
    for mut text in line_query.iter_mut() {
        if text.0 != line {
            text.0.clone_from(&line);
        }
    }

    let banner = banner_text(*state.get(), session, store.best());
    let visibility = if banner.is_some() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut v in root_query.iter_mut() {
        if *v != visibility {
            *v = visibility;
        }
    }
    if let Some(banner) = banner {
        for mut text in banner_query.iter_mut() {
            if text.0 != banner {
                text.0.clone_from(&banner);
            }
        }
    }
}
