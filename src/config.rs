//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! spawn_probability = 0.04
//! starting_lives = 3
//! ```
//!
//! A file that fails to parse or validate is reported with `warn!` and the
//! defaults stay in place.

use std::time::Duration;

use crate::constants::*;
use crate::error::{ensure_in_range, ensure_positive, GameError, GameResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Session ───────────────────────────────────────────────────────────────
    pub starting_lives: u32,
    pub score_per_kill: u32,

    // ── Ship ──────────────────────────────────────────────────────────────────
    pub ship_hit_radius: f32,
    pub ship_follow_factor: f32,
    pub ship_edge_margin: f32,
    pub ship_keyboard_speed: f32,
    pub ship_home_offset: f32,

    // ── Projectiles ───────────────────────────────────────────────────────────
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,
    pub fire_cooldown_ms: u64,

    // ── Asteroids ─────────────────────────────────────────────────────────────
    pub asteroid_min_size: f32,
    pub asteroid_size_range: f32,
    pub asteroid_min_speed: f32,
    pub asteroid_speed_range: f32,
    pub asteroid_max_spin: f32,
    pub asteroid_spawn_inset: f32,
    pub spawn_probability: f64,
    pub breach_margin: f32,

    // ── Particles ─────────────────────────────────────────────────────────────
    pub particles_per_burst: usize,
    pub particle_max_speed: f32,
    pub particle_decay: f32,

    // ── Rendering ─────────────────────────────────────────────────────────────
    pub star_count: usize,

    // ── Persistence ───────────────────────────────────────────────────────────
    pub high_score_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Session
            starting_lives: STARTING_LIVES,
            score_per_kill: SCORE_PER_KILL,
            // Ship
            ship_hit_radius: SHIP_HIT_RADIUS,
            ship_follow_factor: SHIP_FOLLOW_FACTOR,
            ship_edge_margin: SHIP_EDGE_MARGIN,
            ship_keyboard_speed: SHIP_KEYBOARD_SPEED,
            ship_home_offset: SHIP_HOME_OFFSET,
            // Projectiles
            projectile_width: PROJECTILE_WIDTH,
            projectile_height: PROJECTILE_HEIGHT,
            projectile_speed: PROJECTILE_SPEED,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,
            // Asteroids
            asteroid_min_size: ASTEROID_MIN_SIZE,
            asteroid_size_range: ASTEROID_SIZE_RANGE,
            asteroid_min_speed: ASTEROID_MIN_SPEED,
            asteroid_speed_range: ASTEROID_SPEED_RANGE,
            asteroid_max_spin: ASTEROID_MAX_SPIN,
            asteroid_spawn_inset: ASTEROID_SPAWN_INSET,
            spawn_probability: SPAWN_PROBABILITY,
            breach_margin: BREACH_MARGIN,
            // Particles
            particles_per_burst: PARTICLES_PER_BURST,
            particle_max_speed: PARTICLE_MAX_SPEED,
            particle_decay: PARTICLE_DECAY,
            // Rendering
            star_count: STAR_COUNT,
            // Persistence
            high_score_path: HIGH_SCORE_PATH.to_string(),
        }
    }
}

impl GameConfig {
    /// Minimum interval between accepted fire requests.
    #[inline]
    pub fn fire_cooldown(&self) -> Duration {
        Duration::from_millis(self.fire_cooldown_ms)
    }

    /// Decode a TOML document and validate the result.
    pub fn from_toml_str(path: &str, contents: &str) -> GameResult<Self> {
        let config: GameConfig = toml::from_str(contents).map_err(|e| GameError::ConfigParse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> GameResult<()> {
        ensure_in_range(
            "spawn_probability",
            self.spawn_probability,
            0.0,
            1.0,
            "[0, 1]",
        )?;
        ensure_in_range(
            "ship_follow_factor",
            self.ship_follow_factor as f64,
            0.0,
            1.0,
            "[0, 1]",
        )?;
        ensure_positive("starting_lives", self.starting_lives as f64)?;
        ensure_positive("fire_cooldown_ms", self.fire_cooldown_ms as f64)?;
        ensure_positive("projectile_speed", self.projectile_speed as f64)?;
        ensure_positive("asteroid_min_size", self.asteroid_min_size as f64)?;
        ensure_positive("particle_decay", self.particle_decay as f64)?;
        ensure_in_range(
            "asteroid_size_range",
            self.asteroid_size_range as f64,
            0.0,
            f64::MAX,
            "[0, ∞)",
        )?;
        ensure_in_range(
            "asteroid_speed_range",
            self.asteroid_speed_range as f64,
            0.0,
            f64::MAX,
            "[0, ∞)",
        )?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// A missing file is not an error; defaults are already in place from
/// `insert_resource`.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = CONFIG_PATH;
    match std::fs::read_to_string(path) {
        Ok(contents) => match GameConfig::from_toml_str(path, &contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded game config from {path}");
            }
            Err(e) => {
                warn!("{e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {path} found; using compiled defaults");
        }
    }
}
