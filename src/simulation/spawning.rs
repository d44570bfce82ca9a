//! Entity constructors: projectiles, randomised asteroids and particle bursts.

use super::state::{Asteroid, Particle, Playfield, Projectile};
use crate::config::GameConfig;
use bevy::prelude::*;
use rand::Rng;

/// A projectile leaving the ship's centre.
pub fn projectile_at(origin: Vec2, config: &GameConfig) -> Projectile {
    Projectile {
        pos: origin,
        width: config.projectile_width,
        height: config.projectile_height,
        speed: config.projectile_speed,
    }
}

/// A fresh asteroid sitting just above the top edge at a random column.
///
/// Size, fall speed and spin are drawn uniformly from the configured ranges;
/// the rotation always starts at zero.
pub fn random_asteroid<R: Rng + ?Sized>(
    rng: &mut R,
    playfield: Playfield,
    config: &GameConfig,
) -> Asteroid {
    let size = config.asteroid_min_size + rng.gen::<f32>() * config.asteroid_size_range;
    let column_span = (playfield.width - config.asteroid_spawn_inset).max(0.0);
    let left = rng.gen::<f32>() * column_span;

    Asteroid {
        pos: Vec2::new(left + size / 2.0, -size / 2.0),
        size,
        speed: config.asteroid_min_speed + rng.gen::<f32>() * config.asteroid_speed_range,
        rotation: 0.0,
        spin: (rng.gen::<f32>() - 0.5) * 2.0 * config.asteroid_max_spin,
    }
}

/// Append one burst of debris at `origin`.
///
/// Each particle gets an independent velocity with both components uniform
/// in `±particle_max_speed`.
pub fn emit_burst<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    origin: Vec2,
    config: &GameConfig,
    rng: &mut R,
) {
    let reach = config.particle_max_speed;
    particles.extend((0..config.particles_per_burst).map(|_| Particle {
        pos: origin,
        vel: Vec2::new(
            (rng.gen::<f32>() - 0.5) * 2.0 * reach,
            (rng.gen::<f32>() - 0.5) * 2.0 * reach,
        ),
        life: 1.0,
    }));
}
