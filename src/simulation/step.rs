//! The per-frame update.
//!
//! ## Phase order (each phase completes before the next begins)
//!
//! | # | Phase                         | Effect                                                    |
//! |---|-------------------------------|-----------------------------------------------------------|
//! | 0 | fire                          | consume the request; cooldown-gated projectile at the ship |
//! | 1 | ship motion                   | keyboard displacement or eased pointer follow, then confine |
//! | 2 | projectile advance            | move up, drop once the leading edge is above the top      |
//! | 3 | asteroid advance + breach     | move down, spin, breach costs a life                      |
//! | 4 | ship–asteroid collision       | each overlap costs a life; ship is not displaced          |
//! | 5 | particle advance              | integrate, decay, drop dead particles                     |
//! | 6 | projectile–asteroid collision | first hit wins, +score, high score reported               |
//! | 7 | spawner                       | Bernoulli trial for one new asteroid                      |
//!
//! Once the game-over latch is set (at entry or during phases 3–4) the step
//! returns immediately: nothing else moves, scores or costs a life.
//!
//! Removal is index-stable throughout: `retain` for filtering passes and
//! reverse index iteration where entities are removed mid-scan.

use std::time::Duration;

use super::collision::circles_overlap;
use super::spawning::{emit_burst, projectile_at, random_asteroid};
use super::state::Simulation;
use crate::config::GameConfig;
use crate::input::PendingInput;
use bevy::prelude::*;
use rand::Rng;

/// What happened during one step.
///
/// The step itself performs no I/O; the host reads this to persist the high
/// score and to log session events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// A fire request was accepted and a projectile launched.
    pub fired: bool,
    /// Asteroids that fell past the bottom boundary.
    pub breaches: u32,
    /// Asteroids that struck the ship.
    pub ship_hits: u32,
    /// Asteroids destroyed by projectiles.
    pub kills: u32,
    /// The game-over latch was set during this step.
    pub game_over: bool,
    /// Set when the score overtook the high score; holds the new value.
    pub new_high_score: Option<u32>,
    /// The spawner produced an asteroid.
    pub spawned: bool,
}

impl Simulation {
    /// Advance the whole simulation by one frame.
    ///
    /// `now` is the time elapsed since the app started; it is only used for
    /// the fire cooldown comparison.  `input` is read, and only written to
    /// consume the fire request.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        config: &GameConfig,
        input: &mut PendingInput,
        now: Duration,
        rng: &mut R,
    ) -> StepReport {
        let mut report = StepReport::default();
        let fire = input.take_fire_request();

        if self.session.game_over {
            return report;
        }
        self.frame += 1;

        if fire && self.cooldown.try_accept(now) {
            self.projectiles.push(projectile_at(self.ship.pos, config));
            report.fired = true;
        }

        self.move_ship(config, input);
        self.advance_projectiles();
        self.advance_asteroids(config, rng, &mut report);
        if self.session.game_over {
            return report;
        }

        self.collide_ship(config, rng, &mut report);
        if self.session.game_over {
            return report;
        }

        self.advance_particles(config);
        self.collide_projectiles(config, rng, &mut report);

        if rng.gen::<f64>() < config.spawn_probability {
            let asteroid = random_asteroid(rng, self.playfield, config);
            self.asteroids.push(asteroid);
            report.spawned = true;
        }

        report
    }

    /// Phase 1.  Held keys win over the pointer for this frame.  After the
    /// keys are released the ship holds still until the aim target is
    /// overwritten again.
    fn move_ship(&mut self, config: &GameConfig, input: &PendingInput) {
        let ship = self.ship.pos;
        let target = match input.keyboard_direction() {
            Some(direction) => {
                self.keyboard_anchor = Some(input.aim_revision());
                ship + direction * config.ship_keyboard_speed
            }
            None if self.keyboard_anchor == Some(input.aim_revision()) => ship,
            None => {
                self.keyboard_anchor = None;
                ship + (input.aim - ship) * config.ship_follow_factor
            }
        };

        self.ship.pos = self.playfield.confine(target, config.ship_edge_margin);
    }

    /// Phase 2.
    fn advance_projectiles(&mut self) {
        self.projectiles.retain_mut(|projectile| {
            projectile.pos.y -= projectile.speed;
            projectile.pos.y >= 0.0
        });
    }

    /// Phase 3.
    fn advance_asteroids<R: Rng + ?Sized>(
        &mut self,
        config: &GameConfig,
        rng: &mut R,
        report: &mut StepReport,
    ) {
        let Self {
            playfield,
            asteroids,
            particles,
            session,
            ..
        } = self;
        let floor = playfield.height + config.breach_margin;

        asteroids.retain_mut(|asteroid| {
            if session.game_over {
                return true;
            }
            asteroid.pos.y += asteroid.speed;
            asteroid.rotation += asteroid.spin;
            if asteroid.pos.y <= floor {
                return true;
            }

            report.breaches += 1;
            emit_burst(
                particles,
                Vec2::new(asteroid.pos.x, playfield.height),
                config,
                rng,
            );
            if session.lose_life() {
                report.game_over = true;
            }
            false
        });
    }

    /// Phase 4.
    fn collide_ship<R: Rng + ?Sized>(
        &mut self,
        config: &GameConfig,
        rng: &mut R,
        report: &mut StepReport,
    ) {
        let ship = self.ship.pos;
        for index in (0..self.asteroids.len()).rev() {
            if self.session.game_over {
                break;
            }
            let asteroid = &self.asteroids[index];
            if !circles_overlap(ship, asteroid.pos, asteroid.radius() + config.ship_hit_radius) {
                continue;
            }

            let asteroid = self.asteroids.remove(index);
            report.ship_hits += 1;
            emit_burst(&mut self.particles, asteroid.pos, config, rng);
            emit_burst(&mut self.particles, ship, config, rng);
            if self.session.lose_life() {
                report.game_over = true;
            }
        }
    }

    /// Phase 5.
    fn advance_particles(&mut self, config: &GameConfig) {
        self.particles.retain_mut(|particle| {
            particle.pos += particle.vel;
            particle.life -= config.particle_decay;
            particle.life > 0.0
        });
    }

    /// Phase 6.  Each projectile scans the asteroids from the back and stops
    /// at the first overlap, so one shot never destroys two rocks.
    fn collide_projectiles<R: Rng + ?Sized>(
        &mut self,
        config: &GameConfig,
        rng: &mut R,
        report: &mut StepReport,
    ) {
        let Self {
            projectiles,
            asteroids,
            particles,
            session,
            ..
        } = self;

        projectiles.retain(|projectile| {
            let Some(index) = asteroids
                .iter()
                .rposition(|a| circles_overlap(projectile.pos, a.pos, a.radius()))
            else {
                return true;
            };

            let asteroid = asteroids.remove(index);
            emit_burst(particles, asteroid.pos, config, rng);
            report.kills += 1;
            if let Some(high) = session.award(config.score_per_kill) {
                report.new_high_score = Some(high);
            }
            false
        });
    }
}
