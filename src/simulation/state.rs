//! Entity records and session counters owned by the simulation.
//!
//! Everything here is plain data.  The only code that mutates it is
//! [`Simulation::step`](super::step) plus the lifecycle helpers
//! ([`Simulation::restart`], [`Simulation::resize`]) defined below.

use std::time::Duration;

use crate::config::GameConfig;
use crate::input::PendingInput;
use bevy::prelude::*;

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Logical dimensions of the drawing surface.
///
/// Coordinates run from the top-left corner with +Y pointing down, matching
/// window cursor coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Where the ship is parked on start, restart and resize.
    #[inline]
    pub fn home(&self, config: &GameConfig) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - config.ship_home_offset)
    }

    /// Pull `point` inside the playfield, `margin` away from every edge.
    ///
    /// On a surface narrower than two margins the lower bound wins rather
    /// than panicking the way `f32::clamp` would.
    #[inline]
    pub fn confine(&self, point: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            point.x.min(self.width - margin).max(margin),
            point.y.min(self.height - margin).max(margin),
        )
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// The player ship.  Exactly one per session; never destroyed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ship {
    /// Centre of the ship.
    pub pos: Vec2,
}

/// A shot travelling up the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Horizontal centre and top (leading) edge.
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Upward travel per frame.
    pub speed: f32,
}

/// A falling, spinning rock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    /// Centre of the asteroid.
    pub pos: Vec2,
    /// Diameter.
    pub size: f32,
    /// Downward travel per frame.
    pub speed: f32,
    /// Current angle (radians).
    pub rotation: f32,
    /// Signed change of `rotation` per frame.
    pub spin: f32,
}

impl Asteroid {
    /// Radius used by every overlap test.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }
}

/// Cosmetic debris left by a destruction event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Displacement per frame.
    pub vel: Vec2,
    /// 1.0 at birth; the particle is removed once this reaches zero.
    pub life: f32,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Score, lives and the game-over latch.
///
/// These are the values a presentation layer shows; nothing outside the
/// simulation writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Never decreases within a session.
    pub score: u32,
    /// Always within `[0, starting_lives]`.
    pub lives: u32,
    /// Once set, every step is a no-op until restart.
    pub game_over: bool,
    /// Best score known so far, including earlier sessions.
    pub high_score: u32,
    /// Score captured when `game_over` latched; 0 while playing.
    pub final_score: u32,
}

impl Session {
    pub fn new(lives: u32, high_score: u32) -> Self {
        Self {
            score: 0,
            lives,
            game_over: false,
            high_score,
            final_score: 0,
        }
    }

    /// Remove one life.  Returns `true` when this loss ended the session.
    ///
    /// Has no effect once the session is over.
    pub fn lose_life(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            self.final_score = self.score;
            return true;
        }
        false
    }

    /// Add `points` to the score.  Returns the new high score when it moved.
    pub fn award(&mut self, points: u32) -> Option<u32> {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            Some(self.high_score)
        } else {
            None
        }
    }
}

// ── Fire cooldown ─────────────────────────────────────────────────────────────

/// Timestamp gate for fire requests.
///
/// A request at `now` is accepted when no request was accepted yet, or when
/// `now - last_accepted >= window`.  Acceptance restarts the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireCooldown {
    window: Duration,
    last_accepted: Option<Duration>,
}

impl FireCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    pub fn try_accept(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_sub(last) < self.window {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The single owned game state.
///
/// Inserted as a resource when the loop starts and removed when it stops, so
/// its presence is also the "loop is running" signal for frame systems.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Simulation {
    pub playfield: Playfield,
    pub ship: Ship,
    pub projectiles: Vec<Projectile>,
    pub asteroids: Vec<Asteroid>,
    pub particles: Vec<Particle>,
    pub session: Session,
    pub cooldown: FireCooldown,
    /// Steps executed since the loop started (frozen steps are not counted).
    pub frame: u64,
    /// Aim revision that keyboard steering last overrode.  While the pending
    /// aim still has this revision the ship holds position instead of easing
    /// back toward a stale pointer target.
    pub keyboard_anchor: Option<u64>,
}

impl Simulation {
    pub fn new(config: &GameConfig, playfield: Playfield, high_score: u32) -> Self {
        Self {
            playfield,
            ship: Ship {
                pos: playfield.home(config),
            },
            projectiles: Vec::new(),
            asteroids: Vec::new(),
            particles: Vec::new(),
            session: Session::new(config.starting_lives, high_score),
            cooldown: FireCooldown::new(config.fire_cooldown()),
            frame: 0,
            keyboard_anchor: None,
        }
    }

    /// Reset every transient collection and counter in place.
    ///
    /// The high score survives; the ship and aim target return home.
    pub fn restart(&mut self, config: &GameConfig, input: &mut PendingInput) {
        self.projectiles.clear();
        self.asteroids.clear();
        self.particles.clear();
        self.session = Session::new(config.starting_lives, self.session.high_score);
        self.cooldown.reset();
        self.keyboard_anchor = None;
        self.ship.pos = self.playfield.home(config);
        *input = PendingInput::aimed_at(self.ship.pos);
    }

    /// Adopt new surface dimensions and recentre the ship and aim target.
    pub fn resize(&mut self, playfield: Playfield, config: &GameConfig, input: &mut PendingInput) {
        self.playfield = playfield;
        self.keyboard_anchor = None;
        self.ship.pos = playfield.home(config);
        input.point_at(self.ship.pos);
    }
}
