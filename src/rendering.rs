//! Renderer: a read-only projection of [`Simulation`] onto the window.
//!
//! Drawing happens in two halves so the projection can be tested without a
//! display:
//!
//! 1. [`build_frame`] turns `&Simulation` into a back-to-front list of
//!    [`DrawCommand`]s in playfield coordinates (origin top-left, y down).
//! 2. [`render_frame_system`] paints that list with immediate-mode gizmos,
//!    mapping each point into Bevy's centred, y-up world space.
//!
//! ## Layer Model
//!
//! | Layer        | Drawn as                                   | Colour          |
//! |--------------|--------------------------------------------|-----------------|
//! | Background   | `ClearColor`                               | rgb(26,26,46)   |
//! | Stars        | 1 px points, index-derived positions       | white, α 0.5    |
//! | Particles    | 3×3 squares                                | #ff6b6b, α life |
//! | Asteroids    | jittered 8-gon, rotated                    | #8b5cf6 / #a78bfa |
//! | Projectiles  | rectangle plus glow                        | #ff6b6b         |
//! | Ship         | arrow polygon plus glow                    | #00d4ff         |
//!
//! Gizmos have no persistent framebuffer, so the translucent motion-trail
//! wash is approximated by a plain clear.

use crate::constants::{ASTEROID_JITTER, ASTEROID_SIDES, PARTICLE_SIZE, STAR_SCROLL_RATE};
use crate::config::GameConfig;
use crate::lifecycle::FrameSet;
use crate::simulation::{Asteroid, Playfield, Ship, Simulation};
use bevy::prelude::*;
use std::f32::consts::TAU;

// ── Palette ───────────────────────────────────────────────────────────────────

pub const BACKGROUND_COLOR: Color = Color::srgb(26.0 / 255.0, 26.0 / 255.0, 46.0 / 255.0);
pub const STAR_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.5);
pub const DEBRIS_COLOR: Color = Color::srgb(1.0, 107.0 / 255.0, 107.0 / 255.0);
pub const ASTEROID_FILL: Color = Color::srgb(139.0 / 255.0, 92.0 / 255.0, 246.0 / 255.0);
pub const ASTEROID_STROKE: Color = Color::srgb(167.0 / 255.0, 139.0 / 255.0, 250.0 / 255.0);
pub const SHIP_COLOR: Color = Color::srgb(0.0, 212.0 / 255.0, 1.0);

/// Ship silhouette around its centre, y down: nose, left wing, notch, right wing.
pub const SHIP_OUTLINE: [Vec2; 4] = [
    Vec2::new(0.0, -15.0),
    Vec2::new(-12.0, 15.0),
    Vec2::new(0.0, 10.0),
    Vec2::new(12.0, 15.0),
];

/// Alpha of the glow halo drawn around projectiles and the ship.
const GLOW_ALPHA: f32 = 0.35;
/// Scale of the glow halo relative to the shape it surrounds.
const GLOW_SCALE: f32 = 1.3;
/// Asteroid fill is suggested by an inner outline at this fraction of the radius.
const FILL_INSET: f32 = 0.7;

// ── Display list ──────────────────────────────────────────────────────────────

/// Draw order, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Stars,
    Particles,
    Asteroids,
    Projectiles,
    Ship,
}

/// One primitive in playfield coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Wash { color: Color },
    Star { pos: Vec2, color: Color },
    Debris { pos: Vec2, size: f32, color: Color },
    Rock { outline: Vec<Vec2>, fill: Color, stroke: Color },
    Bolt { center: Vec2, size: Vec2, color: Color },
    Ship { outline: Vec<Vec2>, color: Color },
}

impl DrawCommand {
    pub fn layer(&self) -> Layer {
        match self {
            DrawCommand::Wash { .. } => Layer::Background,
            DrawCommand::Star { .. } => Layer::Stars,
            DrawCommand::Debris { .. } => Layer::Particles,
            DrawCommand::Rock { .. } => Layer::Asteroids,
            DrawCommand::Bolt { .. } => Layer::Projectiles,
            DrawCommand::Ship { .. } => Layer::Ship,
        }
    }
}

/// Deterministic starfield: star `i` sits at column `(i·123) mod width` and
/// scrolls down at `STAR_SCROLL_RATE` px per elapsed millisecond.
pub fn star_positions(playfield: Playfield, elapsed_ms: f64, count: usize) -> Vec<Vec2> {
    if playfield.width <= 0.0 || playfield.height <= 0.0 {
        return Vec::new();
    }
    let width = f64::from(playfield.width);
    let height = f64::from(playfield.height);
    let scroll = elapsed_ms * STAR_SCROLL_RATE;

    (0..count)
        .map(|i| {
            let i = i as f64;
            let x = (i * 123.0).rem_euclid(width);
            let y = (i * 456.0 + scroll).rem_euclid(height);
            Vec2::new(x as f32, y as f32)
        })
        .collect()
}

/// Irregular rotated polygon for an asteroid.
///
/// Vertex `i` sits at `size/2 + sin(i)·jitter` from the centre, so a given
/// asteroid always has the same silhouette.
pub fn asteroid_outline(asteroid: &Asteroid) -> Vec<Vec2> {
    let base = asteroid.radius();
    (0..ASTEROID_SIDES)
        .map(|i| {
            let angle = asteroid.rotation + i as f32 / ASTEROID_SIDES as f32 * TAU;
            let reach = base + (i as f32).sin() * ASTEROID_JITTER;
            asteroid.pos + Vec2::from_angle(angle) * reach
        })
        .collect()
}

/// Ship silhouette translated to the ship's position.
pub fn ship_outline(ship: &Ship) -> Vec<Vec2> {
    SHIP_OUTLINE.iter().map(|&offset| ship.pos + offset).collect()
}

/// Project the simulation into a back-to-front display list.
pub fn build_frame(sim: &Simulation, elapsed_ms: f64, star_count: usize) -> Vec<DrawCommand> {
    let mut frame = Vec::with_capacity(
        1 + star_count + sim.particles.len() + sim.asteroids.len() + sim.projectiles.len() + 1,
    );

    frame.push(DrawCommand::Wash {
        color: BACKGROUND_COLOR,
    });

    frame.extend(
        star_positions(sim.playfield, elapsed_ms, star_count)
            .into_iter()
            .map(|pos| DrawCommand::Star {
                pos,
                color: STAR_COLOR,
            }),
    );

    frame.extend(sim.particles.iter().map(|p| DrawCommand::Debris {
        pos: p.pos,
        size: PARTICLE_SIZE,
        color: DEBRIS_COLOR.with_alpha(p.life.clamp(0.0, 1.0)),
    }));

    frame.extend(sim.asteroids.iter().map(|a| DrawCommand::Rock {
        outline: asteroid_outline(a),
        fill: ASTEROID_FILL,
        stroke: ASTEROID_STROKE,
    }));

    // Projectile `pos.y` is the leading (top) edge.
    frame.extend(sim.projectiles.iter().map(|p| DrawCommand::Bolt {
        center: Vec2::new(p.pos.x, p.pos.y + p.height / 2.0),
        size: Vec2::new(p.width, p.height),
        color: DEBRIS_COLOR,
    }));

    frame.push(DrawCommand::Ship {
        outline: ship_outline(&sim.ship),
        color: SHIP_COLOR,
    });

    frame
}

// ── Painter ───────────────────────────────────────────────────────────────────

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, render_frame_system.in_set(FrameSet::Render));
    }
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Paint the current frame.  Only shared access to the simulation is taken.
pub fn render_frame_system(
    mut gizmos: Gizmos,
    mut clear: ResMut<ClearColor>,
    sim: Res<Simulation>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    let elapsed_ms = time.elapsed_secs_f64() * 1000.0;
    let to_world = |p: Vec2| {
        Vec2::new(
            p.x - sim.playfield.width / 2.0,
            sim.playfield.height / 2.0 - p.y,
        )
    };

    for command in build_frame(&sim, elapsed_ms, config.star_count) {
        match command {
            DrawCommand::Wash { color } => {
                if clear.0 != color {
                    clear.0 = color;
                }
            }
            DrawCommand::Star { pos, color } => {
                gizmos.rect_2d(to_world(pos), Vec2::ONE, color);
            }
            DrawCommand::Debris { pos, size, color } => {
                gizmos.rect_2d(to_world(pos), Vec2::splat(size), color);
            }
            DrawCommand::Rock {
                outline,
                fill,
                stroke,
            } => {
                let world: Vec<Vec2> = outline.iter().map(|&p| to_world(p)).collect();
                let centre = centroid(&world);
                let inner: Vec<Vec2> = world
                    .iter()
                    .map(|&p| centre + (p - centre) * FILL_INSET)
                    .collect();
                draw_closed(&mut gizmos, &inner, fill);
                draw_closed(&mut gizmos, &world, stroke);
            }
            DrawCommand::Bolt {
                center,
                size,
                color,
            } => {
                let at = to_world(center);
                gizmos.rect_2d(at, size * GLOW_SCALE, color.with_alpha(GLOW_ALPHA));
                gizmos.rect_2d(at, size, color);
            }
            DrawCommand::Ship { outline, color } => {
                let world: Vec<Vec2> = outline.iter().map(|&p| to_world(p)).collect();
                let centre = centroid(&world);
                let halo: Vec<Vec2> = world
                    .iter()
                    .map(|&p| centre + (p - centre) * GLOW_SCALE)
                    .collect();
                draw_closed(&mut gizmos, &halo, color.with_alpha(GLOW_ALPHA));
                draw_closed(&mut gizmos, &world, color);
            }
        }
    }
}

fn draw_closed(gizmos: &mut Gizmos, points: &[Vec2], color: Color) {
    for (i, &p1) in points.iter().enumerate() {
        let p2 = points[(i + 1) % points.len()];
        gizmos.line_2d(p1, p2, color);
    }
}

fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    points.iter().copied().sum::<Vec2>() / points.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Particle, Projectile};

    fn busy_simulation() -> Simulation {
        let config = GameConfig::default();
        let mut sim = Simulation::new(&config, Playfield::new(800.0, 600.0), 120);
        sim.asteroids.push(Asteroid {
            pos: Vec2::new(200.0, 100.0),
            size: 30.0,
            speed: 1.0,
            rotation: 0.4,
            spin: 0.01,
        });
        sim.projectiles.push(Projectile {
            pos: Vec2::new(400.0, 300.0),
            width: 4.0,
            height: 12.0,
            speed: 7.0,
        });
        sim.particles.push(Particle {
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ONE,
            life: 0.25,
        });
        sim
    }

    #[test]
    fn frame_is_back_to_front_with_ship_on_top() {
        let frame = build_frame(&busy_simulation(), 1234.0, 50);

        let layers: Vec<Layer> = frame.iter().map(DrawCommand::layer).collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]), "{layers:?}");
        assert_eq!(layers.first(), Some(&Layer::Background));
        assert_eq!(layers.last(), Some(&Layer::Ship));
        assert_eq!(layers.iter().filter(|l| **l == Layer::Stars).count(), 50);
        assert_eq!(layers.iter().filter(|l| **l == Layer::Asteroids).count(), 1);
        assert_eq!(layers.iter().filter(|l| **l == Layer::Projectiles).count(), 1);
        assert_eq!(layers.iter().filter(|l| **l == Layer::Particles).count(), 1);
    }

    #[test]
    fn building_a_frame_leaves_state_untouched() {
        let sim = busy_simulation();
        let before = sim.clone();
        let _ = build_frame(&sim, 5000.0, 50);
        assert_eq!(sim, before);
    }

    #[test]
    fn starfield_is_reproducible_and_scrolls_with_time() {
        let field = Playfield::new(800.0, 600.0);
        let a = star_positions(field, 1000.0, 50);
        let b = star_positions(field, 1000.0, 50);
        assert_eq!(a, b);

        // Star 1 at t=0 is (123, 456); 1000 ms later it has moved 10 px down.
        let early = star_positions(field, 0.0, 2);
        let late = star_positions(field, 1000.0, 2);
        assert_eq!(early[1], Vec2::new(123.0, 456.0));
        assert_eq!(late[1], Vec2::new(123.0, 466.0));

        for star in &a {
            assert!(star.x >= 0.0 && star.x < 800.0);
            assert!(star.y >= 0.0 && star.y < 600.0);
        }
    }

    #[test]
    fn empty_playfield_has_no_stars() {
        assert!(star_positions(Playfield::new(0.0, 0.0), 10.0, 50).is_empty());
    }

    #[test]
    fn asteroid_outline_is_a_jittered_octagon() {
        let rock = Asteroid {
            pos: Vec2::new(100.0, 100.0),
            size: 40.0,
            speed: 1.0,
            rotation: 0.0,
            spin: 0.0,
        };
        let outline = asteroid_outline(&rock);
        assert_eq!(outline.len(), 8);

        // Vertex 0 has zero jitter and points along +x.
        assert!((outline[0] - Vec2::new(120.0, 100.0)).length() < 1e-4);
        for p in &outline {
            let r = p.distance(rock.pos);
            assert!((17.0 - 1e-4..=23.0 + 1e-4).contains(&r), "radius {r}");
        }
    }

    #[test]
    fn particle_alpha_tracks_remaining_life() {
        let frame = build_frame(&busy_simulation(), 0.0, 0);
        let alpha = frame.iter().find_map(|c| match c {
            DrawCommand::Debris { color, .. } => Some(color.alpha()),
            _ => None,
        });
        assert_eq!(alpha, Some(0.25));
    }

    #[test]
    fn ship_outline_follows_ship() {
        let ship = Ship {
            pos: Vec2::new(400.0, 550.0),
        };
        let outline = ship_outline(&ship);
        assert_eq!(outline[0], Vec2::new(400.0, 535.0), "nose points up the screen");
    }
}
