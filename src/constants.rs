//! Centralised gameplay constants.
//!
//! Every tuneable value lives here so it can be found and changed in one
//! place.  [`crate::config::GameConfig::default`] mirrors these values; the
//! runtime copy may be overridden from `assets/game.toml`.
//!
//! Distances are logical pixels, speeds are pixels per frame, angles are
//! radians.  The playfield origin is the top-left corner with +Y pointing down.

// ── Window ────────────────────────────────────────────────────────────────────

/// Initial window width.  Together with [`WINDOW_HEIGHT`] this gives the 4:3
/// playfield the game was tuned on.
pub const WINDOW_WIDTH: u32 = 800;

/// Initial window height.
pub const WINDOW_HEIGHT: u32 = 600;

// ── Session ───────────────────────────────────────────────────────────────────

/// Lives granted at the start of every session.
pub const STARTING_LIVES: u32 = 5;

/// Points awarded per asteroid destroyed by a projectile.
pub const SCORE_PER_KILL: u32 = 10;

// ── Ship ──────────────────────────────────────────────────────────────────────

/// Radius used for ship–asteroid overlap tests.
pub const SHIP_HIT_RADIUS: f32 = 15.0;

/// Fraction of the remaining distance to the aim target covered each frame.
///
/// 0.05 gives the deliberately "heavy" feel; values near 1.0 make the ship
/// snap to the pointer.
pub const SHIP_FOLLOW_FACTOR: f32 = 0.05;

/// Distance kept between the ship and every playfield edge.
pub const SHIP_EDGE_MARGIN: f32 = 20.0;

/// Per-frame displacement for each held movement key.
pub const SHIP_KEYBOARD_SPEED: f32 = 5.0;

/// Distance from the bottom edge where the ship is parked on start and resize.
pub const SHIP_HOME_OFFSET: f32 = 50.0;

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const PROJECTILE_WIDTH: f32 = 4.0;
pub const PROJECTILE_HEIGHT: f32 = 12.0;

/// Upward travel per frame.
pub const PROJECTILE_SPEED: f32 = 7.0;

/// Minimum time between two accepted fire requests (milliseconds).
pub const FIRE_COOLDOWN_MS: u64 = 200;

// ── Asteroids ─────────────────────────────────────────────────────────────────

/// Smallest asteroid diameter.  Actual sizes are `MIN + rand * RANGE`.
pub const ASTEROID_MIN_SIZE: f32 = 25.0;
pub const ASTEROID_SIZE_RANGE: f32 = 20.0;

/// Slowest fall speed.  Actual speeds are `MIN + rand * RANGE`.
pub const ASTEROID_MIN_SPEED: f32 = 0.5;
pub const ASTEROID_SPEED_RANGE: f32 = 1.0;

/// Largest absolute spin per frame; the sign is random.
pub const ASTEROID_MAX_SPIN: f32 = 0.05;

/// Horizontal band kept free at the right edge when choosing a spawn column.
pub const ASTEROID_SPAWN_INSET: f32 = 30.0;

/// Independent per-frame probability that a new asteroid appears.
///
/// Expected gap between spawns is `1 / p` frames (~50 frames at 0.02).
pub const SPAWN_PROBABILITY: f64 = 0.02;

/// How far below the bottom edge an asteroid may travel before it counts as
/// a breach.
pub const BREACH_MARGIN: f32 = 50.0;

/// Vertices in the rendered asteroid silhouette.
pub const ASTEROID_SIDES: usize = 8;

/// Amplitude of the per-vertex radius jitter on asteroid silhouettes.
pub const ASTEROID_JITTER: f32 = 3.0;

// ── Particles ─────────────────────────────────────────────────────────────────

/// Particles emitted per destruction event.
pub const PARTICLES_PER_BURST: usize = 8;

/// Largest absolute particle velocity component.
pub const PARTICLE_MAX_SPEED: f32 = 2.0;

/// Life removed from every particle each frame (life starts at 1.0).
pub const PARTICLE_DECAY: f32 = 0.02;

/// Edge length of a rendered particle square.
pub const PARTICLE_SIZE: f32 = 3.0;

// ── Background ────────────────────────────────────────────────────────────────

pub const STAR_COUNT: usize = 50;

/// Starfield scroll speed in pixels per millisecond of elapsed time.
pub const STAR_SCROLL_RATE: f64 = 0.01;

// ── Persistence ───────────────────────────────────────────────────────────────

/// Storage key under which the high score is kept.
pub const HIGH_SCORE_KEY: &str = "spaceDefenderHighScore";

/// Default location of the high-score file, relative to the working directory.
pub const HIGH_SCORE_PATH: &str = "saves/high_scores.toml";

/// Default location of the optional configuration override file.
pub const CONFIG_PATH: &str = "assets/game.toml";
