//! Space Defender game library
//!
//! A single-screen arcade shooter: steer the ship, shoot the falling
//! asteroids, and keep them from slipping past the bottom edge.  The game
//! state is one owned [`simulation::Simulation`] resource advanced once per
//! frame; everything else feeds it input or draws it.

pub mod config;
pub mod constants;
pub mod error;
pub mod hud;
pub mod input;
pub mod lifecycle;
pub mod rendering;
pub mod save;
pub mod simulation;
