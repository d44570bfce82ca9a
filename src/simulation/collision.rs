//! Circle overlap tests.

use bevy::prelude::*;

/// `true` when the centres are strictly closer than `reach`.
///
/// `reach` is the sum of both radii.  Touching circles do not overlap.
#[inline]
pub fn circles_overlap(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance_squared(b) < reach * reach
}
