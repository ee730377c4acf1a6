//! Geometry helpers in logical [0, 1]² space.

use std::f64::consts::TAU;

use crate::scene::Path;

/// A 2D point or vector in logical coordinates.
pub type Vec2 = glam::DVec2;

/// Minimum segment count used by [`circle`].
pub const MIN_CIRCLE_SEGMENTS: usize = 64;

/// Closed axis-aligned square of side `size` centered at `(cx, cy)`.
pub fn square(cx: f64, cy: f64, size: f64) -> Path {
    let hs = size * 0.5;
    Path::new(
        vec![
            Vec2::new(cx - hs, cy - hs),
            Vec2::new(cx + hs, cy - hs),
            Vec2::new(cx + hs, cy + hs),
            Vec2::new(cx - hs, cy + hs),
        ],
        true,
    )
}

/// Closed circle approximation with at least [`MIN_CIRCLE_SEGMENTS`] points.
pub fn circle(cx: f64, cy: f64, radius: f64, segments: usize) -> Path {
    Path::new(
        regular_polygon(cx, cy, radius, segments.max(MIN_CIRCLE_SEGMENTS), 0.0),
        true,
    )
}

/// Closed circle approximation with exactly `segments` points.
///
/// Used for small stamped dots where a full-resolution circle is wasted.
pub fn circle_at(cx: f64, cy: f64, radius: f64, segments: usize) -> Path {
    Path::new(regular_polygon(cx, cy, radius, segments, 0.0), true)
}

/// Vertices of a regular polygon, the first at angle `rotation`.
pub fn regular_polygon(cx: f64, cy: f64, radius: f64, sides: usize, rotation: f64) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = i as f64 / sides as f64 * TAU + rotation;
            Vec2::new(cx, cy) + polar_to_cartesian(radius, angle)
        })
        .collect()
}

/// `n` points evenly spaced on an arc from `start` to `end` (inclusive).
///
/// `n < 2` yields just the start point (or nothing for `n == 0`).
pub fn arc(cx: f64, cy: f64, radius: f64, start: f64, end: f64, n: usize) -> Vec<Vec2> {
    if n < 2 {
        return (0..n)
            .map(|_| Vec2::new(cx, cy) + polar_to_cartesian(radius, start))
            .collect();
    }
    let dt = (end - start) / (n - 1) as f64;
    (0..n)
        .map(|i| Vec2::new(cx, cy) + polar_to_cartesian(radius, start + i as f64 * dt))
        .collect()
}

/// Converts polar `(r, θ)` to a cartesian offset.
pub fn polar_to_cartesian(r: f64, theta: f64) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Converts a vector to polar `(r, θ)` with θ in (-π, π].
pub fn cartesian_to_polar(v: Vec2) -> (f64, f64) {
    (v.length(), v.y.atan2(v.x))
}

/// True when `p` lies in the closed unit square.
pub fn in_unit_square(p: Vec2) -> bool {
    (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
}
