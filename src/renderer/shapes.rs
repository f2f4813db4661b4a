//! Shape generation for 2D primitives
//!
//! Everything is tessellated into triangle lists in arena coordinates. Neon
//! strokes are a thin bright core over a wide translucent underlay.

use glam::Vec2;

use super::vertex::{Vertex, with_alpha};

/// Width multiplier of the glow underlay relative to the core stroke
pub const GLOW_WIDTH: f32 = 4.0;
/// Alpha of the glow underlay relative to the core stroke
pub const GLOW_ALPHA: f32 = 0.18;

fn push_quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    // a-b-c, c-b-d
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(d.x, d.y, color));
}

/// Thick line segment from `a` to `b`
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = dir.perp() * (width / 2.0);
    // Extend by half the width so corners of joined segments overlap
    let a = a - dir * (width / 2.0);
    let b = b + dir * (width / 2.0);
    push_quad(out, a + perp, a - perp, b + perp, b - perp, color);
}

/// Polyline through `points`, closed back to the first point if `closed`
pub fn polyline(out: &mut Vec<Vertex>, points: &[Vec2], closed: bool, width: f32, color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    for pair in points.windows(2) {
        line(out, pair[0], pair[1], width, color);
    }
    if closed {
        if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
            line(out, last, first, width, color);
        }
    }
}

/// Polyline with a glow underlay
pub fn neon_polyline(
    out: &mut Vec<Vertex>,
    points: &[Vec2],
    closed: bool,
    width: f32,
    color: [f32; 4],
    glow: bool,
) {
    if glow {
        polyline(out, points, closed, width * GLOW_WIDTH, with_alpha(color, GLOW_ALPHA));
    }
    polyline(out, points, closed, width, color);
}

/// Axis-aligned filled square centered on `center`
pub fn square(out: &mut Vec<Vertex>, center: Vec2, size: f32, color: [f32; 4]) {
    let h = size / 2.0;
    push_quad(
        out,
        center + Vec2::new(-h, -h),
        center + Vec2::new(h, -h),
        center + Vec2::new(-h, h),
        center + Vec2::new(h, h),
        color,
    );
}

/// Square with a soft halo behind it
pub fn neon_square(out: &mut Vec<Vertex>, center: Vec2, size: f32, color: [f32; 4], glow: bool) {
    if glow {
        square(out, center, size * GLOW_WIDTH, with_alpha(color, GLOW_ALPHA));
    }
    square(out, center, size, color);
}

/// Filled convex fan around `center` through `points`
pub fn fan(out: &mut Vec<Vertex>, center: Vec2, points: &[Vec2], color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    for i in 0..points.len() {
        let p1 = points[i];
        let p2 = points[(i + 1) % points.len()];
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(p1.x, p1.y, color));
        out.push(Vertex::new(p2.x, p2.y, color));
    }
}

/// Rotate local points by `angle` and move them to `origin`, scaled by `scale`
pub fn transform(points: &[Vec2], origin: Vec2, angle: f32, scale: f32) -> Vec<Vec2> {
    let rot = Vec2::from_angle(angle);
    points.iter().map(|&p| origin + rot.rotate(p * scale)).collect()
}
