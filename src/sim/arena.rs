//! Arena geometry and wraparound topology
//!
//! The arena is a fixed rectangle with (0, 0) at the top-left corner. Anything
//! that drifts more than its own radius past an edge reappears just outside
//! the opposite edge, so it slides back into view on the next tick.

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Rectangular wrapped world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    /// Center point (ship spawn)
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Teleport `pos` to the opposite edge if it left the arena by more than `radius`.
    ///
    /// The position is reset outright; nothing is interpolated across the seam.
    pub fn wrap(&self, pos: &mut Vec2, radius: f32) {
        pos.x = wrap_axis(pos.x, self.width, radius);
        pos.y = wrap_axis(pos.y, self.height, radius);
    }

    /// True if `pos` lies in the band every wrapped entity stays inside
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        (-radius..=self.width + radius).contains(&pos.x)
            && (-radius..=self.height + radius).contains(&pos.y)
    }
}

#[inline]
fn wrap_axis(v: f32, bound: f32, radius: f32) -> f32 {
    if v < -radius {
        bound + radius
    } else if v > bound + radius {
        -radius
    } else {
        v
    }
}
