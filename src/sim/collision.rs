//! Collision detection between the player, terrain and obstacles
//!
//! Two independent checks run every tick: falling off the terrain, and
//! touching an obstacle. Either one ends the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{ObstacleKind, Segment, World};
use crate::settings::Layout;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Left the terrain (below the playfield, or off the path)
    Fell,
    /// Touched an obstacle
    HitObstacle(ObstacleKind),
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    /// Axis-aligned box given by centre and half extents
    Rect { center: Vec2, half: Vec2 },
}

impl Shape {
    pub fn center(&self) -> Vec2 {
        match *self {
            Shape::Circle { center, .. } | Shape::Rect { center, .. } => center,
        }
    }
}

/// Circles overlap when their centres are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Boxes overlap when all four half-plane conditions hold
#[inline]
pub fn rects_overlap(a: Vec2, ha: Vec2, b: Vec2, hb: Vec2) -> bool {
    a.x - ha.x < b.x + hb.x
        && a.x + ha.x > b.x - hb.x
        && a.y - ha.y < b.y + hb.y
        && a.y + ha.y > b.y - hb.y
}

/// Circle vs box via the closest point on the box
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_center: Vec2, half: Vec2) -> bool {
    let closest = center.clamp(rect_center - half, rect_center + half);
    center.distance_squared(closest) < radius * radius
}

/// Shape vs shape
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    match (*a, *b) {
        (Shape::Circle { center: ca, radius: ra }, Shape::Circle { center: cb, radius: rb }) => {
            circles_overlap(ca, ra, cb, rb)
        }
        (Shape::Rect { center: ca, half: ha }, Shape::Rect { center: cb, half: hb }) => {
            rects_overlap(ca, ha, cb, hb)
        }
        (Shape::Circle { center, radius }, Shape::Rect { center: rc, half })
        | (Shape::Rect { center: rc, half }, Shape::Circle { center, radius }) => {
            circle_rect_overlap(center, radius, rc, half)
        }
    }
}

/// Find the segment whose span contains scroll position `x`
///
/// Segments are ordered by `start`, so this is a binary search. Gaps and an
/// empty sequence both yield `None`.
pub fn segment_at(segments: &[Segment], x: f32) -> Option<&Segment> {
    let idx = segments.partition_point(|s| s.start <= x);
    if idx == 0 {
        return None;
    }
    let segment = &segments[idx - 1];
    segment.contains(x).then_some(segment)
}

/// Whether the player has left the terrain
pub fn boundary_fall(world: &World) -> bool {
    let player = &world.player;
    match world.settings.layout {
        Layout::Ridge => player.pos.y > world.settings.viewport_span,
        Layout::Trail => {
            // Airborne players are judged when they land
            if player.altitude > 0.0 {
                return false;
            }
            match segment_at(&world.segments, player.pos.x) {
                Some(segment) => {
                    let half = player.half().y;
                    !segment.holds_lateral(player.pos.y - half, player.pos.y + half)
                }
                None => false,
            }
        }
    }
}

/// First obstacle the player overlaps, if any
pub fn obstacle_hit(world: &World) -> Option<ObstacleKind> {
    let player = &world.player;
    if world.settings.layout == Layout::Trail && player.altitude > 0.0 {
        return None;
    }
    let hitbox = player.hitbox(world.settings.layout);
    world
        .obstacles
        .iter()
        .find(|o| overlaps(&hitbox, &o.shape()))
        .map(|o| o.kind)
}

/// Run both checks
pub fn evaluate(world: &World) -> Option<Collision> {
    if boundary_fall(world) {
        return Some(Collision::Fell);
    }
    obstacle_hit(world).map(Collision::HitObstacle)
}
