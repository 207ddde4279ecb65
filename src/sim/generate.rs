//! Procedural generation of terrain and course content
//!
//! Terrain is extended one segment at a time until the lookahead window is
//! full. Each new segment gets independent rolls for an obstacle, a power-up
//! and scenery. All randomness comes from the world's seeded RNG.

use glam::Vec2;
use rand::Rng;

use super::state::{Decoration, DecorationKind, Obstacle, PowerUp, Segment, World};
use super::window;
use crate::consts::*;
use crate::settings::Layout;
use crate::{chance, roll};

/// Place the first segment explicitly so the window is never empty
pub fn seed_world(world: &mut World) {
    if !world.segments.is_empty() {
        return;
    }
    let id = world.next_entity_id();
    let settings = &world.settings;
    let segment = Segment {
        id,
        start: 0.0,
        length: settings.seed_length.max(1.0),
        level: settings.start_level,
        width: world.path_width,
    };
    world.segments.push(segment);
}

/// Whether the lookahead window is under-filled
pub fn needs_more(world: &World) -> bool {
    let Some(last) = world.segments.last() else {
        return true;
    };
    last.end() - window::viewpoint(world) < world.settings.lookahead
        || window::segments_ahead(world) < world.settings.min_segments_ahead
}

/// Extend the terrain until the lookahead window is full
///
/// Returns the number of segments appended.
pub fn ensure_generated(world: &mut World) -> usize {
    seed_world(world);
    let mut added = 0;
    while needs_more(world) {
        append_segment(world);
        added += 1;
    }
    added
}

/// Append one segment after the last, plus whatever content it rolls
fn append_segment(world: &mut World) {
    let Some(last) = world.segments.last().cloned() else {
        seed_world(world);
        return;
    };

    let settings = &world.settings;
    let rng = &mut world.rng;

    let width = match settings.layout {
        Layout::Ridge => 0.0,
        Layout::Trail => world.path_width,
    };

    let mut start = last.end();
    if settings.layout == Layout::Ridge && chance(rng, settings.gap_chance) {
        start += roll(rng, settings.min_gap, settings.max_gap);
    }

    let delta = roll(rng, -settings.max_step, settings.max_step);
    let (lo, hi) = settings.level_range(width);
    let level = (last.level + delta)
        .max(lo)
        .min(hi)
        .max(last.level - settings.max_step)
        .min(last.level + settings.max_step);

    let length = settings.segment_length.max(1.0);

    let segment = Segment {
        id: world.next_entity_id(),
        start,
        length,
        level,
        width,
    };

    spawn_obstacle(world, &segment);
    spawn_power_up(world, &segment);
    spawn_scenery(world, &segment);
    world.segments.push(segment);
}

/// Maybe place an obstacle somewhere on the segment
fn spawn_obstacle(world: &mut World, segment: &Segment) {
    let settings = &world.settings;
    let rng = &mut world.rng;
    if settings.obstacle_kinds.is_empty() || !chance(rng, settings.obstacle_chance) {
        return;
    }

    let kind = settings.obstacle_kinds[rng.random_range(0..settings.obstacle_kinds.len())];
    let half = kind.size() / 2.0;
    let x = roll(rng, segment.start + half.x, segment.end() - half.x);
    let y = match settings.layout {
        // Resting on the surface
        Layout::Ridge => segment.level - half.y,
        Layout::Trail => segment.level + half.y + roll(rng, 0.0, segment.width - 2.0 * half.y),
    };

    let id = world.next_entity_id();
    world.obstacles.push(Obstacle {
        id,
        kind,
        pos: Vec2::new(x, y),
    });
}

/// Maybe place a power-up on the segment
fn spawn_power_up(world: &mut World, segment: &Segment) {
    let settings = &world.settings;
    let rng = &mut world.rng;
    if settings.powerup_kinds.is_empty() || !chance(rng, settings.powerup_chance) {
        return;
    }

    let kind = settings.powerup_kinds[rng.random_range(0..settings.powerup_kinds.len())];
    let x = roll(rng, segment.start + POWERUP_RADIUS, segment.end() - POWERUP_RADIUS);
    let y = match settings.layout {
        // Mid-body height so a running player picks it up
        Layout::Ridge => segment.level - settings.player_size.y / 2.0,
        Layout::Trail => roll(
            rng,
            segment.level + POWERUP_RADIUS,
            segment.level + segment.width - POWERUP_RADIUS,
        ),
    };

    let id = world.next_entity_id();
    world.power_ups.push(PowerUp {
        id,
        kind,
        pos: Vec2::new(x, y),
    });
}

/// Maybe add a pine and a cloud near the segment
fn spawn_scenery(world: &mut World, segment: &Segment) {
    let settings = &world.settings;
    let rng = &mut world.rng;
    let mut scenery = Vec::new();

    if chance(rng, settings.pine_chance) {
        let (pos, size) = match settings.layout {
            Layout::Ridge => {
                let size = Vec2::new(30.0, 50.0);
                let x = roll(rng, segment.start, segment.end());
                (Vec2::new(x, segment.level - size.y / 2.0), size)
            }
            Layout::Trail => {
                // Along either edge of the playfield
                let size = Vec2::new(50.0, 30.0);
                let offset = roll(rng, 0.0, 50.0);
                let y = if chance(rng, 0.5) {
                    offset + size.y / 2.0
                } else {
                    settings.viewport_span - offset - size.y / 2.0
                };
                (Vec2::new(segment.start, y), size)
            }
        };
        scenery.push((DecorationKind::Pine, pos, size, Vec2::ZERO));
    }

    if chance(rng, settings.cloud_chance) {
        let size = Vec2::new(roll(rng, 50.0, 100.0), roll(rng, 20.0, 50.0));
        let speed = roll(rng, 0.1, 0.6);
        let (pos, drift) = match settings.layout {
            Layout::Ridge => (
                Vec2::new(segment.end(), roll(rng, 0.0, settings.viewport_span / 2.0)),
                Vec2::new(-speed, 0.0),
            ),
            Layout::Trail => (
                Vec2::new(
                    segment.start + roll(rng, 0.0, segment.length),
                    settings.viewport_span,
                ),
                Vec2::new(0.0, -speed),
            ),
        };
        scenery.push((DecorationKind::Cloud, pos, size, drift));
    }

    for (kind, pos, size, drift) in scenery {
        let id = world.next_entity_id();
        world.decorations.push(Decoration {
            id,
            kind,
            pos,
            size,
            drift,
        });
    }
}
