//! Idle/demo driver
//!
//! Produces the input a reasonable player would give this tick. Used for the
//! attract loop and the headless binary; it reads the world but never mutates it.

use super::collision::segment_at;
use super::state::World;
use super::tick::TickInput;
use crate::settings::Layout;

/// Ticks of warning before an obstacle that trigger a jump
const JUMP_LEAD_TICKS: f32 = 6.0;
/// Ticks of warning before the ground ends that trigger a jump
const EDGE_LEAD_TICKS: f32 = 2.0;

/// Decide this tick's input
pub fn drive(world: &World) -> TickInput {
    match world.settings.layout {
        Layout::Ridge => drive_ridge(world),
        Layout::Trail => drive_trail(world),
    }
}

fn drive_ridge(world: &World) -> TickInput {
    let player = &world.player;
    if !player.locomotion.is_supported() {
        return TickInput::default();
    }

    let speed = player.vel.x.max(world.speed);
    let ahead_x = player.pos.x + speed * EDGE_LEAD_TICKS;

    let ground = segment_at(&world.segments, ahead_x);
    let ground_ends = ground.is_none();
    // A rise taller than one step cannot be climbed
    let wall = ground.is_some_and(|s| player.bottom() - s.level > world.settings.max_step);
    let blocked = world.obstacles.iter().any(|o| {
        let ahead = o.back() - player.front();
        ahead > -1.0 && ahead < speed * JUMP_LEAD_TICKS
    });

    TickInput {
        jump: ground_ends || wall || blocked,
        ..Default::default()
    }
}

fn drive_trail(world: &World) -> TickInput {
    let player = &world.player;

    // Steer for the middle of the path where we will be after moving
    let next_x = player.pos.x + player.vel.x;
    let target_lateral = segment_at(&world.segments, next_x).map(|s| s.level + s.width / 2.0);

    let speed = player.vel.x.max(world.speed);
    let reach = player.size.y / 3.0;
    let blocked = world.obstacles.iter().any(|o| {
        let ahead = o.back() - player.pos.x;
        let lateral = (o.pos.y - target_lateral.unwrap_or(player.pos.y)).abs();
        ahead > -1.0 && ahead < speed * JUMP_LEAD_TICKS && lateral < o.kind.size().y / 2.0 + reach
    });

    TickInput {
        target_lateral,
        jump: blocked && player.locomotion.is_supported(),
        ..Default::default()
    }
}
