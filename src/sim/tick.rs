//! Fixed tick simulation step
//!
//! Core game loop that advances the world deterministically, one display
//! frame per call.

use super::autopilot;
use super::collision::{self, overlaps, segment_at};
use super::generate;
use super::state::{ActivePowerUp, GameEvent, Locomotion, PowerUpKind, World};
use super::window;
use crate::consts::EPSILON;
use crate::settings::{Layout, ScoreRule};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lateral target from the pointer (Trail)
    pub target_lateral: Option<f32>,
    /// Jump (click/tap/space)
    pub jump: bool,
    /// Idle/demo mode - autopilot plays the game
    pub autopilot: bool,
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) {
    if world.is_crashed() {
        return;
    }

    world.time_ticks += 1;
    world.events.clear();

    expire_power_up(world);

    let mut input = input.clone();
    if input.autopilot {
        let auto = autopilot::drive(world);
        input.jump |= auto.jump;
        if auto.target_lateral.is_some() {
            input.target_lateral = auto.target_lateral;
        }
    }
    let input = &input;

    match world.settings.layout {
        Layout::Ridge => step_ridge(world, input),
        Layout::Trail => step_trail(world, input),
    }

    for decoration in &mut world.decorations {
        decoration.pos += decoration.drift;
    }

    generate::ensure_generated(world);
    window::retire(world);
    update_score(world);
    collect_power_ups(world);

    if let Some(collision) = collision::evaluate(world) {
        world.crash = Some(collision);
        world.events.push(GameEvent::Crashed(collision));
        log::info!(
            "Crashed ({:?}) at tick {} with score {}",
            collision,
            world.time_ticks,
            world.score
        );
        return;
    }

    ramp_difficulty(world);
}

/// Side view: gravity on y, land on segment surfaces, step up small rises
fn step_ridge(world: &mut World, input: &TickInput) {
    let settings = &world.settings;
    let player = &mut world.player;
    let was_supported = player.locomotion.is_supported();
    let prev_bottom = player.bottom();

    // Vertical: jetpack thrust overrides gravity
    if player.has_power_up(PowerUpKind::Jetpack) {
        player.vel.y = -settings.jetpack_lift;
    } else {
        if input.jump && was_supported {
            player.vel.y = -settings.jump_force;
            world.events.push(GameEvent::Jumped);
        }
        player.vel.y += settings.gravity;
    }

    // Horizontal speed was chosen at the end of the previous tick
    player.pos += player.vel;

    // Can't fly out of the top of the playfield
    let ceiling = player.half().y;
    if player.pos.y < ceiling {
        player.pos.y = ceiling;
    }

    let half_height = player.half().y;
    match segment_at(&world.segments, player.pos.x) {
        Some(segment)
            if player.vel.y >= 0.0
                && player.bottom() >= segment.level
                && prev_bottom <= segment.level + settings.max_step =>
        {
            let stepped_up = prev_bottom > segment.level + EPSILON;
            player.pos.y = segment.level - half_height;
            player.vel.y = 0.0;
            player.locomotion = if stepped_up {
                Locomotion::Climbing
            } else {
                Locomotion::Grounded
            };
            if !was_supported {
                world.events.push(GameEvent::Landed);
            }
        }
        _ => {
            player.locomotion = if player.vel.y < 0.0 {
                Locomotion::Jumping
            } else {
                Locomotion::Falling
            };
        }
    }

    // Speed for the next tick: a climb slows the tick after contact
    let mut next_speed = world.speed;
    if player.locomotion == Locomotion::Climbing {
        next_speed *= settings.climb_speed_factor;
        if player.has_power_up(PowerUpKind::Pickaxe) {
            next_speed *= settings.pickaxe_climb_boost;
        }
    }
    player.vel.x = next_speed;
}

/// Top view: pointer steers laterally, jumps are hops above the path
fn step_trail(world: &mut World, input: &TickInput) {
    let settings = &world.settings;
    let player = &mut world.player;
    let was_supported = player.locomotion.is_supported();

    if player.has_power_up(PowerUpKind::Jetpack) {
        player.altitude_vel = settings.jetpack_lift;
    } else {
        if input.jump && was_supported {
            player.altitude_vel = settings.jump_force;
            world.events.push(GameEvent::Jumped);
        }
        player.altitude_vel -= settings.gravity;
    }

    // Direct positional mapping from the pointer
    if let Some(target) = input.target_lateral {
        let half = player.half().y;
        player.pos.y = target.max(half).min(settings.viewport_span - half);
    }

    player.pos.x += player.vel.x;
    player.altitude = (player.altitude + player.altitude_vel).min(settings.jump_apex());

    if player.altitude <= 0.0 {
        player.altitude = 0.0;
        player.altitude_vel = 0.0;
        player.locomotion = Locomotion::Grounded;
        if !was_supported {
            world.events.push(GameEvent::Landed);
        }
    } else {
        player.locomotion = if player.altitude_vel > 0.0 {
            Locomotion::Jumping
        } else {
            Locomotion::Falling
        };
    }

    player.vel.x = world.speed;
}

/// Clear the power-up once its time is up
fn expire_power_up(world: &mut World) {
    if let Some(active) = world.player.power_up {
        if world.time_ticks >= active.expires_at {
            world.player.power_up = None;
            world.events.push(GameEvent::PowerUpExpired(active.kind));
            log::debug!("{} expired at tick {}", active.kind.as_str(), world.time_ticks);
        }
    }
}

/// Pick up at most one power-up the player is touching
fn collect_power_ups(world: &mut World) {
    let hitbox = world.player.hitbox(world.settings.layout);
    let Some(idx) = world
        .power_ups
        .iter()
        .position(|p| overlaps(&hitbox, &p.shape()))
    else {
        return;
    };

    let power_up = world.power_ups.remove(idx);
    world.player.power_up = Some(ActivePowerUp {
        kind: power_up.kind,
        expires_at: world.time_ticks + u64::from(world.settings.powerup_ticks),
    });
    world.events.push(GameEvent::PowerUpCollected(power_up.kind));
    log::debug!(
        "Collected {} at tick {}",
        power_up.kind.as_str(),
        world.time_ticks
    );
}

/// Score never decreases
fn update_score(world: &mut World) {
    let score = match world.settings.score_rule {
        ScoreRule::Ticks => world.score + 1,
        ScoreRule::Distance { unit } => (world.distance() / unit).floor().max(0.0) as u64,
    };
    world.score = world.score.max(score);
}

/// Speed up and narrow the path as the score grows
fn ramp_difficulty(world: &mut World) {
    let settings = &world.settings;
    world.speed = (world.speed + settings.speed_increment).min(settings.max_speed);
    if settings.layout == Layout::Trail {
        world.path_width = (settings.path_width - world.score as f32 * settings.path_shrink)
            .max(settings.min_path_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::collision::Collision;
    use crate::sim::state::{Obstacle, ObstacleKind, PowerUp, Segment};
    use glam::Vec2;

    /// Settings without random hazards or pickups
    fn calm(layout: Layout) -> Settings {
        let mut settings = Settings::for_layout(layout);
        settings.obstacle_chance = 0.0;
        settings.powerup_chance = 0.0;
        settings.gap_chance = 0.0;
        settings
    }

    fn flat(start: f32, length: f32, level: f32) -> Segment {
        Segment {
            id: 0,
            start,
            length,
            level,
            width: 0.0,
        }
    }

    #[test]
    fn test_tick_advances_player() {
        let mut world = World::new(calm(Layout::Ridge), 12345);
        let x = world.player.pos.x;
        tick(&mut world, &TickInput::default());
        assert_eq!(world.time_ticks, 1);
        assert!(world.player.pos.x > x);
        assert_eq!(world.player.locomotion, Locomotion::Grounded);
        assert!(!world.is_crashed());
    }

    #[test]
    fn test_jump_only_when_supported() {
        let mut world = World::new(calm(Layout::Ridge), 1);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut world, &jump);
        assert_eq!(world.player.locomotion, Locomotion::Jumping);
        assert!(world.events.contains(&GameEvent::Jumped));
        let vy = world.player.vel.y;
        assert!(vy < 0.0);

        // Mid-air: a second request does nothing
        tick(&mut world, &jump);
        assert!(!world.events.contains(&GameEvent::Jumped));
        assert_eq!(world.player.vel.y, vy + world.settings.gravity);
    }

    #[test]
    fn test_jump_lands_again() {
        let mut world = World::new(calm(Layout::Ridge), 1);
        world.segments = vec![flat(0.0, 100_000.0, 500.0)];
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut world, &jump);
        let mut landed = false;
        for _ in 0..60 {
            tick(&mut world, &TickInput::default());
            landed |= world.events.contains(&GameEvent::Landed);
        }
        assert!(landed);
        assert_eq!(world.player.locomotion, Locomotion::Grounded);
        assert!((world.player.bottom() - 500.0).abs() < EPSILON);
    }

    #[test]
    fn test_climb_speed_lags_one_tick() {
        let mut world = World::new(calm(Layout::Ridge), 1);
        world.segments = vec![flat(0.0, 300.0, 500.0), flat(300.0, 100_000.0, 480.0)];
        world.player.pos.x = 298.0;
        let speed = world.speed;

        // Contact tick moves at full speed and only then slows down
        tick(&mut world, &TickInput::default());
        assert_eq!(world.player.locomotion, Locomotion::Climbing);
        assert!((world.player.pos.x - (298.0 + speed)).abs() < EPSILON);
        assert!((world.player.bottom() - 480.0).abs() < EPSILON);
        let climb = speed * world.settings.climb_speed_factor;
        assert!((world.player.vel.x - climb).abs() < EPSILON);

        let x = world.player.pos.x;
        tick(&mut world, &TickInput::default());
        assert!((world.player.pos.x - (x + climb)).abs() < EPSILON);
        assert_eq!(world.player.locomotion, Locomotion::Grounded);
        assert!((world.player.vel.x - world.speed).abs() < 0.01);
    }

    #[test]
    fn test_pickaxe_speeds_climb() {
        let mut world = World::new(calm(Layout::Ridge), 1);
        world.segments = vec![flat(0.0, 300.0, 500.0), flat(300.0, 100_000.0, 480.0)];
        world.player.pos.x = 298.0;
        world.player.power_up = Some(ActivePowerUp {
            kind: PowerUpKind::Pickaxe,
            expires_at: 1_000,
        });
        let speed = world.speed;
        tick(&mut world, &TickInput::default());
        let settings = &world.settings;
        let expected = speed * settings.climb_speed_factor * settings.pickaxe_climb_boost;
        assert!((world.player.vel.x - expected).abs() < EPSILON);
    }

    #[test]
    fn test_wall_too_tall_is_not_climbed() {
        let mut world = World::new(calm(Layout::Ridge), 1);
        world.segments = vec![flat(0.0, 300.0, 500.0), flat(300.0, 100_000.0, 400.0)];
        world.player.pos.x = 298.0;
        tick(&mut world, &TickInput::default());
        assert_eq!(world.player.locomotion, Locomotion::Falling);
    }

    #[test]
    fn test_power_up_expires() {
        let mut world = World::new(calm(Layout::Ridge), 1);
        world.player.power_up = Some(ActivePowerUp {
            kind: PowerUpKind::Jetpack,
            expires_at: 3,
        });
        tick(&mut world, &TickInput::default());
        assert!(world.player.vel.y < 0.0);
        tick(&mut world, &TickInput::default());
        assert!(world.player.power_up.is_some());
        tick(&mut world, &TickInput::default());
        assert!(world.player.power_up.is_none());
        assert!(world.events.contains(&GameEvent::PowerUpExpired(PowerUpKind::Jetpack)));
    }

    #[test]
    fn test_collects_power_up() {
        let mut world = World::new(calm(Layout::Ridge), 1);
        let pos = world.player.pos + Vec2::new(world.speed, 0.0);
        world.power_ups.push(PowerUp {
            id: 900,
            kind: PowerUpKind::Pickaxe,
            pos,
        });
        tick(&mut world, &TickInput::default());
        assert!(world.power_ups.iter().all(|p| p.id != 900));
        let active = world.player.power_up.expect("power-up active");
        assert_eq!(active.kind, PowerUpKind::Pickaxe);
        assert_eq!(active.expires_at, 1 + u64::from(world.settings.powerup_ticks));
        assert!(world.events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Pickaxe)));
    }

    #[test]
    fn test_obstacle_ends_run() {
        let mut world = World::new(calm(Layout::Ridge), 1);
        let pos = world.player.pos + Vec2::new(40.0, 0.0);
        world.obstacles.push(Obstacle {
            id: 901,
            kind: ObstacleKind::Tree,
            pos,
        });
        for _ in 0..20 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.crash, Some(Collision::HitObstacle(ObstacleKind::Tree)));

        // A crashed world is frozen
        let ticks = world.time_ticks;
        let x = world.player.pos.x;
        tick(&mut world, &TickInput::default());
        assert_eq!(world.time_ticks, ticks);
        assert_eq!(world.player.pos.x, x);
    }

    #[test]
    fn test_ridge_gap_is_fatal_without_jump() {
        let mut world = World::new(calm(Layout::Ridge), 1);
        world.segments = vec![flat(0.0, 250.0, 500.0), flat(330.0, 100_000.0, 500.0)];
        for _ in 0..200 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.crash, Some(Collision::Fell));
    }

    #[test]
    fn test_trail_pointer_maps_laterally() {
        let mut world = World::new(calm(Layout::Trail), 1);
        let input = TickInput {
            target_lateral: Some(330.0),
            ..Default::default()
        };
        tick(&mut world, &input);
        assert_eq!(world.player.pos.y, 330.0);

        // Clamped to the playfield
        let input = TickInput {
            target_lateral: Some(-50.0),
            ..Default::default()
        };
        tick(&mut world, &input);
        assert_eq!(world.player.pos.y, world.player.half().y);
    }

    #[test]
    fn test_trail_off_path_falls() {
        let mut world = World::new(calm(Layout::Trail), 1);
        let input = TickInput {
            target_lateral: Some(20.0),
            ..Default::default()
        };
        tick(&mut world, &input);
        assert_eq!(world.crash, Some(Collision::Fell));
    }

    #[test]
    fn test_trail_hop_clears_edge() {
        let mut world = World::new(calm(Layout::Trail), 1);
        let hop = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut world, &hop);
        assert!(world.player.altitude > 0.0);

        // Over the verge while airborne
        let off = TickInput {
            target_lateral: Some(20.0),
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut world, &off);
        }
        assert!(!world.is_crashed());
    }

    #[test]
    fn test_trail_path_narrows() {
        let mut world = World::new(calm(Layout::Trail), 1);
        let autopilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut world, &autopilot);
        }
        assert!(!world.is_crashed());
        assert_eq!(world.score, 600);
        let expected = world.settings.path_width - 600.0 * world.settings.path_shrink;
        assert!((world.path_width - expected).abs() < 0.01);
        assert!(world.speed > world.settings.start_speed);
    }

    #[test]
    fn test_score_never_decreases() {
        for layout in [Layout::Ridge, Layout::Trail] {
            let mut world = World::new(Settings::for_layout(layout), 77);
            let autopilot = TickInput {
                autopilot: true,
                ..Default::default()
            };
            let mut last = 0;
            for _ in 0..2_000 {
                tick(&mut world, &autopilot);
                assert!(world.score >= last);
                last = world.score;
            }
        }
    }

    #[test]
    fn test_memory_bounded() {
        for layout in [Layout::Ridge, Layout::Trail] {
            let mut world = World::new(calm(layout), 2024);
            let autopilot = TickInput {
                autopilot: true,
                ..Default::default()
            };
            let mut peak = 0;
            for _ in 0..10_000 {
                tick(&mut world, &autopilot);
                peak = peak.max(world.live_entities());
            }
            assert!(!world.is_crashed(), "{layout:?} run crashed: {:?}", world.crash);
            assert!(peak < 200, "{layout:?} peaked at {peak} live entities");
            let boundary = window::retention_boundary(&world);
            assert!(world.segments.iter().all(|s| s.end() >= boundary));
        }
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed should produce identical results
        for layout in [Layout::Ridge, Layout::Trail] {
            let mut world1 = World::new(Settings::for_layout(layout), 99999);
            let mut world2 = World::new(Settings::for_layout(layout), 99999);

            for _ in 0..1_000 {
                tick(&mut world1, &TickInput::default());
                tick(&mut world2, &TickInput::default());
            }

            assert_eq!(world1.time_ticks, world2.time_ticks);
            assert_eq!(world1.crash, world2.crash);
            assert_eq!(world1.score, world2.score);
            assert_eq!(world1.player, world2.player);
            assert_eq!(world1.segments, world2.segments);
            assert_eq!(world1.obstacles, world2.obstacles);
        }
    }
}
