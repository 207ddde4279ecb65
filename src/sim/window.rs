//! Viewpoint, lookahead and retirement
//!
//! The course is logically endless but only the stretch between the
//! retention boundary and the lookahead edge is kept in memory.

use super::state::World;
use crate::consts::POWERUP_RADIUS;

/// Trailing edge of the camera along the scroll axis
#[inline]
pub fn viewpoint(world: &World) -> f32 {
    world.player.pos.x - world.settings.player_anchor
}

/// Content whose leading edge is behind this is dropped
#[inline]
pub fn retention_boundary(world: &World) -> f32 {
    viewpoint(world) - world.settings.retention
}

/// Number of segments starting at or after the viewpoint
pub fn segments_ahead(world: &World) -> usize {
    let vp = viewpoint(world);
    world.segments.len() - world.segments.partition_point(|s| s.start < vp)
}

/// Drop everything that has scrolled past the retention boundary
///
/// Returns the number of entities removed.
pub fn retire(world: &mut World) -> usize {
    let boundary = retention_boundary(world);
    let span = world.settings.viewport_span;
    let before = world.live_entities();

    world.segments.retain(|s| s.end() >= boundary);
    world.obstacles.retain(|o| o.front() >= boundary);
    world.power_ups.retain(|p| p.pos.x + POWERUP_RADIUS >= boundary);
    world.decorations.retain(|d| {
        let half = d.size / 2.0;
        d.pos.x + half.x >= boundary && d.pos.y + half.y >= 0.0 && d.pos.y - half.y <= span
    });

    before - world.live_entities()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Layout, Settings};
    use crate::sim::generate;

    #[test]
    fn test_viewpoint_follows_player() {
        let mut world = World::new(Settings::default(), 1);
        assert_eq!(viewpoint(&world), 0.0);
        world.player.pos.x += 120.0;
        assert_eq!(viewpoint(&world), 120.0);
        assert_eq!(retention_boundary(&world), 120.0 - world.settings.retention);
    }

    #[test]
    fn test_retire_drops_stale_content() {
        let mut world = World::new(Settings::for_layout(Layout::Trail), 9);
        world.player.pos.x += 3000.0;
        generate::ensure_generated(&mut world);
        let removed = retire(&mut world);
        assert!(removed > 0);

        let boundary = retention_boundary(&world);
        assert!(world.segments.iter().all(|s| s.end() >= boundary));
        assert!(world.obstacles.iter().all(|o| o.front() >= boundary));
        assert!(world.decorations.iter().all(|d| d.pos.x + d.size.x / 2.0 >= boundary));
        // The seed runway is long gone
        assert!(world.segments[0].start > 0.0);
    }

    #[test]
    fn test_retire_keeps_order() {
        let mut world = World::new(Settings::default(), 2);
        world.player.pos.x += 2000.0;
        generate::ensure_generated(&mut world);
        retire(&mut world);
        assert!(world.segments.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[test]
    fn test_segments_ahead_counts_from_viewpoint() {
        let world = World::new(Settings::for_layout(Layout::Trail), 4);
        // Viewpoint is 0 and every segment starts at or after it
        assert_eq!(segments_ahead(&world), world.segments.len());
    }
}
