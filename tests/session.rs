use glam::Vec2;
use mountain_runner::persistence::{FileSlot, MemorySlot, ScoreSlot};
use mountain_runner::sim::{Obstacle, ObstacleKind, Player, viewpoint};
use mountain_runner::*;

fn running(layout: Layout, seed: u64) -> Session {
    let settings = Settings::for_layout(layout);
    let mut session = Session::new(settings, Box::new(MemorySlot::new()), seed).unwrap();
    session.set_autopilot(true);
    session.handle(InputEvent::Key(Key::Enter));
    session
}

fn force_crash(session: &mut Session) {
    let span = session.world().settings.viewport_span;
    let player = &mut session.world_mut().player;
    player.pos.y = span + 100.0;
    player.altitude = 0.0;
    session.frame();
}

#[test]
fn test_restart_resets_run() {
    let mut session = running(Layout::Ridge, 3);
    for _ in 0..100 {
        session.frame();
    }
    session.world_mut().obstacles.push(Obstacle {
        id: 9999,
        kind: ObstacleKind::Rock,
        pos: Vec2::new(99999.0, 480.0),
    });
    force_crash(&mut session);
    assert_eq!(session.phase(), SessionPhase::GameOver);

    session.handle(InputEvent::Key(Key::Enter));
    assert_eq!(session.phase(), SessionPhase::Running);

    let world = session.world();
    let spawn = Player::spawn(&world.settings);
    assert_eq!(world.score, 0);
    assert_eq!(world.time_ticks, 0);
    assert_eq!(world.player.pos, spawn.pos);
    assert!(world.crash.is_none());
    assert!(world.obstacles.iter().all(|o| o.pos.x != 99999.0));
    assert_eq!(world.segments[0].start, 0.0);
}

#[test]
fn test_high_score_survives_restart() {
    let mut session = running(Layout::Ridge, 8);
    for _ in 0..120 {
        session.frame();
    }
    let best = session.high_score().best();
    assert!(best > 0);
    force_crash(&mut session);

    session.handle(InputEvent::PrimaryAction);
    assert_eq!(session.world().score, 0);
    assert_eq!(session.high_score().best(), best);
    assert_eq!(session.snapshot().high_score, best);
}

#[test]
fn test_high_score_persists_between_sessions() {
    let path = std::env::temp_dir()
        .join(format!("mountain-runner-session-{}", std::process::id()))
        .join("highscore");

    let mut first = Session::new(Settings::default(), Box::new(FileSlot::new(&path)), 21).unwrap();
    first.set_autopilot(true);
    first.start();
    for _ in 0..120 {
        first.frame();
    }
    force_crash(&mut first);
    let best = first.high_score().best();
    assert!(best > 0);
    assert_eq!(FileSlot::new(&path).load().unwrap(), Some(best));

    let second = Session::new(Settings::default(), Box::new(FileSlot::new(&path)), 22).unwrap();
    assert_eq!(second.high_score().best(), best);

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[test]
fn test_same_seed_same_run() {
    for layout in [Layout::Ridge, Layout::Trail] {
        let mut a = running(layout, 77);
        let mut b = running(layout, 77);
        for _ in 0..1500 {
            a.frame();
            b.frame();
        }
        let (wa, wb) = (a.world(), b.world());
        assert_eq!(wa.time_ticks, wb.time_ticks);
        assert_eq!(wa.score, wb.score);
        assert_eq!(wa.crash, wb.crash);
        assert_eq!(wa.player.pos, wb.player.pos);
        assert_eq!(wa.segments, wb.segments);
        assert_eq!(wa.obstacles, wb.obstacles);
    }
}

#[test]
fn test_thousand_frame_scenario() {
    for layout in [Layout::Ridge, Layout::Trail] {
        let mut session = running(layout, 1234);
        let mut last_score = 0;

        for _ in 0..1000 {
            session.frame();
            let world = session.world();

            assert!(world.score >= last_score);
            last_score = world.score;

            assert!(world.segments.windows(2).all(|w| w[0].end() <= w[1].start));
            let last = world.segments.last().expect("terrain never empties");
            assert!(last.end() - viewpoint(world) >= world.settings.lookahead);
            assert!(world.live_entities() < 500);

            if session.phase() == SessionPhase::GameOver {
                break;
            }
        }

        let snap = session.snapshot();
        assert_eq!(snap.layout, layout);
        assert_eq!(snap.score, last_score);
        assert!(snap.high_score >= snap.score);
    }
}
