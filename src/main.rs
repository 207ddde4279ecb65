//! Mountain Runner entry point
//!
//! Native builds run a headless autopilot session and report the result:
//!
//! ```text
//! mountain-runner [ridge|trail] [seed] [max_ticks] [settings.json]
//! ```
//!
//! The wasm32 build is driven by the host page through the library.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;
    use mountain_runner::consts::TICKS_PER_SECOND;
    use mountain_runner::persistence::default_slot;
    use mountain_runner::{Layout, Session, SessionPhase, Settings};

    /// Ten minutes of play
    const DEFAULT_MAX_TICKS: u64 = 10 * 60 * TICKS_PER_SECOND as u64;

    #[derive(Parser)]
    #[command(name = "mountain-runner")]
    #[command(about = "Play one autopilot run of Mountain Runner without a display")]
    #[command(version)]
    struct Cli {
        /// Terrain layout: ridge (side-view climb) or trail (top-down path)
        #[arg(default_value = "ridge", value_parser = parse_layout)]
        layout: Layout,

        /// World seed (defaults to the current time)
        seed: Option<u64>,

        /// Stop after this many ticks if the run is still going
        #[arg(default_value_t = DEFAULT_MAX_TICKS)]
        max_ticks: u64,

        /// JSON settings file; overrides the layout preset
        settings: Option<PathBuf>,
    }

    fn parse_layout(raw: &str) -> Result<Layout, String> {
        Layout::from_str(raw).ok_or_else(|| format!("unknown layout '{raw}' (ridge or trail)"))
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    pub fn run() -> ExitCode {
        let cli = Cli::parse();
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Mountain Runner (headless) starting...");

        let settings = match &cli.settings {
            Some(path) => match Settings::load(path) {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("Could not load settings from {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            },
            None => Settings::for_layout(cli.layout),
        };
        let seed = cli.seed.unwrap_or_else(clock_seed);

        let mut session = match Session::new(settings, default_slot(), seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid settings: {e}");
                return ExitCode::FAILURE;
            }
        };
        session.set_autopilot(true);
        session.start();

        let progress_every = 10 * TICKS_PER_SECOND as u64;
        while session.phase() == SessionPhase::Running
            && session.world().time_ticks < cli.max_ticks
        {
            session.frame();
            let world = session.world();
            if world.time_ticks % progress_every == 0 {
                log::info!(
                    "t={}s score={} distance={:.0} speed={:.2} live={}",
                    world.time_ticks / TICKS_PER_SECOND as u64,
                    world.score,
                    world.distance(),
                    world.speed,
                    world.live_entities()
                );
            }
        }
        session.save_high_score();

        let world = session.world();
        match world.crash {
            Some(crash) => println!(
                "Crashed ({crash:?}) after {} ticks, score {}, best {}",
                world.time_ticks,
                world.score,
                session.high_score().best()
            ),
            None => println!(
                "Survived {} ticks, score {}, best {}",
                world.time_ticks,
                world.score,
                session.high_score().best()
            ),
        }
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives the library directly; nothing to do here
}
