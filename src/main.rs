//! Grid Dash entry point
//!
//! Headless demo: runs the deterministic simulation with a scripted input
//! pattern and logs HUD state. The rendering and input layers are external
//! collaborators; this binary exercises the core fixed-step loop natively.
//!
//! Usage: `grid-dash [level_index]` (default 0), `RUST_LOG=info` for output.

use grid_dash::consts::SIM_DT;
use grid_dash::{InputIntent, RunMode, Session};

/// Safety cap: five minutes of simulated time
const MAX_FRAMES: u64 = 60 * 60 * 5;

fn main() {
    env_logger::init();

    let level = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0);

    let mut session = Session::new(0xDA5E_CAFE);
    if let Err(err) = session.start_level(level) {
        log::error!("{err}");
        std::process::exit(1);
    }
    log::info!(
        "level {level}, background {}, {} visible objects at spawn",
        session.background_color(),
        session.visible_objects().len()
    );

    let mut input = InputIntent::default();
    let mut frames: u64 = 0;
    while session.state().run_mode == RunMode::Playing && frames < MAX_FRAMES {
        // Scripted tapping: press for a third of a second, release, repeat
        match frames % 40 {
            0 => input.press(),
            20 => input.release(),
            _ => {}
        }
        session.update(SIM_DT, &mut input);
        frames += 1;

        if frames % 600 == 0 {
            log::info!(
                "t={:>4}s progress {:>5.1}% attempts {} mode {}",
                frames / 60,
                session.progress_percent(),
                session.attempts(),
                session.player().mode.label()
            );
        }
    }

    log::info!(
        "finished: {:.1}% of level {level} in {} attempts",
        session.progress_percent(),
        session.attempts()
    );
}
