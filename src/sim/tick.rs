//! Fixed timestep simulation driver
//!
//! Wall-clock time is accumulated and drained in 1/60 s steps; forward
//! camera progress happens once per fixed step, never per frame, so physics
//! is deterministic regardless of display refresh rate. Crash flash and
//! respawn are scheduled as tick deadlines evaluated inside the same loop,
//! with no host timers involved.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::resolve;
use super::level::{Level, LevelError};
use super::player::advance;
use super::state::{GameState, InputIntent, Player, RunMode, WorldObject};
use crate::consts::*;

/// Owns one run: game state, the player, the active level geometry and the
/// fixed-step accumulator. Render/HUD layers read state through the sink
/// methods; the input layer writes into an [`InputIntent`] passed to
/// [`Session::update`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    state: GameState,
    player: Player,
    level: Option<Level>,
    accumulator: f32,
}

impl Session {
    /// New session in the menu, with a run seed for generator jitter
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(seed),
            player: Player::spawn(),
            level: None,
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Build the level geometry and begin a run.
    ///
    /// Fails fast on an index outside the authored script; nothing is
    /// mutated in that case.
    pub fn start_level(&mut self, index: usize) -> Result<(), LevelError> {
        let level_seed = (index as u64)
            .wrapping_mul(2654435761)
            .wrapping_add(self.state.seed);
        let mut rng = Pcg32::seed_from_u64(level_seed);
        let level = Level::build(index, &mut rng)?;

        self.state.level_index = index;
        self.state.level_length = level.length;
        self.state.camera_x = 0.0;
        self.state.attempts = 1;
        self.state.flash_until = None;
        self.state.respawn_at = None;
        self.state.run_mode = RunMode::Playing;
        self.player.reset();
        self.accumulator = 0.0;
        self.level = Some(level);

        log::info!("level {index} started");
        Ok(())
    }

    /// Halt the run and return to the menu; in-progress state is discarded
    /// on the next level start.
    pub fn exit_to_menu(&mut self) {
        self.state.run_mode = RunMode::Menu;
        log::info!("exited to menu");
    }

    /// Accumulate a wall-clock delta and drain it in fixed steps
    pub fn update(&mut self, elapsed_secs: f32, input: &mut InputIntent) {
        if self.state.run_mode != RunMode::Playing {
            return;
        }
        // Tab-resume guard against the spiral of death
        self.accumulator += elapsed_secs.min(MAX_FRAME_DELTA);
        while self.accumulator >= SIM_DT {
            self.step(input);
            self.accumulator -= SIM_DT;
        }
    }

    /// Advance exactly one fixed step
    pub fn step(&mut self, input: &mut InputIntent) {
        if self.state.run_mode != RunMode::Playing {
            return;
        }
        self.state.time_ticks += 1;

        if let Some(at) = self.state.respawn_at {
            if self.state.time_ticks >= at {
                self.respawn();
            }
            // Dead steps only count down to the respawn; the restored state
            // stays observable for one full tick
            return;
        }
        if !self.player.alive {
            return;
        }

        let Some(level) = &self.level else {
            return;
        };

        self.state.camera_x += SPEED;

        let survived = advance(&mut self.player, input)
            && resolve(&mut self.player, &level.objects, self.state.camera_x);
        if !survived {
            self.crash();
            return;
        }

        if self.state.camera_x > self.state.level_length {
            log::info!(
                "level {} complete after {} attempts",
                self.state.level_index,
                self.state.attempts
            );
            self.state.run_mode = RunMode::Menu;
        }
    }

    /// Register a death. Idempotent: a second hit within the same step is a
    /// no-op, so overlapping collisions never double-count attempts.
    fn crash(&mut self) {
        if !self.player.alive {
            return;
        }
        self.player.alive = false;
        self.state.attempts += 1;
        self.state.flash_until = Some(self.state.time_ticks + FLASH_STEPS);
        self.state.respawn_at = Some(self.state.time_ticks + RESPAWN_DELAY_STEPS);
        log::info!(
            "crash at {:.0}/{:.0}, attempt {}",
            self.state.camera_x,
            self.state.level_length,
            self.state.attempts
        );
    }

    /// Full-level respawn: the player restarts from the beginning of the
    /// level (no checkpointing)
    fn respawn(&mut self) {
        self.player.reset();
        self.state.camera_x = 0.0;
        self.state.respawn_at = None;
    }

    // --- render / HUD sinks ---

    /// Objects inside the visible x-window around the camera
    pub fn visible_objects(&self) -> &[WorldObject] {
        let Some(level) = &self.level else {
            return &[];
        };
        let start = self.state.camera_x - SCAN_BEHIND;
        let end = self.state.camera_x + SCAN_AHEAD;
        let objs = &level.objects;
        let lo = objs.partition_point(|o| o.pos.x < start);
        let hi = objs.partition_point(|o| o.pos.x <= end);
        &objs[lo..hi]
    }

    pub fn attempts(&self) -> u32 {
        self.state.attempts
    }

    pub fn progress_percent(&self) -> f32 {
        self.state.progress_percent()
    }

    pub fn background_color(&self) -> &'static str {
        self.state.background_color()
    }

    pub fn flash_active(&self) -> bool {
        self.state.flash_active()
    }
}
