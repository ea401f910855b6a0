//! Game state and core simulation types
//!
//! Everything a render/HUD layer needs to observe lives here as plain data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The player's current movement ruleset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Cube,
    Ship,
    Ball,
    Ufo,
    Wave,
    Robot,
}

impl Mode {
    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Cube => "CUBE",
            Mode::Ship => "SHIP",
            Mode::Ball => "BALL",
            Mode::Ufo => "UFO",
            Mode::Wave => "WAVE",
            Mode::Robot => "ROBOT",
        }
    }

    /// Tint for this mode's portal trigger
    pub fn portal_color(&self) -> &'static str {
        match self {
            Mode::Cube => "cyan",
            Mode::Ship => "pink",
            Mode::Ball => "orange",
            Mode::Ufo => "purple",
            Mode::Wave => "blue",
            Mode::Robot => "white",
        }
    }
}

/// Track element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Walkable/collidable block
    Solid,
    /// Instant-death spike
    Hazard,
    /// Mode-switch trigger spanning the full playfield height
    Portal(Mode),
}

/// A world-space axis-aligned track element
///
/// Built once by the level generator, immutable afterwards. The object list
/// is sorted by non-decreasing x; the collision resolver and the render
/// window rely on that for early-exit scanning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub kind: ObjectKind,
    /// Top-left corner
    pub pos: Vec2,
    pub w: f32,
    pub h: f32,
}

impl WorldObject {
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.h
    }
}

/// Normalized input intent, consumed once per fixed step
///
/// The input collaborator delivers `hold` level-triggered and `jump_edge` as
/// exactly one pulse per physical press; `edge_consumed` debounces UFO taps
/// so a single press never fires twice.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputIntent {
    /// True while the jump control is physically held
    pub hold: bool,
    /// True exactly once per discrete press
    pub jump_edge: bool,
    /// Set when an edge-triggered mode has used the current press
    pub edge_consumed: bool,
}

impl InputIntent {
    /// Record a press from the input device layer
    pub fn press(&mut self) {
        self.hold = true;
        self.jump_edge = true;
        self.edge_consumed = false;
    }

    /// Record a release from the input device layer
    pub fn release(&mut self) {
        self.hold = false;
    }
}

/// The single player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// World position of the top-left corner; x stays anchored at
    /// [`PLAYER_X`] relative to the viewport
    pub pos: Vec2,
    pub w: f32,
    pub h: f32,
    /// Vertical velocity, world units per step
    pub dy: f32,
    pub mode: Mode,
    /// Visual rotation in degrees; also decides the landing-alignment snap
    pub rotation: f32,
    pub grounded: bool,
    pub alive: bool,
    /// +1.0 normal gravity, -1.0 inverted (ball mode)
    pub gravity_scale: f32,
    /// Remaining hold-boost steps (robot mode only)
    pub robot_jump_timer: u32,
}

impl Player {
    /// Fresh player at the level spawn point
    pub fn spawn() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, GROUND - PLAYER_SIZE),
            w: PLAYER_SIZE,
            h: PLAYER_SIZE,
            dy: 0.0,
            mode: Mode::Cube,
            rotation: 0.0,
            grounded: true,
            alive: true,
            gravity_scale: 1.0,
            robot_jump_timer: 0,
        }
    }

    /// Restore the exact initial per-level state
    pub fn reset(&mut self) {
        *self = Self::spawn();
    }

    /// Snap rotation to the nearest quarter turn (cube/robot landings)
    pub fn snap_rotation(&mut self) {
        self.rotation = (self.rotation / 90.0).round() * 90.0;
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.h
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::spawn()
    }
}

/// Whether a run is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunMode {
    #[default]
    Menu,
    Playing,
}

/// Run-level state: camera progress, attempts, scheduled crash events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub run_mode: RunMode,
    pub level_index: usize,
    /// Distance traveled, world units; resets to 0 on every respawn
    /// (every crash replays the level from its beginning)
    pub camera_x: f32,
    pub attempts: u32,
    pub level_length: f32,
    /// Simulation step counter, drives scheduled events
    pub time_ticks: u64,
    /// Run seed for generator jitter reproducibility
    pub seed: u64,
    /// Crash flash stays on until this tick
    pub flash_until: Option<u64>,
    /// Pending full-level respawn deadline
    pub respawn_at: Option<u64>,
}

impl GameState {
    /// Menu state with the given run seed
    pub fn new(seed: u64) -> Self {
        Self {
            run_mode: RunMode::Menu,
            level_index: 0,
            camera_x: 0.0,
            attempts: 1,
            level_length: 0.0,
            time_ticks: 0,
            seed,
            flash_until: None,
            respawn_at: None,
        }
    }

    /// Completion percentage for the HUD progress bar
    pub fn progress_percent(&self) -> f32 {
        if self.level_length <= 0.0 {
            return 0.0;
        }
        (self.camera_x / self.level_length * 100.0).min(100.0)
    }

    /// Background color for the active level
    pub fn background_color(&self) -> &'static str {
        BG_COLORS.get(self.level_index).copied().unwrap_or("#001133")
    }

    /// Whether the crash flash overlay is currently visible
    pub fn flash_active(&self) -> bool {
        self.flash_until.is_some_and(|t| self.time_ticks < t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_spawn_state() {
        let p = Player::spawn();
        assert_eq!(p.pos, Vec2::new(200.0, GROUND - 30.0));
        assert_eq!(p.dy, 0.0);
        assert_eq!(p.mode, Mode::Cube);
        assert_eq!(p.gravity_scale, 1.0);
        assert!(p.grounded);
        assert!(p.alive);
    }

    #[test]
    fn test_rotation_snap() {
        let mut p = Player::spawn();
        p.rotation = 132.0;
        p.snap_rotation();
        assert_eq!(p.rotation, 90.0);
        p.rotation = -47.0;
        p.snap_rotation();
        assert_eq!(p.rotation, -90.0);
    }

    #[test]
    fn test_input_press_release() {
        let mut input = InputIntent::default();
        input.press();
        assert!(input.hold && input.jump_edge && !input.edge_consumed);
        input.release();
        assert!(!input.hold);
        // Edge survives release until a mode consumes it
        assert!(input.jump_edge);
    }

    #[test]
    fn test_progress_percent_clamped() {
        let mut gs = GameState::new(1);
        gs.level_length = 1000.0;
        gs.camera_x = 500.0;
        assert_eq!(gs.progress_percent(), 50.0);
        gs.camera_x = 2000.0;
        assert_eq!(gs.progress_percent(), 100.0);
    }

    #[test]
    fn test_mode_labels_distinct() {
        let modes = [
            Mode::Cube,
            Mode::Ship,
            Mode::Ball,
            Mode::Ufo,
            Mode::Wave,
            Mode::Robot,
        ];
        for (i, a) in modes.iter().enumerate() {
            for b in &modes[i + 1..] {
                assert_ne!(a.label(), b.label());
                assert_ne!(a.portal_color(), b.portal_color());
            }
        }
    }
}
