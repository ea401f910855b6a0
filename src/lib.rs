//! Grid Dash - A side-scrolling geometry-runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level generation)
//!
//! Rendering, UI panels and raw input-device binding live outside this crate;
//! the simulation exposes plain state (visible objects, player pose, HUD
//! numbers) and consumes a normalized [`sim::InputIntent`] each fixed step.

pub mod sim;

pub use sim::{
    GameState, InputIntent, LevelError, Mode, ObjectKind, Player, RunMode, Session, WorldObject,
};

/// Game configuration constants
///
/// Level geometry spacing is hand-tuned against these numbers (minimum gaps
/// of 12-14 blocks are only survivable at this gravity/speed ratio), so they
/// must not be changed independently.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest wall-clock delta fed to the accumulator (tab-resume guard)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Downward acceleration per step (CUBE/BALL/UFO/ROBOT)
    pub const GRAVITY: f32 = 0.65;
    /// Cube jump impulse
    pub const JUMP_FORCE: f32 = -10.5;
    /// Ship acceleration while held
    pub const SHIP_LIFT: f32 = -0.35;
    /// Ship acceleration while released
    pub const SHIP_GRAVITY: f32 = 0.25;
    /// Ufo tap impulse
    pub const UFO_JUMP: f32 = -9.0;
    /// Robot minimum jump impulse (hold extends it)
    pub const ROBOT_JUMP_MIN: f32 = -6.5;
    /// Robot hold-boost duration in steps
    pub const ROBOT_HOLD_STEPS: u32 = 15;
    /// Extra upward velocity per held robot step
    pub const ROBOT_HOLD_BOOST: f32 = 0.5;
    /// Wave vertical speed (velocity, not acceleration)
    pub const WAVE_SPEED: f32 = 7.0;
    /// Speed clamp magnitude for all modes
    pub const TERMINAL_VEL: f32 = 12.0;
    /// Forward speed in world units per step
    pub const SPEED: f32 = 6.5;

    /// Vertical world coordinate of the ground line
    pub const GROUND: f32 = 570.0;
    /// Grid unit in world units
    pub const BLOCK_SIZE: f32 = 40.0;
    /// Player square side
    pub const PLAYER_SIZE: f32 = 30.0;
    /// Player x offset from the camera (fixed viewport anchor)
    pub const PLAYER_X: f32 = 200.0;
    /// Out-of-bounds kill margin above/below the playfield
    pub const BOUNDS_MARGIN: f32 = 10.0;

    /// Hitbox inset on all sides (forgiving hitbox)
    pub const HITBOX_INSET: f32 = 8.0;
    /// Landing tolerance band for solid resolution
    pub const LANDING_TOLERANCE: f32 = 15.0;
    /// Collision/render scan window behind the camera
    pub const SCAN_BEHIND: f32 = 100.0;
    /// Collision/render scan window ahead of the camera
    pub const SCAN_AHEAD: f32 = 1400.0;

    /// Generator cursor start offset
    pub const CURSOR_START: f32 = 500.0;
    /// Clear track inserted before and after each portal trigger
    pub const PORTAL_BUFFER: f32 = 200.0;
    /// Trailing buffer appended to the final cursor position
    pub const LEVEL_TAIL: f32 = 1000.0;
    /// Number of authored levels
    pub const LEVEL_COUNT: usize = 15;

    /// Crash flash duration in steps (~100 ms)
    pub const FLASH_STEPS: u64 = 6;
    /// Crash-to-respawn delay in steps (~600 ms)
    pub const RESPAWN_DELAY_STEPS: u64 = 36;

    /// Per-level background colors (official palette)
    pub const BG_COLORS: [&str; LEVEL_COUNT] = [
        "#2E64FE", "#D32EFE", "#00FF40", "#FF0000", "#0080FF", "#8000FF", "#FF0040", "#FF8000",
        "#FF00FF", "#000080", "#2E2E2E", "#804000", "#FF4000", "#202020", "#6600cc",
    ];
}

/// Convert a grid x coordinate to world units
#[inline]
pub fn grid_to_world_x(gx: f32) -> f32 {
    gx * consts::BLOCK_SIZE
}

/// Convert a grid y coordinate (blocks above ground) to a world-space top edge
#[inline]
pub fn grid_to_world_y(gy: f32) -> f32 {
    consts::GROUND - gy * consts::BLOCK_SIZE - consts::BLOCK_SIZE
}
