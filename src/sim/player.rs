//! Player state machine
//!
//! One fixed-step kinematic advance: exactly one per-mode rule, then the
//! terminal-velocity clamp, integration, out-of-bounds check and the default
//! ground/ceiling snap. No I/O, no world geometry - solids are handled by
//! the collision resolver afterwards.

use super::state::{InputIntent, Mode, Player};
use crate::consts::*;

/// Advance the player by one fixed step.
///
/// Consumes edge-triggered input in place. Returns `false` if the player
/// left the vertical bounds (an unconditional kill, independent of any
/// object collision).
pub fn advance(player: &mut Player, input: &mut InputIntent) -> bool {
    let gravity = GRAVITY * player.gravity_scale;

    match player.mode {
        Mode::Cube => {
            player.dy += gravity;
            if player.grounded && input.hold {
                player.dy = JUMP_FORCE * player.gravity_scale;
                player.grounded = false;
            }
            if !player.grounded {
                player.rotation += 5.0 * player.gravity_scale;
            } else {
                player.snap_rotation();
            }
        }
        Mode::Ship => {
            // Free-flying: no ground snap, hold trades fall for lift
            player.dy += if input.hold { SHIP_LIFT } else { SHIP_GRAVITY };
            player.rotation = player.dy * 2.5;
        }
        Mode::Ball => {
            player.dy += gravity;
            if player.grounded && input.jump_edge {
                player.gravity_scale = -player.gravity_scale;
                player.dy = 2.0 * player.gravity_scale;
                player.grounded = false;
                input.jump_edge = false;
            }
            player.rotation += 5.0 * player.gravity_scale;
        }
        Mode::Ufo => {
            player.dy += gravity;
            if input.jump_edge && !input.edge_consumed {
                player.dy = UFO_JUMP;
                input.edge_consumed = true;
                input.jump_edge = false;
            }
        }
        Mode::Wave => {
            // Velocity rule, not acceleration - gravity does not apply
            player.dy = if input.hold { -WAVE_SPEED } else { WAVE_SPEED };
            player.rotation = player.dy * 5.0;
        }
        Mode::Robot => {
            player.dy += gravity;
            if !input.hold {
                player.robot_jump_timer = 0;
            }
            if player.grounded && input.hold {
                player.dy = ROBOT_JUMP_MIN;
                player.grounded = false;
                player.robot_jump_timer = ROBOT_HOLD_STEPS;
            } else if input.hold && player.robot_jump_timer > 0 {
                // Variable jump height: holding extends the arc
                player.dy -= ROBOT_HOLD_BOOST;
                player.robot_jump_timer -= 1;
            }
        }
    }

    if player.dy.abs() > TERMINAL_VEL {
        player.dy = TERMINAL_VEL * player.dy.signum();
    }
    player.pos.y += player.dy;

    let in_bounds =
        player.pos.y >= -BOUNDS_MARGIN && player.pos.y <= GROUND + BOUNDS_MARGIN;

    // Grounded is re-established only by a landing event this same step
    player.grounded = false;

    if player.mode != Mode::Wave && player.mode != Mode::Ship {
        if player.gravity_scale == 1.0 && player.bottom() >= GROUND {
            player.pos.y = GROUND - player.h;
            player.dy = 0.0;
            player.grounded = true;
        } else if player.gravity_scale == -1.0 && player.pos.y <= 0.0 {
            player.pos.y = 0.0;
            player.dy = 0.0;
            player.grounded = true;
        }
    }

    in_bounds
}
