//! Collision detection and resolution against track geometry
//!
//! A windowed scan over the x-sorted object list, dispatching per object
//! kind. Solids are resolved from the player's previous vertical position
//! with a tolerance band, so a shallow approach counts as a landing (or a
//! head bump) and anything steeper is fatal.
//!
//! The test is discrete, not swept: at high relative speed a thin object can
//! be skipped entirely. That tunneling matches the original tuning and is a
//! known limitation, not corrected here.

use super::state::{Mode, ObjectKind, Player, WorldObject};
use crate::consts::*;

/// Resolve one step's interactions between the player and the world.
///
/// `objects` must be sorted by non-decreasing x; the scan skips everything
/// left of `camera_x - SCAN_BEHIND` and stops at the first object past
/// `camera_x + SCAN_AHEAD`. Returns `false` if the player crashed.
pub fn resolve(player: &mut Player, objects: &[WorldObject], camera_x: f32) -> bool {
    let window_start = camera_x - SCAN_BEHIND;
    let window_end = camera_x + SCAN_AHEAD;

    // Shrunk hitbox, fixed for the whole scan (landing snaps within the
    // scan do not re-expand it)
    let left = camera_x + player.pos.x + HITBOX_INSET;
    let right = camera_x + player.pos.x + player.w - HITBOX_INSET;
    let top = player.pos.y + HITBOX_INSET;
    let bottom = player.pos.y + player.h - HITBOX_INSET;

    for obj in objects {
        if obj.pos.x < window_start {
            continue;
        }
        if obj.pos.x > window_end {
            break;
        }

        let overlaps = right > obj.pos.x
            && left < obj.right()
            && bottom > obj.pos.y
            && top < obj.bottom();
        if !overlaps {
            continue;
        }

        match obj.kind {
            ObjectKind::Hazard => return false,
            ObjectKind::Portal(mode) => {
                // Mode switches always restore upright gravity
                player.mode = mode;
                player.gravity_scale = 1.0;
                log::debug!("portal: switched to {}", mode.label());
            }
            ObjectKind::Solid => {
                if !resolve_solid(player, obj) {
                    return false;
                }
            }
        }
    }

    true
}

/// Tolerance-band solid resolution from the pre-integration position.
///
/// Returns `false` on a fatal (side/embedded) collision.
fn resolve_solid(player: &mut Player, obj: &WorldObject) -> bool {
    // Wave has no platform-landing capability
    if player.mode == Mode::Wave {
        return false;
    }

    let prev_y = player.pos.y - player.dy;

    if player.gravity_scale == 1.0 {
        if prev_y + player.h <= obj.pos.y + LANDING_TOLERANCE && player.dy >= 0.0 {
            // Land on top
            player.pos.y = obj.pos.y - player.h;
            player.dy = 0.0;
            player.grounded = true;
            if matches!(player.mode, Mode::Cube | Mode::Robot) {
                player.snap_rotation();
            }
        } else if prev_y >= obj.bottom() - LANDING_TOLERANCE && player.dy < 0.0 {
            // Head bump on the underside
            player.pos.y = obj.bottom();
            player.dy = 0.0;
        } else {
            return false;
        }
    } else {
        // Inverted gravity: landing means ceiling-walking on the underside
        if prev_y >= obj.bottom() - LANDING_TOLERANCE && player.dy <= 0.0 {
            player.pos.y = obj.bottom();
            player.dy = 0.0;
            player.grounded = true;
        } else {
            return false;
        }
    }

    true
}
