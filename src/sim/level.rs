//! Procedural level generation
//!
//! A library of track-pattern emitters plus a hand-authored per-index level
//! script. Patterns work in grid coordinates (one block = 40 world units)
//! and advance a monotonically increasing cursor; the finished object list
//! is sorted by x, which the collision resolver's early-exit scan relies on.
//!
//! Spacing is tuned against the physics constants: the ball takes 6-7 blocks
//! of forward travel to cross the corridor vertically, so ball and sawtooth
//! obstacles keep at least 12 blocks between consecutive hazard groups.

use glam::Vec2;
use rand::Rng;
use thiserror::Error;

use super::state::{Mode, ObjectKind, WorldObject};
use crate::consts::*;
use crate::{grid_to_world_x, grid_to_world_y};

/// Level-script failures; a bad index is a programmer error and is rejected
/// before any geometry is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("unknown level index {0} (expected 0..{max})", max = LEVEL_COUNT)]
    UnknownLevel(usize),
}

/// Track-pattern emitter state
///
/// The cursor lives in world units and only ever increases; every emitter
/// appends objects in cursor order.
#[derive(Debug)]
pub struct PatternGen {
    cursor: f32,
    objects: Vec<WorldObject>,
}

impl PatternGen {
    pub fn new() -> Self {
        Self {
            cursor: CURSOR_START,
            objects: Vec::new(),
        }
    }

    /// Current cursor position in world units
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    fn push(&mut self, gx: f32, gy: f32, kind: ObjectKind) {
        let (y, h) = match kind {
            ObjectKind::Portal(_) => (0.0, GROUND),
            _ => (grid_to_world_y(gy), BLOCK_SIZE),
        };
        self.objects.push(WorldObject {
            kind,
            pos: Vec2::new(grid_to_world_x(gx), y),
            w: BLOCK_SIZE,
            h,
        });
    }

    fn advance(&mut self) -> f32 {
        self.cursor += BLOCK_SIZE;
        self.cursor / BLOCK_SIZE
    }

    /// Flat ground with a staircase every 30 columns and a triple hazard
    /// row on the half-phase between staircases.
    pub fn stereo_walk(&mut self, length: usize) {
        for i in 0..length {
            let cx = self.advance();
            self.push(cx, 0.0, ObjectKind::Solid);
            if i % 30 == 0 {
                self.push(cx, 1.0, ObjectKind::Solid);
                self.push(cx + 1.0, 2.0, ObjectKind::Solid);
                self.push(cx + 2.0, 3.0, ObjectKind::Solid);
            }
            if i % 60 == 30 {
                self.push(cx, 1.0, ObjectKind::Hazard);
                self.push(cx + 1.0, 1.0, ObjectKind::Hazard);
                self.push(cx + 2.0, 1.0, ObjectKind::Hazard);
            }
        }
    }

    /// Sparse ground hazards, each paired with a 2-wide rescue platform
    pub fn jump_pad_walk(&mut self, count: usize) {
        for _ in 0..count {
            self.cursor += 200.0;
            let cx = self.cursor / BLOCK_SIZE;
            self.push(cx, 0.0, ObjectKind::Hazard);
            self.push(cx, 3.0, ObjectKind::Solid);
            self.push(cx + 1.0, 3.0, ObjectKind::Solid);
        }
    }

    /// Ship corridor: floor and ceiling columns whose gap equals
    /// `tightness`; the floor jitters by at most one block every 4 columns,
    /// so the corridor never narrows instantaneously.
    pub fn ship_tunnel(&mut self, length: usize, tightness: i32, rng: &mut impl Rng) {
        let mut ceil_h: i32 = 15;
        let mut floor_h: i32 = 1;
        for i in 0..length {
            let cx = self.advance();
            if i % 4 == 0 {
                let change = rng.random_range(-1..=1);
                floor_h = (floor_h + change).clamp(1, 6);
                ceil_h = (floor_h + tightness).min(15);
            }
            for j in 0..floor_h {
                self.push(cx, j as f32, ObjectKind::Solid);
            }
            for k in ceil_h..16 {
                self.push(cx, k as f32, ObjectKind::Solid);
            }
        }
    }

    /// Rising platforms with a hazard tucked under each platform edge
    pub fn vertical_walk(&mut self, length: usize) {
        let mut h: u32 = 0;
        for i in 0..length {
            let cx = self.advance();
            if i % 10 == 0 {
                h = (h + 2).min(6);
            }
            if i % 15 == 0 {
                h = 0;
            }
            self.push(cx, 0.0, ObjectKind::Solid);
            if h > 0 {
                self.push(cx, h as f32, ObjectKind::Solid);
                self.push(cx, (h - 1) as f32, ObjectKind::Hazard);
            }
        }
    }

    /// Floor/ceiling corridor with alternating floor and ceiling spikes
    /// every 12 columns (ball crossing time caps how close they can be)
    pub fn sawtooth(&mut self, length: usize) {
        for i in 0..length {
            let cx = self.advance();
            self.push(cx, 0.0, ObjectKind::Solid);
            self.push(cx, 10.0, ObjectKind::Solid);
            if i % 12 == 0 {
                if (i / 12) % 2 == 0 {
                    self.push(cx, 1.0, ObjectKind::Hazard);
                } else {
                    self.push(cx, 9.0, ObjectKind::Hazard);
                }
            }
        }
    }

    /// Tighter ship corridor variant
    pub fn clutter_ship(&mut self, length: usize, rng: &mut impl Rng) {
        self.ship_tunnel(length, 4, rng);
    }

    /// Flat ground with a 3-tall block column every 10 columns
    pub fn robot_hop(&mut self, length: usize) {
        for i in 0..length {
            let cx = self.advance();
            if i % 10 == 0 {
                self.push(cx, 0.0, ObjectKind::Solid);
                self.push(cx, 1.0, ObjectKind::Solid);
                self.push(cx, 2.0, ObjectKind::Solid);
            } else {
                self.push(cx, 0.0, ObjectKind::Solid);
            }
        }
    }

    /// Ball corridor: obstacle groups every `max(14, 25 - difficulty)`
    /// columns, randomly a floor spike or a hazard-flanked mid platform
    pub fn ball_section(&mut self, length: usize, difficulty: u32, rng: &mut impl Rng) {
        let gap = (25usize.saturating_sub(difficulty as usize)).max(14);
        for i in 0..length {
            let cx = self.advance();
            self.push(cx, 0.0, ObjectKind::Solid);
            self.push(cx, 10.0, ObjectKind::Solid);
            if i % gap == 0 {
                if rng.random_bool(0.5) {
                    self.push(cx, 1.0, ObjectKind::Hazard);
                } else {
                    self.push(cx, 5.0, ObjectKind::Solid);
                    self.push(cx, 6.0, ObjectKind::Hazard);
                    self.push(cx, 4.0, ObjectKind::Hazard);
                }
            }
        }
    }

    /// Mode-switch trigger with a clear buffer on both sides, so the player
    /// is never mid-obstacle during the switch
    pub fn portal(&mut self, mode: Mode) {
        self.cursor += PORTAL_BUFFER;
        let cx = self.cursor / BLOCK_SIZE;
        self.push(cx, 5.0, ObjectKind::Portal(mode));
        self.cursor += PORTAL_BUFFER;
    }

    /// Finish the track: sorted object list plus total level length
    /// (final cursor + trailing buffer)
    pub fn finish(mut self) -> (Vec<WorldObject>, f32) {
        // Stable sort: staircase emitters reach a couple of blocks ahead of
        // the cursor, the resolver needs strict non-decreasing x
        self.objects
            .sort_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
        (self.objects, self.cursor + LEVEL_TAIL)
    }
}

impl Default for PatternGen {
    fn default() -> Self {
        Self::new()
    }
}

/// A built level: immutable geometry plus its total length
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Level {
    pub index: usize,
    pub objects: Vec<WorldObject>,
    pub length: f32,
}

impl Level {
    /// Build the hand-authored level for `index`.
    ///
    /// The RNG only feeds the ship-tunnel and ball-section jitter; the same
    /// seed reproduces the exact geometry.
    pub fn build(index: usize, rng: &mut impl Rng) -> Result<Self, LevelError> {
        use Mode::*;
        if index >= LEVEL_COUNT {
            return Err(LevelError::UnknownLevel(index));
        }

        let mut g = PatternGen::new();
        match index {
            0 => {
                g.stereo_walk(200);
                g.portal(Ship);
                g.ship_tunnel(300, 6, rng);
                g.portal(Cube);
                g.stereo_walk(200);
            }
            1 => {
                g.stereo_walk(50);
                g.jump_pad_walk(15);
                g.portal(Ship);
                g.ship_tunnel(400, 5, rng);
                g.portal(Cube);
                g.jump_pad_walk(10);
            }
            2 => {
                g.vertical_walk(150);
                g.portal(Ball);
                g.ball_section(400, 2, rng);
                g.portal(Ship);
                g.ship_tunnel(400, 5, rng);
                g.portal(Cube);
                g.vertical_walk(100);
            }
            3 => {
                g.stereo_walk(100);
                g.portal(Ball);
                g.ball_section(300, 3, rng);
                g.portal(Ufo);
                g.sawtooth(200);
                g.portal(Cube);
                g.stereo_walk(200);
            }
            4 => {
                g.stereo_walk(100);
                g.portal(Ship);
                g.ship_tunnel(600, 5, rng);
                g.portal(Cube);
                g.stereo_walk(200);
            }
            5 => {
                g.jump_pad_walk(20);
                g.portal(Ball);
                g.ball_section(400, 5, rng);
                g.portal(Cube);
                g.vertical_walk(300);
            }
            6 => {
                g.portal(Robot);
                g.robot_hop(400);
                g.portal(Ship);
                g.ship_tunnel(300, 5, rng);
                g.portal(Cube);
                g.stereo_walk(200);
            }
            7 => {
                g.stereo_walk(100);
                g.portal(Ball);
                g.ball_section(400, 6, rng);
                g.portal(Robot);
                g.robot_hop(300);
                g.portal(Cube);
                g.stereo_walk(200);
            }
            8 => {
                g.portal(Ball);
                g.ball_section(400, 7, rng);
                g.portal(Ufo);
                g.sawtooth(300);
                g.portal(Ship);
                g.ship_tunnel(300, 4, rng);
            }
            9 => {
                g.stereo_walk(100);
                g.portal(Ship);
                g.ship_tunnel(200, 4, rng);
                g.portal(Ball);
                g.ball_section(200, 8, rng);
                g.portal(Wave);
                g.sawtooth(300);
                g.portal(Robot);
                g.robot_hop(200);
                g.portal(Cube);
                g.stereo_walk(100);
            }
            10 => {
                g.jump_pad_walk(20);
                g.portal(Ship);
                g.clutter_ship(500, rng);
                g.portal(Ball);
                g.ball_section(400, 8, rng);
            }
            11 => {
                g.stereo_walk(100);
                g.portal(Ufo);
                g.sawtooth(300);
                g.portal(Wave);
                g.sawtooth(400);
                g.portal(Ship);
                g.ship_tunnel(300, 4, rng);
                g.portal(Cube);
                g.stereo_walk(200);
            }
            12 => {
                g.stereo_walk(100);
                g.portal(Ship);
                g.ship_tunnel(400, 3, rng);
                g.portal(Cube);
                g.jump_pad_walk(20);
                g.portal(Ufo);
                g.sawtooth(300);
            }
            13 => {
                g.portal(Ship);
                g.ship_tunnel(500, 3, rng);
                g.portal(Ball);
                g.ball_section(400, 9, rng);
                g.portal(Ufo);
                g.sawtooth(300);
                g.portal(Robot);
                g.robot_hop(400);
            }
            14 => {
                g.stereo_walk(100);
                g.portal(Ship);
                g.ship_tunnel(500, 3, rng);
                g.portal(Wave);
                g.sawtooth(500);
                g.portal(Ufo);
                g.sawtooth(300);
            }
            _ => unreachable!("index checked above"),
        }

        let (objects, length) = g.finish();
        log::info!(
            "built level {}: {} objects, length {:.0}",
            index,
            objects.len(),
            length
        );
        Ok(Self {
            index,
            objects,
            length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use proptest::prelude::*;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    #[test]
    fn test_unknown_index_fails_fast() {
        let err = Level::build(LEVEL_COUNT, &mut rng(1)).unwrap_err();
        assert_eq!(err, LevelError::UnknownLevel(LEVEL_COUNT));
    }

    #[test]
    fn test_all_levels_sorted_by_x() {
        for index in 0..LEVEL_COUNT {
            let level = Level::build(index, &mut rng(42)).unwrap();
            assert!(!level.objects.is_empty());
            for pair in level.objects.windows(2) {
                assert!(
                    pair[0].pos.x <= pair[1].pos.x,
                    "level {index} out of order at x={}",
                    pair[1].pos.x
                );
            }
        }
    }

    #[test]
    fn test_same_seed_rebuilds_identical_geometry() {
        for index in 0..LEVEL_COUNT {
            let a = Level::build(index, &mut rng(7)).unwrap();
            let b = Level::build(index, &mut rng(7)).unwrap();
            let a_json = serde_json::to_string(&a.objects).unwrap();
            let b_json = serde_json::to_string(&b.objects).unwrap();
            assert_eq!(a_json, b_json, "level {index} not deterministic");
            assert_eq!(a.length, b.length);
        }
    }

    #[test]
    fn test_non_random_patterns_ignore_seed() {
        // Level 0's walk sections are fixed; only the tunnel jitter differs
        let a = Level::build(0, &mut rng(1)).unwrap();
        let b = Level::build(0, &mut rng(2)).unwrap();
        assert_eq!(a.length, b.length, "cursor advance is seed-independent");
    }

    #[test]
    fn test_level_length_is_cursor_plus_tail() {
        let mut g = PatternGen::new();
        g.stereo_walk(10);
        let (_, length) = g.finish();
        assert_eq!(length, CURSOR_START + 10.0 * BLOCK_SIZE + LEVEL_TAIL);
    }

    #[test]
    fn test_portal_buffer_clear_of_obstacles() {
        for index in 0..LEVEL_COUNT {
            let level = Level::build(index, &mut rng(99)).unwrap();
            let portals: Vec<f32> = level
                .objects
                .iter()
                .filter(|o| matches!(o.kind, ObjectKind::Portal(_)))
                .map(|o| o.pos.x)
                .collect();
            for px in portals {
                for obj in &level.objects {
                    if matches!(obj.kind, ObjectKind::Portal(_)) {
                        continue;
                    }
                    let clear = obj.right() <= px - 100.0 || obj.pos.x >= px + PORTAL_BUFFER;
                    assert!(
                        clear,
                        "level {index}: obstacle at x={} inside portal buffer at x={px}",
                        obj.pos.x
                    );
                }
            }
        }
    }

    #[test]
    fn test_sawtooth_hazard_spacing() {
        let mut g = PatternGen::new();
        g.sawtooth(240);
        let (objects, _) = g.finish();
        let hazards: Vec<f32> = objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Hazard)
            .map(|o| o.pos.x)
            .collect();
        assert!(hazards.len() > 2);
        for pair in hazards.windows(2) {
            assert!(
                pair[1] - pair[0] >= 12.0 * BLOCK_SIZE,
                "sawtooth hazards {} and {} too close",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_ball_section_hazard_spacing() {
        // Max difficulty gives the tightest gap; must stay >= 12 blocks
        // between consecutive hazard groups (same-column pairs are one group)
        let mut g = PatternGen::new();
        g.ball_section(400, 9, &mut rng(3));
        let (objects, _) = g.finish();
        let mut columns: Vec<f32> = objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Hazard)
            .map(|o| o.pos.x)
            .collect();
        columns.dedup();
        assert!(columns.len() > 2);
        for pair in columns.windows(2) {
            assert!(
                pair[1] - pair[0] >= 12.0 * BLOCK_SIZE,
                "ball hazard groups {} and {} too close",
                pair[0],
                pair[1]
            );
        }
    }

    /// Reconstruct (floor height, ceiling height) per tunnel column
    fn tunnel_columns(objects: &[WorldObject]) -> Vec<(i32, i32)> {
        use std::collections::BTreeMap;
        let mut by_col: BTreeMap<i64, Vec<i32>> = BTreeMap::new();
        for obj in objects {
            let gy = ((GROUND - obj.pos.y - BLOCK_SIZE) / BLOCK_SIZE).round() as i32;
            by_col
                .entry(obj.pos.x.round() as i64)
                .or_default()
                .push(gy);
        }
        by_col
            .values()
            .map(|ys| {
                let mut ys = ys.clone();
                ys.sort_unstable();
                let mut floor_h = 0;
                while ys.contains(&floor_h) {
                    floor_h += 1;
                }
                let ceil_h = *ys.iter().find(|&&y| y >= floor_h).expect("ceiling run");
                (floor_h, ceil_h)
            })
            .collect()
    }

    #[test]
    fn test_tunnel_gap_and_jitter_bounds() {
        for tightness in 3..=6 {
            let mut g = PatternGen::new();
            g.ship_tunnel(200, tightness, &mut rng(11));
            let (objects, _) = g.finish();
            let columns = tunnel_columns(&objects);
            assert_eq!(columns.len(), 200);
            let mut prev_floor = None;
            for &(floor_h, ceil_h) in &columns {
                assert!((1..=6).contains(&floor_h));
                assert_eq!(ceil_h - floor_h, tightness, "corridor gap drifted");
                if let Some(prev) = prev_floor {
                    let delta: i32 = floor_h - prev;
                    assert!(delta.abs() <= 1, "floor jumped by {delta}");
                }
                prev_floor = Some(floor_h);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_levels_sorted_for_any_seed(seed in any::<u64>(), index in 0usize..LEVEL_COUNT) {
            let level = Level::build(index, &mut rng(seed)).unwrap();
            prop_assert!(level.length > CURSOR_START);
            for pair in level.objects.windows(2) {
                prop_assert!(pair[0].pos.x <= pair[1].pos.x);
            }
        }
    }
}
