//! Level layouts and progression
//!
//! Levels are fixed tables of pig and block placements, numbered from 1.
//! Destroying the last pig of a level loads the next one; running past the
//! end of the table finishes the game.

use serde::{Deserialize, Serialize};

use super::actor::ObstacleKind;
use crate::consts::CENTER_X;

/// What goes at a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementKind {
    Target,
    Obstacle(ObstacleKind),
}

/// One actor in a layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: PlacementKind,
    pub x: f32,
    pub y: f32,
}

impl Placement {
    pub const fn target(x: f32, y: f32) -> Self {
        Self {
            kind: PlacementKind::Target,
            x,
            y,
        }
    }

    pub const fn column(x: f32, y: f32) -> Self {
        Self {
            kind: PlacementKind::Obstacle(ObstacleKind::Column),
            x,
            y,
        }
    }

    pub const fn beam(x: f32, y: f32) -> Self {
        Self {
            kind: PlacementKind::Obstacle(ObstacleKind::Beam),
            x,
            y,
        }
    }
}

/// A fixed level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelLayout {
    pub name: &'static str,
    /// Built in order
    pub placements: &'static [Placement],
}

impl LevelLayout {
    pub fn target_count(&self) -> u32 {
        self.placements
            .iter()
            .filter(|p| p.kind == PlacementKind::Target)
            .count() as u32
    }
}

const CX: f32 = CENTER_X;

/// Two pigs between two columns
const LEVEL_1: &[Placement] = &[
    Placement::target(CX + 100.0, 100.0),
    Placement::column(CX + 200.0, 50.0),
    Placement::target(CX + 300.0, 100.0),
    Placement::column(CX + 400.0, 50.0),
];

/// Stepped pyramid, three storeys in the middle
const LEVEL_2: &[Placement] = &[
    Placement::column(CX - 40.0, 50.0),
    Placement::column(CX + 40.0, 50.0),
    Placement::column(CX - 40.0, 150.0),
    Placement::column(CX + 40.0, 150.0),
    Placement::column(CX - 40.0, 250.0),
    Placement::column(CX + 40.0, 250.0),
    Placement::column(CX - 120.0, 50.0),
    Placement::column(CX + 120.0, 50.0),
    Placement::column(CX - 120.0, 150.0),
    Placement::column(CX + 120.0, 150.0),
    Placement::column(CX - 205.0, 50.0),
    Placement::column(CX + 205.0, 50.0),
    Placement::beam(CX, 100.0),
    Placement::beam(CX, 200.0),
    Placement::beam(CX, 300.0),
    Placement::beam(CX + 80.0, 200.0),
    Placement::beam(CX - 80.0, 200.0),
    Placement::beam(CX - 80.0, 100.0),
    Placement::beam(CX + 80.0, 100.0),
    Placement::beam(CX - 160.0, 100.0),
    Placement::beam(CX + 160.0, 100.0),
    Placement::target(CX, 120.0),
    Placement::target(CX + 80.0, 50.0),
    Placement::target(CX - 80.0, 50.0),
    Placement::target(CX, 250.0),
    Placement::target(CX - 160.0, 170.0),
    Placement::target(CX + 160.0, 170.0),
];

/// Low fort in the middle plus a tall tower on the right
const LEVEL_3: &[Placement] = &[
    Placement::column(CX - 40.0, 50.0),
    Placement::column(CX + 40.0, 50.0),
    Placement::column(CX - 40.0, 150.0),
    Placement::column(CX + 40.0, 150.0),
    Placement::column(CX - 120.0, 50.0),
    Placement::column(CX + 120.0, 50.0),
    Placement::beam(CX, 100.0),
    Placement::beam(CX, 200.0),
    Placement::beam(CX - 80.0, 100.0),
    Placement::beam(CX + 80.0, 100.0),
    Placement::target(CX, 120.0),
    Placement::target(CX + 80.0, 50.0),
    Placement::target(CX - 80.0, 50.0),
    // Tower
    Placement::column(CX + 595.0, 50.0),
    Placement::column(CX + 520.0, 50.0),
    Placement::beam(CX + 560.0, 100.0),
    Placement::column(CX + 592.0, 150.0),
    Placement::column(CX + 525.0, 153.0),
    Placement::beam(CX + 560.0, 200.0),
    Placement::column(CX + 595.0, 250.0),
    Placement::column(CX + 525.0, 250.0),
    Placement::beam(CX + 560.0, 300.0),
    Placement::target(CX + 555.0, 130.0),
    Placement::target(CX + 555.0, 50.0),
    Placement::target(CX + 555.0, 220.0),
    Placement::target(CX + 555.0, 340.0),
];

/// The game's level table
pub static LEVELS: &[LevelLayout] = &[
    LevelLayout {
        name: "Pig Pen",
        placements: LEVEL_1,
    },
    LevelLayout {
        name: "Pyramid",
        placements: LEVEL_2,
    },
    LevelLayout {
        name: "Watchtower",
        placements: LEVEL_3,
    },
];

/// Progression state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Before the first load
    Unloaded,
    /// Playing level `index` with `targets` pigs left
    Loaded { index: u32, targets: u32 },
    /// Last pig of `index` destroyed; the next load is due this frame
    Cleared { index: u32 },
    /// No levels left
    Finished,
}

/// Result of [`LevelManager::begin_next`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelAdvance {
    /// Build this layout now
    Load {
        index: u32,
        layout: &'static LevelLayout,
    },
    /// Ran past the last level; reported once
    Finished,
    /// Already finished, nothing to do
    Idle,
}

/// Tracks the current level and its remaining pigs
#[derive(Debug, Clone)]
pub struct LevelManager {
    levels: &'static [LevelLayout],
    current_level: u32,
    phase: LevelPhase,
}

impl Default for LevelManager {
    fn default() -> Self {
        Self::new(LEVELS)
    }
}

impl LevelManager {
    pub fn new(levels: &'static [LevelLayout]) -> Self {
        Self {
            levels,
            current_level: 0,
            phase: LevelPhase::Unloaded,
        }
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    /// 1-based index of the last level started (0 before the first load)
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn target_count(&self) -> u32 {
        match self.phase {
            LevelPhase::Loaded { targets, .. } => targets,
            _ => 0,
        }
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self.phase, LevelPhase::Cleared { .. })
    }

    pub fn is_finished(&self) -> bool {
        self.phase == LevelPhase::Finished
    }

    /// Move to the next level. The caller clears the world first and then
    /// builds the returned layout, reporting each pig via
    /// [`record_target_added`](Self::record_target_added).
    pub fn begin_next(&mut self) -> LevelAdvance {
        if self.phase == LevelPhase::Finished {
            return LevelAdvance::Idle;
        }

        self.current_level += 1;
        match self.levels.get(self.current_level as usize - 1) {
            Some(layout) => {
                self.phase = LevelPhase::Loaded {
                    index: self.current_level,
                    targets: 0,
                };
                LevelAdvance::Load {
                    index: self.current_level,
                    layout,
                }
            }
            None => {
                self.phase = LevelPhase::Finished;
                LevelAdvance::Finished
            }
        }
    }

    /// Count a pig placed while building the current level
    pub fn record_target_added(&mut self) {
        if let LevelPhase::Loaded { targets, .. } = &mut self.phase {
            *targets += 1;
        }
    }

    /// A pig died. Returns `true` when that cleared the level.
    ///
    /// Ignored unless a level is loaded, so late reports from a level that
    /// is already cleared can't push the count below zero.
    pub fn on_target_destroyed(&mut self) -> bool {
        let LevelPhase::Loaded { index, targets } = &mut self.phase else {
            return false;
        };
        *targets = targets.saturating_sub(1);
        let (index, remaining) = (*index, *targets);
        log::info!("{remaining} pig(s) left on level {index}");
        if remaining == 0 {
            self.phase = LevelPhase::Cleared { index };
            return true;
        }
        false
    }

    /// Treat a freshly built level with no pigs as already cleared
    pub fn clear_if_empty(&mut self) -> bool {
        if let LevelPhase::Loaded { index, targets: 0 } = self.phase {
            self.phase = LevelPhase::Cleared { index };
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_table_counts() {
        assert_eq!(LEVELS.len(), 3);
        assert_eq!(LEVELS[0].target_count(), 2);
        assert_eq!(LEVELS[1].target_count(), 6);
        assert_eq!(LEVELS[2].target_count(), 7);

        let obstacles = |l: &LevelLayout| l.placements.len() as u32 - l.target_count();
        assert_eq!(obstacles(&LEVELS[0]), 2);
        assert_eq!(obstacles(&LEVELS[1]), 21);
        assert_eq!(obstacles(&LEVELS[2]), 19);
    }

    #[test]
    fn test_progression_counts_down() {
        let mut levels = LevelManager::default();
        assert_eq!(levels.phase(), LevelPhase::Unloaded);

        let LevelAdvance::Load { index, layout } = levels.begin_next() else {
            panic!("level 1 should load");
        };
        assert_eq!(index, 1);
        for _ in 0..layout.target_count() {
            levels.record_target_added();
        }
        assert_eq!(levels.phase(), LevelPhase::Loaded { index: 1, targets: 2 });

        assert!(!levels.on_target_destroyed());
        assert_eq!(levels.target_count(), 1);
        assert!(levels.on_target_destroyed());
        assert_eq!(levels.phase(), LevelPhase::Cleared { index: 1 });

        // Late reports after clearing change nothing
        assert!(!levels.on_target_destroyed());
        assert_eq!(levels.target_count(), 0);
    }

    #[test]
    fn test_finishes_exactly_once() {
        let mut levels = LevelManager::default();
        for expected in 1..=3 {
            assert!(matches!(levels.begin_next(), LevelAdvance::Load { index, .. } if index == expected));
        }
        assert_eq!(levels.begin_next(), LevelAdvance::Finished);
        assert!(levels.is_finished());
        assert_eq!(levels.begin_next(), LevelAdvance::Idle);
        assert_eq!(levels.begin_next(), LevelAdvance::Idle);
        assert_eq!(levels.current_level(), 4);
    }

    #[test]
    fn test_empty_level_counts_as_cleared() {
        static EMPTY: &[LevelLayout] = &[LevelLayout {
            name: "empty",
            placements: &[Placement::column(10.0, 10.0)],
        }];
        let mut levels = LevelManager::new(EMPTY);
        levels.begin_next();
        assert!(levels.clear_if_empty());
        assert!(levels.is_cleared());
    }
}
