#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static stage catalog: maze layouts, patrol templates and per-stage tuning.

use std::time::Duration;

use maze_rescue_core::{CellCoord, StageConfig};
use maze_rescue_world::{LayoutError, MazeLayout, Tuning, World};
use thiserror::Error;

const MEADOW: [&str; 11] = [
    "###############",
    "#P..o#....%%..#",
    "#.##.#.##.##..#",
    "#.#..+..#...#.#",
    "#.#.###.#.#.#.#",
    "#...%...o.#...#",
    "###.#.###.###.#",
    "#o..#...~...#.#",
    "#.###.#.###.#.#",
    "#.....#^.%..o@#",
    "###############",
];

const MEADOW_PATROLS: [&[CellCoord]; 4] = [
    &[CellCoord::new(9, 1), CellCoord::new(6, 1)],
    &[CellCoord::new(3, 5), CellCoord::new(1, 5)],
    &[CellCoord::new(9, 7), CellCoord::new(11, 7)],
    &[CellCoord::new(13, 3), CellCoord::new(13, 8)],
];

const RAVINE: [&str; 11] = [
    "#################",
    "#P...#...o...#..#",
    "#.##.#.#####.#.##",
    "#.#o.~...%.#...@#",
    "#.#.##.###.#.####",
    "#...#...+..#....#",
    "###.#.#####.###.#",
    "#...~.%...#.....#",
    "#.#####.#.#.###.#",
    "#o......#...o...#",
    "#################",
];

const RAVINE_PATROLS: [&[CellCoord]; 5] = [
    &[CellCoord::new(6, 3), CellCoord::new(9, 3)],
    &[CellCoord::new(1, 7), CellCoord::new(3, 7)],
    &[CellCoord::new(11, 9), CellCoord::new(15, 9)],
    &[CellCoord::new(12, 5), CellCoord::new(15, 5)],
    &[CellCoord::new(5, 5), CellCoord::new(10, 5)],
];

const THICKET: [&str; 11] = [
    "###################",
    "#P.%..#.....#..o..#",
    "#.###.#.###.#.###.#",
    "#...#...#o#...#...#",
    "###.###.#.#####.###",
    "#o..~...+.....~..@#",
    "#.#####.#.#.#####.#",
    "#...%...#.#...%...#",
    "#.#.###.###.###.#.#",
    "#.#..o....^....o#.#",
    "###################",
];

const THICKET_PATROLS: [&[CellCoord]; 5] = [
    &[CellCoord::new(9, 5), CellCoord::new(13, 5)],
    &[CellCoord::new(3, 9), CellCoord::new(9, 9)],
    &[CellCoord::new(11, 7), CellCoord::new(13, 7)],
    &[CellCoord::new(17, 6), CellCoord::new(17, 9)],
    &[CellCoord::new(1, 3), CellCoord::new(3, 3)],
];

/// Every maze layout in catalog order.
pub const MAZES: [MazeLayout<'static>; 3] = [
    MazeLayout {
        tiles: &MEADOW,
        patrols: &MEADOW_PATROLS,
    },
    MazeLayout {
        tiles: &RAVINE,
        patrols: &RAVINE_PATROLS,
    },
    MazeLayout {
        tiles: &THICKET,
        patrols: &THICKET_PATROLS,
    },
];

struct StageEntry {
    maze: usize,
    time_limit: Duration,
    adversaries: usize,
    adversary_speed: f32,
    sight_range: u32,
    hazards: bool,
    darkness_radius: Option<u32>,
    reward: &'static str,
}

const STAGES: [StageEntry; 4] = [
    StageEntry {
        maze: 0,
        time_limit: Duration::from_secs(90),
        adversaries: 1,
        adversary_speed: 2.5,
        sight_range: 3,
        hazards: false,
        darkness_radius: None,
        reward: "Found the lost lamb!",
    },
    StageEntry {
        maze: 1,
        time_limit: Duration::from_secs(120),
        adversaries: 2,
        adversary_speed: 3.0,
        sight_range: 4,
        hazards: true,
        darkness_radius: None,
        reward: "The lamb is safe across the ravine!",
    },
    StageEntry {
        maze: 2,
        time_limit: Duration::from_secs(150),
        adversaries: 3,
        adversary_speed: 3.2,
        sight_range: 4,
        hazards: true,
        darkness_radius: Some(5),
        reward: "Led the lamb out of the thicket!",
    },
    StageEntry {
        maze: 0,
        time_limit: Duration::from_secs(100),
        adversaries: 4,
        adversary_speed: 3.5,
        sight_range: 5,
        hazards: true,
        darkness_radius: Some(4),
        reward: "Every lamb is home. Well done, shepherd!",
    },
];

/// Failures raised while building a stage from the catalog.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StageError {
    /// The requested stage number is not in the catalog.
    #[error("stage {number} does not exist (catalog has {count} stages)")]
    UnknownStage {
        /// One-based stage number that was requested.
        number: u32,
        /// Number of stages in the catalog.
        count: usize,
    },
    /// A stage referenced a maze index with no layout.
    #[error("stage references unknown maze {maze}")]
    UnknownMaze {
        /// Offending maze index.
        maze: usize,
    },
    /// The stage layout failed validation.
    #[error("invalid stage layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Number of stages in a full run.
#[must_use]
pub const fn stage_count() -> usize {
    STAGES.len()
}

/// Configuration of the one-based stage `number`.
#[must_use]
pub fn stage(number: u32) -> Option<StageConfig> {
    let index = usize::try_from(number).ok()?.checked_sub(1)?;
    let entry = STAGES.get(index)?;
    Some(StageConfig {
        stage: number,
        maze: entry.maze,
        time_limit: entry.time_limit,
        adversaries: entry.adversaries,
        adversary_speed: entry.adversary_speed,
        sight_range: entry.sight_range,
        hazards: entry.hazards,
        darkness_radius: entry.darkness_radius,
        reward: entry.reward.to_owned(),
        final_stage: index + 1 == STAGES.len(),
    })
}

/// Configurations of every stage in play order.
pub fn stages() -> impl Iterator<Item = StageConfig> {
    (1..=u32::try_from(STAGES.len()).unwrap_or(0)).filter_map(stage)
}

/// Layout of the maze a stage is played on.
#[must_use]
pub fn layout(config: &StageConfig) -> Option<MazeLayout<'static>> {
    MAZES.get(config.maze).copied()
}

/// Builds a fresh world for the one-based stage `number`.
pub fn build(number: u32, tuning: Tuning) -> Result<World, StageError> {
    let config = stage(number).ok_or(StageError::UnknownStage {
        number,
        count: STAGES.len(),
    })?;
    let maze = layout(&config).ok_or(StageError::UnknownMaze { maze: config.maze })?;
    Ok(World::new(config, &maze, tuning)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_numbers_are_one_based() {
        assert_eq!(stage(0), None);
        assert_eq!(stage(1).map(|config| config.stage), Some(1));
        assert_eq!(stage(5), None);
    }

    #[test]
    fn only_the_last_stage_is_final() {
        let finals: Vec<bool> = stages().map(|config| config.final_stage).collect();
        assert_eq!(finals, vec![false, false, false, true]);
    }

    #[test]
    fn unknown_stage_is_reported() {
        assert_eq!(
            build(9, Tuning::default()).err(),
            Some(StageError::UnknownStage {
                number: 9,
                count: 4
            })
        );
    }
}
