#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Rescue engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then appends [`Event`] values to
//! the caller's event queue. Consumers drain that queue once per frame and
//! never mutate the world except through further commands.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level state of a single stage attempt.
///
/// Pausing is tracked separately by the world and is orthogonal to the phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Stage constructed and waiting for the start command.
    Ready,
    /// Player is searching the maze for the objective.
    Playing,
    /// Timed cutscene that begins when the objective is reached.
    Rescue,
    /// Player escorts the rescued objective back to the pen.
    Returning,
    /// Stage completed and another stage follows.
    StageClear,
    /// Final stage completed; terminal for the run.
    AllClear,
    /// Timer expired or health depleted; terminal for the run.
    GameOver,
}

impl Phase {
    /// Reports whether the simulation step advances actors and timers.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Returning)
    }

    /// Reports whether the phase ends the current stage attempt.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::StageClear | Self::AllClear | Self::GameOver)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Leaves the ready phase and starts the stage timer.
    Start,
    /// Pauses or resumes the simulation.
    SetPaused {
        /// Whether the simulation should be suspended.
        paused: bool,
    },
    /// Flips the pause flag.
    TogglePause,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player begin a single-tile move.
    TryMove {
        /// Direction of travel for the attempted move.
        direction: Direction,
    },
    /// Requests activation of the player's special ability.
    UseAbility,
    /// Signals that the externally timed rescue cutscene has finished.
    FinishRescue,
}

/// Events appended to the event queue after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Announces that the stage entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Player finished a move and now occupies a new cell.
    Stepped {
        /// Cell the player arrived at.
        cell: CellCoord,
    },
    /// Player picked up a collectible.
    CollectibleCollected {
        /// Cell that held the collectible.
        cell: CellCoord,
        /// Collectibles gathered so far in the stage.
        collected: u32,
    },
    /// Player activated a checkpoint.
    CheckpointReached {
        /// Cell of the checkpoint.
        cell: CellCoord,
        /// Player health after the checkpoint bonus.
        hp: u32,
    },
    /// A patrolling adversary spotted the player.
    AdversaryBeganChase {
        /// Identifier of the adversary.
        adversary: AdversaryId,
        /// Cell the adversary occupied when it spotted the player.
        cell: CellCoord,
    },
    /// A chasing adversary caught the player.
    PlayerCaught {
        /// Identifier of the adversary credited with the catch.
        adversary: AdversaryId,
        /// Player health after the catch.
        hp: u32,
        /// Cell the player was returned to.
        respawn: CellCoord,
    },
    /// An adversary was pushed back by the player's ability.
    AdversaryStruck {
        /// Identifier of the adversary.
        adversary: AdversaryId,
        /// Cell the adversary ended up in.
        cell: CellCoord,
    },
    /// Player reached the objective; the rescue cutscene begins.
    ObjectiveSecured {
        /// Cell of the objective.
        cell: CellCoord,
    },
    /// The rescued objective is being escorted back to the pen.
    ReturnPhaseStarted {
        /// Number of tiles in the guide path toward the pen.
        guide_length: usize,
    },
    /// Player brought the objective back to the pen.
    StageCompleted {
        /// One-based stage number.
        stage: u32,
        /// Score accumulated during the stage.
        score: u32,
        /// Whether the completed stage ends the run.
        final_stage: bool,
    },
    /// The stage countdown reached zero.
    TimeExpired,
    /// Player health reached zero.
    HealthDepleted,
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in the fixed priority order used for tie-breaks.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit offset expressed as `(column, row)` deltas.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Unique identifier assigned to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdversaryId(u32);

impl AdversaryId {
    /// Creates a new adversary identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single maze tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Neighbouring cell in the provided direction.
    ///
    /// Returns `None` when the step would underflow past row or column zero.
    /// Upper bounds depend on the maze and are checked by the caller.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        let (dc, dr) = direction.offset();
        let column = self.column.checked_add_signed(dc)?;
        let row = self.row.checked_add_signed(dr)?;
        Some(CellCoord::new(column, row))
    }

    /// Direction leading from `self` to an orthogonally adjacent cell.
    #[must_use]
    pub fn direction_to(self, to: CellCoord) -> Option<Direction> {
        let column_diff = self.column.abs_diff(to.column);
        let row_diff = self.row.abs_diff(to.row);
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column > self.column {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row > self.row {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Semantic kind of a single maze tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Permanently impassable.
    Wall,
    /// Ordinary walkable ground.
    Path,
    /// Ground that becomes impassable while the hazard cycle is active.
    Hazard,
    /// Cover that hides the player from adversaries.
    Concealment,
    /// Decorative clutter that can still be walked over.
    Obstacle,
    /// Item that awards score when picked up.
    Collectible,
    /// Respawn point that restores health on first activation.
    Checkpoint,
    /// The lost objective the player must rescue.
    Objective,
    /// Start tile and return destination.
    Pen,
}

impl TileKind {
    /// Parses a layout symbol into a tile kind.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        let kind = match symbol {
            '#' => Self::Wall,
            '.' => Self::Path,
            '~' => Self::Hazard,
            '%' => Self::Concealment,
            '^' => Self::Obstacle,
            'o' => Self::Collectible,
            '+' => Self::Checkpoint,
            '@' => Self::Objective,
            'P' => Self::Pen,
            _ => return None,
        };
        Some(kind)
    }

    /// Layout symbol representing the tile kind.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Path => '.',
            Self::Hazard => '~',
            Self::Concealment => '%',
            Self::Obstacle => '^',
            Self::Collectible => 'o',
            Self::Checkpoint => '+',
            Self::Objective => '@',
            Self::Pen => 'P',
        }
    }
}

/// Behavioural state of an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdversaryState {
    /// Walking its fixed patrol route.
    Patrol,
    /// Pursuing the player.
    Chase,
    /// Returning to the start of its patrol route.
    Retreat,
}

/// Decrementing timer shared by every timed mechanic in the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: Duration,
}

impl Countdown {
    /// Creates a countdown that expires after `duration`.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
        }
    }

    /// Creates a countdown that has already expired.
    #[must_use]
    pub const fn elapsed() -> Self {
        Self {
            remaining: Duration::ZERO,
        }
    }

    /// Time left before expiry.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Reports whether the countdown reached zero.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Restarts the countdown with a new duration.
    pub fn restart(&mut self, duration: Duration) {
        self.remaining = duration;
    }

    /// Decrements the countdown, returning `true` once it has expired.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }

    /// Decrements the countdown and reports how far `dt` overshot expiry.
    ///
    /// Returns `None` while time remains. Returns the unconsumed part of `dt`
    /// (possibly zero) when this tick reached zero.
    pub fn tick_with_overflow(&mut self, dt: Duration) -> Option<Duration> {
        if dt >= self.remaining {
            let overflow = dt - self.remaining;
            self.remaining = Duration::ZERO;
            Some(overflow)
        } else {
            self.remaining -= dt;
            None
        }
    }
}

/// Static per-stage parameters supplied by the stage catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// One-based stage number shown to the player.
    pub stage: u32,
    /// Index of the maze layout used by the stage.
    pub maze: usize,
    /// Time available to rescue the objective and return.
    pub time_limit: Duration,
    /// Number of adversaries drawn from the maze's patrol templates.
    pub adversaries: usize,
    /// Adversary movement speed in tiles per second before state scaling.
    pub adversary_speed: f32,
    /// Manhattan distance within which adversaries perceive the player.
    pub sight_range: u32,
    /// Whether hazard ground cycles between safe and active.
    pub hazards: bool,
    /// Visibility radius around the player, or `None` for a fully lit maze.
    pub darkness_radius: Option<u32>,
    /// Text shown when the stage is completed.
    pub reward: String,
    /// Whether completing the stage ends the run.
    pub final_stage: bool,
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Cell the player occupies (the origin while a move is in flight).
    pub cell: CellCoord,
    /// Destination of the move in flight, if any.
    pub moving_to: Option<CellCoord>,
    /// Interpolation progress of the move in flight in `0.0..=1.0`.
    pub progress: f32,
    /// Direction the player faces.
    pub facing: Direction,
    /// Whether the rescued objective is being carried.
    pub carrying: bool,
    /// Time until the ability can be used again.
    pub ability_cooldown: Duration,
}

/// Immutable representation of a single adversary's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdversarySnapshot {
    /// Identifier assigned to the adversary.
    pub id: AdversaryId,
    /// Cell occupied by the adversary.
    pub cell: CellCoord,
    /// Direction of the adversary's last step.
    pub facing: Direction,
    /// Current behavioural state.
    pub state: AdversaryState,
    /// Manhattan sight range.
    pub sight_range: u32,
}
