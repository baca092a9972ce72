//! Player agent with grid-quantized, interpolated movement.

use std::time::Duration;

use glam::Vec2;
use maze_rescue_core::{CellCoord, Countdown, Direction, PlayerSnapshot};

/// Move in flight toward an adjacent tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingMove {
    pub(crate) target: CellCoord,
    pub(crate) elapsed: Duration,
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) cell: CellCoord,
    pub(crate) facing: Direction,
    pub(crate) pending: Option<PendingMove>,
    pub(crate) carrying: bool,
    pub(crate) cooldown: Countdown,
}

impl Player {
    pub(crate) fn spawn(cell: CellCoord) -> Self {
        Self {
            cell,
            facing: Direction::South,
            pending: None,
            carrying: false,
            cooldown: Countdown::elapsed(),
        }
    }

    pub(crate) fn is_moving(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn begin_move(&mut self, direction: Direction, target: CellCoord) {
        self.facing = direction;
        self.pending = Some(PendingMove {
            target,
            elapsed: Duration::ZERO,
        });
    }

    /// Advances the move in flight and returns the arrival cell once it lands.
    pub(crate) fn advance(&mut self, dt: Duration, step_duration: Duration) -> Option<CellCoord> {
        let pending = self.pending.as_mut()?;
        pending.elapsed = pending.elapsed.saturating_add(dt);
        if pending.elapsed < step_duration {
            return None;
        }

        let target = pending.target;
        self.cell = target;
        self.pending = None;
        Some(target)
    }

    /// Places the player on `cell`, abandoning any move in flight.
    pub(crate) fn relocate(&mut self, cell: CellCoord) {
        self.cell = cell;
        self.pending = None;
    }

    pub(crate) fn progress(&self, step_duration: Duration) -> f32 {
        match self.pending {
            None => 0.0,
            Some(_) if step_duration.is_zero() => 1.0,
            Some(pending) => {
                (pending.elapsed.as_secs_f32() / step_duration.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }

    /// Visual centre in tile units including the interpolation offset.
    pub(crate) fn visual_center(&self, step_duration: Duration) -> Vec2 {
        let base = tile_center(self.cell);
        match self.pending {
            None => base,
            Some(pending) => base.lerp(tile_center(pending.target), self.progress(step_duration)),
        }
    }

    pub(crate) fn snapshot(&self, step_duration: Duration) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: self.cell,
            moving_to: self.pending.map(|pending| pending.target),
            progress: self.progress(step_duration),
            facing: self.facing,
            carrying: self.carrying,
            ability_cooldown: self.cooldown.remaining(),
        }
    }
}

/// Centre of a tile in tile units.
pub(crate) fn tile_center(cell: CellCoord) -> Vec2 {
    Vec2::new(cell.column() as f32 + 0.5, cell.row() as f32 + 0.5)
}
