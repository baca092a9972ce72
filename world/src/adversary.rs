//! Patrol / chase / retreat behaviour for adversaries.

use std::time::Duration;

use maze_rescue_core::{
    AdversaryId, AdversarySnapshot, AdversaryState, CellCoord, Countdown, Direction, TileKind,
};

use crate::{maze::Maze, navigation};

/// Read-only context an adversary needs to pick its next tile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Surroundings<'a> {
    pub(crate) maze: &'a Maze,
    pub(crate) hazard_active: bool,
    pub(crate) player: CellCoord,
}

impl Surroundings<'_> {
    fn walkable(&self, cell: CellCoord) -> bool {
        self.maze.is_walkable(cell, self.hazard_active)
    }

    fn next_hop(&self, from: CellCoord, to: CellCoord) -> Option<CellCoord> {
        navigation::next_hop(
            self.maze.columns(),
            self.maze.rows(),
            from,
            to,
            |cell| self.walkable(cell),
        )
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Adversary {
    pub(crate) id: AdversaryId,
    pub(crate) cell: CellCoord,
    pub(crate) facing: Direction,
    pub(crate) state: AdversaryState,
    route: Vec<CellCoord>,
    waypoint: usize,
    forward: bool,
    chase: Countdown,
    speed: f32,
    sight_range: u32,
    step_accumulator: Duration,
}

impl Adversary {
    /// Places a new adversary at the start of its expanded patrol route.
    ///
    /// `route` is never empty; the maze loader rejects empty templates.
    pub(crate) fn new(
        id: AdversaryId,
        route: Vec<CellCoord>,
        speed: f32,
        sight_range: u32,
    ) -> Self {
        let cell = route.first().copied().unwrap_or(CellCoord::new(0, 0));
        Self {
            id,
            cell,
            facing: Direction::South,
            state: AdversaryState::Patrol,
            route,
            waypoint: 0,
            forward: true,
            chase: Countdown::elapsed(),
            speed,
            sight_range,
            step_accumulator: Duration::ZERO,
        }
    }

    pub(crate) fn origin(&self) -> CellCoord {
        self.route.first().copied().unwrap_or(self.cell)
    }

    /// Manhattan-range perception blocked entirely by concealment.
    pub(crate) fn perceives(&self, maze: &Maze, player: CellCoord) -> bool {
        if maze.tile(player) == Some(TileKind::Concealment) {
            return false;
        }
        self.cell.manhattan_distance(player) <= self.sight_range
    }

    pub(crate) fn enter_retreat(&mut self) {
        self.state = AdversaryState::Retreat;
    }

    fn enter_chase(&mut self, chase_duration: Duration) {
        self.state = AdversaryState::Chase;
        self.chase.restart(chase_duration);
    }

    fn enter_patrol_nearest(&mut self) {
        self.state = AdversaryState::Patrol;
        self.chase = Countdown::elapsed();
        let cell = self.cell;
        self.waypoint = self
            .route
            .iter()
            .enumerate()
            .min_by_key(|(_, waypoint)| waypoint.manhattan_distance(cell))
            .map_or(0, |(index, _)| index);
    }

    fn enter_patrol_at_origin(&mut self) {
        self.state = AdversaryState::Patrol;
        self.waypoint = 0;
        self.forward = true;
    }

    /// Evaluates state transitions after movement has been resolved.
    ///
    /// Returns `true` when the adversary started chasing this step.
    pub(crate) fn update_state(
        &mut self,
        perceives: bool,
        dt: Duration,
        chase_duration: Duration,
    ) -> bool {
        match self.state {
            AdversaryState::Patrol => {
                if perceives {
                    self.enter_chase(chase_duration);
                    return true;
                }
            }
            AdversaryState::Chase => {
                let expired = self.chase.tick(dt);
                if expired || !perceives {
                    self.enter_patrol_nearest();
                }
            }
            AdversaryState::Retreat => {
                if self.cell == self.origin() {
                    self.enter_patrol_at_origin();
                }
            }
        }
        false
    }

    /// Accumulates time and takes at most one step when the interval elapses.
    ///
    /// Returns `true` when the adversary changed cells.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        speed_fraction: f32,
        surroundings: Surroundings<'_>,
    ) -> bool {
        let Some(interval) = step_interval(self.speed * speed_fraction) else {
            return false;
        };

        self.step_accumulator = self.step_accumulator.saturating_add(dt);
        if self.step_accumulator < interval {
            return false;
        }
        self.step_accumulator = (self.step_accumulator - interval).min(interval);

        let next = match self.state {
            AdversaryState::Patrol => self.patrol_step(&surroundings),
            AdversaryState::Chase => self.chase_step(&surroundings),
            AdversaryState::Retreat => surroundings.next_hop(self.cell, self.origin()),
        };

        let Some(next) = next else {
            return false;
        };
        if !surroundings.walkable(next) {
            return false;
        }

        if let Some(direction) = self.cell.direction_to(next) {
            self.facing = direction;
        }
        self.cell = next;
        true
    }

    /// Relocates the adversary up to `distance` tiles along `direction`,
    /// stopping before the first tile it cannot enter.
    pub(crate) fn push_back(
        &mut self,
        direction: Direction,
        distance: u32,
        maze: &Maze,
        hazard_active: bool,
    ) {
        for _ in 0..distance {
            let Some(next) = maze.neighbor(self.cell, direction) else {
                break;
            };
            if !maze.is_walkable(next, hazard_active) {
                break;
            }
            self.cell = next;
        }
        self.facing = direction.opposite();
    }

    fn patrol_step(&mut self, surroundings: &Surroundings<'_>) -> Option<CellCoord> {
        let anchor = *self.route.get(self.waypoint)?;
        if self.cell != anchor {
            return self.toward(anchor, surroundings);
        }
        if self.route.len() < 2 {
            return None;
        }

        if self.forward && self.waypoint + 1 >= self.route.len() {
            self.forward = false;
        } else if !self.forward && self.waypoint == 0 {
            self.forward = true;
        }
        self.waypoint = if self.forward {
            self.waypoint + 1
        } else {
            self.waypoint - 1
        };

        let target = *self.route.get(self.waypoint)?;
        self.toward(target, surroundings)
    }

    fn toward(&self, target: CellCoord, surroundings: &Surroundings<'_>) -> Option<CellCoord> {
        if self.cell.direction_to(target).is_some() {
            Some(target)
        } else {
            surroundings.next_hop(self.cell, target)
        }
    }

    /// Greedy pursuit along the axis with the larger delta, falling back to
    /// the perpendicular axis when the preferred tile is blocked.
    fn chase_step(&self, surroundings: &Surroundings<'_>) -> Option<CellCoord> {
        let target = surroundings.player;
        let dx = i64::from(target.column()) - i64::from(self.cell.column());
        let dy = i64::from(target.row()) - i64::from(self.cell.row());
        if dx == 0 && dy == 0 {
            return None;
        }

        let horizontal = axis_direction(dx, Direction::East, Direction::West);
        let vertical = axis_direction(dy, Direction::South, Direction::North);
        let (primary, fallback, perpendicular) = if dx.abs() >= dy.abs() {
            (horizontal, vertical, [Direction::North, Direction::South])
        } else {
            (vertical, horizontal, [Direction::East, Direction::West])
        };

        let mut candidates: Vec<Direction> = Vec::with_capacity(3);
        candidates.extend(primary);
        match fallback {
            Some(direction) => candidates.push(direction),
            None => candidates.extend(perpendicular),
        }

        candidates
            .into_iter()
            .filter_map(|direction| surroundings.maze.neighbor(self.cell, direction))
            .find(|cell| surroundings.walkable(*cell))
    }

    pub(crate) fn snapshot(&self) -> AdversarySnapshot {
        AdversarySnapshot {
            id: self.id,
            cell: self.cell,
            facing: self.facing,
            state: self.state,
            sight_range: self.sight_range,
        }
    }
}

fn axis_direction(delta: i64, positive: Direction, negative: Direction) -> Option<Direction> {
    match delta.signum() {
        1 => Some(positive),
        -1 => Some(negative),
        _ => None,
    }
}

fn step_interval(tiles_per_second: f32) -> Option<Duration> {
    if !tiles_per_second.is_finite() || tiles_per_second <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f32(1.0 / tiles_per_second).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room() -> Maze {
        Maze::parse(&[
            "#########",
            "#P......#",
            "#.......#",
            "#...%...#",
            "#......@#",
            "#########",
        ])
        .expect("room parses")
    }

    fn route(cells: &[(u32, u32)]) -> Vec<CellCoord> {
        cells
            .iter()
            .map(|(column, row)| CellCoord::new(*column, *row))
            .collect()
    }

    #[test]
    fn patrol_walks_back_and_forth() {
        let maze = open_room();
        let mut adversary = Adversary::new(
            AdversaryId::new(0),
            route(&[(2, 2), (3, 2), (4, 2)]),
            1.0,
            0,
        );
        let surroundings = Surroundings {
            maze: &maze,
            hazard_active: false,
            player: CellCoord::new(1, 1),
        };

        let mut visited = Vec::new();
        for _ in 0..6 {
            assert!(adversary.advance(Duration::from_secs(1), 1.0, surroundings));
            visited.push(adversary.cell.column());
        }
        assert_eq!(visited, vec![3, 4, 3, 2, 3, 4]);
    }

    #[test]
    fn chase_prefers_larger_axis_and_falls_back() {
        let maze = Maze::parse(&["#######", "#P.#..#", "#.....#", "#....@#", "#######"])
            .expect("layout parses");
        let adversary = Adversary::new(AdversaryId::new(0), route(&[(2, 1)]), 1.0, 10);
        let open = Surroundings {
            maze: &maze,
            hazard_active: false,
            player: CellCoord::new(5, 2),
        };
        // East is the larger delta but blocked by the wall at (3, 1).
        assert_eq!(adversary.chase_step(&open), Some(CellCoord::new(2, 2)));

        let below = Surroundings {
            player: CellCoord::new(2, 3),
            ..open
        };
        assert_eq!(adversary.chase_step(&below), Some(CellCoord::new(2, 2)));
    }

    #[test]
    fn concealment_blocks_perception_at_any_range() {
        let maze = open_room();
        let adversary = Adversary::new(AdversaryId::new(0), route(&[(4, 2)]), 1.0, 4);
        assert!(!adversary.perceives(&maze, CellCoord::new(4, 3)));
        assert!(adversary.perceives(&maze, CellCoord::new(5, 3)));
        assert!(!adversary.perceives(&maze, CellCoord::new(1, 4)));
    }

    #[test]
    fn chase_reverts_to_nearest_waypoint_without_perception() {
        let mut adversary = Adversary::new(
            AdversaryId::new(0),
            route(&[(1, 2), (2, 2), (3, 2), (4, 2)]),
            1.0,
            3,
        );
        assert!(adversary.update_state(true, Duration::ZERO, Duration::from_secs(5)));
        assert_eq!(adversary.state, AdversaryState::Chase);

        adversary.cell = CellCoord::new(4, 3);
        assert!(!adversary.update_state(false, Duration::from_millis(10), Duration::from_secs(5)));
        assert_eq!(adversary.state, AdversaryState::Patrol);
        assert_eq!(adversary.waypoint, 3);
    }

    #[test]
    fn chase_expires_even_while_perceiving() {
        let mut adversary = Adversary::new(AdversaryId::new(0), route(&[(1, 2)]), 1.0, 3);
        let _ = adversary.update_state(true, Duration::ZERO, Duration::from_secs(1));
        let _ = adversary.update_state(true, Duration::from_millis(600), Duration::from_secs(1));
        assert_eq!(adversary.state, AdversaryState::Chase);
        let _ = adversary.update_state(true, Duration::from_millis(600), Duration::from_secs(1));
        assert_eq!(adversary.state, AdversaryState::Patrol);
    }

    #[test]
    fn retreat_walks_home_then_patrols() {
        let maze = open_room();
        let mut adversary = Adversary::new(
            AdversaryId::new(0),
            route(&[(2, 2), (3, 2)]),
            1.0,
            0,
        );
        adversary.cell = CellCoord::new(6, 4);
        adversary.enter_retreat();
        let surroundings = Surroundings {
            maze: &maze,
            hazard_active: false,
            player: CellCoord::new(1, 1),
        };

        let mut steps = 0;
        while adversary.state == AdversaryState::Retreat {
            let _ = adversary.advance(Duration::from_secs(1), 1.0, surroundings);
            let _ = adversary.update_state(false, Duration::from_secs(1), Duration::from_secs(5));
            steps += 1;
            assert!(
                steps <= 6,
                "retreat should reach the origin by the shortest route"
            );
        }
        assert_eq!(adversary.cell, CellCoord::new(2, 2));
        assert_eq!(adversary.waypoint, 0);
    }

    #[test]
    fn push_back_stops_at_walls() {
        let maze = open_room();
        let mut adversary = Adversary::new(AdversaryId::new(0), route(&[(5, 2)]), 1.0, 0);
        adversary.push_back(Direction::East, 3, &maze, false);
        assert_eq!(adversary.cell, CellCoord::new(7, 2));
    }

    #[test]
    fn zero_speed_never_moves() {
        let maze = open_room();
        let mut adversary = Adversary::new(AdversaryId::new(0), route(&[(2, 2), (3, 2)]), 0.0, 0);
        let surroundings = Surroundings {
            maze: &maze,
            hazard_active: false,
            player: CellCoord::new(1, 1),
        };
        assert!(!adversary.advance(Duration::from_secs(10), 1.0, surroundings));
        assert_eq!(adversary.cell, CellCoord::new(2, 2));
    }
}
