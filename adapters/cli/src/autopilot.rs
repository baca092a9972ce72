//! Scripted player that drives a stage through simulated key transitions.

use maze_rescue_core::{AdversaryState, CellCoord, Direction, Phase};
use maze_rescue_system_input::{Key, KeyEvent};
use maze_rescue_world::{next_hop, query, World};

/// Chooses the keys a player would press to reach the current goal.
///
/// The autopilot only ever holds one direction key. It steers around the
/// tiles adversaries occupy, waits when no route is open and fires the
/// ability whenever a chasing adversary comes within `ability_reach`.
#[derive(Debug)]
pub(crate) struct Autopilot {
    ability_reach: u32,
    held: Option<Key>,
}

impl Autopilot {
    pub(crate) const fn new(ability_reach: u32) -> Self {
        Self {
            ability_reach,
            held: None,
        }
    }

    /// Key transitions for the next frame.
    pub(crate) fn keys(&mut self, world: &World) -> Vec<KeyEvent> {
        let mut keys = Vec::new();
        match query::phase(world) {
            Phase::Ready => {
                self.release(&mut keys);
                keys.push(KeyEvent::Pressed(Key::Enter));
                keys.push(KeyEvent::Released(Key::Enter));
                return keys;
            }
            Phase::Playing | Phase::Returning => {}
            _ => {
                self.release(&mut keys);
                return keys;
            }
        }

        if self.threatened(world) {
            keys.push(KeyEvent::Pressed(Key::Space));
            keys.push(KeyEvent::Released(Key::Space));
        }

        let wanted = route(world).map(direction_key);
        if wanted != self.held {
            self.release(&mut keys);
            if let Some(key) = wanted {
                keys.push(KeyEvent::Pressed(key));
                self.held = Some(key);
            }
        }
        keys
    }

    fn release(&mut self, keys: &mut Vec<KeyEvent>) {
        if let Some(key) = self.held.take() {
            keys.push(KeyEvent::Released(key));
        }
    }

    fn threatened(&self, world: &World) -> bool {
        let player = query::player(world);
        if !player.ability_cooldown.is_zero() {
            return false;
        }
        query::adversaries(world).iter().any(|adversary| {
            adversary.state == AdversaryState::Chase
                && adversary.cell.manhattan_distance(player.cell) <= self.ability_reach
        })
    }
}

fn route(world: &World) -> Option<Direction> {
    let player = query::player(world);
    let goal = match query::phase(world) {
        Phase::Playing => query::objective(world),
        Phase::Returning => query::pen(world),
        _ => return None,
    };
    let occupied: Vec<CellCoord> = query::adversaries(world)
        .iter()
        .map(|adversary| adversary.cell)
        .collect();
    let maze = query::maze(world);
    let next = next_hop(maze.columns(), maze.rows(), player.cell, goal, |cell| {
        query::is_walkable(world, cell) && !occupied.contains(&cell)
    })?;
    player.cell.direction_to(next)
}

const fn direction_key(direction: Direction) -> Key {
    match direction {
        Direction::North => Key::ArrowUp,
        Direction::East => Key::ArrowRight,
        Direction::South => Key::ArrowDown,
        Direction::West => Key::ArrowLeft,
    }
}
