#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for a single Maze Rescue stage.
//!
//! The [`World`] owns the maze, the player, the adversaries and every timer
//! of one stage attempt. It is mutated exclusively through [`apply`], which
//! appends [`Event`] values describing what happened. Rendering and audio
//! read the world through the [`query`] module and the drained events.

mod adversary;
mod camera;
mod hazard;
mod maze;
mod navigation;
mod particles;
mod player;
mod tuning;

use std::time::Duration;

use glam::Vec2;
use maze_rescue_core::{
    AdversaryId, AdversaryState, CellCoord, Command, Countdown, Direction, Event, Phase,
    StageConfig, TileKind,
};
use tracing::debug;

pub use camera::Camera;
pub use hazard::HazardCycle;
pub use maze::{LayoutError, Maze, MazeLayout};
pub use navigation::{next_hop, shortest_path};
pub use particles::{Particle, ParticleKind};
pub use tuning::Tuning;

use adversary::{Adversary, Surroundings};
use particles::ParticleField;
use player::{tile_center, Player};

const PARTICLE_SEED: u64 = 0x6d61_7a65_5f72_6573;

const SPARKLE_COUNT: usize = 8;
const HEAL_COUNT: usize = 10;
const SHOCKWAVE_COUNT: usize = 16;
const DUST_COUNT: usize = 6;

/// Complete mutable state of one stage attempt.
#[derive(Clone, Debug)]
pub struct World {
    config: StageConfig,
    tuning: Tuning,
    maze: Maze,
    pen: CellCoord,
    objective: CellCoord,
    activated_checkpoints: Vec<CellCoord>,
    last_checkpoint: Option<CellCoord>,
    player: Player,
    adversaries: Vec<Adversary>,
    hazard: HazardCycle,
    hp: u32,
    timer: Countdown,
    phase: Phase,
    paused: bool,
    collected: u32,
    score: u32,
    camera: Camera,
    particles: ParticleField,
    guide_path: Vec<CellCoord>,
}

impl World {
    /// Builds a fresh stage in the [`Phase::Ready`] phase.
    ///
    /// Every patrol template of the layout is validated, then the first
    /// `config.adversaries` of them each receive one adversary.
    pub fn new(
        config: StageConfig,
        layout: &MazeLayout<'_>,
        tuning: Tuning,
    ) -> Result<Self, LayoutError> {
        let maze = Maze::parse(layout.tiles)?;
        let pen = maze.locate(TileKind::Pen).ok_or(LayoutError::MissingTile {
            kind: TileKind::Pen,
        })?;
        let objective = maze
            .locate(TileKind::Objective)
            .ok_or(LayoutError::MissingTile {
                kind: TileKind::Objective,
            })?;

        if config.adversaries > layout.patrols.len() {
            return Err(LayoutError::NotEnoughPatrols {
                requested: config.adversaries,
                available: layout.patrols.len(),
            });
        }

        let routes = layout
            .patrols
            .iter()
            .enumerate()
            .map(|(index, corners)| maze.expand_patrol(index, corners))
            .collect::<Result<Vec<_>, LayoutError>>()?;

        let adversaries = routes
            .into_iter()
            .take(config.adversaries)
            .enumerate()
            .map(|(index, route)| {
                let id = AdversaryId::new(u32::try_from(index).unwrap_or(u32::MAX));
                Adversary::new(id, route, config.adversary_speed, config.sight_range)
            })
            .collect();

        let camera = Camera::new(
            Vec2::new(tuning.viewport_columns, tuning.viewport_rows),
            Vec2::new(maze.columns() as f32, maze.rows() as f32),
            tuning.camera_smoothing,
            tile_center(pen),
        );

        Ok(Self {
            hazard: HazardCycle::new(tuning.hazard_safe, tuning.hazard_active, config.hazards),
            hp: tuning.max_hp,
            timer: Countdown::new(config.time_limit),
            particles: ParticleField::new(
                PARTICLE_SEED ^ u64::from(config.stage),
                tuning.particle_lifetime,
            ),
            player: Player::spawn(pen),
            activated_checkpoints: Vec::new(),
            last_checkpoint: None,
            phase: Phase::Ready,
            paused: false,
            collected: 0,
            score: 0,
            guide_path: Vec::new(),
            adversaries,
            camera,
            config,
            tuning,
            maze,
            pen,
            objective,
        })
    }

    fn set_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        debug!(
            stage = self.config.stage,
            from = ?self.phase,
            to = ?phase,
            "phase changed"
        );
        self.phase = phase;
        self.paused = false;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn set_paused(&mut self, paused: bool) {
        if !self.phase.is_active() || self.paused == paused {
            return;
        }
        debug!(stage = self.config.stage, paused, "pause toggled");
        self.paused = paused;
    }

    fn player_focus(&self) -> Vec2 {
        self.player.visual_center(self.tuning.player_step)
    }

    fn step(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.phase.is_active() || self.paused {
            return;
        }

        if self.timer.tick(dt) {
            out_events.push(Event::TimeExpired);
            self.set_phase(Phase::GameOver, out_events);
            return;
        }

        let _ = self.player.cooldown.tick(dt);
        self.hazard.advance(dt);

        if let Some(cell) = self.player.advance(dt, self.tuning.player_step) {
            out_events.push(Event::Stepped { cell });
            self.resolve_arrival(cell, out_events);
        }

        let focus = self.player_focus();
        self.camera.follow(focus, dt);

        match self.phase {
            Phase::Returning => self.escort(dt, out_events),
            Phase::Playing => self.run_adversaries(dt, out_events),
            _ => {}
        }

        self.particles.advance(dt);
    }

    fn resolve_arrival(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.maze.tile(cell) {
            Some(TileKind::Collectible) => {
                self.maze.clear(cell);
                self.collected = self.collected.saturating_add(1);
                self.score = self.score.saturating_add(self.tuning.collectible_bonus);
                out_events.push(Event::CollectibleCollected {
                    cell,
                    collected: self.collected,
                });
                self.particles
                    .burst(ParticleKind::Sparkle, tile_center(cell), SPARKLE_COUNT);
            }
            Some(TileKind::Checkpoint) => {
                self.last_checkpoint = Some(cell);
                if self.activated_checkpoints.contains(&cell) {
                    return;
                }
                self.activated_checkpoints.push(cell);
                self.hp = self.hp.saturating_add(1).min(self.tuning.max_hp);
                self.score = self.score.saturating_add(self.tuning.checkpoint_bonus);
                out_events.push(Event::CheckpointReached { cell, hp: self.hp });
                self.particles
                    .burst(ParticleKind::Heal, tile_center(cell), HEAL_COUNT);
            }
            Some(TileKind::Objective) if !self.player.carrying && self.phase == Phase::Playing => {
                out_events.push(Event::ObjectiveSecured { cell });
                self.set_phase(Phase::Rescue, out_events);
            }
            _ => {}
        }
    }

    /// Returning phase: adversaries head home while the player escorts the
    /// objective back to the pen.
    fn escort(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let surroundings = Surroundings {
            maze: &self.maze,
            hazard_active: self.hazard.is_active(),
            player: self.player.cell,
        };
        for adversary in &mut self.adversaries {
            adversary.enter_retreat();
            let _ = adversary.advance(dt, self.tuning.retreat_speed_fraction, surroundings);
        }

        if self.player.carrying && !self.player.is_moving() && self.player.cell == self.pen {
            let final_stage = self.config.final_stage;
            out_events.push(Event::StageCompleted {
                stage: self.config.stage,
                score: self.score,
                final_stage,
            });
            let next = if final_stage {
                Phase::AllClear
            } else {
                Phase::StageClear
            };
            self.set_phase(next, out_events);
        }
    }

    fn run_adversaries(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let surroundings = Surroundings {
            maze: &self.maze,
            hazard_active: self.hazard.is_active(),
            player: self.player.cell,
        };
        for adversary in &mut self.adversaries {
            let fraction = match adversary.state {
                AdversaryState::Patrol => self.tuning.patrol_speed_fraction,
                AdversaryState::Chase => self.tuning.chase_speed_fraction,
                AdversaryState::Retreat => self.tuning.retreat_speed_fraction,
            };
            let _ = adversary.advance(dt, fraction, surroundings);
        }

        let player_cell = self.player.cell;
        let mut credited = None;
        for adversary in self
            .adversaries
            .iter_mut()
            .filter(|adversary| adversary.state == AdversaryState::Chase)
            .filter(|adversary| adversary.cell == player_cell)
        {
            if credited.is_none() {
                credited = Some(adversary.id);
            }
            adversary.enter_retreat();
        }
        if let Some(adversary) = credited {
            self.catch_player(adversary, out_events);
            if !self.phase.is_active() {
                return;
            }
        }

        let player_cell = self.player.cell;
        for adversary in &mut self.adversaries {
            let perceives = adversary.perceives(&self.maze, player_cell);
            if adversary.update_state(perceives, dt, self.tuning.chase_duration) {
                debug!(adversary = adversary.id.get(), cell = ?adversary.cell, "chase started");
                out_events.push(Event::AdversaryBeganChase {
                    adversary: adversary.id,
                    cell: adversary.cell,
                });
            }
        }
    }

    /// One life per frame regardless of how many adversaries made the catch.
    fn catch_player(&mut self, adversary: AdversaryId, out_events: &mut Vec<Event>) {
        self.hp = self.hp.saturating_sub(1);
        let respawn = self.last_checkpoint.unwrap_or(self.pen);
        self.player.relocate(respawn);
        self.particles
            .burst(ParticleKind::Dust, tile_center(respawn), DUST_COUNT);
        debug!(
            adversary = adversary.get(),
            hp = self.hp,
            respawn = ?respawn,
            "player caught"
        );
        out_events.push(Event::PlayerCaught {
            adversary,
            hp: self.hp,
            respawn,
        });

        if self.hp == 0 {
            out_events.push(Event::HealthDepleted);
            self.set_phase(Phase::GameOver, out_events);
        }
    }

    fn finish_rescue(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Rescue {
            return;
        }

        self.player.carrying = true;
        self.maze.clear(self.objective);
        self.guide_path = shortest_path(
            self.maze.columns(),
            self.maze.rows(),
            self.player.cell,
            self.pen,
            |cell| self.maze.is_walkable(cell, false),
        );
        for adversary in &mut self.adversaries {
            adversary.enter_retreat();
        }

        out_events.push(Event::ReturnPhaseStarted {
            guide_length: self.guide_path.len(),
        });
        self.set_phase(Phase::Returning, out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that are not legal in the current state are ignored without
/// touching the world or emitting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => {
            if world.phase == Phase::Ready {
                world.set_phase(Phase::Playing, out_events);
            }
        }
        Command::SetPaused { paused } => world.set_paused(paused),
        Command::TogglePause => {
            let paused = !world.paused;
            world.set_paused(paused);
        }
        Command::Tick { dt } => {
            let dt = dt.min(world.tuning.max_step);
            world.step(dt, out_events);
        }
        Command::TryMove { direction } => {
            let _ = try_move(world, direction);
        }
        Command::UseAbility => {
            let _ = use_ability(world, out_events);
        }
        Command::FinishRescue => world.finish_rescue(out_events),
    }
}

/// Starts a single-tile move and reports whether it was accepted.
///
/// Rejected while a move is already in flight, while the simulation is not
/// running, or when the destination is not walkable right now.
pub fn try_move(world: &mut World, direction: Direction) -> bool {
    if !world.phase.is_active() || world.paused || world.player.is_moving() {
        return false;
    }
    let Some(target) = world.maze.neighbor(world.player.cell, direction) else {
        return false;
    };
    if !world.maze.is_walkable(target, world.hazard.is_active()) {
        return false;
    }
    world.player.begin_move(direction, target);
    true
}

/// Triggers the player's push-back ability and reports whether it fired.
///
/// Every adversary within the ability radius is pushed along the player's
/// facing direction and forced to retreat.
pub fn use_ability(world: &mut World, out_events: &mut Vec<Event>) -> bool {
    if !world.phase.is_active() || world.paused || !world.player.cooldown.is_expired() {
        return false;
    }
    world.player.cooldown.restart(world.tuning.ability_cooldown);

    let origin = world.player.cell;
    let facing = world.player.facing;
    let hazard_active = world.hazard.is_active();
    let radius = world.tuning.ability_radius;
    for adversary in world
        .adversaries
        .iter_mut()
        .filter(|adversary| adversary.cell.manhattan_distance(origin) <= radius)
    {
        adversary.push_back(
            facing,
            world.tuning.push_distance,
            &world.maze,
            hazard_active,
        );
        adversary.enter_retreat();
        debug!(adversary = adversary.id.get(), cell = ?adversary.cell, "adversary struck");
        out_events.push(Event::AdversaryStruck {
            adversary: adversary.id,
            cell: adversary.cell,
        });
    }

    world.particles.burst(
        ParticleKind::Shockwave,
        tile_center(origin),
        SHOCKWAVE_COUNT,
    );
    true
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use maze_rescue_core::{
        AdversarySnapshot, CellCoord, Phase, PlayerSnapshot, StageConfig, TileKind,
    };

    use super::{Camera, Maze, Particle, World};

    /// Current top-level phase of the stage.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Reports whether the simulation is suspended.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Static parameters the stage was built from.
    #[must_use]
    pub fn config(world: &World) -> &StageConfig {
        &world.config
    }

    /// Current maze including cleared tiles.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Bounds-checked walkability under the current hazard state.
    #[must_use]
    pub fn is_walkable(world: &World, cell: CellCoord) -> bool {
        world.maze.is_walkable(cell, world.hazard.is_active())
    }

    /// Reports whether hazard ground is currently impassable.
    #[must_use]
    pub fn hazard_active(world: &World) -> bool {
        world.hazard.is_active()
    }

    /// Pen tile where the stage starts and ends.
    #[must_use]
    pub fn pen(world: &World) -> CellCoord {
        world.pen
    }

    /// Original location of the objective.
    #[must_use]
    pub fn objective(world: &World) -> CellCoord {
        world.objective
    }

    /// Collectibles that have not been picked up yet.
    #[must_use]
    pub fn remaining_collectibles(world: &World) -> Vec<CellCoord> {
        world.maze.locate_all(TileKind::Collectible)
    }

    /// Every checkpoint paired with whether it has been activated.
    #[must_use]
    pub fn checkpoints(world: &World) -> Vec<(CellCoord, bool)> {
        world
            .maze
            .locate_all(TileKind::Checkpoint)
            .into_iter()
            .map(|cell| (cell, world.activated_checkpoints.contains(&cell)))
            .collect()
    }

    /// Checkpoint the player respawns on after a catch, if any.
    #[must_use]
    pub fn last_checkpoint(world: &World) -> Option<CellCoord> {
        world.last_checkpoint
    }

    /// Read-only snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot(world.tuning.player_step)
    }

    /// Interpolated player centre in tile units.
    #[must_use]
    pub fn player_position(world: &World) -> Vec2 {
        world.player_focus()
    }

    /// Snapshots of every adversary ordered by identifier.
    #[must_use]
    pub fn adversaries(world: &World) -> Vec<AdversarySnapshot> {
        world
            .adversaries
            .iter()
            .map(|adversary| adversary.snapshot())
            .collect()
    }

    /// Remaining player health.
    #[must_use]
    pub fn hp(world: &World) -> u32 {
        world.hp
    }

    /// Health cap for the stage.
    #[must_use]
    pub fn max_hp(world: &World) -> u32 {
        world.tuning.max_hp
    }

    /// Time left on the stage countdown.
    #[must_use]
    pub fn time_remaining(world: &World) -> Duration {
        world.timer.remaining()
    }

    /// Score accumulated during the stage.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Collectibles gathered during the stage.
    #[must_use]
    pub fn collected(world: &World) -> u32 {
        world.collected
    }

    /// Static trail toward the pen computed when the return began.
    #[must_use]
    pub fn guide_path(world: &World) -> &[CellCoord] {
        &world.guide_path
    }

    /// Smoothed viewport following the player.
    #[must_use]
    pub fn camera(world: &World) -> &Camera {
        &world.camera
    }

    /// Live decorative particles.
    #[must_use]
    pub fn particles(world: &World) -> &[Particle] {
        world.particles.particles()
    }

    /// Reports whether a cell is lit under the stage's darkness radius.
    #[must_use]
    pub fn is_lit(world: &World, cell: CellCoord) -> bool {
        let Some(radius) = world.config.darkness_radius else {
            return true;
        };
        let center = world.player.cell;
        let dx = u64::from(cell.column().abs_diff(center.column()));
        let dy = u64::from(cell.row().abs_diff(center.row()));
        let radius = u64::from(radius);
        dx * dx + dy * dy <= radius * radius
    }

    /// Everything a renderer needs for one frame.
    #[must_use]
    pub fn frame(world: &World) -> FrameSnapshot<'_> {
        FrameSnapshot {
            phase: world.phase,
            paused: world.paused,
            maze: &world.maze,
            player: player(world),
            player_position: player_position(world),
            adversaries: adversaries(world),
            hp: world.hp,
            max_hp: world.tuning.max_hp,
            time_remaining: world.timer.remaining(),
            score: world.score,
            collected: world.collected,
            hazard_active: world.hazard.is_active(),
            camera: world.camera.position(),
            guide_path: &world.guide_path,
            particles: world.particles.particles(),
        }
    }

    /// Read-only aggregate consumed by renderers once per frame.
    #[derive(Clone, Debug)]
    pub struct FrameSnapshot<'a> {
        /// Current phase.
        pub phase: Phase,
        /// Whether the simulation is suspended.
        pub paused: bool,
        /// Current maze tiles.
        pub maze: &'a Maze,
        /// Player state.
        pub player: PlayerSnapshot,
        /// Interpolated player centre in tile units.
        pub player_position: Vec2,
        /// Adversary states.
        pub adversaries: Vec<AdversarySnapshot>,
        /// Remaining health.
        pub hp: u32,
        /// Health cap.
        pub max_hp: u32,
        /// Time left on the stage countdown.
        pub time_remaining: Duration,
        /// Stage score.
        pub score: u32,
        /// Collectibles gathered.
        pub collected: u32,
        /// Whether hazard ground is impassable.
        pub hazard_active: bool,
        /// Camera origin in tile units.
        pub camera: Vec2,
        /// Guide trail toward the pen.
        pub guide_path: &'a [CellCoord],
        /// Live particles.
        pub particles: &'a [Particle],
    }
}
