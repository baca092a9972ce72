use std::time::Duration;

use maze_rescue_core::{CellCoord, Command, Direction, Event, Phase, StageConfig};
use maze_rescue_world::{self as world, query, MazeLayout, Tuning, World};

const TICK: Duration = Duration::from_millis(50);

fn config(hazards: bool) -> StageConfig {
    StageConfig {
        stage: 1,
        maze: 0,
        time_limit: Duration::from_secs(60),
        adversaries: 0,
        adversary_speed: 0.0,
        sight_range: 0,
        hazards,
        darkness_radius: None,
        reward: String::from("well done"),
        final_stage: false,
    }
}

fn started(tiles: &[&str], hazards: bool, tuning: Tuning) -> World {
    let layout = MazeLayout {
        tiles,
        patrols: &[],
    };
    let mut world = World::new(config(hazards), &layout, tuning).expect("layout is valid");
    let mut events = Vec::new();
    world::apply(&mut world, Command::Start, &mut events);
    assert_eq!(query::phase(&world), Phase::Playing);
    world
}

fn tick(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: TICK }, &mut events);
    events
}

#[test]
fn second_move_during_flight_is_rejected_without_side_effects() {
    let mut world = started(
        &["#######", "#P...@#", "#.#####", "#######"],
        false,
        Tuning::default(),
    );

    assert!(world::try_move(&mut world, Direction::East));
    let _ = tick(&mut world);
    let before = query::player(&world);
    assert_eq!(before.moving_to, Some(CellCoord::new(2, 1)));

    assert!(!world::try_move(&mut world, Direction::East));
    assert!(!world::try_move(&mut world, Direction::South));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::TryMove {
            direction: Direction::South,
        },
        &mut events,
    );

    assert!(events.is_empty(), "rejected moves must not emit events");
    assert_eq!(
        query::player(&world),
        before,
        "rejected moves changed the player"
    );
}

#[test]
fn move_lands_after_step_duration_and_emits_step_event() {
    let mut world = started(&["#######", "#P...@#", "#######"], false, Tuning::default());
    assert!(world::try_move(&mut world, Direction::East));

    assert!(tick(&mut world).is_empty());
    assert!(tick(&mut world).is_empty());
    let events = tick(&mut world);
    assert_eq!(
        events,
        vec![Event::Stepped {
            cell: CellCoord::new(2, 1)
        }]
    );
    let player = query::player(&world);
    assert_eq!(player.cell, CellCoord::new(2, 1));
    assert_eq!(player.facing, Direction::East);
    assert_eq!(player.moving_to, None);
}

#[test]
fn walls_reject_moves_and_keep_facing() {
    let mut world = started(&["#######", "#P...@#", "#######"], false, Tuning::default());
    let facing = query::player(&world).facing;

    assert!(!world::try_move(&mut world, Direction::North));
    assert!(!world::try_move(&mut world, Direction::West));
    assert_eq!(query::player(&world).facing, facing);
    assert_eq!(query::player(&world).cell, CellCoord::new(1, 1));
}

#[test]
fn hazard_walkability_tracks_the_cycle_across_a_sweep() {
    let tuning = Tuning {
        hazard_safe: Duration::from_millis(300),
        hazard_active: Duration::from_millis(200),
        ..Tuning::default()
    };
    let mut world = started(&["######", "#P~.@#", "######"], true, tuning);
    let hazard = CellCoord::new(2, 1);
    let wall = CellCoord::new(0, 1);

    let mut elapsed = Duration::ZERO;
    let mut saw_active = false;
    for _ in 0..120 {
        let _ = tick(&mut world);
        elapsed += TICK;
        let millis = elapsed.as_millis() % 500;
        let expected_active = millis >= 300;
        saw_active |= expected_active;

        assert_eq!(
            query::hazard_active(&world),
            expected_active,
            "hazard state diverged at {elapsed:?}"
        );
        assert_eq!(query::is_walkable(&world, hazard), !expected_active);
        assert!(!query::is_walkable(&world, wall));
    }
    assert!(saw_active);
}

#[test]
fn active_hazard_blocks_moves_until_it_is_safe_again() {
    let tuning = Tuning {
        hazard_safe: Duration::from_millis(300),
        hazard_active: Duration::from_millis(200),
        ..Tuning::default()
    };
    let mut world = started(&["######", "#P~.@#", "######"], true, tuning);

    for _ in 0..6 {
        let _ = tick(&mut world);
    }
    assert!(query::hazard_active(&world));
    assert!(!world::try_move(&mut world, Direction::East));

    for _ in 0..4 {
        let _ = tick(&mut world);
    }
    assert!(!query::hazard_active(&world));
    assert!(world::try_move(&mut world, Direction::East));
}

#[test]
fn disabled_hazards_stay_walkable() {
    let mut world = started(&["######", "#P~.@#", "######"], false, Tuning::default());
    for _ in 0..200 {
        let _ = tick(&mut world);
        assert!(query::is_walkable(&world, CellCoord::new(2, 1)));
    }
}
