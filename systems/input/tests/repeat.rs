use std::time::Duration;

use maze_rescue_core::{Command, Direction};
use maze_rescue_system_input::{InputRepeat, Key, KeyBindings, KeyEvent};

const FRAME: Duration = Duration::from_millis(20);

fn frame(input: &mut InputRepeat, keys: &[KeyEvent]) -> Vec<Command> {
    let mut commands = Vec::new();
    input.handle(keys, FRAME, &mut commands);
    commands
}

fn moves(commands: &[Command]) -> Vec<Direction> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::TryMove { direction } => Some(*direction),
            _ => None,
        })
        .collect()
}

#[test]
fn press_fires_immediately_then_repeats_on_interval() {
    let mut input = InputRepeat::new(KeyBindings::default(), Duration::from_millis(100));

    let first = frame(&mut input, &[KeyEvent::Pressed(Key::ArrowRight)]);
    assert_eq!(moves(&first), vec![Direction::East]);

    let mut repeated = Vec::new();
    for _ in 0..10 {
        repeated.extend(frame(&mut input, &[]));
    }
    assert_eq!(
        moves(&repeated),
        vec![Direction::East, Direction::East],
        "200 ms of holding should repeat twice"
    );
}

#[test]
fn release_stops_the_trigger() {
    let mut input = InputRepeat::new(KeyBindings::default(), Duration::from_millis(100));
    let _ = frame(&mut input, &[KeyEvent::Pressed(Key::S)]);
    let _ = frame(&mut input, &[KeyEvent::Released(Key::S)]);

    for _ in 0..20 {
        assert!(frame(&mut input, &[]).is_empty());
    }
    assert_eq!(input.held_direction(), None);
}

#[test]
fn most_recent_held_direction_wins() {
    let mut input = InputRepeat::new(KeyBindings::default(), Duration::from_millis(100));
    let _ = frame(&mut input, &[KeyEvent::Pressed(Key::ArrowUp)]);
    let second = frame(&mut input, &[KeyEvent::Pressed(Key::A)]);
    assert_eq!(moves(&second), vec![Direction::West]);
    assert_eq!(input.held_direction(), Some(Direction::West));

    let _ = frame(&mut input, &[KeyEvent::Released(Key::A)]);
    assert_eq!(input.held_direction(), Some(Direction::North));
}

#[test]
fn platform_auto_repeat_does_not_fire_extra_moves() {
    let mut input = InputRepeat::new(KeyBindings::default(), Duration::from_millis(100));
    let _ = frame(&mut input, &[KeyEvent::Pressed(Key::ArrowDown)]);
    let echoed = frame(&mut input, &[KeyEvent::Pressed(Key::ArrowDown)]);
    assert!(moves(&echoed).is_empty());
}

#[test]
fn action_keys_map_to_commands() {
    let mut input = InputRepeat::default();
    let commands = frame(
        &mut input,
        &[
            KeyEvent::Pressed(Key::Enter),
            KeyEvent::Pressed(Key::Space),
            KeyEvent::Pressed(Key::P),
            KeyEvent::Released(Key::P),
            KeyEvent::Pressed(Key::Escape),
        ],
    );
    assert_eq!(
        commands,
        vec![
            Command::Start,
            Command::UseAbility,
            Command::TogglePause,
            Command::TogglePause,
        ]
    );
}

#[test]
fn long_frame_fires_a_single_repeat() {
    let mut input = InputRepeat::new(KeyBindings::default(), Duration::from_millis(100));
    let _ = frame(&mut input, &[KeyEvent::Pressed(Key::D)]);

    let mut commands = Vec::new();
    input.handle(&[], Duration::from_secs(1), &mut commands);
    assert_eq!(moves(&commands), vec![Direction::East]);
}
