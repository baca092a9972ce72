#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input decoding system that turns key transitions into world commands.
//!
//! Held direction keys are expressed as a fixed-rate repeated trigger rather
//! than a velocity, so every move the player makes stays a discrete
//! single-tile [`Command::TryMove`].

use std::time::Duration;

use maze_rescue_core::{Command, Direction};

/// Default delay between repeated moves while a direction is held.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(140);

/// Physical keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Right arrow.
    ArrowRight,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Letter W.
    W,
    /// Letter A.
    A,
    /// Letter S.
    S,
    /// Letter D.
    D,
    /// Space bar.
    Space,
    /// Enter / return.
    Enter,
    /// Escape.
    Escape,
    /// Letter P.
    P,
}

/// Transition of a single key reported by the platform layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    /// Key went down. Platform auto-repeat of a held key is ignored.
    Pressed(Key),
    /// Key went up.
    Released(Key),
}

/// Mapping from keys to game actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    primary: [Key; 4],
    alternate: [Key; 4],
    ability: Key,
    pause: Vec<Key>,
    confirm: Key,
}

impl KeyBindings {
    /// Creates bindings with direction keys listed in north, east, south,
    /// west order.
    #[must_use]
    pub fn new(
        primary: [Key; 4],
        alternate: [Key; 4],
        ability: Key,
        pause: Vec<Key>,
        confirm: Key,
    ) -> Self {
        Self {
            primary,
            alternate,
            ability,
            pause,
            confirm,
        }
    }

    /// Direction bound to `key` in either the primary or alternate set.
    #[must_use]
    pub fn direction(&self, key: Key) -> Option<Direction> {
        self.primary
            .iter()
            .position(|bound| *bound == key)
            .or_else(|| self.alternate.iter().position(|bound| *bound == key))
            .and_then(|index| Direction::ALL.get(index).copied())
    }

    /// Reports whether `key` triggers the special ability.
    #[must_use]
    pub fn is_ability(&self, key: Key) -> bool {
        self.ability == key
    }

    /// Reports whether `key` toggles the pause flag.
    #[must_use]
    pub fn is_pause(&self, key: Key) -> bool {
        self.pause.contains(&key)
    }

    /// Reports whether `key` starts the stage.
    #[must_use]
    pub fn is_confirm(&self, key: Key) -> bool {
        self.confirm == key
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new(
            [Key::ArrowUp, Key::ArrowRight, Key::ArrowDown, Key::ArrowLeft],
            [Key::W, Key::D, Key::S, Key::A],
            Key::Space,
            vec![Key::P, Key::Escape],
            Key::Enter,
        )
    }
}

/// Pure system converting key transitions into commands.
#[derive(Clone, Debug)]
pub struct InputRepeat {
    bindings: KeyBindings,
    interval: Duration,
    held: Vec<Key>,
    since_trigger: Duration,
}

impl Default for InputRepeat {
    fn default() -> Self {
        Self::new(KeyBindings::default(), DEFAULT_REPEAT_INTERVAL)
    }
}

impl InputRepeat {
    /// Creates the system with the provided bindings and repeat interval.
    #[must_use]
    pub fn new(bindings: KeyBindings, interval: Duration) -> Self {
        Self {
            bindings,
            interval,
            held: Vec::new(),
            since_trigger: Duration::ZERO,
        }
    }

    /// Direction currently driving the repeat trigger, if any.
    #[must_use]
    pub fn held_direction(&self) -> Option<Direction> {
        self.held
            .last()
            .and_then(|key| self.bindings.direction(*key))
    }

    /// Consumes this frame's key transitions and elapsed time.
    ///
    /// A newly pressed direction fires immediately and restarts the repeat
    /// timer. Otherwise a held direction fires at most once per frame each
    /// time the repeat interval elapses. The most recently pressed held
    /// direction wins.
    pub fn handle(&mut self, keys: &[KeyEvent], dt: Duration, out: &mut Vec<Command>) {
        let mut fired = false;

        for event in keys {
            match *event {
                KeyEvent::Pressed(key) => {
                    if let Some(direction) = self.bindings.direction(key) {
                        if self.held.contains(&key) {
                            continue;
                        }
                        self.held.push(key);
                        self.since_trigger = Duration::ZERO;
                        out.push(Command::TryMove { direction });
                        fired = true;
                    } else if self.bindings.is_ability(key) {
                        out.push(Command::UseAbility);
                    } else if self.bindings.is_pause(key) {
                        out.push(Command::TogglePause);
                    } else if self.bindings.is_confirm(key) {
                        out.push(Command::Start);
                    }
                }
                KeyEvent::Released(key) => {
                    self.held.retain(|held| *held != key);
                    if self.held.is_empty() {
                        self.since_trigger = Duration::ZERO;
                    }
                }
            }
        }

        if fired {
            return;
        }
        let Some(direction) = self.held_direction() else {
            return;
        };

        self.since_trigger = self.since_trigger.saturating_add(dt);
        if self.since_trigger >= self.interval {
            self.since_trigger = self
                .since_trigger
                .saturating_sub(self.interval)
                .min(self.interval);
            out.push(Command::TryMove { direction });
        }
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.since_trigger = Duration::ZERO;
    }
}
