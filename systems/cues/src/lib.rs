#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Audio cue system that maps drained world events to sound identifiers.

use maze_rescue_core::{Event, Phase};

/// Sound effects and jingles an audio backend is expected to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Player finished a step.
    Footstep,
    /// Collectible picked up.
    Coin,
    /// Checkpoint activated.
    Chime,
    /// An adversary started chasing.
    Alert,
    /// Player was caught.
    Hurt,
    /// Ability pushed an adversary away.
    Whoosh,
    /// Objective reached; rescue cutscene begins.
    RescueJingle,
    /// Escort back to the pen begins.
    ReturnFanfare,
    /// Stage or run completed.
    Victory,
    /// Run lost.
    Defeat,
}

impl Cue {
    /// Stable identifier an audio backend can use to look up the asset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Footstep => "footstep",
            Self::Coin => "coin",
            Self::Chime => "chime",
            Self::Alert => "alert",
            Self::Hurt => "hurt",
            Self::Whoosh => "whoosh",
            Self::RescueJingle => "rescue_jingle",
            Self::ReturnFanfare => "return_fanfare",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
        }
    }
}

/// Pure system translating one frame of events into cues.
#[derive(Debug, Default)]
pub struct Cues {
    muted: bool,
}

impl Cues {
    /// Creates the system with sound enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Silences or restores every cue.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Appends the cues triggered by `events` to `out`.
    ///
    /// At most one footstep is emitted per batch. Several alerts raised in
    /// the same batch also collapse into one.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Cue>) {
        if self.muted {
            return;
        }

        let mut stepped = false;
        let mut alerted = false;
        for event in events {
            let cue = match event {
                Event::Stepped { .. } if !stepped => {
                    stepped = true;
                    Cue::Footstep
                }
                Event::AdversaryBeganChase { .. } if !alerted => {
                    alerted = true;
                    Cue::Alert
                }
                Event::CollectibleCollected { .. } => Cue::Coin,
                Event::CheckpointReached { .. } => Cue::Chime,
                Event::PlayerCaught { .. } => Cue::Hurt,
                Event::AdversaryStruck { .. } => Cue::Whoosh,
                Event::ObjectiveSecured { .. } => Cue::RescueJingle,
                Event::ReturnPhaseStarted { .. } => Cue::ReturnFanfare,
                Event::StageCompleted { .. } => Cue::Victory,
                Event::PhaseChanged {
                    phase: Phase::GameOver,
                } => Cue::Defeat,
                _ => continue,
            };
            out.push(cue);
        }
    }
}
