use maze_rescue_core::{AdversaryId, CellCoord, Event, Phase};
use maze_rescue_system_cues::{Cue, Cues};

fn cues_for(events: &[Event]) -> Vec<Cue> {
    let mut cues = Vec::new();
    Cues::new().handle(events, &mut cues);
    cues
}

#[test]
fn footsteps_are_throttled_to_one_per_batch() {
    let events = [
        Event::Stepped {
            cell: CellCoord::new(1, 1),
        },
        Event::Stepped {
            cell: CellCoord::new(2, 1),
        },
        Event::CollectibleCollected {
            cell: CellCoord::new(2, 1),
            collected: 1,
        },
    ];
    assert_eq!(cues_for(&events), vec![Cue::Footstep, Cue::Coin]);
}

#[test]
fn gameplay_events_map_to_their_cues() {
    let adversary = AdversaryId::new(0);
    let events = [
        Event::AdversaryBeganChase {
            adversary,
            cell: CellCoord::new(4, 4),
        },
        Event::AdversaryBeganChase {
            adversary: AdversaryId::new(1),
            cell: CellCoord::new(5, 4),
        },
        Event::PlayerCaught {
            adversary,
            hp: 2,
            respawn: CellCoord::new(1, 1),
        },
        Event::AdversaryStruck {
            adversary,
            cell: CellCoord::new(6, 4),
        },
        Event::CheckpointReached {
            cell: CellCoord::new(3, 3),
            hp: 3,
        },
        Event::ObjectiveSecured {
            cell: CellCoord::new(9, 9),
        },
        Event::ReturnPhaseStarted { guide_length: 12 },
        Event::StageCompleted {
            stage: 1,
            score: 75,
            final_stage: false,
        },
    ];
    assert_eq!(
        cues_for(&events),
        vec![
            Cue::Alert,
            Cue::Hurt,
            Cue::Whoosh,
            Cue::Chime,
            Cue::RescueJingle,
            Cue::ReturnFanfare,
            Cue::Victory,
        ]
    );
}

#[test]
fn only_game_over_phase_changes_are_audible() {
    let events = [
        Event::PhaseChanged {
            phase: Phase::Playing,
        },
        Event::TimeExpired,
        Event::PhaseChanged {
            phase: Phase::GameOver,
        },
    ];
    assert_eq!(cues_for(&events), vec![Cue::Defeat]);
}

#[test]
fn muted_system_emits_nothing() {
    let mut cues = Cues::new();
    cues.set_muted(true);
    let mut out = Vec::new();
    cues.handle(
        &[Event::Stepped {
            cell: CellCoord::new(1, 1),
        }],
        &mut out,
    );
    assert!(out.is_empty());
    assert_eq!(Cue::Footstep.name(), "footstep");
}
