#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that plays the maze rescue stages with a
//! scripted autopilot and reports the settlement outcome.

mod autopilot;
mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use autopilot::Autopilot;
use clap::Parser;
use maze_rescue_core::{Command, Event, Phase};
use maze_rescue_system_campaign::{Campaign, RunOutcome};
use maze_rescue_system_cues::Cues;
use maze_rescue_system_input::InputRepeat;
use maze_rescue_world::query;
use serde::Serialize;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Plays maze rescue stages headlessly", long_about = None)]
struct Args {
    /// One-based stage the run starts at.
    #[arg(long, default_value_t = 1)]
    stage: u32,

    /// TOML file overriding simulation tuning.
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Simulated length of one presentation frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Frames to simulate before giving up on an unfinished run.
    #[arg(long, default_value_t = 200_000)]
    max_frames: u64,

    /// Print the report as JSON instead of plain text.
    #[arg(long)]
    json: bool,

    /// Suppress audio cue logging.
    #[arg(long)]
    mute: bool,
}

/// Summary printed when the binary exits.
#[derive(Debug, Serialize)]
struct Report {
    frames: u64,
    stage: u32,
    phase: Phase,
    score: u32,
    collected: u32,
    outcome: Option<RunOutcome>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let tuning = config::load_tuning(args.tuning.as_deref())?;
    let ability_reach = tuning.ability_radius;
    let mut campaign = Campaign::starting_at(args.stage, tuning)
        .with_context(|| format!("failed to start the run at stage {}", args.stage))?;

    let frame = Duration::from_millis(args.frame_ms);
    let mut pilot = Autopilot::new(ability_reach);
    let mut input = InputRepeat::default();
    let mut cues = Cues::new();
    cues.set_muted(args.mute);

    let mut commands: Vec<Command> = Vec::new();
    let mut events: Vec<Event> = Vec::new();
    let mut sounds = Vec::new();
    let mut frames = 0;

    while frames < args.max_frames {
        match campaign.phase() {
            Phase::StageClear => {
                campaign
                    .advance_stage()
                    .context("failed to build the next stage")?;
                input.release_all();
                pilot = Autopilot::new(ability_reach);
                continue;
            }
            Phase::AllClear | Phase::GameOver => break,
            _ => {}
        }

        let keys = pilot.keys(campaign.world());
        commands.clear();
        input.handle(&keys, frame, &mut commands);

        events.clear();
        campaign.frame(frame, &commands, &mut events);
        frames += 1;

        for event in &events {
            log_event(campaign.stage(), event);
        }
        sounds.clear();
        cues.handle(&events, &mut sounds);
        for cue in &sounds {
            trace!(cue = cue.name(), "cue");
        }
    }

    let world = campaign.world();
    let report = Report {
        frames,
        stage: campaign.stage(),
        phase: campaign.phase(),
        score: campaign.total_score(),
        collected: campaign.total_collected(),
        outcome: campaign.outcome(),
    };
    if report.outcome.is_none() {
        warn!(
            frames,
            stage = report.stage,
            hp = query::hp(world),
            "run did not finish within the frame limit"
        );
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{json}");
    } else {
        println!(
            "stage {} ({:?}) after {} frames: score {}, collected {}",
            report.stage, report.phase, report.frames, report.score, report.collected
        );
    }
    Ok(())
}

fn log_event(stage: u32, event: &Event) {
    match event {
        Event::StageCompleted { score, .. } => info!(stage, score, "stage completed"),
        Event::PlayerCaught { hp, respawn, .. } => {
            info!(
                stage,
                hp,
                column = respawn.column(),
                row = respawn.row(),
                "player caught"
            );
        }
        Event::TimeExpired => warn!(stage, "time expired"),
        Event::HealthDepleted => warn!(stage, "health depleted"),
        Event::Stepped { .. } => {}
        other => debug!(stage, event = ?other, "world event"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
