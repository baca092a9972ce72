#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run orchestration: frame sub-stepping, the rescue cutscene, stage
//! progression and the final settlement outcome.

use std::time::Duration;

use maze_rescue_core::{Command, Countdown, Event, Phase};
use maze_rescue_system_stages::{self as stages, StageError};
use maze_rescue_world::{self as world, query, Tuning, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Length of the rescue cutscene played after the objective is reached.
pub const DEFAULT_RESCUE_CUTSCENE: Duration = Duration::from_millis(1_500);

/// Upper bound on simulated time consumed by a single frame.
pub const DEFAULT_FRAME_BUDGET: Duration = Duration::from_millis(250);

/// Splits raw frame deltas into bounded simulation steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameClock {
    max_step: Duration,
    budget: Duration,
}

impl FrameClock {
    /// Creates a clock producing steps of at most `max_step`, consuming at
    /// most `budget` per frame.
    #[must_use]
    pub const fn new(max_step: Duration, budget: Duration) -> Self {
        Self { max_step, budget }
    }

    /// Sub-steps covering `frame`, truncated to the frame budget.
    #[must_use]
    pub fn substeps(&self, frame: Duration) -> Vec<Duration> {
        if self.max_step.is_zero() {
            return Vec::new();
        }
        let mut remaining = frame.min(self.budget);
        let mut steps = Vec::new();
        while !remaining.is_zero() {
            let step = remaining.min(self.max_step);
            steps.push(step);
            remaining -= step;
        }
        steps
    }
}

/// Settlement summary read by the reward routine once the run has ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Score accumulated over every stage played.
    pub score: u32,
    /// One-based number of the last stage played.
    pub stage_reached: u32,
    /// Collectibles gathered over every stage played.
    pub collected: u32,
    /// Whether the final stage was completed.
    pub cleared: bool,
}

/// Failures raised by stage transitions.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// The catalog could not produce the requested stage.
    #[error("failed to build stage")]
    Stage(#[from] StageError),
    /// Advancing was requested before the current stage was cleared.
    #[error("stage {stage} has not been cleared (phase {phase:?})")]
    NotCleared {
        /// Current one-based stage number.
        stage: u32,
        /// Phase the current stage is in.
        phase: Phase,
    },
    /// The run already ended with every stage cleared.
    #[error("the run is already complete")]
    RunComplete,
}

/// Owns the world of the current stage and everything around it that the
/// simulation itself does not time.
#[derive(Debug)]
pub struct Campaign {
    tuning: Tuning,
    clock: FrameClock,
    rescue_duration: Duration,
    world: World,
    stage: u32,
    cutscene: Option<Countdown>,
    banked_score: u32,
    banked_collected: u32,
}

impl Campaign {
    /// Starts a run at the first stage.
    pub fn new(tuning: Tuning) -> Result<Self, CampaignError> {
        Self::starting_at(1, tuning)
    }

    /// Starts a run at the one-based stage `stage`.
    pub fn starting_at(stage: u32, tuning: Tuning) -> Result<Self, CampaignError> {
        let world = stages::build(stage, tuning.clone())?;
        info!(stage, "campaign started");
        Ok(Self {
            clock: FrameClock::new(tuning.max_step, DEFAULT_FRAME_BUDGET),
            rescue_duration: DEFAULT_RESCUE_CUTSCENE,
            cutscene: None,
            banked_score: 0,
            banked_collected: 0,
            tuning,
            world,
            stage,
        })
    }

    /// Overrides the rescue cutscene length.
    #[must_use]
    pub fn with_rescue_duration(mut self, duration: Duration) -> Self {
        self.rescue_duration = duration;
        self
    }

    /// World of the stage being played.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// One-based number of the stage being played.
    #[must_use]
    pub const fn stage(&self) -> u32 {
        self.stage
    }

    /// Phase of the stage being played.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Reports whether the rescue cutscene is running.
    #[must_use]
    pub fn in_cutscene(&self) -> bool {
        self.cutscene.is_some()
    }

    /// Score banked from cleared stages plus the current stage score.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.banked_score.saturating_add(query::score(&self.world))
    }

    /// Collectibles banked from cleared stages plus the current stage.
    #[must_use]
    pub fn total_collected(&self) -> u32 {
        self.banked_collected.saturating_add(query::collected(&self.world))
    }

    /// Runs one presentation frame.
    ///
    /// `commands` are applied first, then the rescue cutscene advances, then
    /// the world is ticked in bounded sub-steps covering `frame`. Every event
    /// produced along the way is appended to `out_events`.
    pub fn frame(&mut self, frame: Duration, commands: &[Command], out_events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command.clone(), out_events);
        }

        let frame = frame.min(DEFAULT_FRAME_BUDGET);
        if let Some(cutscene) = self.cutscene.as_mut() {
            if cutscene.tick(frame) {
                self.cutscene = None;
                debug!(stage = self.stage, "rescue cutscene finished");
                world::apply(&mut self.world, Command::FinishRescue, out_events);
            }
        }

        for step in self.clock.substeps(frame) {
            let first_new = out_events.len();
            world::apply(&mut self.world, Command::Tick { dt: step }, out_events);
            let secured = out_events[first_new..]
                .iter()
                .any(|event| matches!(event, Event::ObjectiveSecured { .. }));
            if secured {
                debug!(stage = self.stage, "rescue cutscene started");
                self.cutscene = Some(Countdown::new(self.rescue_duration));
            }
        }
    }

    /// Banks the cleared stage and builds the next one from scratch.
    pub fn advance_stage(&mut self) -> Result<(), CampaignError> {
        match self.phase() {
            Phase::StageClear => {}
            Phase::AllClear => return Err(CampaignError::RunComplete),
            phase => {
                return Err(CampaignError::NotCleared {
                    stage: self.stage,
                    phase,
                })
            }
        }

        let next = self.stage.saturating_add(1);
        let world = stages::build(next, self.tuning.clone())?;
        self.banked_score = self.total_score();
        self.banked_collected = self.total_collected();
        info!(
            cleared = self.stage,
            next,
            score = self.banked_score,
            "advancing to next stage"
        );
        self.world = world;
        self.stage = next;
        self.cutscene = None;
        Ok(())
    }

    /// Rebuilds the current stage from scratch, discarding its progress.
    pub fn restart_stage(&mut self) -> Result<(), CampaignError> {
        if self.phase() == Phase::AllClear {
            return Err(CampaignError::RunComplete);
        }
        self.world = stages::build(self.stage, self.tuning.clone())?;
        self.cutscene = None;
        info!(stage = self.stage, "stage restarted");
        Ok(())
    }

    /// Settlement summary, available once the run has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<RunOutcome> {
        let cleared = match self.phase() {
            Phase::AllClear => true,
            Phase::GameOver => false,
            _ => return None,
        };
        Some(RunOutcome {
            score: self.total_score(),
            stage_reached: self.stage,
            collected: self.total_collected(),
            cleared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substeps_respect_max_step_and_budget() {
        let clock = FrameClock::new(Duration::from_millis(50), Duration::from_millis(250));
        assert_eq!(
            clock.substeps(Duration::from_millis(120)),
            vec![
                Duration::from_millis(50),
                Duration::from_millis(50),
                Duration::from_millis(20)
            ]
        );
        assert_eq!(clock.substeps(Duration::from_secs(3)).len(), 5);
        assert!(clock.substeps(Duration::ZERO).is_empty());
    }

    #[test]
    fn zero_step_clock_never_advances() {
        let clock = FrameClock::new(Duration::ZERO, Duration::from_millis(250));
        assert!(clock.substeps(Duration::from_millis(100)).is_empty());
    }

    #[test]
    fn advance_requires_a_cleared_stage() {
        let mut campaign = Campaign::new(Tuning::default()).expect("first stage builds");
        let error = campaign.advance_stage().expect_err("stage not cleared");
        assert!(matches!(
            error,
            CampaignError::NotCleared {
                stage: 1,
                phase: Phase::Ready
            }
        ));
        assert_eq!(campaign.outcome(), None);
    }
}
