use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use maze_rescue_world::Tuning;
use serde::Deserialize;

/// Optional overrides read from a tuning file. Missing keys keep the default.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TuningFile {
    player_step_ms: Option<u64>,
    max_hp: Option<u32>,
    ability_cooldown_ms: Option<u64>,
    ability_radius: Option<u32>,
    push_distance: Option<u32>,
    chase_duration_ms: Option<u64>,
    patrol_speed_fraction: Option<f32>,
    chase_speed_fraction: Option<f32>,
    retreat_speed_fraction: Option<f32>,
    hazard_safe_ms: Option<u64>,
    hazard_active_ms: Option<u64>,
    collectible_bonus: Option<u32>,
    checkpoint_bonus: Option<u32>,
    camera_smoothing: Option<f32>,
    viewport_columns: Option<f32>,
    viewport_rows: Option<f32>,
    max_step_ms: Option<u64>,
    particle_lifetime_ms: Option<u64>,
}

impl TuningFile {
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse tuning toml contents")
    }

    pub(crate) fn into_tuning(self) -> Result<Tuning> {
        let defaults = Tuning::default();
        let millis = |value: Option<u64>, fallback: Duration| {
            value.map_or(fallback, Duration::from_millis)
        };

        let tuning = Tuning {
            player_step: millis(self.player_step_ms, defaults.player_step),
            max_hp: self.max_hp.unwrap_or(defaults.max_hp),
            ability_cooldown: millis(self.ability_cooldown_ms, defaults.ability_cooldown),
            ability_radius: self.ability_radius.unwrap_or(defaults.ability_radius),
            push_distance: self.push_distance.unwrap_or(defaults.push_distance),
            chase_duration: millis(self.chase_duration_ms, defaults.chase_duration),
            patrol_speed_fraction: self
                .patrol_speed_fraction
                .unwrap_or(defaults.patrol_speed_fraction),
            chase_speed_fraction: self
                .chase_speed_fraction
                .unwrap_or(defaults.chase_speed_fraction),
            retreat_speed_fraction: self
                .retreat_speed_fraction
                .unwrap_or(defaults.retreat_speed_fraction),
            hazard_safe: millis(self.hazard_safe_ms, defaults.hazard_safe),
            hazard_active: millis(self.hazard_active_ms, defaults.hazard_active),
            collectible_bonus: self.collectible_bonus.unwrap_or(defaults.collectible_bonus),
            checkpoint_bonus: self.checkpoint_bonus.unwrap_or(defaults.checkpoint_bonus),
            camera_smoothing: self.camera_smoothing.unwrap_or(defaults.camera_smoothing),
            viewport_columns: self.viewport_columns.unwrap_or(defaults.viewport_columns),
            viewport_rows: self.viewport_rows.unwrap_or(defaults.viewport_rows),
            max_step: millis(self.max_step_ms, defaults.max_step),
            particle_lifetime: millis(self.particle_lifetime_ms, defaults.particle_lifetime),
        };

        ensure!(!tuning.max_step.is_zero(), "max_step_ms must be positive");
        ensure!(
            !tuning.player_step.is_zero(),
            "player_step_ms must be positive"
        );
        ensure!(tuning.max_hp > 0, "max_hp must be positive");
        for (name, fraction) in [
            ("patrol_speed_fraction", tuning.patrol_speed_fraction),
            ("chase_speed_fraction", tuning.chase_speed_fraction),
            ("retreat_speed_fraction", tuning.retreat_speed_fraction),
        ] {
            ensure!(
                fraction.is_finite() && fraction >= 0.0,
                "{name} must be a non-negative number, got {fraction}"
            );
        }
        Ok(tuning)
    }
}

/// Resolves the tuning used for the run, falling back to defaults when no
/// file is given.
pub(crate) fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    TuningFile::parse(&contents)
        .and_then(TuningFile::into_tuning)
        .with_context(|| format!("invalid tuning file {}", path.display()))
}
