//! Simulation constants that are not part of a stage definition.

use std::time::Duration;

/// Tunable simulation parameters shared by every stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    /// Time needed for the player to cross one tile.
    pub player_step: Duration,
    /// Health the player starts each stage with and can never exceed.
    pub max_hp: u32,
    /// Delay before the ability can be used again.
    pub ability_cooldown: Duration,
    /// Manhattan radius affected by the ability.
    pub ability_radius: u32,
    /// Maximum number of tiles an adversary is pushed by the ability.
    pub push_distance: u32,
    /// How long an adversary keeps chasing after spotting the player.
    pub chase_duration: Duration,
    /// Fraction of the stage adversary speed used while patrolling.
    pub patrol_speed_fraction: f32,
    /// Fraction of the stage adversary speed used while chasing.
    pub chase_speed_fraction: f32,
    /// Fraction of the stage adversary speed used while retreating.
    pub retreat_speed_fraction: f32,
    /// Length of the window in which hazard ground is walkable.
    pub hazard_safe: Duration,
    /// Length of the window in which hazard ground is impassable.
    pub hazard_active: Duration,
    /// Score awarded per collectible.
    pub collectible_bonus: u32,
    /// Score awarded on first activation of a checkpoint.
    pub checkpoint_bonus: u32,
    /// Exponential camera smoothing rate per second.
    pub camera_smoothing: f32,
    /// Width of the visible viewport in tiles.
    pub viewport_columns: f32,
    /// Height of the visible viewport in tiles.
    pub viewport_rows: f32,
    /// Largest delta a single tick may advance the simulation by.
    pub max_step: Duration,
    /// Lifetime of decorative particles.
    pub particle_lifetime: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_step: Duration::from_millis(150),
            max_hp: 3,
            ability_cooldown: Duration::from_secs(6),
            ability_radius: 2,
            push_distance: 3,
            chase_duration: Duration::from_secs(5),
            patrol_speed_fraction: 0.5,
            chase_speed_fraction: 1.0,
            retreat_speed_fraction: 0.75,
            hazard_safe: Duration::from_secs(3),
            hazard_active: Duration::from_secs(2),
            collectible_bonus: 50,
            checkpoint_bonus: 25,
            camera_smoothing: 6.0,
            viewport_columns: 11.0,
            viewport_rows: 9.0,
            max_step: Duration::from_millis(50),
            particle_lifetime: Duration::from_millis(600),
        }
    }
}
