//! Short-lived decorative particles spawned by gameplay moments.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Visual flavour of a particle burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Collectible pickup.
    Sparkle,
    /// Checkpoint activation.
    Heal,
    /// Ability shockwave.
    Shockwave,
    /// Player knocked back after being caught.
    Dust,
}

/// Single particle positioned in tile units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Flavour used to pick colours and sprites.
    pub kind: ParticleKind,
    /// Current position in tile units.
    pub position: Vec2,
    /// Velocity in tiles per second.
    pub velocity: Vec2,
    /// Time since the particle was spawned.
    pub age: Duration,
    /// Total lifetime of the particle.
    pub lifetime: Duration,
}

impl Particle {
    /// Remaining life as a fraction in `[0, 1]`.
    #[must_use]
    pub fn fade(&self) -> f32 {
        if self.lifetime.is_zero() {
            return 0.0;
        }
        (1.0 - self.age.as_secs_f32() / self.lifetime.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Deterministically seeded particle pool.
#[derive(Clone, Debug)]
pub(crate) struct ParticleField {
    rng: ChaCha8Rng,
    lifetime: Duration,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub(crate) fn new(seed: u64, lifetime: Duration) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            lifetime,
            particles: Vec::new(),
        }
    }

    /// Emits `count` particles radiating from `origin`.
    pub(crate) fn burst(&mut self, kind: ParticleKind, origin: Vec2, count: usize) {
        if self.lifetime.is_zero() {
            return;
        }
        let (min_speed, max_speed) = match kind {
            ParticleKind::Sparkle => (1.0, 2.5),
            ParticleKind::Heal => (0.5, 1.5),
            ParticleKind::Shockwave => (3.0, 5.0),
            ParticleKind::Dust => (0.5, 1.0),
        };
        for _ in 0..count {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.gen_range(min_speed..max_speed);
            self.particles.push(Particle {
                kind,
                position: origin,
                velocity: Vec2::from_angle(angle) * speed,
                age: Duration::ZERO,
                lifetime: self.lifetime,
            });
        }
    }

    /// Moves and ages every particle, dropping expired ones.
    pub(crate) fn advance(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();
        for particle in &mut self.particles {
            particle.position += particle.velocity * seconds;
            particle.age = particle.age.saturating_add(dt);
        }
        self.particles
            .retain(|particle| particle.age < particle.lifetime);
    }

    pub(crate) fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
