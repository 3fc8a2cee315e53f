//! Fixed-capacity particle pool for a single burst.
//!
//! A burst stores its particles as parallel arrays that never change length.
//! Expired particles are respawned in place (or parked, under
//! [`DespawnRule::Settle`]); nothing is allocated after [`ParticleBurst::spawn`].

use crate::config::{BurstConfig, DespawnRule, EmissionStrategy};
use crate::constants::{
    DEGENERATE_TRAVEL_DISTANCE, LIFETIME_EPSILON, MAX_FRAME_DT, MAX_SPEED_SCALE,
    MIN_PARTICLE_LIFETIME,
};
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;

/// Creation-ordered burst handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BurstId(pub u64);

/// Which emitter slot produced a burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmissionKind {
    /// Directed solar wind stream.
    Wind,
    /// Radial flare shell.
    Flare,
}

pub struct ParticleBurst {
    id: BurstId,
    origin: Vec3,
    target: Vec3,
    direction: Vec3,
    config: BurstConfig,
    rng: StdRng,

    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    elapsed: Vec<f32>,
    lifetimes: Vec<f32>,
    sizes: Vec<f32>,
    colors: Vec<[f32; 3]>,
    opacities: Vec<f32>,

    created_at: f64,
    age: f32,
    active: bool,
    speed_scale: f32,
    // reference marker: never respawned, drives Travel/Distance despawn
    marker_start: f32,
    travelled: f32,
}

impl ParticleBurst {
    /// Seed a burst of `config.particle_count` particles.
    ///
    /// `config` is expected to have passed [`BurstConfig::validate`]. A zero
    /// length origin-to-target path falls back to `config.fallback_direction`.
    pub fn spawn(
        id: BurstId,
        origin: Vec3,
        target: Vec3,
        config: &BurstConfig,
        created_at: f64,
        seed: u64,
    ) -> Self {
        let n = config.particle_count;
        let fallback = config.fallback_direction.try_normalize().unwrap_or(Vec3::Y);
        let direction = (target - origin).try_normalize().unwrap_or(fallback);
        let marker_start = match config.strategy {
            EmissionStrategy::Directed { .. } => 0.0,
            EmissionStrategy::Radial { radius } => radius,
        };
        let mut burst = Self {
            id,
            origin,
            target,
            direction,
            config: config.clone(),
            rng: StdRng::seed_from_u64(seed),
            positions: vec![origin; n],
            velocities: vec![Vec3::ZERO; n],
            elapsed: vec![0.0; n],
            lifetimes: vec![config.lifetime; n],
            sizes: vec![0.0; n],
            colors: vec![[0.0; 3]; n],
            opacities: vec![0.0; n],
            created_at,
            age: 0.0,
            active: true,
            speed_scale: 1.0,
            marker_start,
            travelled: 0.0,
        };
        for i in 0..n {
            burst.seed_particle(i);
        }
        burst
    }

    /// Integrate every particle by `dt` seconds.
    ///
    /// A particle whose elapsed time reaches its lifetime is respawned at the
    /// origin in this same call. Velocities are constant between respawns.
    /// `dt` is clamped to `0..=MAX_FRAME_DT`; non-finite values count as 0.
    pub fn advance(&mut self, dt: f32) {
        debug_assert!(self.arrays_consistent(), "particle arrays out of sync");
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        let settle = matches!(self.config.despawn, DespawnRule::Settle { .. });
        let step_scale = self.speed_scale * dt;
        let drift_amp = self.config.drift_jitter * dt;

        for i in 0..self.positions.len() {
            self.elapsed[i] += dt;
            if self.elapsed[i] + LIFETIME_EPSILON >= self.lifetimes[i] {
                if settle {
                    self.opacities[i] = 0.0;
                } else {
                    self.seed_particle(i);
                }
                continue;
            }
            let mut step = self.velocities[i] * step_scale;
            if drift_amp > 0.0 {
                step += signed_vec3(&mut self.rng) * drift_amp;
            }
            self.positions[i] += step;
        }

        self.travelled += self.config.base_speed * step_scale;
        self.age += dt;
    }

    /// Whether the whole burst has run its course.
    pub fn should_despawn(&self) -> bool {
        match self.config.despawn {
            DespawnRule::Travel { multiplier } => {
                let path = self.origin.distance(self.target);
                let limit = if path > f32::EPSILON {
                    path * multiplier
                } else {
                    DEGENERATE_TRAVEL_DISTANCE
                };
                self.travelled > limit
            }
            DespawnRule::Distance { max } => self.reference_distance() > max,
            DespawnRule::Settle { grace } => {
                self.elapsed
                    .iter()
                    .zip(&self.lifetimes)
                    .map(|(e, l)| e - l)
                    .fold(f32::INFINITY, f32::min)
                    > grace
            }
        }
    }

    fn seed_particle(&mut self, i: usize) {
        let cfg = &self.config;
        let rng = &mut self.rng;
        let (position, heading) = match cfg.strategy {
            EmissionStrategy::Directed {
                spread,
                angular_jitter,
            } => {
                let offset = signed_vec3(rng) * spread;
                let tilt = signed_vec3(rng) * angular_jitter;
                let heading = (self.direction + tilt)
                    .try_normalize()
                    .unwrap_or(self.direction);
                (self.origin + offset, heading)
            }
            EmissionStrategy::Radial { radius } => {
                let normal = random_unit_vector(rng);
                (self.origin + normal * radius, normal)
            }
        };
        let speed = (cfg.base_speed + signed(rng) * cfg.speed_variation).max(0.0);
        let lifetime =
            (cfg.lifetime + signed(rng) * cfg.lifetime_variation).max(MIN_PARTICLE_LIFETIME);
        let t = rng.gen::<f32>();
        let color = [
            lerp(cfg.color_low[0], cfg.color_high[0], t),
            lerp(cfg.color_low[1], cfg.color_high[1], t),
            lerp(cfg.color_low[2], cfg.color_high[2], t),
        ];
        let size = cfg.size.sample(rng);
        let opacity = cfg.opacity.sample(rng);

        self.positions[i] = position;
        self.velocities[i] = heading * speed;
        self.elapsed[i] = 0.0;
        self.lifetimes[i] = lifetime;
        self.sizes[i] = size;
        self.colors[i] = color;
        self.opacities[i] = opacity;
    }

    pub fn id(&self) -> BurstId {
        self.id
    }

    pub fn kind(&self) -> EmissionKind {
        match self.config.strategy {
            EmissionStrategy::Directed { .. } => EmissionKind::Wind,
            EmissionStrategy::Radial { .. } => EmissionKind::Flare,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Unit base direction; never NaN.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn config(&self) -> &BurstConfig {
        &self.config
    }

    pub fn particle_count(&self) -> usize {
        self.config.particle_count
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Unscaled velocities; the effective velocity is `velocity * speed_scale`.
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn elapsed(&self) -> &[f32] {
        &self.elapsed
    }

    pub fn lifetimes(&self) -> &[f32] {
        &self.lifetimes
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    pub fn created_at(&self) -> f64 {
        self.created_at
    }

    /// Seconds advanced since spawn.
    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn speed_scale(&self) -> f32 {
        self.speed_scale
    }

    /// Applies from the next `advance` on, including to particles in flight.
    pub fn set_speed_scale(&mut self, scale: f32) {
        if scale.is_finite() {
            self.speed_scale = scale.clamp(0.0, MAX_SPEED_SCALE);
        }
    }

    /// Distance of the reference marker from the origin.
    pub fn reference_distance(&self) -> f32 {
        self.marker_start + self.travelled
    }

    /// Distance the reference marker has moved since spawn.
    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    /// All per-particle arrays have exactly `particle_count` slots.
    pub fn arrays_consistent(&self) -> bool {
        let n = self.config.particle_count;
        self.positions.len() == n
            && self.velocities.len() == n
            && self.elapsed.len() == n
            && self.lifetimes.len() == n
            && self.sizes.len() == n
            && self.colors.len() == n
            && self.opacities.len() == n
    }
}

#[inline]
fn signed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>() * 2.0 - 1.0
}

#[inline]
fn signed_vec3<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(signed(rng), signed(rng), signed(rng))
}

/// Uniform direction on the unit sphere (Archimedes' hat-box method).
fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let z = signed(rng);
    let phi = rng.gen::<f32>() * TAU;
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_vectors_are_unit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4, "not unit: {v:?}");
        }
    }

    #[test]
    fn signed_stays_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let s = signed(&mut rng);
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn radial_marker_starts_on_shell() {
        let cfg = BurstConfig::flare();
        let burst = ParticleBurst::spawn(BurstId(0), Vec3::ZERO, Vec3::X, &cfg, 0.0, 3);
        assert_eq!(burst.reference_distance(), crate::constants::SUN_RADIUS);
        assert_eq!(burst.travelled(), 0.0);
    }
}
