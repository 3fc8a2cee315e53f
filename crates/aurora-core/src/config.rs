//! Configuration for bursts, emitters and the solar-wind environment.
//!
//! Every option has a documented default. Configs are validated once, when
//! an [`EmitterManager`](crate::EmitterManager) or [`AuroraLab`](crate::AuroraLab)
//! is built, and are never re-defaulted at the use site.

use crate::constants::*;
use crate::error::ConfigError;
use glam::Vec3;
use rand::Rng;

/// Spawn and motion rule shared by every particle of a burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EmissionStrategy {
    /// Particles start inside a cube of half-extent `spread` around the origin
    /// and travel toward the target, each direction tilted by up to
    /// `angular_jitter` (radians, approximately).
    Directed { spread: f32, angular_jitter: f32 },
    /// Particles start on a sphere shell of `radius` around the origin and move
    /// radially outward. The target is ignored.
    Radial { radius: f32 },
}

/// When a whole burst is retired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DespawnRule {
    /// Reference marker travelled farther than `|target - origin| * multiplier`.
    Travel { multiplier: f32 },
    /// Reference marker is farther than `max` from the origin.
    Distance { max: f32 },
    /// Every particle has been expired at once for longer than `grace` seconds.
    /// Particles are one-shot under this rule and are parked instead of respawned.
    Settle { grace: f32 },
}

/// Inclusive value range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.gen::<f32>() * (self.max - self.min)
    }

    fn validate(self, field: &'static str) -> Result<Self, ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFinite { field });
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(self)
    }
}

/// Everything needed to seed and advance one burst.
#[derive(Clone, Debug, PartialEq)]
pub struct BurstConfig {
    pub strategy: EmissionStrategy,
    /// Fixed number of particle slots. Default 1500 (wind) / 600 (flare).
    pub particle_count: usize,
    /// World units per second before speed scaling.
    pub base_speed: f32,
    /// Uniform +/- variation around `base_speed`.
    pub speed_variation: f32,
    /// Seconds before a particle is recycled.
    pub lifetime: f32,
    /// Uniform +/- variation around `lifetime`.
    pub lifetime_variation: f32,
    pub size: ValueRange,
    pub opacity: ValueRange,
    /// Colors are a random blend between these two endpoints.
    pub color_low: [f32; 3],
    pub color_high: [f32; 3],
    /// Amplitude of the per-step random drift, in world units per second.
    pub drift_jitter: f32,
    pub despawn: DespawnRule,
    /// Used when origin and target coincide. Default +Y.
    pub fallback_direction: Vec3,
}

impl BurstConfig {
    /// Solar wind: volumetric cube spawn streaming from the Sun toward Earth.
    pub fn wind() -> Self {
        Self {
            strategy: EmissionStrategy::Directed {
                spread: 1.5,
                angular_jitter: 0.12,
            },
            particle_count: 1500,
            base_speed: 9.0,
            speed_variation: 2.0,
            lifetime: 5.0,
            lifetime_variation: 1.0,
            size: ValueRange::new(0.08, 0.22),
            opacity: ValueRange::new(0.5, 1.0),
            color_low: [1.0, 0.85, 0.45],
            color_high: [1.0, 0.98, 0.85],
            drift_jitter: 0.35,
            despawn: DespawnRule::Travel { multiplier: 1.15 },
            fallback_direction: Vec3::Y,
        }
    }

    /// Coronal flare: spherical shell expanding from the Sun's surface.
    pub fn flare() -> Self {
        Self {
            strategy: EmissionStrategy::Radial { radius: SUN_RADIUS },
            particle_count: 600,
            base_speed: 3.0,
            speed_variation: 1.0,
            lifetime: 3.0,
            lifetime_variation: 0.8,
            size: ValueRange::new(0.12, 0.3),
            opacity: ValueRange::new(0.6, 1.0),
            color_low: [1.0, 0.45, 0.1],
            color_high: [1.0, 0.75, 0.3],
            drift_jitter: 0.2,
            despawn: DespawnRule::Distance { max: 16.0 },
            fallback_direction: Vec3::Y,
        }
    }

    /// Check every option and normalize the ones that have an obvious
    /// canonical form (absolute variations, unit fallback direction).
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::ZeroParticles);
        }
        finite("base_speed", self.base_speed)?;
        finite("speed_variation", self.speed_variation)?;
        finite("lifetime_variation", self.lifetime_variation)?;
        finite("drift_jitter", self.drift_jitter)?;
        positive("lifetime", self.lifetime)?;
        self.speed_variation = self.speed_variation.abs();
        self.lifetime_variation = self.lifetime_variation.abs();
        self.drift_jitter = self.drift_jitter.abs();
        self.size = self.size.validate("size")?;
        self.opacity = self.opacity.validate("opacity")?;

        self.strategy = match self.strategy {
            EmissionStrategy::Directed {
                spread,
                angular_jitter,
            } => {
                finite("spread", spread)?;
                finite("angular_jitter", angular_jitter)?;
                EmissionStrategy::Directed {
                    spread: spread.abs(),
                    angular_jitter: angular_jitter.abs(),
                }
            }
            EmissionStrategy::Radial { radius } => {
                finite("radius", radius)?;
                EmissionStrategy::Radial {
                    radius: radius.abs(),
                }
            }
        };
        match self.despawn {
            DespawnRule::Travel { multiplier } => positive("despawn.multiplier", multiplier)?,
            DespawnRule::Distance { max } => positive("despawn.max", max)?,
            DespawnRule::Settle { grace } => {
                finite("despawn.grace", grace)?;
                if grace < 0.0 {
                    return Err(ConfigError::NonPositive {
                        field: "despawn.grace",
                        value: grace,
                    });
                }
            }
        }
        self.fallback_direction = self.fallback_direction.try_normalize().unwrap_or(Vec3::Y);
        Ok(self)
    }
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self::wind()
    }
}

/// Emitter-level options: the two burst kinds and trigger timing.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterConfig {
    pub wind: BurstConfig,
    pub flare: BurstConfig,
    /// Default emission source (the Sun).
    pub source: Vec3,
    /// Default emission target (Earth).
    pub target: Vec3,
    /// Manual/click triggers inside this window of the last one are ignored.
    pub manual_debounce: f64,
    /// Delay before the next auto burst after any parameter edit.
    pub auto_soon_delay: f64,
    pub seed: u64,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            wind: BurstConfig::wind(),
            flare: BurstConfig::flare(),
            source: SUN_POSITION,
            target: EARTH_POSITION,
            manual_debounce: MANUAL_DEBOUNCE_SEC,
            auto_soon_delay: AUTO_FIRE_SOON_DELAY,
            seed: DEFAULT_SEED,
        }
    }
}

impl EmitterConfig {
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.wind = self.wind.validate()?;
        self.flare = self.flare.validate()?;
        if !self.source.is_finite() {
            return Err(ConfigError::NonFinite { field: "source" });
        }
        if !self.target.is_finite() {
            return Err(ConfigError::NonFinite { field: "target" });
        }
        finite("manual_debounce", self.manual_debounce as f32)?;
        finite("auto_soon_delay", self.auto_soon_delay as f32)?;
        self.manual_debounce = self.manual_debounce.max(0.0);
        self.auto_soon_delay = self.auto_soon_delay.max(0.0);
        Ok(self)
    }
}

/// Solar-wind inputs pushed by the settings panel. Read-only to the core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentParameters {
    /// Bulk wind speed in km/s. Default 400.
    pub wind_speed: f32,
    /// Proton density in particles/cm^3. Default 5.
    pub density: f32,
    /// North-south IMF component in nT; negative is southward. Default 0.
    pub bz: f32,
    /// Seconds between automatic bursts; `<= 0` disables them. Default 4.
    pub auto_interval: f32,
    /// Values come from a live feed rather than the sliders. Default false.
    pub real_data_mode: bool,
}

impl Default for EnvironmentParameters {
    fn default() -> Self {
        Self {
            wind_speed: REFERENCE_WIND_SPEED,
            density: 5.0,
            bz: 0.0,
            auto_interval: 4.0,
            real_data_mode: false,
        }
    }
}

impl EnvironmentParameters {
    /// Copy with non-finite values replaced by defaults and speed, density
    /// and Bz clamped to physical ranges, so downstream math never sees NaN,
    /// an infinite pressure or a zero one.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let pick = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            wind_speed: pick(self.wind_speed, d.wind_speed).clamp(MIN_WIND_SPEED, MAX_WIND_SPEED),
            density: pick(self.density, d.density).clamp(MIN_DENSITY, MAX_DENSITY),
            bz: pick(self.bz, d.bz).clamp(-MAX_ABS_BZ, MAX_ABS_BZ),
            auto_interval: pick(self.auto_interval, d.auto_interval),
            real_data_mode: self.real_data_mode,
        }
    }

    /// Particle speed multiplier implied by the wind speed.
    #[inline]
    pub fn speed_scale(&self) -> f32 {
        self.sanitized().wind_speed / REFERENCE_WIND_SPEED
    }

    /// Auto-emission interval, or `None` when disabled.
    #[inline]
    pub fn auto_interval(&self) -> Option<f64> {
        let s = self.sanitized();
        (s.auto_interval > 0.0).then_some(s.auto_interval as f64)
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
