//! Ownership and lifecycle of every live particle burst.

use crate::config::{BurstConfig, EmitterConfig};
use crate::constants::MAX_SPEED_SCALE;
use crate::error::ConfigError;
use crate::particles::{BurstId, EmissionKind, ParticleBurst};
use crate::scene::SceneHost;
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;
use std::fmt;

/// What one [`EmitterManager::tick`] did.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    /// Bursts integrated this tick.
    pub advanced: usize,
    /// Bursts that met their despawn rule this tick; removed on the next one.
    pub retired: usize,
    /// Bursts detached and dropped this tick.
    pub removed: SmallVec<[BurstId; 4]>,
}

/// Snapshot for the debug console.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterStats {
    pub live_bursts: usize,
    pub inactive_bursts: usize,
    pub particles: usize,
    pub speed_scale: f32,
    pub next_auto_fire: Option<f64>,
}

impl fmt::Display for EmitterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bursts={} (inactive {}) particles={} speed_scale={:.2}",
            self.live_bursts, self.inactive_bursts, self.particles, self.speed_scale
        )?;
        match self.next_auto_fire {
            Some(t) => write!(f, " next_auto={t:.2}s"),
            None => write!(f, " next_auto=off"),
        }
    }
}

pub struct EmitterManager {
    config: EmitterConfig,
    bursts: Vec<ParticleBurst>,
    rng: StdRng,
    next_id: u64,
    speed_scale: f32,
    next_auto_fire: Option<f64>,
    last_manual: Option<f64>,
}

impl EmitterManager {
    pub fn new(config: EmitterConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            bursts: Vec::new(),
            rng,
            next_id: 0,
            speed_scale: 1.0,
            next_auto_fire: None,
            last_manual: None,
        })
    }

    /// Spawn one wind burst from `origin` toward `target`.
    ///
    /// Manual, timed and click triggers all end up here.
    pub fn trigger<H: SceneHost + ?Sized>(
        &mut self,
        origin: Vec3,
        target: Vec3,
        speed_scale: f32,
        now: f64,
        scene: &mut H,
    ) -> BurstId {
        self.trigger_kind(EmissionKind::Wind, origin, target, speed_scale, now, scene)
    }

    pub fn trigger_kind<H: SceneHost + ?Sized>(
        &mut self,
        kind: EmissionKind,
        origin: Vec3,
        target: Vec3,
        speed_scale: f32,
        now: f64,
        scene: &mut H,
    ) -> BurstId {
        let id = BurstId(self.next_id);
        self.next_id += 1;
        let seed = self.rng.gen::<u64>();
        let config: &BurstConfig = match kind {
            EmissionKind::Wind => &self.config.wind,
            EmissionKind::Flare => &self.config.flare,
        };
        let mut burst = ParticleBurst::spawn(id, origin, target, config, now, seed);
        burst.set_speed_scale(speed_scale);
        scene.attach_burst(&burst);
        log::debug!(
            "[emitter] spawn {:?} {:?} particles={} t={:.2}",
            id,
            kind,
            burst.particle_count(),
            now
        );
        self.bursts.push(burst);
        id
    }

    /// Debounced wind burst from the configured source toward the target.
    pub fn manual_trigger<H: SceneHost + ?Sized>(
        &mut self,
        now: f64,
        scene: &mut H,
    ) -> Option<BurstId> {
        if let Some(last) = self.last_manual {
            if now - last < self.config.manual_debounce {
                log::debug!("[emitter] manual trigger debounced at t={now:.2}");
                return None;
            }
        }
        self.last_manual = Some(now);
        let (source, target) = (self.config.source, self.config.target);
        Some(self.trigger(source, target, self.speed_scale, now, scene))
    }

    /// The emission source was clicked. Shares the manual debounce window.
    pub fn click_trigger<H: SceneHost + ?Sized>(
        &mut self,
        now: f64,
        scene: &mut H,
    ) -> Option<BurstId> {
        self.manual_trigger(now, scene)
    }

    /// Radial flare shell from the source.
    pub fn flare<H: SceneHost + ?Sized>(&mut self, now: f64, scene: &mut H) -> BurstId {
        let (source, target) = (self.config.source, self.config.target);
        self.trigger_kind(
            EmissionKind::Flare,
            source,
            target,
            self.speed_scale,
            now,
            scene,
        )
    }

    /// Advance live bursts and prune finished ones.
    ///
    /// A burst that meets its despawn rule is marked inactive here and
    /// detached on the following tick.
    pub fn tick<H: SceneHost + ?Sized>(&mut self, dt: f32, scene: &mut H) -> TickReport {
        let mut report = TickReport::default();
        self.bursts.retain_mut(|burst| {
            if !burst.is_active() {
                scene.detach_burst(burst.id());
                report.removed.push(burst.id());
                return false;
            }
            burst.advance(dt);
            report.advanced += 1;
            if burst.should_despawn() {
                burst.deactivate();
                report.retired += 1;
            }
            true
        });
        for id in &report.removed {
            log::debug!("[emitter] despawn {:?}", id);
        }
        report
    }

    /// Rescale every live burst and every later auto/manual burst.
    pub fn set_global_speed_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            return;
        }
        self.speed_scale = scale.clamp(0.0, MAX_SPEED_SCALE);
        for burst in &mut self.bursts {
            burst.set_speed_scale(self.speed_scale);
        }
    }

    /// Drop every burst now, skipping the despawn grace tick.
    pub fn clear_all<H: SceneHost + ?Sized>(&mut self, scene: &mut H) {
        let n = self.bursts.len();
        for burst in self.bursts.drain(..) {
            scene.detach_burst(burst.id());
        }
        log::info!("[emitter] cleared {n} bursts");
    }

    /// Mark a burst finished; it is removed on the next tick.
    pub fn retire(&mut self, id: BurstId) -> bool {
        match self.bursts.iter_mut().find(|b| b.id() == id) {
            Some(burst) => {
                burst.deactivate();
                true
            }
            None => false,
        }
    }

    /// Any parameter edit pulls the next auto burst in to "soon".
    pub fn on_parameters_changed(&mut self, now: f64) {
        self.next_auto_fire = Some(now + self.config.auto_soon_delay);
    }

    /// Fire the auto trigger if it is due. `interval` of `None` disables it.
    pub fn poll_auto_trigger<H: SceneHost + ?Sized>(
        &mut self,
        now: f64,
        interval: Option<f64>,
        scene: &mut H,
    ) -> Option<BurstId> {
        let Some(interval) = interval else {
            self.next_auto_fire = None;
            return None;
        };
        let due = *self.next_auto_fire.get_or_insert(now + interval);
        if now < due {
            return None;
        }
        self.next_auto_fire = Some(now + interval);
        let (source, target) = (self.config.source, self.config.target);
        Some(self.trigger(source, target, self.speed_scale, now, scene))
    }

    pub fn bursts(&self) -> &[ParticleBurst] {
        &self.bursts
    }

    pub fn get(&self, id: BurstId) -> Option<&ParticleBurst> {
        self.bursts.iter().find(|b| b.id() == id)
    }

    pub fn len(&self) -> usize {
        self.bursts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }

    pub fn speed_scale(&self) -> f32 {
        self.speed_scale
    }

    pub fn next_auto_fire(&self) -> Option<f64> {
        self.next_auto_fire
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn stats(&self) -> EmitterStats {
        let inactive_bursts = self.bursts.iter().filter(|b| !b.is_active()).count();
        EmitterStats {
            live_bursts: self.bursts.len(),
            inactive_bursts,
            particles: self.bursts.iter().map(|b| b.particle_count()).sum(),
            speed_scale: self.speed_scale,
            next_auto_fire: self.next_auto_fire,
        }
    }
}
