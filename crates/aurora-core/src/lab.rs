//! The one simulation instance behind a page.

use crate::camera::{ArrivalCallback, ViewController, ViewName};
use crate::clock::SimClock;
use crate::config::{EmitterConfig, EnvironmentParameters};
use crate::emitter::EmitterManager;
use crate::error::ConfigError;
use crate::field::FieldModel;
use crate::particles::BurstId;
use crate::scene::SceneHost;
use std::fmt::Write as _;

/// Owns clock, camera, emitter, field model and the current environment.
///
/// Built once at startup. Tests build as many as they like.
pub struct AuroraLab {
    pub clock: SimClock,
    pub camera: ViewController,
    pub emitter: EmitterManager,
    pub field: FieldModel,
    environment: EnvironmentParameters,
}

impl AuroraLab {
    pub fn new(config: EmitterConfig) -> Result<Self, ConfigError> {
        let mut emitter = EmitterManager::new(config)?;
        let environment = EnvironmentParameters::default();
        emitter.set_global_speed_scale(environment.speed_scale());
        Ok(Self {
            clock: SimClock::new(),
            camera: ViewController::new(ViewName::Space),
            emitter,
            field: FieldModel::new(),
            environment,
        })
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn environment(&self) -> EnvironmentParameters {
        self.environment
    }

    /// Accept a new parameter set from the settings panel or data feed.
    ///
    /// Live bursts pick up the new wind speed immediately and the next auto
    /// burst is pulled in to "soon".
    pub fn set_environment(&mut self, params: EnvironmentParameters) {
        log::info!(
            "[lab] environment speed={:.0} density={:.1} bz={:.1} interval={:.1} real={}",
            params.wind_speed,
            params.density,
            params.bz,
            params.auto_interval,
            params.real_data_mode
        );
        self.environment = params;
        self.emitter.set_global_speed_scale(params.speed_scale());
        self.emitter.on_parameters_changed(self.clock.now());
    }

    pub fn manual_trigger<H: SceneHost + ?Sized>(&mut self, scene: &mut H) -> Option<BurstId> {
        let now = self.clock.now();
        self.emitter.manual_trigger(now, scene)
    }

    pub fn click_trigger<H: SceneHost + ?Sized>(&mut self, scene: &mut H) -> Option<BurstId> {
        let now = self.clock.now();
        self.emitter.click_trigger(now, scene)
    }

    pub fn flare<H: SceneHost + ?Sized>(&mut self, scene: &mut H) -> BurstId {
        let now = self.clock.now();
        self.emitter.flare(now, scene)
    }

    pub fn clear_all<H: SceneHost + ?Sized>(&mut self, scene: &mut H) {
        self.emitter.clear_all(scene);
    }

    pub fn set_view(&mut self, view: ViewName, on_arrive: Option<ArrivalCallback>) {
        self.camera.transition_to(view, on_arrive);
    }

    /// Multi-line state summary for the debug console.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        let env = self.environment;
        let field = self.field.visuals();
        let pose = self.camera.pose();
        _ = writeln!(
            out,
            "t={:.2}s frames={}",
            self.clock.now(),
            self.clock.frames()
        );
        _ = writeln!(out, "emitter: {}", self.emitter.stats());
        for b in self.emitter.bursts() {
            _ = writeln!(
                out,
                "  {:?} {:?} n={} age={:.2}s ref={:.2} active={}",
                b.id(),
                b.kind(),
                b.particle_count(),
                b.age(),
                b.reference_distance(),
                b.is_active()
            );
        }
        _ = writeln!(
            out,
            "env: speed={:.0}km/s density={:.1}/cc bz={:.1}nT interval={:.1}s real={}",
            env.wind_speed, env.density, env.bz, env.auto_interval, env.real_data_mode
        );
        _ = writeln!(
            out,
            "field: standoff={:.2}Re aurora={:.2} oval={:.1}deg shield={:.2}",
            field.standoff_re,
            field.aurora_intensity,
            field.oval_colatitude_deg,
            field.shield_intensity
        );
        let view = match (self.camera.current_view(), self.camera.target_view()) {
            (Some(v), _) => v.to_string(),
            (None, Some(to)) => format!("-> {to}"),
            (None, None) => "?".to_string(),
        };
        _ = write!(
            out,
            "camera: {view} eye=({:.1},{:.1},{:.1}) fov={:.0}",
            pose.eye.x, pose.eye.y, pose.eye.z, pose.fovy_degrees
        );
        out
    }
}
