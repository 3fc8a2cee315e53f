//! Magnetosphere shield and aurora glow driven by solar-wind parameters.
//!
//! [`field_targets`] is a pure mapping from parameters and time to the
//! visuals the shaders should converge on. [`FieldModel`] eases toward those
//! targets every tick so slider edits and feed updates don't snap.

use crate::config::EnvironmentParameters;
use crate::constants::*;

/// Shader-facing description of the shield and aurora for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldVisuals {
    /// Magnetopause standoff distance in Earth radii.
    pub standoff_re: f32,
    /// Standoff distance in world units.
    pub shield_radius: f32,
    /// Tail flaring exponent.
    pub flaring: f32,
    /// Quiet-time standoff divided by the current one; > 1 when squeezed.
    pub compression: f32,
    pub shield_intensity: f32,
    /// 0 (faint) ..= 1 (storm).
    pub aurora_intensity: f32,
    /// Equatorward edge of the auroral oval, degrees from the pole.
    pub oval_colatitude_deg: f32,
    /// Share of red (high-altitude oxygen) emission mixed into the green.
    pub aurora_red_fraction: f32,
    /// Signed brightness wobble, already scaled by intensity.
    pub shimmer: f32,
    pub live_data: bool,
}

/// Dynamic pressure in nPa for density (cm^-3) and speed (km/s).
#[inline]
pub fn dynamic_pressure(density: f32, speed: f32) -> f32 {
    PROTON_PRESSURE_COEFF * density * speed * speed
}

/// Magnetopause standoff (Shue et al. 1998) in Earth radii.
pub fn standoff_distance(pressure: f32, bz: f32) -> f32 {
    let r0 = (10.22 + 1.29 * (0.184 * (bz + 8.14)).tanh()) * pressure.powf(-1.0 / 6.6);
    r0.clamp(MIN_STANDOFF_RE, MAX_STANDOFF_RE)
}

/// Target visuals for the given parameters at simulation time `time`.
pub fn field_targets(params: &EnvironmentParameters, time: f64) -> FieldVisuals {
    let p = params.sanitized();
    let pressure = dynamic_pressure(p.density, p.wind_speed);
    let standoff_re = standoff_distance(pressure, p.bz);
    let flaring =
        ((0.58 - 0.007 * p.bz) * (1.0 + 0.024 * pressure.ln())).clamp(MIN_FLARING, MAX_FLARING);
    let compression = QUIET_STANDOFF_RE / standoff_re;
    let shield_intensity = (0.5 * compression.powi(3)).clamp(0.1, 1.0);

    let southward = (-p.bz).max(0.0);
    let coupling = (p.wind_speed / REFERENCE_WIND_SPEED).powf(4.0 / 3.0)
        * (southward / 5.0).powf(2.0 / 3.0);
    let aurora_intensity = (AURORA_BASE_INTENSITY
        + AURORA_COUPLING_GAIN * coupling
        + AURORA_DENSITY_GAIN * p.density)
        .clamp(0.0, 1.0);
    let oval_colatitude_deg =
        AURORA_OVAL_COLAT_QUIET_DEG + AURORA_OVAL_COLAT_SPAN_DEG * aurora_intensity;
    let aurora_red_fraction = ((aurora_intensity - 0.6) / 0.4).clamp(0.0, 1.0);
    let shimmer = AURORA_SHIMMER_AMPLITUDE
        * aurora_intensity
        * ((time as f32) * AURORA_SHIMMER_RATE).sin();

    FieldVisuals {
        standoff_re,
        shield_radius: standoff_re * SHIELD_SCENE_SCALE,
        flaring,
        compression,
        shield_intensity,
        aurora_intensity,
        oval_colatitude_deg,
        aurora_red_fraction,
        shimmer,
        live_data: p.real_data_mode,
    }
}

/// Eased field state. The first update snaps straight to the targets.
#[derive(Clone, Debug, Default)]
pub struct FieldModel {
    current: FieldVisuals,
    initialized: bool,
}

impl FieldModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute targets from `params` and move `dt` seconds toward them.
    pub fn update(&mut self, params: &EnvironmentParameters, time: f64, dt: f32) -> FieldVisuals {
        let target = field_targets(params, time);
        if !self.initialized && target_is_finite(&target) {
            self.current = target;
            self.initialized = true;
            return self.current;
        }
        let tau = if target.live_data {
            FIELD_EASE_TAU_REAL_DATA_SEC
        } else {
            FIELD_EASE_TAU_SEC
        };
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let alpha = 1.0 - (-dt / tau).exp();
        let c = &mut self.current;
        ease(&mut c.standoff_re, target.standoff_re, alpha);
        ease(&mut c.shield_radius, target.shield_radius, alpha);
        ease(&mut c.flaring, target.flaring, alpha);
        ease(&mut c.compression, target.compression, alpha);
        ease(&mut c.shield_intensity, target.shield_intensity, alpha);
        ease(&mut c.aurora_intensity, target.aurora_intensity, alpha);
        ease(&mut c.oval_colatitude_deg, target.oval_colatitude_deg, alpha);
        ease(&mut c.aurora_red_fraction, target.aurora_red_fraction, alpha);
        if target.shimmer.is_finite() {
            c.shimmer = target.shimmer;
        }
        c.live_data = target.live_data;
        self.current
    }

    pub fn visuals(&self) -> FieldVisuals {
        self.current
    }
}

fn target_is_finite(v: &FieldVisuals) -> bool {
    [
        v.standoff_re,
        v.shield_radius,
        v.flaring,
        v.compression,
        v.shield_intensity,
        v.aurora_intensity,
        v.oval_colatitude_deg,
        v.aurora_red_fraction,
        v.shimmer,
    ]
    .iter()
    .all(|x| x.is_finite())
}

/// Non-finite targets are skipped so the eased state never picks up NaN.
#[inline]
fn ease(value: &mut f32, target: f32, alpha: f32) {
    if !target.is_finite() {
        return;
    }
    if !value.is_finite() {
        *value = target;
        return;
    }
    *value += (target - *value) * alpha;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wind_gives_quiet_standoff() {
        let p = dynamic_pressure(5.0, 400.0);
        let r = standoff_distance(p, 0.0);
        assert!((r - QUIET_STANDOFF_RE).abs() < 0.5, "standoff {r}");
    }

    #[test]
    fn zero_dt_does_not_move() {
        let mut m = FieldModel::new();
        let quiet = EnvironmentParameters::default();
        let first = m.update(&quiet, 0.0, 0.016);
        let storm = EnvironmentParameters {
            bz: -15.0,
            ..quiet
        };
        let second = m.update(&storm, 0.0, 0.0);
        assert_eq!(first.aurora_intensity, second.aurora_intensity);
    }
}
