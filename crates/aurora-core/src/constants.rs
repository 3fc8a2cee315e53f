use glam::Vec3;

// Shared tuning constants for the simulation core and both frontends.

// Scene layout (world units; Earth radius is 1.0)
pub const EARTH_POSITION: Vec3 = Vec3::ZERO;
pub const EARTH_RADIUS: f32 = 1.0;
pub const SUN_POSITION: Vec3 = Vec3::new(-40.0, 0.0, 0.0);
pub const SUN_RADIUS: f32 = 4.0;
pub const SUN_PICK_RADIUS: f32 = 4.5; // ray-sphere radius for click picking

// Frame pacing
pub const MAX_FRAME_DT: f32 = 0.25; // clamp for resumed/backgrounded tabs
pub const MAX_SPEED_SCALE: f32 = 50.0;

// Particle lifetimes
pub const LIFETIME_EPSILON: f32 = 1e-4; // tolerance when elapsed reaches the ceiling
pub const MIN_PARTICLE_LIFETIME: f32 = 0.05;
pub const DEGENERATE_TRAVEL_DISTANCE: f32 = 10.0; // despawn distance when origin == target

// Emitter triggers
pub const AUTO_FIRE_SOON_DELAY: f64 = 0.35; // next auto burst after a parameter edit
pub const MANUAL_DEBOUNCE_SEC: f64 = 0.5;
pub const DEFAULT_SEED: u64 = 0x5EED_A0A0;

// Solar wind reference values
pub const REFERENCE_WIND_SPEED: f32 = 400.0; // km/s, maps to speed scale 1.0
pub const MIN_WIND_SPEED: f32 = 50.0;
pub const MAX_WIND_SPEED: f32 = 3000.0;
pub const MIN_DENSITY: f32 = 0.1;
pub const MAX_DENSITY: f32 = 200.0; // cm^-3
pub const MAX_ABS_BZ: f32 = 100.0; // nT
pub const PROTON_PRESSURE_COEFF: f32 = 1.6726e-6; // nPa per (cm^-3 * (km/s)^2)

// Magnetosphere shield
pub const QUIET_STANDOFF_RE: f32 = 10.8;
pub const MIN_STANDOFF_RE: f32 = 3.0;
pub const MAX_STANDOFF_RE: f32 = 20.0;
pub const SHIELD_SCENE_SCALE: f32 = 0.5; // world units per Earth radius of standoff
pub const MIN_FLARING: f32 = 0.3; // tail flaring exponent range accepted by the shield shader
pub const MAX_FLARING: f32 = 1.5;

// Aurora
pub const AURORA_BASE_INTENSITY: f32 = 0.12;
pub const AURORA_COUPLING_GAIN: f32 = 0.55;
pub const AURORA_DENSITY_GAIN: f32 = 0.02;
pub const AURORA_OVAL_COLAT_QUIET_DEG: f32 = 18.0;
pub const AURORA_OVAL_COLAT_SPAN_DEG: f32 = 14.0;
pub const AURORA_SHIMMER_AMPLITUDE: f32 = 0.06;
pub const AURORA_SHIMMER_RATE: f32 = 1.7; // rad/s

// Field easing time constants (seconds)
pub const FIELD_EASE_TAU_SEC: f32 = 0.6;
pub const FIELD_EASE_TAU_REAL_DATA_SEC: f32 = 1.5;

// Camera
pub const TRANSITION_DURATION_SEC: f32 = 2.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 500.0;

#[inline]
pub fn sun_to_earth_distance() -> f32 {
    SUN_POSITION.distance(EARTH_POSITION)
}
