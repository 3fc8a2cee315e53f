// Web front-end tuning constants

// DOM
pub const CANVAS_ID: &str = "app-canvas";

// Background clear color (deep space)
pub const CLEAR_R: f64 = 0.005;
pub const CLEAR_G: f64 = 0.007;
pub const CLEAR_B: f64 = 0.018;

// Particle instance buffer starts with room for this many quads and doubles
pub const INITIAL_INSTANCE_CAPACITY: usize = 4096;

// Shield raymarch step count (kept in sync with field.wgsl)
pub const SHIELD_MARCH_STEPS: u32 = 48;

// Pointer taps that move farther than this (canvas px) are drags, not clicks
pub const CLICK_MAX_TRAVEL_PX: f32 = 6.0;
