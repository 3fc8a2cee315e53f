// Tests for the field model and the tuning constants behind it.

use aurora_core::*;

fn env(wind_speed: f32, density: f32, bz: f32) -> EnvironmentParameters {
    EnvironmentParameters {
        wind_speed,
        density,
        bz,
        ..EnvironmentParameters::default()
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_have_logical_relationships() {
    // Picking should be a little forgiving around the Sun
    assert!(SUN_PICK_RADIUS >= SUN_RADIUS);

    // Standoff bounds bracket the quiet value and stay outside the planet
    assert!(MIN_STANDOFF_RE > EARTH_RADIUS);
    assert!(MIN_STANDOFF_RE < QUIET_STANDOFF_RE && QUIET_STANDOFF_RE < MAX_STANDOFF_RE);

    // Live data eases slower than slider edits
    assert!(FIELD_EASE_TAU_REAL_DATA_SEC > FIELD_EASE_TAU_SEC);
    assert!(FIELD_EASE_TAU_SEC > 0.0);

    // Timing knobs
    assert!(AUTO_FIRE_SOON_DELAY > 0.0 && MANUAL_DEBOUNCE_SEC > 0.0);
    assert!(MIN_PARTICLE_LIFETIME > LIFETIME_EPSILON);
    assert!(MAX_FRAME_DT > 0.0 && MAX_SPEED_SCALE > 1.0);

    // The shield must clear the Earth even when fully squeezed
    assert!(MIN_STANDOFF_RE * SHIELD_SCENE_SCALE > EARTH_RADIUS);
    assert!(CAMERA_ZFAR > sun_to_earth_distance() * 2.0);
}

#[test]
fn stronger_wind_squeezes_the_shield() {
    let quiet = field_targets(&env(400.0, 5.0, 0.0), 0.0);
    let fast = field_targets(&env(800.0, 5.0, 0.0), 0.0);
    let dense = field_targets(&env(400.0, 25.0, 0.0), 0.0);
    assert!(fast.standoff_re < quiet.standoff_re);
    assert!(dense.standoff_re < quiet.standoff_re);
    assert!(fast.compression > 1.0);
    assert!((quiet.shield_radius - quiet.standoff_re * SHIELD_SCENE_SCALE).abs() < 1e-6);
}

#[test]
fn southward_field_brightens_and_widens_the_oval() {
    let north = field_targets(&env(500.0, 5.0, 5.0), 0.0);
    let south = field_targets(&env(500.0, 5.0, -10.0), 0.0);
    assert!(south.aurora_intensity > north.aurora_intensity);
    assert!(south.oval_colatitude_deg > north.oval_colatitude_deg);
    assert!(south.aurora_red_fraction >= north.aurora_red_fraction);
}

#[test]
fn extreme_inputs_stay_bounded() {
    for e in [
        env(5000.0, 100.0, -60.0),
        env(3.0e38, 1.0e30, -1.0e30),
        env(f32::MAX, f32::MAX, f32::MAX),
        env(0.0, 0.0, 60.0),
        env(f32::NAN, f32::INFINITY, f32::NEG_INFINITY),
        env(-400.0, -5.0, 0.0),
    ] {
        let f = field_targets(&e, 12.3);
        assert!((MIN_STANDOFF_RE..=MAX_STANDOFF_RE).contains(&f.standoff_re), "{f:?}");
        assert!((0.0..=1.0).contains(&f.aurora_intensity), "{f:?}");
        assert!((0.0..=1.0).contains(&f.aurora_red_fraction), "{f:?}");
        assert!((0.0..=1.0).contains(&f.shield_intensity), "{f:?}");
        assert!((MIN_FLARING..=MAX_FLARING).contains(&f.flaring), "{f:?}");
        assert!(f.compression.is_finite() && f.oval_colatitude_deg.is_finite());
        assert!(f.shimmer.abs() <= AURORA_SHIMMER_AMPLITUDE);
    }
}

fn assert_visuals_finite(v: &FieldVisuals) {
    for x in [
        v.standoff_re,
        v.shield_radius,
        v.flaring,
        v.compression,
        v.shield_intensity,
        v.aurora_intensity,
        v.oval_colatitude_deg,
        v.aurora_red_fraction,
        v.shimmer,
    ] {
        assert!(x.is_finite(), "{v:?}");
    }
}

#[test]
fn huge_wind_does_not_poison_the_eased_state() {
    let quiet = EnvironmentParameters::default();
    let huge = EnvironmentParameters {
        wind_speed: 3.0e38,
        ..quiet
    };
    let mut model = FieldModel::new();
    let mut t = 0.0;
    model.update(&quiet, t, 0.016);
    t += 0.016;
    let during = model.update(&huge, t, 0.016);
    assert_visuals_finite(&during);
    for _ in 0..200 {
        t += 0.016;
        let v = model.update(&quiet, t, 0.016);
        assert_visuals_finite(&v);
    }
    // back to quiet: the state has recovered toward the quiet targets
    let target = field_targets(&quiet, t);
    let settled = model.visuals();
    assert!((settled.standoff_re - target.standoff_re).abs() < 0.05, "{settled:?}");
    assert!((settled.aurora_intensity - target.aurora_intensity).abs() < 0.01);
}

#[test]
fn first_update_snaps_then_eases() {
    let mut model = FieldModel::new();
    let storm = env(700.0, 15.0, -12.0);
    let first = model.update(&storm, 0.0, 0.1);
    assert_eq!(first, field_targets(&storm, 0.0));

    let quiet = EnvironmentParameters::default();
    let target = field_targets(&quiet, 0.1);
    let second = model.update(&quiet, 0.1, 0.1);
    assert!(second.aurora_intensity < first.aurora_intensity);
    assert!(second.aurora_intensity > target.aurora_intensity);
    assert_eq!(model.visuals(), second);
}

#[test]
fn real_data_mode_eases_more_slowly() {
    let start = env(400.0, 5.0, 0.0);
    let storm = env(750.0, 20.0, -15.0);
    let live_storm = EnvironmentParameters {
        real_data_mode: true,
        ..storm
    };

    let mut sliders = FieldModel::new();
    sliders.update(&start, 0.0, 0.1);
    let s = sliders.update(&storm, 0.1, 0.1);

    let mut live = FieldModel::new();
    live.update(&start, 0.0, 0.1);
    let l = live.update(&live_storm, 0.1, 0.1);

    assert!(l.live_data);
    assert!(l.aurora_intensity < s.aurora_intensity);
}
