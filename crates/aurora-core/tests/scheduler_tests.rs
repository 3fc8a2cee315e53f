// Integration tests for the frame scheduler and the lab it drives.

use aurora_core::*;
use std::collections::HashSet;

#[derive(Clone, Debug)]
struct RenderedFrame {
    time: f64,
    dt: f32,
    camera: CameraPose,
    field: FieldVisuals,
    bursts: Vec<BurstId>,
}

#[derive(Default)]
struct RecordingHost {
    attached: HashSet<BurstId>,
    frames: Vec<RenderedFrame>,
}

impl SceneHost for RecordingHost {
    fn attach_burst(&mut self, burst: &ParticleBurst) {
        self.attached.insert(burst.id());
    }
    fn detach_burst(&mut self, id: BurstId) {
        self.attached.remove(&id);
    }
}

impl Renderer for RecordingHost {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frames.push(RenderedFrame {
            time: frame.time,
            dt: frame.dt,
            camera: frame.camera,
            field: frame.field,
            bursts: frame.bursts.iter().map(|b| b.id()).collect(),
        });
    }
}

fn lab() -> AuroraLab {
    let config = EmitterConfig {
        wind: BurstConfig {
            particle_count: 24,
            ..BurstConfig::wind()
        },
        flare: BurstConfig {
            particle_count: 12,
            ..BurstConfig::flare()
        },
        ..EmitterConfig::default()
    };
    AuroraLab::new(config).unwrap()
}

fn running() -> FrameScheduler {
    let mut s = FrameScheduler::new();
    s.start();
    s
}

#[test]
fn stopped_scheduler_does_nothing() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    let mut sched = FrameScheduler::new();
    assert!(!sched.is_running());
    assert!(sched.tick(&mut lab, 0.1, &mut host).is_none());

    sched.start();
    assert!(sched.tick(&mut lab, 0.1, &mut host).is_some());
    sched.stop();
    assert!(sched.tick(&mut lab, 0.1, &mut host).is_none());

    assert_eq!(host.frames.len(), 1);
    assert_eq!(lab.clock.frames(), 1);
}

#[test]
fn renders_once_per_tick_with_current_state() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    let mut sched = running();
    lab.set_view(ViewName::NorthPole, None);
    for i in 1..=4 {
        let stats = sched.tick(&mut lab, 0.25, &mut host).unwrap();
        assert_eq!(host.frames.len(), i);
        let frame = host.frames.last().unwrap();
        assert_eq!(frame.time, stats.time);
        assert_eq!(frame.time, lab.now());
        assert_eq!(frame.dt, 0.25);
        assert_eq!(frame.camera, lab.camera.pose());
    }
    assert_eq!(lab.now(), 1.0);
    // halfway through the 2 s transition the camera is between the views
    let eye = host.frames[3].camera.eye;
    assert_ne!(eye, ViewName::Space.pose().eye);
    assert_ne!(eye, ViewName::NorthPole.pose().eye);
}

#[test]
fn long_stalls_are_clamped() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    let mut sched = running();
    let stats = sched.tick(&mut lab, 30.0, &mut host).unwrap();
    assert_eq!(stats.dt, MAX_FRAME_DT);
    assert_eq!(lab.now(), MAX_FRAME_DT as f64);
    let stats = sched.tick(&mut lab, f32::NAN, &mut host).unwrap();
    assert_eq!(stats.dt, 0.0);
}

#[test]
fn auto_trigger_fires_on_default_interval() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    let mut sched = running();
    // first tick lands at 0.25 and schedules the first burst for 4.25
    for _ in 0..16 {
        let stats = sched.tick(&mut lab, 0.25, &mut host).unwrap();
        assert!(stats.auto_spawned.is_none());
    }
    let stats = sched.tick(&mut lab, 0.25, &mut host).unwrap();
    let id = stats.auto_spawned.expect("auto burst at 4.25");
    assert!(host.attached.contains(&id));
    // the burst is drawn in the same frame it spawned in
    assert_eq!(host.frames.last().unwrap().bursts, vec![id]);
}

#[test]
fn environment_change_rescales_and_pulls_auto_trigger_in() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    let mut sched = running();
    for _ in 0..4 {
        sched.tick(&mut lab, 0.25, &mut host);
    }
    let manual = lab.manual_trigger(&mut host).unwrap();
    assert_eq!(lab.emitter.get(manual).unwrap().speed_scale(), 1.0);

    lab.set_environment(EnvironmentParameters {
        wind_speed: 800.0,
        ..EnvironmentParameters::default()
    });
    assert_eq!(lab.emitter.speed_scale(), 2.0);
    assert_eq!(lab.emitter.get(manual).unwrap().speed_scale(), 2.0);
    assert_eq!(lab.emitter.next_auto_fire(), Some(1.0 + AUTO_FIRE_SOON_DELAY));

    let stats = sched.tick(&mut lab, 0.25, &mut host).unwrap();
    assert!(stats.auto_spawned.is_none());
    let stats = sched.tick(&mut lab, 0.25, &mut host).unwrap();
    let auto = stats.auto_spawned.expect("auto burst soon after the edit");
    assert_eq!(lab.emitter.get(auto).unwrap().speed_scale(), 2.0);
}

#[test]
fn zero_interval_disables_auto_bursts() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    let mut sched = running();
    lab.set_environment(EnvironmentParameters {
        auto_interval: 0.0,
        ..EnvironmentParameters::default()
    });
    for _ in 0..80 {
        let stats = sched.tick(&mut lab, 0.25, &mut host).unwrap();
        assert!(stats.auto_spawned.is_none());
    }
    assert!(lab.emitter.is_empty());
}

#[test]
fn finished_bursts_leave_the_scene() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    let mut sched = running();
    lab.set_environment(EnvironmentParameters {
        auto_interval: 0.0,
        ..EnvironmentParameters::default()
    });
    let id = lab.manual_trigger(&mut host).unwrap();
    let mut removed = 0;
    for _ in 0..60 {
        removed += sched.tick(&mut lab, 0.25, &mut host).unwrap().removed;
    }
    assert_eq!(removed, 1);
    assert!(!host.attached.contains(&id));
    assert!(host.frames.last().unwrap().bursts.is_empty());
}

#[test]
fn field_eases_toward_storm_targets() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    let mut sched = running();
    sched.tick(&mut lab, 0.25, &mut host);
    let quiet = host.frames[0].field;

    let storm = EnvironmentParameters {
        wind_speed: 750.0,
        density: 20.0,
        bz: -15.0,
        ..EnvironmentParameters::default()
    };
    lab.set_environment(storm);
    let target = field_targets(&storm, 0.0);
    assert!(target.aurora_intensity > quiet.aurora_intensity);
    assert!(target.standoff_re < quiet.standoff_re);

    let mut last = quiet;
    for _ in 0..6 {
        sched.tick(&mut lab, 0.25, &mut host);
        let f = host.frames.last().unwrap().field;
        assert!(f.aurora_intensity > last.aurora_intensity);
        assert!(f.standoff_re < last.standoff_re);
        last = f;
    }
    // still easing after 1.5 s with a 0.6 s time constant
    assert!(last.aurora_intensity < target.aurora_intensity);
    for _ in 0..60 {
        sched.tick(&mut lab, 0.25, &mut host);
    }
    let settled = host.frames.last().unwrap().field;
    assert!((settled.standoff_re - target.standoff_re).abs() < 1e-3);
    assert!((settled.aurora_intensity - target.aurora_intensity).abs() < 1e-3);
}

#[test]
fn debug_dump_mentions_every_subsystem() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    let mut sched = running();
    lab.flare(&mut host);
    sched.tick(&mut lab, 0.25, &mut host);
    let dump = lab.debug_dump();
    for needle in ["t=0.25s", "emitter:", "Flare", "env:", "field:", "camera: space"] {
        assert!(dump.contains(needle), "missing {needle:?} in\n{dump}");
    }
}

#[test]
fn clear_all_through_lab_detaches_everything() {
    let mut lab = lab();
    let mut host = RecordingHost::default();
    lab.manual_trigger(&mut host);
    lab.flare(&mut host);
    assert_eq!(host.attached.len(), 2);
    lab.clear_all(&mut host);
    assert!(host.attached.is_empty());
    assert!(lab.emitter.is_empty());
}
