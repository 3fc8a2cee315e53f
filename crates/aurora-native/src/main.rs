use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use fnv::FnvHashSet;
use aurora_core::{
    AuroraLab, BurstId, EmitterConfig, EnvironmentParameters, Frame, FrameScheduler,
    ParticleBurst, Renderer, SceneHost, ViewName,
};

const REFRESH_HZ: f32 = 60.0;
const DEFAULT_SECONDS: f32 = 12.0;
const DUMP_EVERY_SEC: f64 = 2.0;

/// Stands in for a scene graph and renderer: tracks attachments and logs
/// a one-line frame summary now and then.
#[derive(Default)]
struct LoggingHost {
    attached: FnvHashSet<BurstId>,
    frames: u64,
    last_summary: f64,
}

impl SceneHost for LoggingHost {
    fn attach_burst(&mut self, burst: &ParticleBurst) {
        self.attached.insert(burst.id());
        log::info!(
            "[scene] attach {:?} {:?} n={}",
            burst.id(),
            burst.kind(),
            burst.particle_count()
        );
    }

    fn detach_burst(&mut self, id: BurstId) {
        if self.attached.remove(&id) {
            log::info!("[scene] detach {:?}", id);
        } else {
            log::warn!("[scene] detach of unknown {:?}", id);
        }
    }
}

impl Renderer for LoggingHost {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        if frame.time - self.last_summary < 0.5 {
            return;
        }
        self.last_summary = frame.time;
        let particles: usize = frame.bursts.iter().map(|b| b.particle_count()).sum();
        log::debug!(
            "[render] t={:.2} bursts={} particles={} standoff={:.2}Re aurora={:.2} eye=({:.1},{:.1},{:.1})",
            frame.time,
            frame.bursts.len(),
            particles,
            frame.field.standoff_re,
            frame.field.aurora_intensity,
            frame.camera.eye.x,
            frame.camera.eye.y,
            frame.camera.eye.z
        );
    }
}

/// One scripted interaction, fired once when sim time passes `at`.
struct Cue {
    at: f64,
    name: &'static str,
    run: fn(&mut AuroraLab, &mut LoggingHost),
}

fn script() -> Vec<Cue> {
    vec![
        Cue {
            at: 1.0,
            name: "manual burst",
            run: |lab, host| {
                lab.manual_trigger(host);
            },
        },
        Cue {
            at: 1.2,
            name: "debounced burst",
            run: |lab, host| {
                if lab.manual_trigger(host).is_none() {
                    log::info!("[script] second trigger debounced as expected");
                }
            },
        },
        Cue {
            at: 2.0,
            name: "flare",
            run: |lab, host| {
                lab.flare(host);
            },
        },
        Cue {
            at: 3.0,
            name: "north pole view",
            run: |lab, _| {
                lab.set_view(
                    ViewName::NorthPole,
                    Some(Box::new(|v: ViewName| log::info!("[script] reached {}", v))),
                )
            },
        },
        Cue {
            at: 5.0,
            name: "storm",
            run: |lab, _| {
                lab.set_environment(EnvironmentParameters {
                    wind_speed: 750.0,
                    density: 20.0,
                    bz: -15.0,
                    auto_interval: 2.0,
                    real_data_mode: false,
                })
            },
        },
        Cue {
            at: 8.0,
            name: "space view",
            run: |lab, _| lab.set_view(ViewName::Space, None),
        },
        Cue {
            at: 10.0,
            name: "clear",
            run: |lab, host| lab.clear_all(host),
        },
    ]
}

/// Run the Aurora Lab core headless through a scripted session.
#[derive(Parser, Debug)]
#[command(name = "aurora-native", version, about, long_about = None)]
struct Args {
    /// Simulated seconds to run
    #[arg(long, default_value_t = DEFAULT_SECONDS, value_parser = positive_seconds)]
    seconds: f32,

    /// Sleep between frames so the run takes wall-clock time
    #[arg(long)]
    realtime: bool,
}

fn positive_seconds(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(format!("must be a positive number of seconds, got {s}"))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut lab = AuroraLab::new(EmitterConfig::default()).context("building lab")?;
    let mut scheduler = FrameScheduler::new();
    let mut host = LoggingHost::default();
    let mut cues = script().into_iter().peekable();

    let frame_dt = 1.0 / REFRESH_HZ;
    let total_frames = (args.seconds * REFRESH_HZ).ceil() as u64;
    let mut next_dump = DUMP_EVERY_SEC;
    let wall_start = Instant::now();
    log::info!(
        "aurora-native: {} frames at {} Hz{}",
        total_frames,
        REFRESH_HZ,
        if args.realtime { " (realtime)" } else { "" }
    );

    scheduler.start();
    for _ in 0..total_frames {
        let frame_start = Instant::now();
        while let Some(cue) = cues.next_if(|c| lab.now() >= c.at) {
            log::info!("[script] t={:.2} {}", lab.now(), cue.name);
            (cue.run)(&mut lab, &mut host);
        }
        scheduler.tick(&mut lab, frame_dt, &mut host);

        if lab.now() >= next_dump {
            next_dump += DUMP_EVERY_SEC;
            log::info!("\n{}", lab.debug_dump());
        }
        if args.realtime {
            let budget = Duration::from_secs_f32(frame_dt);
            if let Some(rest) = budget.checked_sub(frame_start.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
    scheduler.stop();

    log::info!(
        "done: {} frames in {:.2?}, {} bursts still attached",
        host.frames,
        wall_start.elapsed(),
        host.attached.len()
    );
    Ok(())
}
