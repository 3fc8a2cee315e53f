//! The per-frame driver.

use crate::lab::AuroraLab;
use crate::particles::BurstId;
use crate::scene::{Frame, Renderer, SceneHost};

/// Summary of one scheduler tick.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStats {
    pub time: f64,
    pub dt: f32,
    pub live_bursts: usize,
    pub auto_spawned: Option<BurstId>,
    pub retired: usize,
    pub removed: usize,
}

/// Sequences one tick: clock, camera, bursts, field, render.
///
/// Holds nothing but the running flag; every piece of simulation state
/// lives in [`AuroraLab`].
#[derive(Debug, Default)]
pub struct FrameScheduler {
    running: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one frame with `wall_dt` seconds since the previous one.
    ///
    /// Returns `None` without touching anything when stopped.
    pub fn tick<H>(&mut self, lab: &mut AuroraLab, wall_dt: f32, host: &mut H) -> Option<FrameStats>
    where
        H: SceneHost + Renderer + ?Sized,
    {
        if !self.running {
            return None;
        }
        // 1. clock
        let dt = lab.clock.advance(wall_dt);
        let now = lab.clock.now();
        // 2. camera
        lab.camera.tick(dt);
        // 3. bursts
        let env = lab.environment();
        let auto_spawned = lab
            .emitter
            .poll_auto_trigger(now, env.auto_interval(), host);
        let report = lab.emitter.tick(dt, host);
        // 4. field
        let field = lab.field.update(&env, now, dt);
        // 5. render
        host.render(&Frame {
            time: now,
            dt,
            camera: lab.camera.pose(),
            field,
            bursts: lab.emitter.bursts(),
        });
        Some(FrameStats {
            time: now,
            dt,
            live_bursts: lab.emitter.len(),
            auto_spawned,
            retired: report.retired,
            removed: report.removed.len(),
        })
    }
}
