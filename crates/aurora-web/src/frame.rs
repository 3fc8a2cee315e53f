use crate::render;
use aurora_core::{AuroraLab, FrameScheduler};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything the RAF loop and the event closures share.
pub struct FrameContext<'a> {
    pub lab: AuroraLab,
    pub scheduler: FrameScheduler,
    pub scene: render::WebScene<'a>,
    pub canvas: web::HtmlCanvasElement,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        lab: AuroraLab,
        scene: render::WebScene<'a>,
        canvas: web::HtmlCanvasElement,
    ) -> Self {
        let mut scheduler = FrameScheduler::new();
        scheduler.start();
        Self {
            lab,
            scheduler,
            scene,
            canvas,
            last_instant: Instant::now(),
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        self.scene
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        if let Some(stats) = self.scheduler.tick(&mut self.lab, dt_sec, &mut self.scene) {
            if let Some(id) = stats.auto_spawned {
                log::debug!("[frame] auto burst {:?} at t={:.2}", id, stats.time);
            }
        }
    }

    /// Backing store size of the canvas, for pointer-ray math.
    pub fn viewport(&self) -> [u32; 2] {
        [self.canvas.width(), self.canvas.height()]
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
