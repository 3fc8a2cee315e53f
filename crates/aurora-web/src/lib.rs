#![cfg(target_arch = "wasm32")]
use aurora_core::{AuroraLab, EmitterConfig, EnvironmentParameters, ViewName};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod camera;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod render;

use frame::FrameContext;

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<FrameContext<'static>>>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("aurora-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, constants::CANVAS_ID)?;
    dom::wire_canvas_resize(&canvas);

    let lab = AuroraLab::new(EmitterConfig::default())?;
    // Without WebGPU the simulation still runs, it just draws nothing
    let gpu = frame::init_gpu(&canvas).await;
    let scene = render::WebScene::new(gpu);
    let ctx = Rc::new(RefCell::new(FrameContext::new(lab, scene, canvas.clone())));

    events::wire_global_keydown(ctx.clone());
    events::wire_pointer_handlers(&canvas, ctx.clone());
    events::wire_visibility(&document, ctx.clone());

    APP.with(|app| *app.borrow_mut() = Some(ctx.clone()));
    frame::start_loop(ctx);
    log::info!("[lab] ready");
    Ok(())
}

/// Run `f` against the live lab, or log and return `None` before init
/// finishes.
fn with_app<R>(f: impl FnOnce(&mut FrameContext<'static>) -> R) -> Option<R> {
    let ctx = APP.with(|app| app.borrow().clone());
    let Some(ctx) = ctx else {
        log::warn!("[hooks] lab not initialised yet");
        return None;
    };
    let Ok(mut c) = ctx.try_borrow_mut() else {
        log::warn!("[hooks] lab busy");
        return None;
    };
    Some(f(&mut c))
}

#[wasm_bindgen]
pub fn aurora_trigger_burst() -> bool {
    with_app(|c| {
        let FrameContext { lab, scene, .. } = c;
        lab.manual_trigger(scene).is_some()
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn aurora_trigger_flare() {
    with_app(|c| {
        let FrameContext { lab, scene, .. } = c;
        lab.flare(scene);
    });
}

#[wasm_bindgen]
pub fn aurora_clear_bursts() {
    with_app(|c| {
        let FrameContext { lab, scene, .. } = c;
        lab.clear_all(scene);
    });
}

#[wasm_bindgen]
pub fn aurora_debug_dump() -> String {
    with_app(|c| {
        format!(
            "{}\nscene: attached={} running={}",
            c.lab.debug_dump(),
            c.scene.attached_count(),
            c.scheduler.is_running()
        )
    })
    .unwrap_or_default()
}

/// Start a transition to `name` (`space`, `northPole`, `southPole`).
/// Returns `false` for an unknown name.
#[wasm_bindgen]
pub fn aurora_set_view(name: &str) -> bool {
    let view: ViewName = match name.parse() {
        Ok(v) => v,
        Err(e) => {
            log::warn!("[hooks] {}", e);
            return false;
        }
    };
    with_app(|c| {
        c.lab.set_view(
            view,
            Some(Box::new(|arrived: ViewName| {
                log::debug!("[hooks] view {} reached", arrived);
            })),
        );
    })
    .is_some()
}

#[wasm_bindgen]
pub fn aurora_set_environment(
    wind_speed: f32,
    density: f32,
    bz: f32,
    auto_interval: f32,
    real_data_mode: bool,
) {
    let params = EnvironmentParameters {
        wind_speed,
        density,
        bz,
        auto_interval,
        real_data_mode,
    };
    with_app(|c| c.lab.set_environment(params));
}

/// Current environment as a plain JS object, for the settings panel.
#[wasm_bindgen]
pub fn aurora_environment() -> JsValue {
    let Some(env) = with_app(|c| c.lab.environment()) else {
        return JsValue::NULL;
    };
    let obj = js_sys::Object::new();
    let entries: [(&str, JsValue); 5] = [
        ("windSpeed", env.wind_speed.into()),
        ("density", env.density.into()),
        ("bz", env.bz.into()),
        ("autoInterval", env.auto_interval.into()),
        ("realDataMode", env.real_data_mode.into()),
    ];
    for (key, value) in entries {
        _ = js_sys::Reflect::set(&obj, &JsValue::from_str(key), &value);
    }
    obj.into()
}
