use crate::camera::screen_to_world_ray;
use crate::constants::CLICK_MAX_TRAVEL_PX;
use crate::frame::FrameContext;
use crate::input::{self, PointerState};
use aurora_core::{SUN_PICK_RADIUS, SUN_POSITION};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    input::client_to_canvas_px(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        [
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ],
        [canvas.width(), canvas.height()],
    )
}

/// Click on the Sun fires a burst. Drags are ignored.
pub fn wire_pointer_handlers(
    canvas: &web::HtmlCanvasElement,
    ctx: Rc<RefCell<FrameContext<'static>>>,
) {
    let pointer = Rc::new(RefCell::new(PointerState::default()));

    // pointerdown
    {
        let pointer_d = pointer.clone();
        let canvas_d = canvas.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            if ev.button() != 0 {
                return;
            }
            pointer_d.borrow_mut().down_at = Some(pointer_canvas_px(&ev, &canvas_d));
        }) as Box<dyn FnMut(_)>);
        _ = canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // pointerup
    {
        let pointer_u = pointer.clone();
        let canvas_u = canvas.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let Some(down) = pointer_u.borrow_mut().down_at.take() else {
                return;
            };
            let up = pointer_canvas_px(&ev, &canvas_u);
            if !input::is_click(down, up, CLICK_MAX_TRAVEL_PX) {
                return;
            }
            let mut c = ctx.borrow_mut();
            let pose = c.lab.camera.pose();
            let (ro, rd) = screen_to_world_ray(&pose, c.viewport(), up.x, up.y);
            if input::ray_sphere(ro, rd, SUN_POSITION, SUN_PICK_RADIUS).is_none() {
                return;
            }
            let FrameContext { lab, scene, .. } = &mut *c;
            match lab.click_trigger(scene) {
                Some(id) => log::info!("[input] sun click -> {:?}", id),
                None => log::debug!("[input] sun click debounced"),
            }
        }) as Box<dyn FnMut(_)>);
        _ = canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // pointercancel / leaving the canvas drops a pending press
    {
        let pointer_c = pointer;
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
            pointer_c.borrow_mut().down_at = None;
        }) as Box<dyn FnMut(_)>);
        _ = canvas
            .add_event_listener_with_callback("pointercancel", closure.as_ref().unchecked_ref());
        _ = canvas
            .add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
