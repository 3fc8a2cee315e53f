use crate::frame::FrameContext;
use crate::input::{key_action, KeyAction};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn apply_key_action(ctx: &mut FrameContext<'_>, action: KeyAction) {
    let FrameContext { lab, scene, .. } = ctx;
    match action {
        KeyAction::View(view) => lab.set_view(view, None),
        KeyAction::ManualTrigger => {
            if lab.manual_trigger(scene).is_none() {
                log::debug!("[input] manual trigger debounced");
            }
        }
        KeyAction::Flare => {
            lab.flare(scene);
        }
        KeyAction::Clear => lab.clear_all(scene),
    }
}

pub fn wire_global_keydown(ctx: Rc<RefCell<FrameContext<'static>>>) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                if ev.repeat() {
                    return;
                }
                let Some(action) = key_action(&ev.key()) else {
                    return;
                };
                // keep space from scrolling the page
                if action == KeyAction::ManualTrigger {
                    ev.prevent_default();
                }
                apply_key_action(&mut ctx.borrow_mut(), action);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
