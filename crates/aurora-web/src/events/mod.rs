pub mod keyboard;
pub mod pointer;

pub use keyboard::{apply_key_action, wire_global_keydown};
pub use pointer::wire_pointer_handlers;

use crate::frame::FrameContext;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Stop the scheduler while the tab is hidden and restart it on return.
pub fn wire_visibility(document: &web::Document, ctx: Rc<RefCell<FrameContext<'static>>>) {
    let doc = document.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
        let mut c = ctx.borrow_mut();
        if doc.hidden() {
            c.scheduler.stop();
            log::info!("[frame] paused (tab hidden)");
        } else {
            c.last_instant = Instant::now();
            c.scheduler.start();
            log::info!("[frame] resumed");
        }
    }) as Box<dyn FnMut()>);
    _ = document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
    closure.forget();
}
