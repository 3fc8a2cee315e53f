use aurora_core::ViewName;
use glam::{Vec2, Vec3};

/// Pointer position at `pointerdown`, used to tell clicks from drags.
#[derive(Default, Clone, Copy)]
pub struct PointerState {
    pub down_at: Option<Vec2>,
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Map CSS-pixel client coordinates into the canvas backing store.
///
/// `rect` is the canvas bounding rect as `(left, top, width, height)`.
#[inline]
pub fn client_to_canvas_px(client: Vec2, rect: [f32; 4], backing: [u32; 2]) -> Vec2 {
    let [left, top, width, height] = rect;
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    let x_css = client.x - left;
    let y_css = client.y - top;
    Vec2::new(
        (x_css / width) * backing[0] as f32,
        (y_css / height) * backing[1] as f32,
    )
}

/// A press and release close enough together to count as a click.
#[inline]
pub fn is_click(down: Vec2, up: Vec2, max_travel_px: f32) -> bool {
    down.distance(up) <= max_travel_px
}

/// What a key press asks the lab to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    View(ViewName),
    ManualTrigger,
    Flare,
    Clear,
}

#[inline]
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "1" => Some(KeyAction::View(ViewName::Space)),
        "2" => Some(KeyAction::View(ViewName::NorthPole)),
        "3" => Some(KeyAction::View(ViewName::SouthPole)),
        " " => Some(KeyAction::ManualTrigger),
        "f" | "F" => Some(KeyAction::Flare),
        "c" | "C" => Some(KeyAction::Clear),
        _ => None,
    }
}
