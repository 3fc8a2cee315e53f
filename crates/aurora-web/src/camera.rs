use aurora_core::CameraPose;
use glam::{Mat4, Vec3, Vec4};

/// Compute a world-space ray from screen-space canvas coordinates.
///
/// - `pose`: camera pose of the frame the user is looking at
/// - `viewport`: canvas backing store size in pixels
/// - `sx`, `sy`: pixel coordinates in the canvas' backing store space
///
/// Returns `(ray_origin, ray_direction)` in world space.
pub fn screen_to_world_ray(pose: &CameraPose, viewport: [u32; 2], sx: f32, sy: f32) -> (Vec3, Vec3) {
    let width = viewport[0].max(1) as f32;
    let height = viewport[1].max(1) as f32;
    let ndc_x = (2.0 * sx / width) - 1.0;
    let ndc_y = 1.0 - (2.0 * sy / height);
    let inv = view_proj(pose, width / height).inverse();
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let p1: Vec3 = p_far.truncate() / p_far.w;
    let ro = pose.eye;
    let rd = (p1 - ro).try_normalize().unwrap_or(Vec3::NEG_Z);
    (ro, rd)
}

#[inline]
pub fn view_proj(pose: &CameraPose, aspect: f32) -> Mat4 {
    pose.projection_matrix(aspect) * pose.view_matrix()
}

/// Camera right and up axes in world space, for billboarding.
#[inline]
pub fn billboard_axes(pose: &CameraPose) -> (Vec3, Vec3) {
    let view = pose.view_matrix();
    (view.row(0).truncate(), view.row(1).truncate())
}
