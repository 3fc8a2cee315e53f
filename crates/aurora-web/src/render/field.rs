use super::helpers::{self, PipelineDesc};
use crate::constants::SHIELD_MARCH_STEPS;
use aurora_core::{Frame, EARTH_POSITION, EARTH_RADIUS, SUN_POSITION, SUN_RADIUS};
use glam::Mat4;

/// Matches `FieldUniforms` in field.wgsl.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FieldUniforms {
    pub(crate) inv_view_proj: [[f32; 4]; 4],
    pub(crate) eye: [f32; 4],    // xyz, w = time
    pub(crate) sun: [f32; 4],    // xyz, w = radius
    pub(crate) earth: [f32; 4],  // xyz, w = radius
    pub(crate) shield: [f32; 4], // standoff radius, flaring, intensity, compression
    pub(crate) aurora: [f32; 4], // intensity, oval colatitude (rad), red fraction, shimmer
    pub(crate) misc: [f32; 4],   // live data, march steps, unused, unused
}

impl FieldUniforms {
    pub(crate) fn from_frame(frame: &Frame<'_>, view_proj: Mat4) -> Self {
        let f = &frame.field;
        let eye = frame.camera.eye;
        Self {
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, frame.time as f32],
            sun: SUN_POSITION.extend(SUN_RADIUS).to_array(),
            earth: EARTH_POSITION.extend(EARTH_RADIUS).to_array(),
            shield: [
                f.shield_radius,
                f.flaring,
                f.shield_intensity,
                f.compression,
            ],
            aurora: [
                f.aurora_intensity,
                f.oval_colatitude_deg.to_radians(),
                f.aurora_red_fraction,
                f.shimmer,
            ],
            misc: [
                if f.live_data { 1.0 } else { 0.0 },
                SHIELD_MARCH_STEPS as f32,
                0.0,
                0.0,
            ],
        }
    }
}

pub(crate) struct FieldResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

pub(crate) fn create_field_resources(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
) -> FieldResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("field_shader"),
        source: wgpu::ShaderSource::Wgsl(super::FIELD_WGSL.into()),
    });
    let (uniform_buffer, bgl, bind_group) = helpers::create_uniform_binding(
        device,
        "field_uniforms",
        std::mem::size_of::<FieldUniforms>() as u64,
        wgpu::ShaderStages::FRAGMENT,
    );
    let pipeline = helpers::make_pipeline(
        device,
        &bgl,
        PipelineDesc {
            label: "field_pipeline",
            shader: &shader,
            vs_entry: "vs_fullscreen",
            fs_entry: "fs_field",
            buffers: &[],
            color_format,
            blend: None,
        },
    );
    FieldResources {
        pipeline,
        uniform_buffer,
        bind_group,
    }
}
