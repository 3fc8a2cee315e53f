use super::helpers::{self, PipelineDesc};
use crate::camera::billboard_axes;
use crate::constants::INITIAL_INSTANCE_CAPACITY;
use aurora_core::{CameraPose, ParticleInstance, EARTH_POSITION, EARTH_RADIUS};
use glam::Mat4;
use wgpu::util::DeviceExt;

/// Matches `ParticleUniforms` in particles.wgsl.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ParticleUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) cam_right: [f32; 4],
    pub(crate) cam_up: [f32; 4],
    pub(crate) eye: [f32; 4],
    pub(crate) earth: [f32; 4], // occluder: xyz, w = radius
}

impl ParticleUniforms {
    pub(crate) fn new(pose: &CameraPose, view_proj: Mat4) -> Self {
        let (right, up) = billboard_axes(pose);
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            cam_right: right.extend(0.0).to_array(),
            cam_up: up.extend(0.0).to_array(),
            eye: pose.eye.extend(1.0).to_array(),
            earth: EARTH_POSITION.extend(EARTH_RADIUS).to_array(),
        }
    }
}

pub(crate) struct ParticleResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) quad_vb: wgpu::Buffer,
    pub(crate) instance_vb: wgpu::Buffer,
    pub(crate) capacity: usize,
}

impl ParticleResources {
    /// Grow the instance buffer (doubling) until it holds `count` instances.
    pub(crate) fn ensure_capacity(&mut self, device: &wgpu::Device, count: usize) {
        if count <= self.capacity {
            return;
        }
        let mut capacity = self.capacity.max(1);
        while capacity < count {
            capacity *= 2;
        }
        log::info!("[render] instance buffer {} -> {}", self.capacity, capacity);
        self.instance_vb = create_instance_buffer(device, capacity);
        self.capacity = capacity;
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("particle_instances"),
        size: (std::mem::size_of::<ParticleInstance>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(crate) fn create_particle_resources(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
) -> ParticleResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("particle_shader"),
        source: wgpu::ShaderSource::Wgsl(super::PARTICLES_WGSL.into()),
    });
    let (uniform_buffer, bgl, bind_group) = helpers::create_uniform_binding(
        device,
        "particle_uniforms",
        std::mem::size_of::<ParticleUniforms>() as u64,
        wgpu::ShaderStages::VERTEX,
    );

    // Two triangles of a unit quad centred on the particle
    let quad_vertices: [f32; 12] = [
        -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
    ];
    let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("quad_vb"),
        contents: bytemuck::cast_slice(&quad_vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let instance_vb = create_instance_buffer(device, INITIAL_INSTANCE_CAPACITY);

    let vertex_buffers = [
        // slot 0: quad corners
        wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 2) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        },
        // slot 1: ParticleInstance
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 2,
                },
            ],
        },
    ];
    let pipeline = helpers::make_pipeline(
        device,
        &bgl,
        PipelineDesc {
            label: "particle_pipeline",
            shader: &shader,
            vs_entry: "vs_main",
            fs_entry: "fs_main",
            buffers: &vertex_buffers,
            color_format,
            blend: Some(helpers::ADDITIVE),
        },
    );

    ParticleResources {
        pipeline,
        uniform_buffer,
        bind_group,
        quad_vb,
        instance_vb,
        capacity: INITIAL_INSTANCE_CAPACITY,
    }
}
