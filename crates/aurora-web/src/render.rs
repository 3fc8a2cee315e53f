use crate::camera::view_proj;
use crate::constants::{CLEAR_B, CLEAR_G, CLEAR_R};
use aurora_core::{pack_instances, BurstId, Frame, ParticleBurst, ParticleInstance, Renderer, SceneHost};
use fnv::FnvHashSet;
use web_sys as web;

mod field;
mod helpers;
mod particles;

use field::{create_field_resources, FieldResources, FieldUniforms};
use particles::{create_particle_resources, ParticleResources, ParticleUniforms};

pub static FIELD_WGSL: &str = include_str!("../shaders/field.wgsl");
pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");

/// Scene graph for the page: which bursts are on stage, plus the GPU that
/// draws them once WebGPU is up.
///
/// Bursts are tracked even while `gpu` is `None`, so attach/detach stay
/// balanced if the adapter request fails.
pub struct WebScene<'a> {
    attached: FnvHashSet<BurstId>,
    instances: Vec<ParticleInstance>,
    gpu: Option<GpuState<'a>>,
}

impl<'a> WebScene<'a> {
    pub fn new(gpu: Option<GpuState<'a>>) -> Self {
        Self {
            attached: FnvHashSet::default(),
            instances: Vec::new(),
            gpu,
        }
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(width, height);
        }
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }
}

impl SceneHost for WebScene<'_> {
    fn attach_burst(&mut self, burst: &ParticleBurst) {
        self.attached.insert(burst.id());
        log::debug!(
            "[render] attach {:?} ({} particles)",
            burst.id(),
            burst.particle_count()
        );
    }

    fn detach_burst(&mut self, id: BurstId) {
        if !self.attached.remove(&id) {
            log::warn!("[render] detach of unknown {:?}", id);
        }
    }
}

impl Renderer for WebScene<'_> {
    fn render(&mut self, frame: &Frame<'_>) {
        self.instances.clear();
        for burst in frame.bursts {
            if self.attached.contains(&burst.id()) {
                pack_instances(burst, &mut self.instances);
            }
        }
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        match gpu.draw(frame, &self.instances) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    field: FieldResources,
    particles: ParticleResources,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits; older WebGPU implementations reject unknown fields
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let field = create_field_resources(&device, format);
        let particles = create_particle_resources(&device, format);
        log::info!("[render] WebGPU ready {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            field,
            particles,
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_R,
                g: CLEAR_G,
                b: CLEAR_B,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn draw(
        &mut self,
        frame: &Frame<'_>,
        instances: &[ParticleInstance],
    ) -> Result<(), wgpu::SurfaceError> {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let vp = view_proj(&frame.camera, aspect);

        self.queue.write_buffer(
            &self.field.uniform_buffer,
            0,
            bytemuck::bytes_of(&FieldUniforms::from_frame(frame, vp)),
        );
        self.queue.write_buffer(
            &self.particles.uniform_buffer,
            0,
            bytemuck::bytes_of(&ParticleUniforms::new(&frame.camera, vp)),
        );
        self.particles.ensure_capacity(&self.device, instances.len());
        if !instances.is_empty() {
            self.queue.write_buffer(
                &self.particles.instance_vb,
                0,
                bytemuck::cast_slice(instances),
            );
        }

        let surface_tex = self.surface.get_current_texture()?;
        let view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // Sun, Earth, shield and aurora in one fullscreen pass
            rpass.set_pipeline(&self.field.pipeline);
            rpass.set_bind_group(0, &self.field.bind_group, &[]);
            rpass.draw(0..3, 0..1);

            if !instances.is_empty() {
                rpass.set_pipeline(&self.particles.pipeline);
                rpass.set_bind_group(0, &self.particles.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.particles.quad_vb.slice(..));
                rpass.set_vertex_buffer(1, self.particles.instance_vb.slice(..));
                rpass.draw(0..6, 0..instances.len() as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        surface_tex.present();
        Ok(())
    }
}
