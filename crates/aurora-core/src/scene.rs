//! Output seams toward the rendering layer.
//!
//! The core never draws anything itself. It tells a [`SceneHost`] when burst
//! meshes come and go, and hands a [`Renderer`] one read-only [`Frame`] per tick.

use crate::camera::CameraPose;
use crate::field::FieldVisuals;
use crate::particles::{BurstId, ParticleBurst};
use bytemuck::{Pod, Zeroable};

/// Scene graph that owns the visible meshes for live bursts.
pub trait SceneHost {
    fn attach_burst(&mut self, burst: &ParticleBurst);
    fn detach_burst(&mut self, id: BurstId);
}

/// Receives exactly one call per scheduler tick.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Everything a renderer needs to draw one tick.
pub struct Frame<'a> {
    pub time: f64,
    pub dt: f32,
    pub camera: CameraPose,
    pub field: FieldVisuals,
    pub bursts: &'a [ParticleBurst],
}

/// Per-particle GPU instance. Matches `ParticleInstance` in the particle shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub pos_size: [f32; 4], // xyz = position, w = size
    pub color: [f32; 4],    // rgb, a = opacity
}

/// Append one instance per particle of `burst` to `out`.
pub fn pack_instances(burst: &ParticleBurst, out: &mut Vec<ParticleInstance>) {
    out.reserve(burst.particle_count());
    let iter = burst
        .positions()
        .iter()
        .zip(burst.sizes())
        .zip(burst.colors())
        .zip(burst.opacities());
    for (((p, size), c), a) in iter {
        out.push(ParticleInstance {
            pos_size: [p.x, p.y, p.z, *size],
            color: [c[0], c[1], c[2], *a],
        });
    }
}
