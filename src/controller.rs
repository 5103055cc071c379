//! Ocean surface orchestration.
//!
//! One controller per ocean surface: it owns the static grid topology, the
//! render-facing vertex/index buffers, the ripple pool and its contact
//! debouncer, the color uniform, and exactly one wave backend. Everything a
//! frame needs happens inside [`OceanSurfaceController::update`], in a fixed
//! order: advance the clock, expire ripples, upload frame state, record the
//! compute dispatch, record the copy into the render vertex buffer.

use glam::Vec2;
use log::warn;
use wgpu::util::DeviceExt;

use crate::gerstner::GerstnerWaveSynthesizer;
use crate::mesh::SurfaceMesh;
use crate::params::{ColorParams, SpectrumParameters, SurfaceConfig};
use crate::ripple::{ContactTracker, RipplePool};
use crate::spectral::SpectralOceanSimulator;

/// The active wave model. Gerstner displaces the shared vertex buffer on
/// the GPU; the spectral simulator instead fills displacement/normal
/// textures sampled by the render collaborator's vertex stage.
pub enum OceanBackend {
    Gerstner(GerstnerWaveSynthesizer),
    Spectral(SpectralOceanSimulator),
}

/// Owns one ocean surface end to end and drives it every frame.
pub struct OceanSurfaceController {
    mesh: SurfaceMesh,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,

    pool: RipplePool,
    contacts: ContactTracker,
    /// Lifetime of contact-spawned ripples, seconds.
    pub contact_duration: f32,
    /// Intensity of contact-spawned ripples.
    pub contact_intensity: f32,
    /// Maximum radius of contact-spawned ripples, meters.
    pub contact_max_radius: f32,

    colors: ColorParams,
    color_buffer: wgpu::Buffer,
    colors_dirty: bool,

    backend: OceanBackend,
    time: f32,
}

impl OceanSurfaceController {
    /// Builds a controller around the Gerstner backend.
    pub fn with_gerstner(device: &wgpu::Device, config: &SurfaceConfig) -> Self {
        let backend = OceanBackend::Gerstner(GerstnerWaveSynthesizer::new(device, config));
        Self::assemble(device, config, backend)
    }

    /// Builds a controller around the spectral backend. Fails when
    /// `resolution` is not a power of two.
    pub fn with_spectral(
        device: &wgpu::Device,
        config: &SurfaceConfig,
        resolution: u32,
        domain_size: f32,
        params: SpectrumParameters,
        seed: u64,
    ) -> Result<Self, String> {
        let sim = SpectralOceanSimulator::new(device, resolution, domain_size, params, seed)?;
        Ok(Self::assemble(device, config, OceanBackend::Spectral(sim)))
    }

    fn assemble(device: &wgpu::Device, config: &SurfaceConfig, backend: OceanBackend) -> Self {
        let mesh = SurfaceMesh::new(config);
        let colors = ColorParams::default();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ocean Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ocean Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ocean Color Uniform"),
            contents: bytemuck::bytes_of(&colors.to_gpu()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let index_count = mesh.indices.len() as u32;

        Self {
            mesh,
            vertex_buffer,
            index_buffer,
            index_count,
            pool: RipplePool::new(),
            contacts: ContactTracker::default(),
            contact_duration: 2.0,
            contact_intensity: 0.8,
            contact_max_radius: 6.0,
            colors,
            color_buffer,
            colors_dirty: false,
            backend,
            time: 0.0,
        }
    }

    /// Per-frame driver. `now` is the monotonic simulation clock in seconds.
    ///
    /// Order is load-bearing: ripples are expired before serialization, all
    /// buffer writes land before the dispatch is recorded, and the vertex
    /// copy is recorded after the dispatch so wgpu's usage tracking inserts
    /// the write→copy barrier.
    pub fn update(&mut self, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder, now: f32) {
        self.time = now;
        self.pool.update(now);
        let ripples = self.pool.serialize(now);

        if self.colors_dirty {
            queue.write_buffer(&self.color_buffer, 0, bytemuck::bytes_of(&self.colors.to_gpu()));
            self.colors_dirty = false;
        }

        match &mut self.backend {
            OceanBackend::Gerstner(synth) => {
                synth.upload_frame(queue, now, &ripples);
                synth.dispatch(encoder);
                synth.copy_to_vertex_buffer(encoder, &self.vertex_buffer);
            }
            OceanBackend::Spectral(sim) => {
                sim.update(queue, now, &ripples);
                sim.dispatch(encoder);
            }
        }
    }

    /// Spawns a ripple at `center` on the world XZ plane, evicting the
    /// oldest event when the pool is full. Returns the slot used.
    pub fn add_circular_ripple(
        &mut self,
        center: Vec2,
        duration: f32,
        intensity: f32,
        max_radius: f32,
    ) -> usize {
        self.pool.add(center, duration, intensity, max_radius, self.time)
    }

    /// Feeds one object's contact state through the debouncer, spawning a
    /// ripple on a rising edge or after sufficient movement in contact.
    /// Returns `true` when a ripple was spawned.
    pub fn report_contact(&mut self, id: u64, position: Vec2, hitting: bool) -> bool {
        if self.contacts.report(id, position, hitting) {
            self.pool.add(
                position,
                self.contact_duration,
                self.contact_intensity,
                self.contact_max_radius,
                self.time,
            );
            return true;
        }
        false
    }

    /// Drops the contact record of a despawned object.
    pub fn forget_contact(&mut self, id: u64) {
        self.contacts.forget(id);
    }

    /// Forwards to the Gerstner backend; warns and ignores under the
    /// spectral backend.
    pub fn set_wave(
        &mut self,
        index: usize,
        direction: glam::Vec3,
        amplitude: f32,
        wavelength: f32,
        speed: f32,
    ) {
        match &mut self.backend {
            OceanBackend::Gerstner(synth) => {
                synth.set_wave(index, direction, amplitude, wavelength, speed)
            }
            OceanBackend::Spectral(_) => {
                warn!("set_wave called on a spectral surface, ignoring")
            }
        }
    }

    /// Forwards to the spectral backend; warns and ignores under Gerstner.
    pub fn set_wind(&mut self, speed: f32, direction: Vec2) {
        match &mut self.backend {
            OceanBackend::Spectral(sim) => {
                sim.set_wind_speed(speed);
                sim.set_wind_direction(direction);
            }
            OceanBackend::Gerstner(_) => {
                warn!("set_wind called on a Gerstner surface, ignoring")
            }
        }
    }

    /// Replaces the shading colors; uploaded at the start of the next frame.
    pub fn set_colors(&mut self, colors: ColorParams) {
        self.colors = colors;
        self.colors_dirty = true;
    }

    pub fn colors(&self) -> &ColorParams {
        &self.colors
    }

    pub fn color_buffer(&self) -> &wgpu::Buffer {
        &self.color_buffer
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    pub fn pool(&self) -> &RipplePool {
        &self.pool
    }

    pub fn backend(&self) -> &OceanBackend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut OceanBackend {
        &mut self.backend
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Vertex buffer the render collaborator binds. Under Gerstner it holds
    /// this frame's displaced vertices once the recorded copy executes.
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Uniform ripple block for the shading stage, rewritten every frame
    /// from the pool regardless of the active backend.
    pub fn ripple_buffer(&self) -> &wgpu::Buffer {
        match &self.backend {
            OceanBackend::Gerstner(synth) => synth.ripple_buffer(),
            OceanBackend::Spectral(sim) => sim.ripple_buffer(),
        }
    }

    /// Spectral displacement texture; `None` under the Gerstner backend.
    pub fn displacement_view(&self) -> Option<&wgpu::TextureView> {
        match &self.backend {
            OceanBackend::Spectral(sim) => Some(sim.displacement_view()),
            OceanBackend::Gerstner(_) => None,
        }
    }

    /// Spectral normal texture; `None` under the Gerstner backend.
    pub fn normal_view(&self) -> Option<&wgpu::TextureView> {
        match &self.backend {
            OceanBackend::Spectral(sim) => Some(sim.normal_view()),
            OceanBackend::Gerstner(_) => None,
        }
    }
}
