//! Gerstner (trochoidal) wave synthesis.
//!
//! Up to [`MAX_WAVES`] directional waves are summed per grid vertex. The
//! closed form lives here on the CPU ([`GerstnerWaveSynthesizer::displace`])
//! and is mirrored by the compute kernel in `shaders/gerstner.wgsl`, which
//! writes displaced positions and normals for the whole grid in 8x8 tiles.

use std::f32::consts::TAU;

use glam::{Mat4, Vec2, Vec3};
use log::warn;
use wgpu::util::DeviceExt;

use crate::gpu_types::{RippleBufferGpu, SimSettingsGpu, SurfaceVertex, WaveInfoGpu};
use crate::params::SurfaceConfig;

/// Canonical number of concurrently active Gerstner waves. Every buffer,
/// array, and shader declaration is sized from this single constant.
pub const MAX_WAVES: usize = 3;

/// One directional wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveDescriptor {
    /// Travel direction; only the XZ components matter and they are
    /// normalized before use.
    pub direction: Vec3,
    /// Crest height in meters. Never negative.
    pub amplitude: f32,
    /// Crest-to-crest distance in meters. Always positive.
    pub wavelength: f32,
    /// Phase speed in m/s.
    pub speed: f32,
    /// Static phase offset in radians.
    pub phase: f32,
}

impl Default for WaveDescriptor {
    fn default() -> Self {
        Self {
            direction: Vec3::X,
            amplitude: 0.0,
            wavelength: 10.0,
            speed: 2.0,
            phase: 0.0,
        }
    }
}

impl WaveDescriptor {
    fn to_gpu(self) -> WaveInfoGpu {
        WaveInfoGpu {
            direction: self.direction.to_array(),
            amplitude: self.amplitude,
            wavelength: self.wavelength,
            speed: self.speed,
            phase: self.phase,
            _pad: 0.0,
        }
    }
}

/// Sums up to three trochoidal waves per vertex and drives the compute
/// dispatch that writes the displaced grid into a GPU buffer.
pub struct GerstnerWaveSynthesizer {
    waves: [WaveDescriptor; MAX_WAVES],
    /// Crest sharpening factor shared by all waves, in [0, 1].
    pub steepness: f32,
    settings: SimSettingsGpu,
    vertex_count: u32,

    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    settings_buffer: wgpu::Buffer,
    wave_buffer: wgpu::Buffer,
    ripple_buffer: wgpu::Buffer,
    output_buffer: wgpu::Buffer,
}

impl GerstnerWaveSynthesizer {
    /// Allocates the wave, ripple, settings, and output buffers for a grid
    /// of `(config.grid_size + 1)^2` vertices and builds the compute
    /// pipeline.
    pub fn new(device: &wgpu::Device, config: &SurfaceConfig) -> Self {
        let waves = [WaveDescriptor::default(); MAX_WAVES];
        let settings = SimSettingsGpu {
            grid_size: config.grid_size,
            grid_spacing: config.grid_spacing_m,
            normal_eps: config.normal_eps,
            ..Default::default()
        };
        let vertex_count = config.vertex_count();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Gerstner Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gerstner.wgsl").into()),
        });

        let settings_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gerstner Settings"),
            contents: bytemuck::bytes_of(&settings),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let wave_gpu: [WaveInfoGpu; MAX_WAVES] = waves.map(WaveDescriptor::to_gpu);
        let wave_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Info"),
            contents: bytemuck::cast_slice(&wave_gpu),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let ripple_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ripple Buffer"),
            contents: bytemuck::bytes_of(&RippleBufferGpu::default()),
            usage: wgpu::BufferUsages::UNIFORM
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
        });

        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Displaced Vertices"),
            size: (vertex_count as usize * std::mem::size_of::<SurfaceVertex>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Gerstner Bind Group Layout"),
                entries: &[
                    uniform_entry(0),
                    storage_entry(1, true),
                    uniform_entry(2),
                    storage_entry(3, false),
                ],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Gerstner Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: settings_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wave_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: ripple_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: output_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Gerstner Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Gerstner Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("displace_grid"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            waves,
            steepness: 0.6,
            settings,
            vertex_count,
            pipeline,
            bind_group,
            settings_buffer,
            wave_buffer,
            ripple_buffer,
            output_buffer,
        }
    }

    /// Replaces wave `index`. Indices outside `[0, MAX_WAVES)` are ignored
    /// with a warning; amplitude is clamped to >= 0 and wavelength to a
    /// small positive minimum.
    pub fn set_wave(
        &mut self,
        index: usize,
        direction: Vec3,
        amplitude: f32,
        wavelength: f32,
        speed: f32,
    ) {
        if index >= MAX_WAVES {
            warn!(
                "set_wave: index {} out of range (max {}), ignoring",
                index, MAX_WAVES
            );
            return;
        }
        if amplitude < 0.0 || wavelength <= 0.0 {
            warn!(
                "set_wave: clamping invalid parameters (amplitude {}, wavelength {})",
                amplitude, wavelength
            );
        }
        self.waves[index] = WaveDescriptor {
            direction,
            amplitude: amplitude.max(0.0),
            wavelength: wavelength.max(1.0e-3),
            speed,
            phase: self.waves[index].phase,
        };
    }

    pub fn wave(&self, index: usize) -> Option<&WaveDescriptor> {
        self.waves.get(index)
    }

    /// Sets the local-to-world transform baked into the output vertices.
    pub fn set_world(&mut self, world: Mat4) {
        self.settings.world = world.to_cols_array_2d();
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn output_buffer(&self) -> &wgpu::Buffer {
        &self.output_buffer
    }

    /// Size in bytes of the displaced-vertex output.
    pub fn output_size(&self) -> u64 {
        self.vertex_count as u64 * std::mem::size_of::<SurfaceVertex>() as u64
    }

    /// Uniform ripple block, also bound by the displacement kernel. Exposed
    /// so the shading stage can share it.
    pub fn ripple_buffer(&self) -> &wgpu::Buffer {
        &self.ripple_buffer
    }

    /// Uploads the current frame state: simulation time, wave descriptors,
    /// and the serialized ripple block. Pure data transfer; nothing happens
    /// on the GPU until the next [`dispatch`](Self::dispatch).
    pub fn upload_frame(&mut self, queue: &wgpu::Queue, now: f32, ripples: &RippleBufferGpu) {
        self.settings.time = now;
        self.settings.steepness = self.steepness.clamp(0.0, 1.0);
        queue.write_buffer(&self.settings_buffer, 0, bytemuck::bytes_of(&self.settings));

        let wave_gpu: [WaveInfoGpu; MAX_WAVES] = self.waves.map(WaveDescriptor::to_gpu);
        queue.write_buffer(&self.wave_buffer, 0, bytemuck::cast_slice(&wave_gpu));
        queue.write_buffer(&self.ripple_buffer, 0, bytemuck::bytes_of(ripples));
    }

    /// Records the displacement dispatch: one 8x8 workgroup tile per 8x8
    /// vertex block. Must be recorded before any copy out of the output
    /// buffer in the same frame.
    pub fn dispatch(&self, encoder: &mut wgpu::CommandEncoder) {
        let groups = (self.settings.grid_size + 1).div_ceil(8);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Gerstner Dispatch"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.dispatch_workgroups(groups, groups, 1);
    }

    /// Records the full-buffer copy into the render collaborator's vertex
    /// buffer. wgpu's usage tracking inserts the write→copy barrier as long
    /// as this is recorded after [`dispatch`](Self::dispatch).
    pub fn copy_to_vertex_buffer(&self, encoder: &mut wgpu::CommandEncoder, dst: &wgpu::Buffer) {
        encoder.copy_buffer_to_buffer(&self.output_buffer, 0, dst, 0, self.output_size());
    }

    /// CPU reference of the wave superposition: returns the displaced
    /// world-space position and unit normal for a rest position on the grid
    /// plane. The GPU kernel computes the same sum.
    pub fn displace(&self, rest: Vec3, time: f32) -> (Vec3, Vec3) {
        let (p, n) = superpose(
            &self.waves,
            self.steepness,
            self.settings.normal_eps,
            rest,
            time,
        );
        let world = Mat4::from_cols_array_2d(&self.settings.world);
        (
            world.transform_point3(p),
            world.transform_vector3(n).normalize(),
        )
    }
}

/// Closed-form Gerstner superposition with finite-difference normals.
/// Shared by [`GerstnerWaveSynthesizer::displace`] and the tests; the WGSL
/// kernel mirrors this function.
pub fn superpose(
    waves: &[WaveDescriptor],
    steepness: f32,
    normal_eps: f32,
    rest: Vec3,
    time: f32,
) -> (Vec3, Vec3) {
    let eps = normal_eps.max(1.0e-4);
    let p = superpose_point(waves, steepness, rest, time);
    let px = superpose_point(waves, steepness, rest + Vec3::new(eps, 0.0, 0.0), time);
    let pz = superpose_point(waves, steepness, rest + Vec3::new(0.0, 0.0, eps), time);

    let normal = (pz - p).cross(px - p).normalize_or_zero();
    let normal = if normal == Vec3::ZERO { Vec3::Y } else { normal };
    (p, normal)
}

fn superpose_point(waves: &[WaveDescriptor], steepness: f32, rest: Vec3, time: f32) -> Vec3 {
    let active = waves.iter().filter(|w| w.amplitude > 0.0).count().max(1) as f32;

    let mut out = rest;
    for wave in waves.iter().filter(|w| w.amplitude > 0.0) {
        let dir = Vec2::new(wave.direction.x, wave.direction.z)
            .try_normalize()
            .unwrap_or(Vec2::X);
        let k = TAU / wave.wavelength;
        let theta = k * dir.dot(Vec2::new(rest.x, rest.z)) - k * wave.speed * time + wave.phase;

        // Crest sharpening bounded so the surface never self-intersects.
        let q = steepness / (k * wave.amplitude * active);
        let horizontal = q * wave.amplitude * theta.cos();

        out.x += dir.x * horizontal;
        out.z += dir.y * horizontal;
        out.y += wave.amplitude * theta.sin();
    }
    out
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.1;

    #[test]
    fn zero_amplitude_is_flat_with_up_normals() {
        let waves = [WaveDescriptor::default(); MAX_WAVES];
        for &(x, z) in &[(0.0, 0.0), (3.5, -2.0), (100.0, 41.0)] {
            let (p, n) = superpose(&waves, 0.6, EPS, Vec3::new(x, 0.0, z), 7.3);
            assert_eq!(p, Vec3::new(x, 0.0, z));
            assert_eq!(n, Vec3::Y);
        }
    }

    #[test]
    fn single_wave_height_is_bounded_by_amplitude() {
        let waves = [WaveDescriptor {
            direction: Vec3::X,
            amplitude: 1.5,
            wavelength: 12.0,
            speed: 2.0,
            phase: 0.0,
        }];
        for i in 0..200 {
            let x = i as f32 * 0.37;
            let (p, _) = superpose(&waves, 0.6, EPS, Vec3::new(x, 0.0, 0.0), 1.0);
            assert!(p.y.abs() <= 1.5 + 1.0e-4);
        }
    }

    #[test]
    fn wave_travels_with_phase_speed() {
        let waves = [WaveDescriptor {
            direction: Vec3::X,
            amplitude: 1.0,
            wavelength: 10.0,
            speed: 2.0,
            phase: 0.0,
        }];
        // The pattern at (x, t) must equal the pattern at (x + c*dt, t + dt).
        let (a, _) = superpose(&waves, 0.6, EPS, Vec3::new(1.0, 0.0, 0.0), 0.0);
        let (b, _) = superpose(&waves, 0.6, EPS, Vec3::new(1.0 + 2.0 * 0.5, 0.0, 0.0), 0.5);
        assert!((a.y - b.y).abs() < 1.0e-4);
    }

    #[test]
    fn normals_tilt_against_travel_direction_on_front_face() {
        let waves = [WaveDescriptor {
            direction: Vec3::X,
            amplitude: 0.5,
            wavelength: 20.0,
            speed: 0.0,
            phase: 0.0,
        }];
        // theta == 0 at the origin: rising front, normal leans toward -X.
        let (_, n) = superpose(&waves, 0.6, EPS, Vec3::ZERO, 0.0);
        assert!(n.x < 0.0);
        assert!(n.y > 0.9);
    }

    #[test]
    fn default_wave_is_inert_with_sane_parameters() {
        let wave = WaveDescriptor::default();
        assert_eq!(wave.amplitude, 0.0);
        assert_eq!(wave.wavelength, 10.0);
        assert_eq!(wave.speed, 2.0);
    }
}
