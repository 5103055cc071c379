//! GPU spectral ocean pipeline.
//!
//! Per frame, strictly ordered: spectrum evolution → `2 * log2(resolution)`
//! butterfly passes over ping-pong buffers (horizontal rows, then vertical
//! columns) → output assembly into the displacement and normal textures.
//! The initial spectrum h0(k) lives on the CPU side of the fence: generated
//! with seeded Gaussian draws, uploaded once, and re-uploaded only when a
//! spectrum-shaping parameter changes (dirty-bit protocol, see setters).

use glam::Vec2;
use log::debug;
use wgpu::util::DeviceExt;

use super::fft;
use super::spectrum;
use crate::gpu_types::{FftStageGpu, RippleBufferGpu, SpectralFrameGpu};
use crate::params::SpectrumParameters;

/// Default frequency-grid resolution. Must be a power of two.
pub const DEFAULT_RESOLUTION: u32 = 256;

/// Complex fields carried through the FFT: height, choppy X, choppy Z.
const FIELD_COUNT: u64 = 3;

/// Statistically realistic ocean surface via Phillips spectrum + inverse
/// FFT, producing shader-readable displacement and normal textures.
pub struct SpectralOceanSimulator {
    resolution: u32,
    domain_size: f32,
    seed: u64,
    params: SpectrumParameters,
    spectrum_dirty: bool,

    h0_buffer: wgpu::Buffer,
    frame_buffer: wgpu::Buffer,
    /// Shader-bindable spectrum params for the shading stage.
    params_buffer: wgpu::Buffer,
    /// Shader-bindable ripple block; the shading stage composites ripples
    /// on top of the spectral displacement.
    ripple_buffer: wgpu::Buffer,
    /// Ping-pong pair; evolve writes `spectra[0]`, each butterfly pass flips.
    spectra: [wgpu::Buffer; 2],

    evolve_pipeline: wgpu::ComputePipeline,
    evolve_bind_group: wgpu::BindGroup,
    fft_pipeline: wgpu::ComputePipeline,
    /// One pre-built bind group per butterfly pass, orientation baked in.
    fft_passes: Vec<wgpu::BindGroup>,
    assemble_pipeline: wgpu::ComputePipeline,
    assemble_bind_group: wgpu::BindGroup,

    displacement_tex: wgpu::Texture,
    normal_tex: wgpu::Texture,
    displacement_view: wgpu::TextureView,
    normal_view: wgpu::TextureView,
}

impl SpectralOceanSimulator {
    /// Creates the simulator and all GPU-resident state for `resolution^2`
    /// frequency bins over a `domain_size`-meter tile.
    ///
    /// Fails when `resolution` is not a power of two: the butterfly stage
    /// count is `log2(resolution)` and nothing else is meaningful.
    pub fn new(
        device: &wgpu::Device,
        resolution: u32,
        domain_size: f32,
        params: SpectrumParameters,
        seed: u64,
    ) -> Result<Self, String> {
        if !fft::is_valid_resolution(resolution) {
            return Err(format!(
                "spectral resolution must be a power of two >= 2, got {}",
                resolution
            ));
        }

        let n = resolution as u64;
        let complex_size = 2 * std::mem::size_of::<f32>() as u64;

        let h0 = spectrum::generate_h0(resolution, domain_size, &params, seed);
        let h0_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Initial Spectrum h0"),
            contents: bytemuck::cast_slice(&h0),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let frame = SpectralFrameGpu {
            resolution,
            domain_size,
            time: 0.0,
            choppiness: params.choppiness,
        };
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spectral Frame Params"),
            contents: bytemuck::bytes_of(&frame),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spectrum Params"),
            contents: bytemuck::bytes_of(&params.to_gpu()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let ripple_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spectral Ripple Buffer"),
            contents: bytemuck::bytes_of(&RippleBufferGpu::default()),
            usage: wgpu::BufferUsages::UNIFORM
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
        });

        let spectra_size = FIELD_COUNT * n * n * complex_size;
        let spectra = [0, 1].map(|i| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(if i == 0 { "Spectra Ping" } else { "Spectra Pong" }),
                size: spectra_size,
                usage: wgpu::BufferUsages::STORAGE,
                mapped_at_creation: false,
            })
        });

        let make_texture = |label: &str| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: resolution,
                    height: resolution,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba32Float,
                usage: wgpu::TextureUsages::STORAGE_BINDING
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            })
        };
        let displacement_tex = make_texture("Ocean Displacement");
        let normal_tex = make_texture("Ocean Normal");
        let displacement_view =
            displacement_tex.create_view(&wgpu::TextureViewDescriptor::default());
        let normal_view = normal_tex.create_view(&wgpu::TextureViewDescriptor::default());

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Spectral Ocean Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/spectral.wgsl").into()),
        });

        // Evolve: h0 -> h(k, t) for all three fields.
        let evolve_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Evolve Layout"),
            entries: &[
                buffer_entry(0, wgpu::BufferBindingType::Uniform),
                buffer_entry(1, wgpu::BufferBindingType::Storage { read_only: true }),
                buffer_entry(2, wgpu::BufferBindingType::Storage { read_only: false }),
            ],
        });
        let evolve_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Evolve Bind Group"),
            layout: &evolve_layout,
            entries: &[
                bind(0, &frame_buffer),
                bind(1, &h0_buffer),
                bind(2, &spectra[0]),
            ],
        });

        // Butterfly: per-pass uniforms and ping-pong orientation are baked
        // into one bind group per pass at init, so the whole frame records
        // without any mid-encoder uniform rewrites.
        let fft_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("FFT Layout"),
            entries: &[
                buffer_entry(0, wgpu::BufferBindingType::Uniform),
                buffer_entry(1, wgpu::BufferBindingType::Storage { read_only: true }),
                buffer_entry(2, wgpu::BufferBindingType::Storage { read_only: false }),
            ],
        });

        let stages = fft::stage_count(resolution);
        let mut fft_passes = Vec::with_capacity(2 * stages as usize);
        let mut ping = 0usize;
        for axis in 0..2u32 {
            for stage in 0..stages {
                let stage_params = FftStageGpu {
                    stage,
                    axis,
                    resolution,
                    ping: ping as u32,
                };
                let stage_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("FFT Stage Params"),
                    contents: bytemuck::bytes_of(&stage_params),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                fft_passes.push(device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("FFT Pass Bind Group"),
                    layout: &fft_layout,
                    entries: &[
                        bind(0, &stage_buffer),
                        bind(1, &spectra[ping]),
                        bind(2, &spectra[1 - ping]),
                    ],
                }));
                ping = 1 - ping;
            }
        }
        // An even pass count lands the spatial result back in spectra[0].
        debug_assert_eq!(ping, 0);

        // Assembly: sign-corrected real parts -> displacement, finite
        // differences -> normal + Jacobian foam factor.
        let assemble_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Assemble Layout"),
            entries: &[
                buffer_entry(0, wgpu::BufferBindingType::Uniform),
                buffer_entry(1, wgpu::BufferBindingType::Storage { read_only: true }),
                texture_entry(2),
                texture_entry(3),
            ],
        });
        let assemble_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Assemble Bind Group"),
            layout: &assemble_layout,
            entries: &[
                bind(0, &frame_buffer),
                bind(1, &spectra[0]),
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&displacement_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&normal_view),
                },
            ],
        });

        let make_pipeline = |label: &str, entry: &str, layout: &wgpu::BindGroupLayout| {
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[layout],
                push_constant_ranges: &[],
            });
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some(entry),
                compilation_options: Default::default(),
                cache: None,
            })
        };

        Ok(Self {
            resolution,
            domain_size,
            seed,
            params,
            spectrum_dirty: false,
            h0_buffer,
            frame_buffer,
            params_buffer,
            ripple_buffer,
            spectra,
            evolve_pipeline: make_pipeline("Evolve Pipeline", "evolve_spectrum", &evolve_layout),
            evolve_bind_group,
            fft_pipeline: make_pipeline("FFT Pipeline", "butterfly", &fft_layout),
            fft_passes,
            assemble_pipeline: make_pipeline("Assemble Pipeline", "assemble_output", &assemble_layout),
            assemble_bind_group,
            displacement_tex,
            normal_tex,
            displacement_view,
            normal_view,
        })
    }

    /// Wind speed in m/s. Takes effect on the next `update`, which
    /// regenerates the initial spectrum.
    pub fn set_wind_speed(&mut self, speed: f32) {
        self.params.wind_speed = speed.max(0.0);
        self.spectrum_dirty = true;
    }

    /// Wind direction on the XZ plane. Regenerates on next `update`.
    pub fn set_wind_direction(&mut self, direction: Vec2) {
        self.params.wind_direction = direction;
        self.spectrum_dirty = true;
    }

    /// Phillips amplitude constant. Regenerates on next `update`.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.params.amplitude = amplitude.max(0.0);
        self.spectrum_dirty = true;
    }

    /// Small-wave suppression length. Regenerates on next `update`.
    pub fn set_suppression(&mut self, suppression: f32) {
        self.params.suppression = suppression.max(0.0);
        self.spectrum_dirty = true;
    }

    /// Horizontal choppiness scale. Per-frame uniform only; never touches
    /// the stored spectrum.
    pub fn set_choppiness(&mut self, choppiness: f32) {
        self.params.choppiness = choppiness;
    }

    pub fn params(&self) -> &SpectrumParameters {
        &self.params
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Butterfly stages per axis: `log2(resolution)`.
    pub fn stage_count(&self) -> u32 {
        fft::stage_count(self.resolution)
    }

    pub fn is_spectrum_dirty(&self) -> bool {
        self.spectrum_dirty
    }

    /// Shader-readable combined xyz displacement.
    pub fn displacement_view(&self) -> &wgpu::TextureView {
        &self.displacement_view
    }

    pub fn displacement_texture(&self) -> &wgpu::Texture {
        &self.displacement_tex
    }

    pub fn normal_texture(&self) -> &wgpu::Texture {
        &self.normal_tex
    }

    /// Uniform block of the current spectrum parameters, for render-side
    /// binding. Refreshed whenever the spectrum is regenerated.
    pub fn params_buffer(&self) -> &wgpu::Buffer {
        &self.params_buffer
    }

    /// Uniform ripple block, rewritten every `update`. The shading stage
    /// binds it to composite circular disturbances over the FFT sea.
    pub fn ripple_buffer(&self) -> &wgpu::Buffer {
        &self.ripple_buffer
    }

    /// Shader-readable normals; w carries the Jacobian foam factor.
    pub fn normal_view(&self) -> &wgpu::TextureView {
        &self.normal_view
    }

    /// Uploads this frame's uniforms and ripple block and, when a
    /// spectrum-shaping parameter changed, regenerates and re-uploads h0(k).
    pub fn update(&mut self, queue: &wgpu::Queue, now: f32, ripples: &RippleBufferGpu) {
        if self.spectrum_dirty {
            debug!(
                "regenerating initial spectrum (wind {} m/s)",
                self.params.wind_speed
            );
            let h0 = spectrum::generate_h0(
                self.resolution,
                self.domain_size,
                &self.params,
                self.seed,
            );
            queue.write_buffer(&self.h0_buffer, 0, bytemuck::cast_slice(&h0));
            queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&self.params.to_gpu()));
            self.spectrum_dirty = false;
        }

        let frame = SpectralFrameGpu {
            resolution: self.resolution,
            domain_size: self.domain_size,
            time: now,
            choppiness: self.params.choppiness,
        };
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));
        queue.write_buffer(&self.ripple_buffer, 0, bytemuck::bytes_of(ripples));
    }

    /// Records the full per-frame pipeline. Pass order is the algorithm:
    /// evolve, then `2 * log2(n)` butterflies, then assemble.
    pub fn dispatch(&self, encoder: &mut wgpu::CommandEncoder) {
        let n = self.resolution;
        let tiles = n.div_ceil(8);

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Spectrum Evolve"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.evolve_pipeline);
            pass.set_bind_group(0, &self.evolve_bind_group, &[]);
            pass.dispatch_workgroups(tiles, tiles, 1);
        }

        // Each pass transforms n/2 butterflies x n lines x 3 fields.
        let butterfly_tiles_x = (n / 2).div_ceil(8);
        for bind_group in &self.fft_passes {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("FFT Butterfly"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.fft_pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.dispatch_workgroups(butterfly_tiles_x, tiles, FIELD_COUNT as u32);
        }

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Output Assembly"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.assemble_pipeline);
            pass.set_bind_group(0, &self.assemble_bind_group, &[]);
            pass.dispatch_workgroups(tiles, tiles, 1);
        }
    }
}

fn buffer_entry(binding: u32, ty: wgpu::BufferBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::StorageTexture {
            access: wgpu::StorageTextureAccess::WriteOnly,
            format: wgpu::TextureFormat::Rgba32Float,
            view_dimension: wgpu::TextureViewDimension::D2,
        },
        count: None,
    }
}

fn bind(binding: u32, buffer: &wgpu::Buffer) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry {
        binding,
        resource: buffer.as_entire_binding(),
    }
}
