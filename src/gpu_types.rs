//! GPU-mirrored data blocks.
//!
//! Every struct here is part of the binding contract with the compute and
//! shading stages: field order, padding, and 16-byte block alignment must
//! match the WGSL declarations in `src/shaders/` exactly. The CPU side is
//! authoritative: these buffers are written every frame and never read back
//! (only the displaced vertex output travels GPU→CPU, via copy).

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use crate::gerstner::MAX_WAVES;
use crate::ripple::MAX_RIPPLES;

/// One packed ripple event (32 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RippleGpu {
    /// Center on the world XZ plane.
    pub position: [f32; 2],
    pub start_time: f32,
    pub intensity: f32,
    pub duration: f32,
    pub max_radius: f32,
    pub speed: f32,
    pub _pad: f32,
}

/// Full ripple constant block: 8 fixed entries plus the frame footer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RippleBufferGpu {
    pub ripples: [RippleGpu; MAX_RIPPLES],
    /// Number of valid entries in `ripples`, packed front-to-back.
    pub active_count: u32,
    pub current_time: f32,
    /// Default propagation speed for entries with speed == 0.
    pub speed: f32,
    /// Radial falloff exponent applied in the kernel.
    pub decay: f32,
}

impl Default for RippleBufferGpu {
    fn default() -> Self {
        Self {
            ripples: [RippleGpu::default(); MAX_RIPPLES],
            active_count: 0,
            current_time: 0.0,
            speed: 1.0,
            decay: 1.0,
        }
    }
}

/// One Gerstner wave descriptor (32 bytes), array of [`MAX_WAVES`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WaveInfoGpu {
    pub direction: [f32; 3],
    pub amplitude: f32,
    pub wavelength: f32,
    pub speed: f32,
    /// Static phase offset in radians.
    pub phase: f32,
    pub _pad: f32,
}

/// Phillips spectrum parameters (32 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpectrumGpu {
    pub wind_speed: f32,
    pub wind_direction: [f32; 2],
    pub amplitude: f32,
    pub suppression: f32,
    pub _pad: [f32; 3],
}

/// Water shading passthrough (64 bytes, four 16-byte blocks).
///
/// Each color occupies a vec3 slot with one shading scalar deliberately
/// packed into the fourth lane of its block, rather than trailing all
/// scalars after the colors: the interleaving keeps every block exactly
/// 16 bytes with no extra padding, and the shading stage declares the
/// matching layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ColorGpu {
    pub sea_base: [f32; 3],
    pub base_strength: f32,
    pub sea_shallow: [f32; 3],
    pub water_clarity: f32,
    pub sky: [f32; 3],
    pub foam_threshold: f32,
    pub deep_water: [f32; 3],
    pub foam_scale: f32,
}

impl Default for ColorGpu {
    fn default() -> Self {
        Self {
            sea_base: [0.02, 0.12, 0.25],
            base_strength: 0.6,
            sea_shallow: [0.1, 0.35, 0.45],
            water_clarity: 0.75,
            sky: [0.55, 0.7, 0.9],
            foam_threshold: 0.55,
            deep_water: [0.01, 0.05, 0.12],
            foam_scale: 1.0,
        }
    }
}

/// Displaced surface vertex as written by the compute kernels (48 bytes).
///
/// Padded to WGSL storage-array alignment; the render collaborator consumes
/// this layout directly as its vertex stream.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub normal: [f32; 3],
    pub _pad1: f32,
    pub uv: [f32; 2],
    pub _pad2: [f32; 2],
}

/// Per-dispatch simulation settings (96 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SimSettingsGpu {
    /// Local-to-world transform applied to displaced positions.
    pub world: [[f32; 4]; 4],
    /// Cells per side; vertex grid is (grid_size + 1)^2.
    pub grid_size: u32,
    pub grid_spacing: f32,
    /// Step used for finite-difference normal estimation.
    pub normal_eps: f32,
    pub time: f32,
    /// Shared crest sharpening factor, [0, 1].
    pub steepness: f32,
    pub _pad: [f32; 3],
}

impl Default for SimSettingsGpu {
    fn default() -> Self {
        Self {
            world: glam::Mat4::IDENTITY.to_cols_array_2d(),
            grid_size: 0,
            grid_spacing: 1.0,
            normal_eps: 0.1,
            time: 0.0,
            steepness: 0.6,
            _pad: [0.0; 3],
        }
    }
}

/// Butterfly pass parameters (16 bytes): one uniform write per FFT stage.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FftStageGpu {
    pub stage: u32,
    /// 0 = horizontal pass, 1 = vertical pass.
    pub axis: u32,
    pub resolution: u32,
    /// Ping-pong selector: which buffer is read this stage.
    pub ping: u32,
}

/// Spectrum evolution / output assembly parameters (16 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpectralFrameGpu {
    pub resolution: u32,
    pub domain_size: f32,
    pub time: f32,
    pub choppiness: f32,
}

const_assert_eq!(std::mem::size_of::<RippleGpu>(), 32);
const_assert_eq!(std::mem::size_of::<RippleBufferGpu>(), 32 * MAX_RIPPLES + 16);
const_assert_eq!(std::mem::size_of::<WaveInfoGpu>(), 32);
const_assert_eq!(std::mem::size_of::<SpectrumGpu>(), 32);
const_assert_eq!(std::mem::size_of::<ColorGpu>(), 64);
const_assert_eq!(std::mem::size_of::<SurfaceVertex>(), 48);
const_assert_eq!(std::mem::size_of::<SimSettingsGpu>(), 96);
const_assert_eq!(std::mem::size_of::<FftStageGpu>(), 16);
const_assert_eq!(std::mem::size_of::<SpectralFrameGpu>(), 16);
