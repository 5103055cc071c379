//! Surface grid and shading passthrough configuration.

use glam::Vec3;

use crate::gpu_types::ColorGpu;

/// Static configuration for one ocean surface instance.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Grid resolution in cells per side; the vertex grid is
    /// (grid_size + 1)^2.
    pub grid_size: u32,

    /// Spacing between grid vertices in meters.
    pub grid_spacing_m: f32,

    /// Finite-difference step for normal estimation in the Gerstner kernel.
    pub normal_eps: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            grid_size: 255,
            grid_spacing_m: 1.0,
            normal_eps: 0.1,
        }
    }
}

impl SurfaceConfig {
    /// Vertices per side.
    pub fn vertices_per_side(&self) -> u32 {
        self.grid_size + 1
    }

    /// Total vertex count of the grid mesh.
    pub fn vertex_count(&self) -> u32 {
        self.vertices_per_side() * self.vertices_per_side()
    }
}

/// Water shading parameters. Not part of the simulation algorithm: written
/// once per change into the GPU color block and otherwise ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorParams {
    pub sea_base: Vec3,
    pub sea_shallow: Vec3,
    pub sky: Vec3,
    pub deep_water: Vec3,
    pub base_strength: f32,
    pub water_clarity: f32,
    pub foam_threshold: f32,
    /// Foam accumulation scale; only meaningful for the spectral backend.
    pub foam_scale: f32,
}

impl Default for ColorParams {
    fn default() -> Self {
        let gpu = ColorGpu::default();
        Self {
            sea_base: Vec3::from_array(gpu.sea_base),
            sea_shallow: Vec3::from_array(gpu.sea_shallow),
            sky: Vec3::from_array(gpu.sky),
            deep_water: Vec3::from_array(gpu.deep_water),
            base_strength: gpu.base_strength,
            water_clarity: gpu.water_clarity,
            foam_threshold: gpu.foam_threshold,
            foam_scale: gpu.foam_scale,
        }
    }
}

impl ColorParams {
    /// Packs into the 16-byte-aligned GPU block.
    pub fn to_gpu(&self) -> ColorGpu {
        ColorGpu {
            sea_base: self.sea_base.to_array(),
            base_strength: self.base_strength,
            sea_shallow: self.sea_shallow.to_array(),
            water_clarity: self.water_clarity,
            sky: self.sky.to_array(),
            foam_threshold: self.foam_threshold,
            deep_water: self.deep_water.to_array(),
            foam_scale: self.foam_scale,
        }
    }
}
