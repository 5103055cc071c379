//! Swell - procedural ocean wave simulation on the GPU
//!
//! Two interchangeable wave backends drive a shared grid mesh: closed-form
//! Gerstner superposition for stylized seas and a Phillips-spectrum FFT
//! pipeline for statistically realistic ones. A bounded ripple pool layers
//! gameplay-driven circular disturbances on top of either backend.

pub mod context;
pub mod controller;
pub mod gerstner;
pub mod gpu_types;
pub mod mesh;
pub mod params;
pub mod ripple;
pub mod spectral;

pub use context::GpuContext;
pub use controller::{OceanBackend, OceanSurfaceController};
pub use gerstner::{GerstnerWaveSynthesizer, WaveDescriptor, MAX_WAVES};
pub use mesh::SurfaceMesh;
pub use params::{ColorParams, SpectrumParameters, SurfaceConfig};
pub use ripple::{ContactTracker, RippleEvent, RipplePool, MAX_RIPPLES};
pub use spectral::SpectralOceanSimulator;
