//! Parameter definitions with physical units and documented semantics.

mod spectrum;
mod surface;

pub use spectrum::SpectrumParameters;
pub use surface::{ColorParams, SurfaceConfig};
