//! Phillips spectrum parameters.

use glam::Vec2;

/// Statistical sea-state configuration for the spectral simulator.
///
/// Immutable during a frame; mutated only through the owning simulator's
/// setters so spectrum regeneration can be tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumParameters {
    /// Wind speed in m/s. Larger values shift energy toward longer waves.
    pub wind_speed: f32,

    /// Wind direction on the XZ plane. Kept normalized.
    pub wind_direction: Vec2,

    /// Global amplitude scale (the Phillips `A` constant, dimensionless).
    pub amplitude: f32,

    /// Small-wave suppression length in meters: waves shorter than this are
    /// damped by `exp(-k^2 * l^2)` to avoid aliasing shimmer.
    pub suppression: f32,

    /// Horizontal displacement scale for choppy wave crests.
    /// Purely a per-frame shading input; never affects the stored spectrum.
    pub choppiness: f32,
}

impl Default for SpectrumParameters {
    fn default() -> Self {
        Self {
            wind_speed: 12.0,
            wind_direction: Vec2::new(1.0, 0.0),
            amplitude: 2.0e-5,
            suppression: 0.1,
            choppiness: 1.4,
        }
    }
}

impl SpectrumParameters {
    /// Calm sea: light wind, gentle crests.
    pub fn calm() -> Self {
        Self {
            wind_speed: 5.0,
            choppiness: 0.5,
            ..Self::default()
        }
    }

    /// Stormy sea: strong wind, pronounced choppy crests.
    pub fn stormy() -> Self {
        Self {
            wind_speed: 25.0,
            choppiness: 2.2,
            ..Self::default()
        }
    }

    /// Returns the wind direction as a unit vector, defaulting to +X when
    /// a zero vector was stored.
    pub fn wind_direction_normalized(&self) -> Vec2 {
        self.wind_direction.try_normalize().unwrap_or(Vec2::X)
    }

    /// Packs the spectrum-shaping fields into their GPU mirror block.
    pub fn to_gpu(&self) -> crate::gpu_types::SpectrumGpu {
        crate::gpu_types::SpectrumGpu {
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction_normalized().to_array(),
            amplitude: self.amplitude,
            suppression: self.suppression,
            _pad: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_wind_direction_falls_back_to_x() {
        let params = SpectrumParameters {
            wind_direction: Vec2::ZERO,
            ..Default::default()
        };
        assert_eq!(params.wind_direction_normalized(), Vec2::X);
    }

    #[test]
    fn presets_differ_in_energy() {
        assert!(SpectrumParameters::stormy().wind_speed > SpectrumParameters::calm().wind_speed);
    }
}
