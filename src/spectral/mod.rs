//! Spectral (FFT) ocean synthesis: Phillips spectrum, Stockham butterflies,
//! and the GPU pipeline that ties them together.

mod fft;
mod simulator;
mod spectrum;

pub use fft::{fft_1d, ifft_2d, is_valid_resolution, stage_count};
pub use simulator::{SpectralOceanSimulator, DEFAULT_RESOLUTION};
pub use spectrum::{
    dispersion, evolve, generate_h0, phillips, wave_vector, Complex, GRAVITY,
};
