//! Phillips spectrum sampling and time evolution.
//!
//! The initial spectrum h0(k) is generated once on the CPU with seeded
//! Gaussian draws and uploaded to the GPU; per-frame evolution to h(k, t)
//! runs in the `spectrum_evolve` kernel, which mirrors [`evolve`].

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::params::SpectrumParameters;

/// Standard gravity, m/s^2. Fixed by the deep-water dispersion relation.
pub const GRAVITY: f32 = 9.81;

/// A complex amplitude stored as (re, im). Kept as a plain pair so spectrum
/// slices can be cast directly into GPU upload buffers.
pub type Complex = [f32; 2];

/// Phillips spectrum energy for wave vector `k`.
///
/// `P(k) = A * exp(-1/(k L)^2) / k^4 * |k_hat . w_hat|^2 * exp(-k^2 l^2)`
/// with `L = V^2 / g` the largest wind-driven wave and `l` the small-wave
/// suppression length. Waves moving against the wind are damped.
pub fn phillips(k: Vec2, params: &SpectrumParameters) -> f32 {
    let k_len = k.length();
    if k_len < 1.0e-6 {
        return 0.0;
    }

    let wind = params.wind_direction_normalized();
    let l_big = params.wind_speed * params.wind_speed / GRAVITY;
    let k_hat = k / k_len;

    let alignment = k_hat.dot(wind);
    let k2 = k_len * k_len;

    let mut p = params.amplitude * (-1.0 / (k2 * l_big * l_big)).exp() / (k2 * k2)
        * alignment
        * alignment;

    // Waves travelling against the wind are heavily suppressed.
    if alignment < 0.0 {
        p *= 0.07;
    }

    // Small-wave cutoff keeps sub-grid chop from aliasing.
    let l_small = params.suppression;
    p * (-k2 * l_small * l_small).exp()
}

/// Deep-water dispersion: angular frequency for wave number `|k|`.
pub fn dispersion(k_len: f32) -> f32 {
    (GRAVITY * k_len).sqrt()
}

/// The wave vector for frequency-grid cell `(x, y)` on an `n`-point grid
/// spanning `domain_size` meters. Frequencies are centered: indices past
/// n/2 alias to negative wave numbers.
pub fn wave_vector(x: u32, y: u32, n: u32, domain_size: f32) -> Vec2 {
    let half = (n / 2) as i32;
    let kx = x as i32 - half;
    let ky = y as i32 - half;
    let scale = std::f32::consts::TAU / domain_size;
    Vec2::new(kx as f32 * scale, ky as f32 * scale)
}

/// Generates the initial complex spectrum h0(k) over an `n x n` grid.
///
/// `h0(k) = (xi_r + i xi_i) * sqrt(P(k) / 2)` with xi drawn from a standard
/// normal (Box-Muller over the seeded generator). Deterministic for a given
/// seed and parameter set.
pub fn generate_h0(n: u32, domain_size: f32, params: &SpectrumParameters, seed: u64) -> Vec<Complex> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity((n * n) as usize);

    for y in 0..n {
        for x in 0..n {
            let k = wave_vector(x, y, n, domain_size);
            let root = (phillips(k, params) / 2.0).sqrt();
            let (g0, g1) = gaussian_pair(&mut rng);
            out.push([g0 * root, g1 * root]);
        }
    }
    out
}

/// Evolves h0(k) to h(k, t) by phase rotation under the dispersion relation:
/// `h(k,t) = h0(k) e^{i w t} + conj(h0(-k)) e^{-i w t}`.
///
/// CPU mirror of the `evolve_spectrum` kernel; used by tests and for h0
/// re-upload checks.
pub fn evolve(h0: &[Complex], n: u32, domain_size: f32, time: f32) -> Vec<Complex> {
    let mut out = vec![[0.0, 0.0]; h0.len()];
    for y in 0..n {
        for x in 0..n {
            let idx = (y * n + x) as usize;
            let k = wave_vector(x, y, n, domain_size);
            let omega = dispersion(k.length());
            let (sin, cos) = (omega * time).sin_cos();

            // Mirror cell holding h0(-k); the center maps to itself.
            let mx = (n - x) % n;
            let my = (n - y) % n;
            let mirror = ((my * n + mx) as usize).min(h0.len() - 1);

            let a = h0[idx];
            let b = h0[mirror];

            // a * e^{iwt} + conj(b) * e^{-iwt}
            out[idx] = [
                a[0] * cos - a[1] * sin + b[0] * cos - b[1] * sin,
                a[0] * sin + a[1] * cos - b[0] * sin - b[1] * cos,
            ];
        }
    }
    out
}

fn gaussian_pair(rng: &mut StdRng) -> (f32, f32) {
    // Box-Muller transform over two uniform draws.
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen::<f32>();
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = std::f32::consts::TAU * u2;
    (r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phillips_is_zero_at_dc() {
        let params = SpectrumParameters::default();
        assert_eq!(phillips(Vec2::ZERO, &params), 0.0);
    }

    #[test]
    fn phillips_favors_wind_aligned_waves() {
        let params = SpectrumParameters::default(); // wind along +X
        let k = 0.5;
        let along = phillips(Vec2::new(k, 0.0), &params);
        let against = phillips(Vec2::new(-k, 0.0), &params);
        let cross = phillips(Vec2::new(0.0, k), &params);

        assert!(along > 0.0);
        assert!(against < along);
        // Perpendicular waves carry no directional energy.
        assert!(cross < along * 1.0e-3);
    }

    #[test]
    fn suppression_damps_short_waves() {
        let reference = SpectrumParameters::default();
        let suppressed = SpectrumParameters {
            suppression: 2.0,
            ..reference.clone()
        };
        let k_short = Vec2::new(3.0, 0.0);
        assert!(phillips(k_short, &suppressed) < phillips(k_short, &reference));
    }

    #[test]
    fn dispersion_follows_sqrt_gk() {
        assert!((dispersion(1.0) - GRAVITY.sqrt()).abs() < 1.0e-5);
        assert!((dispersion(4.0) - 2.0 * GRAVITY.sqrt()).abs() < 1.0e-4);
    }

    #[test]
    fn h0_is_deterministic_per_seed() {
        let params = SpectrumParameters::default();
        let a = generate_h0(16, 100.0, &params, 42);
        let b = generate_h0(16, 100.0, &params, 42);
        let c = generate_h0(16, 100.0, &params, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn evolve_at_t0_is_hermitian_sum() {
        let params = SpectrumParameters::default();
        let n = 8;
        let h0 = generate_h0(n, 100.0, &params, 1);
        let ht = evolve(&h0, n, 100.0, 0.0);

        // At t = 0 the evolution reduces to h0(k) + conj(h0(-k)).
        for y in 0..n {
            for x in 0..n {
                let idx = (y * n + x) as usize;
                let mx = (n - x) % n;
                let my = (n - y) % n;
                let mirror = ((my * n + mx) as usize).min(h0.len() - 1);
                let expected = [
                    h0[idx][0] + h0[mirror][0],
                    h0[idx][1] - h0[mirror][1],
                ];
                assert!((ht[idx][0] - expected[0]).abs() < 1.0e-6);
                assert!((ht[idx][1] - expected[1]).abs() < 1.0e-6);
            }
        }
    }
}
