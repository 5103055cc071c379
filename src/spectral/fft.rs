//! Radix-2 Stockham FFT over ping-pong buffers.
//!
//! This is the CPU mirror of the butterfly kernel in `shaders/spectral.wgsl`:
//! `log2(n)` stages, each reading one buffer of the pair and writing the
//! other, selector flipping every stage. Stockham's autosort variant needs
//! no bit-reversal pass, which is why GPU implementations favor it. The 2D
//! inverse transform runs the 1D pass over every row, then every column.
//!
//! Validated against `rustfft` in the test suite.

use std::f32::consts::TAU;

use super::spectrum::Complex;

/// Number of butterfly stages for an `n`-point transform: `log2(n)`.
///
/// `n` must be a power of two; see [`is_valid_resolution`].
pub fn stage_count(n: u32) -> u32 {
    debug_assert!(is_valid_resolution(n));
    n.trailing_zeros()
}

/// Whether `n` is usable as an FFT size / spectral resolution.
pub fn is_valid_resolution(n: u32) -> bool {
    n >= 2 && n.is_power_of_two()
}

/// Unnormalized 1D radix-2 transform. `inverse` selects the conjugate
/// twiddle sign; no `1/n` scaling is applied in either direction.
pub fn fft_1d(input: &[Complex], inverse: bool) -> Vec<Complex> {
    let len = input.len();
    assert!(
        is_valid_resolution(len as u32),
        "FFT length must be a power of two >= 2, got {}",
        len
    );

    let mut ping = input.to_vec();
    let mut pong = vec![[0.0f32; 2]; len];
    let sign = if inverse { 1.0f32 } else { -1.0 };

    // Stockham: per stage, sub-transform length n halves while the
    // interleave stride s doubles; read ping, write pong, flip.
    let mut n = len;
    let mut s = 1usize;
    while n > 1 {
        let m = n / 2;
        let theta0 = sign * TAU / n as f32;
        for p in 0..m {
            let (wi, wr) = (theta0 * p as f32).sin_cos();
            for q in 0..s {
                let a = ping[q + s * p];
                let b = ping[q + s * (p + m)];
                pong[q + s * (2 * p)] = [a[0] + b[0], a[1] + b[1]];
                let d = [a[0] - b[0], a[1] - b[1]];
                pong[q + s * (2 * p + 1)] = [d[0] * wr - d[1] * wi, d[0] * wi + d[1] * wr];
            }
        }
        std::mem::swap(&mut ping, &mut pong);
        n = m;
        s *= 2;
    }
    ping
}

/// 2D inverse FFT of an `n x n` row-major grid, scaled by `1/n^2` so a unit
/// frequency bin produces a unit-amplitude spatial sinusoid.
pub fn ifft_2d(input: &[Complex], n: usize) -> Vec<Complex> {
    assert_eq!(input.len(), n * n, "grid must be n x n");

    // Horizontal passes: one 1D inverse transform per row.
    let mut rows = Vec::with_capacity(n * n);
    for row in input.chunks(n) {
        rows.extend(fft_1d(row, true));
    }

    // Vertical passes over the row results.
    let mut out = vec![[0.0f32; 2]; n * n];
    let mut column = vec![[0.0f32; 2]; n];
    for x in 0..n {
        for y in 0..n {
            column[y] = rows[y * n + x];
        }
        let transformed = fft_1d(&column, true);
        for y in 0..n {
            out[y * n + x] = transformed[y];
        }
    }

    let scale = 1.0 / (n * n) as f32;
    for v in &mut out {
        v[0] *= scale;
        v[1] *= scale;
    }
    out
}
