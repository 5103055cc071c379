//! Planar grid mesh for the ocean surface.
//!
//! The topology is static after creation and shared by whichever wave
//! backend is active: compute dispatches overwrite vertex positions and
//! normals every frame, the index buffer never changes.

use crate::gpu_types::SurfaceVertex;
use crate::params::SurfaceConfig;

/// Grid mesh with standard two-triangle-per-cell indexing.
pub struct SurfaceMesh {
    pub vertices: Vec<SurfaceVertex>,
    pub indices: Vec<u32>,
    grid_size: u32,
}

impl SurfaceMesh {
    /// Builds a flat `(grid_size + 1)^2` vertex grid on the XZ plane,
    /// centered on the origin, with +Y normals and [0, 1] UVs.
    pub fn new(config: &SurfaceConfig) -> Self {
        let grid_size = config.grid_size;
        let spacing = config.grid_spacing_m;
        let half_size = (grid_size as f32 * spacing) / 2.0;

        let mut vertices = Vec::with_capacity(config.vertex_count() as usize);
        let mut indices = Vec::with_capacity((grid_size * grid_size * 6) as usize);

        for z in 0..=grid_size {
            for x in 0..=grid_size {
                let x_pos = x as f32 * spacing - half_size;
                let z_pos = z as f32 * spacing - half_size;

                vertices.push(SurfaceVertex {
                    position: [x_pos, 0.0, z_pos],
                    normal: [0.0, 1.0, 0.0],
                    uv: [x as f32 / grid_size as f32, z as f32 / grid_size as f32],
                    ..Default::default()
                });
            }
        }

        // Counter-clockwise winding, two triangles per cell.
        for z in 0..grid_size {
            for x in 0..grid_size {
                let top_left = z * (grid_size + 1) + x;
                let top_right = top_left + 1;
                let bottom_left = (z + 1) * (grid_size + 1) + x;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            grid_size,
        }
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn mesh(n: u32) -> SurfaceMesh {
        SurfaceMesh::new(&SurfaceConfig {
            grid_size: n,
            ..Default::default()
        })
    }

    #[test]
    fn counts_match_grid_size() {
        let m = mesh(8);
        assert_eq!(m.vertices.len(), 81); // (8+1)^2
        assert_eq!(m.indices.len(), 8 * 8 * 6); // 2 triangles per cell
    }

    #[test]
    fn interior_vertex_shared_by_four_cells() {
        let m = mesh(4);
        // Vertex (2, 2) is interior.
        let target = 2 * 5 + 2u32;

        let mut cells = HashSet::new();
        for (cell, tri_pair) in m.indices.chunks(6).enumerate() {
            if tri_pair.contains(&target) {
                cells.insert(cell);
            }
        }
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn grid_is_flat_and_centered() {
        let m = mesh(4);
        let half = 4.0 * SurfaceConfig::default().grid_spacing_m / 2.0;
        for v in &m.vertices {
            assert_eq!(v.position[1], 0.0);
            assert!(v.position[0].abs() <= half + 1e-6);
            assert!(v.position[2].abs() <= half + 1e-6);
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn indices_stay_in_bounds() {
        let m = mesh(3);
        let max = m.vertices.len() as u32;
        assert!(m.indices.iter().all(|&i| i < max));
    }
}
