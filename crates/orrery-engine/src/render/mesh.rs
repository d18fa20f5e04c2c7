//! Mesh primitives and GPU upload.
//!
//! Every mesh is an immutable (vertex buffer, index buffer) pair created once
//! at startup. CPU-side [`MeshData`] is validated before any GPU allocation
//! happens, so a malformed mesh fails the startup attempt instead of
//! producing out-of-range reads at draw time.

use anyhow::{bail, Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

/// Vertex format shared by every mesh: position, normal, vertex color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x4  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// CPU mesh data, ready for upload.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

// ── cube ──────────────────────────────────────────────────────────────────

/// Corner positions and colors of the unit-2 cube.
const CUBE_CORNERS: [([f32; 3], [f32; 4]); 8] = [
    ([-1.0, 1.0, -1.0], [0.0, 0.0, 1.0, 1.0]),
    ([1.0, 1.0, -1.0], [0.0, 1.0, 1.0, 1.0]),
    ([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0, 1.0]),
    ([1.0, -1.0, -1.0], [1.0, 0.0, 0.0, 1.0]),
    ([-1.0, 1.0, 1.0], [1.0, 0.0, 1.0, 1.0]),
    ([1.0, 1.0, 1.0], [1.0, 1.0, 0.0, 1.0]),
    ([-1.0, -1.0, 1.0], [0.0, 0.0, 0.0, 1.0]),
    ([1.0, -1.0, 1.0], [0.5, 0.5, 1.0, 1.0]),
];

/// Cube triangles as corner indices, two per face.
const CUBE_TRIS: [[u16; 3]; 12] = [
    [0, 1, 2], [2, 1, 3], // back
    [0, 2, 6], [4, 0, 6], // left
    [1, 5, 7], [1, 7, 3], // right
    [7, 5, 4], [6, 7, 4], // front
    [0, 4, 5], [5, 1, 0], // top
    [7, 6, 2], [7, 2, 3], // bottom
];

// ── pyramid ───────────────────────────────────────────────────────────────

const PYRAMID_CORNERS: [([f32; 3], [f32; 4]); 5] = [
    ([1.0, -1.0, 0.0], [0.0, 0.0, 1.0, 1.0]),
    ([-1.0, -1.0, 0.0], [0.0, 1.0, 1.0, 1.0]),
    ([-1.0, -1.0, -2.0], [1.0, 1.0, 1.0, 1.0]),
    ([1.0, -1.0, -2.0], [1.0, 0.0, 0.0, 1.0]),
    ([0.0, 1.0, -1.0], [1.0, 0.0, 1.0, 1.0]),
];

const PYRAMID_TRIS: [[u16; 3]; 6] = [
    [0, 1, 2], // base
    [0, 2, 3],
    [1, 0, 4],
    [4, 2, 1],
    [3, 4, 0],
    [3, 2, 4],
];

// ── grid palette ──────────────────────────────────────────────────────────

/// Vertex colors cycled across grid columns.
const GRID_PALETTE: [[f32; 4]; 5] = [
    [0.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0, 1.0],
];

impl MeshData {
    /// Flat-shaded cube: 36 vertices (one per triangle corner), 36 indices.
    ///
    /// Corner colors carry over from the shared-corner layout; normals are
    /// baked per face, which is why corners are not shared.
    pub fn cube() -> Self {
        let mut vertices = Vec::with_capacity(CUBE_TRIS.len() * 3);
        let mut indices = Vec::with_capacity(CUBE_TRIS.len() * 3);

        for tri in CUBE_TRIS {
            let normal = face_normal(
                CUBE_CORNERS[tri[0] as usize].0,
                CUBE_CORNERS[tri[1] as usize].0,
                CUBE_CORNERS[tri[2] as usize].0,
            );
            for &corner in &tri {
                let (position, color) = CUBE_CORNERS[corner as usize];
                indices.push(vertices.len() as u16);
                vertices.push(Vertex {
                    position,
                    normal: normal.to_array(),
                    color,
                });
            }
        }

        Self { vertices, indices }
    }

    /// Smooth-shaded pyramid: 5 shared vertices, 6 triangles (18 indices).
    ///
    /// Vertex normals accumulate the normals of every face touching the
    /// vertex, then normalize.
    pub fn pyramid() -> Self {
        let mut normals = [Vec3::ZERO; PYRAMID_CORNERS.len()];
        for tri in PYRAMID_TRIS {
            let normal = face_normal(
                PYRAMID_CORNERS[tri[0] as usize].0,
                PYRAMID_CORNERS[tri[1] as usize].0,
                PYRAMID_CORNERS[tri[2] as usize].0,
            );
            for &corner in &tri {
                normals[corner as usize] += normal;
            }
        }

        let vertices = PYRAMID_CORNERS
            .iter()
            .zip(normals.iter())
            .map(|(&(position, color), normal)| Vertex {
                position,
                normal: normal.normalize().to_array(),
                color,
            })
            .collect();

        let indices = PYRAMID_TRIS.iter().flatten().copied().collect();

        Self { vertices, indices }
    }

    /// Procedural grid plane in the XZ plane, centered on the origin.
    ///
    /// `cols` × `rows` vertices spanning `width` × `depth` local units, two
    /// triangles per cell: `(cols-1) * (rows-1) * 6` indices. Colors cycle
    /// the palette per column; normals point +Y.
    pub fn grid_plane(cols: u32, rows: u32, width: f32, depth: f32) -> Self {
        assert!(cols >= 2 && rows >= 2, "grid needs at least 2x2 vertices");
        assert!(
            cols.checked_mul(rows).is_some_and(|n| n <= u16::MAX as u32 + 1),
            "grid vertex count exceeds 16-bit index range"
        );

        let mut vertices = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            let z = -depth / 2.0 + depth * row as f32 / (rows - 1) as f32;
            for col in 0..cols {
                let x = -width / 2.0 + width * col as f32 / (cols - 1) as f32;
                vertices.push(Vertex {
                    position: [x, 0.0, z],
                    normal: [0.0, 1.0, 0.0],
                    color: GRID_PALETTE[(col % GRID_PALETTE.len() as u32) as usize],
                });
            }
        }

        let mut indices = Vec::with_capacity(((cols - 1) * (rows - 1) * 6) as usize);
        for row in 0..rows - 1 {
            for col in 0..cols - 1 {
                let v = (row * cols + col) as u16;
                let below = v + cols as u16;
                indices.extend_from_slice(&[v, v + 1, below]);
                indices.extend_from_slice(&[v + 1, below + 1, below]);
            }
        }

        Self { vertices, indices }
    }

    /// Number of indices, as drawn.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Rejects meshes that would read out of range at draw time.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            bail!("mesh has no vertices");
        }
        if self.indices.len() % 3 != 0 {
            bail!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            );
        }
        let vertex_count = self.vertices.len();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            bail!("index {bad} out of range for {vertex_count} vertices");
        }
        Ok(())
    }
}

/// GPU mesh: immutable vertex/index buffer pair plus the fixed index count.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Validates and uploads `data`.
    ///
    /// Validation runs before any buffer is created, so a rejected mesh
    /// leaves nothing allocated.
    pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Result<Self> {
        data.validate()
            .with_context(|| format!("mesh '{label}' rejected"))?;

        let vbo_label = format!("{label} vertex buffer");
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&vbo_label),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibo_label = format!("{label} index buffer");
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&ibo_label),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: data.index_count(),
        })
    }
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Vec3 {
    let (a, b, c) = (Vec3::from(a), Vec3::from(b), Vec3::from(c));
    (b - a).cross(c - b).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── cube ──────────────────────────────────────────────────────────────

    #[test]
    fn cube_is_flat_shaded_with_36_indices() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 36);
        assert_eq!(cube.index_count(), 36);
        // One vertex per index, in order.
        assert!(cube.indices.iter().enumerate().all(|(i, &v)| v as usize == i));
    }

    #[test]
    fn cube_normals_are_unit_and_axis_aligned() {
        for v in MeshData::cube().vertices {
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            let axis_components = n.to_array().iter().filter(|c| c.abs() > 1e-5).count();
            assert_eq!(axis_components, 1, "face normal not axis aligned: {n:?}");
        }
    }

    // ── pyramid ───────────────────────────────────────────────────────────

    #[test]
    fn pyramid_shares_5_vertices_across_18_indices() {
        let pyramid = MeshData::pyramid();
        assert_eq!(pyramid.vertices.len(), 5);
        assert_eq!(pyramid.index_count(), 18);
    }

    #[test]
    fn pyramid_normals_are_unit() {
        for v in MeshData::pyramid().vertices {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn pyramid_base_normals_point_down() {
        let pyramid = MeshData::pyramid();
        // The four base corners sit at y = -1; their accumulated normals must
        // face away from the apex.
        for v in &pyramid.vertices[..4] {
            assert!(v.normal[1] < 0.0, "base normal points up: {:?}", v.normal);
        }
    }

    // ── grid plane ────────────────────────────────────────────────────────

    #[test]
    fn grid_index_count_follows_cell_count() {
        let grid = MeshData::grid_plane(5, 5, 2.0, 2.0);
        assert_eq!(grid.vertices.len(), 25);
        assert_eq!(grid.index_count(), 96); // (5-1) * (5-1) * 6
    }

    #[test]
    fn grid_11x11_has_600_indices() {
        let grid = MeshData::grid_plane(11, 11, 2.0, 2.0);
        assert_eq!(grid.vertices.len(), 121);
        assert_eq!(grid.index_count(), 600); // 100 quads, 6 indices each
    }

    #[test]
    fn grid_spans_requested_extent() {
        let grid = MeshData::grid_plane(5, 5, 2.0, 2.0);
        assert_eq!(grid.vertices.first().unwrap().position, [-1.0, 0.0, -1.0]);
        assert_eq!(grid.vertices.last().unwrap().position, [1.0, 0.0, 1.0]);
    }

    #[test]
    fn grid_colors_cycle_per_column() {
        let grid = MeshData::grid_plane(7, 2, 2.0, 2.0);
        assert_eq!(grid.vertices[0].color, GRID_PALETTE[0]);
        assert_eq!(grid.vertices[5].color, GRID_PALETTE[0]); // col 5 wraps
        assert_eq!(grid.vertices[6].color, GRID_PALETTE[1]);
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn primitives_pass_validation() {
        assert!(MeshData::cube().validate().is_ok());
        assert!(MeshData::pyramid().validate().is_ok());
        assert!(MeshData::grid_plane(11, 11, 2.0, 2.0).validate().is_ok());
    }

    #[test]
    fn validation_rejects_out_of_range_index() {
        let mut grid = MeshData::grid_plane(5, 5, 2.0, 2.0);
        grid.indices[20] = 24; // last valid vertex
        assert!(grid.validate().is_ok());
        // A stray index past the last vertex, as a hand-written table typo
        // would produce.
        grid.indices[20] = 26;
        assert!(grid.validate().is_err());
    }

    #[test]
    fn validation_rejects_partial_triangles() {
        let mut cube = MeshData::cube();
        cube.indices.pop();
        assert!(cube.validate().is_err());
    }

    #[test]
    fn validation_rejects_empty_mesh() {
        let empty = MeshData {
            vertices: vec![],
            indices: vec![],
        };
        assert!(empty.validate().is_err());
    }

    // ── vertex layout ─────────────────────────────────────────────────────

    #[test]
    fn vertex_stride_matches_attributes() {
        // 3 + 3 + 4 floats.
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
        assert_eq!(Vertex::layout().array_stride, 40);
    }
}
