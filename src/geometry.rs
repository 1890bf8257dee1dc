//! Procedural mesh generation.
//!
//! Meshes are plain attribute arrays; the backend decides how to upload
//! them. Empty attribute vectors mean "not present".

use std::f32::consts::PI;

use glam::Vec3;

/// How the backend should assemble vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Points,
    Triangles,
    Lines,
}

/// CPU-side mesh description.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub topology: Topology,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 3]>,
    /// Element indices; empty means draw the vertices in order.
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Number of elements a draw call covers.
    pub fn element_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len()
        } else {
            self.indices.len()
        }
    }
}

/// Largest vertex count a mesh with `u16` indices can address.
pub const MAX_INDEXED_VERTICES: u64 = u16::MAX as u64;

/// Vertices [`uv_sphere`] emits for the given segment counts.
pub fn uv_sphere_vertex_count(width_segments: u32, height_segments: u32) -> u64 {
    (width_segments.max(3) as u64 + 1) * (height_segments.max(2) as u64 + 1)
}

/// Vertices [`octahedron`] emits for `detail`: 8 faces of `(detail + 1)^2`
/// triangles each.
pub fn octahedron_vertex_count(detail: u32) -> u64 {
    let side = detail as u64 + 1;
    8 * side * side * 3
}

/// Colored point cloud.
pub fn point_cloud(positions: Vec<[f32; 3]>, colors: Vec<[f32; 3]>) -> MeshData {
    MeshData {
        positions,
        colors,
        ..MeshData::new(Topology::Points)
    }
}

/// Indexed UV sphere centered at the origin.
///
/// `width_segments` runs around the equator, `height_segments` from pole to
/// pole. Pole rows are emitted as single triangles. The vertex count must
/// stay within [`MAX_INDEXED_VERTICES`].
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut mesh = MeshData::new(Topology::Triangles);

    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let normal = Vec3::new(
                -(u * 2.0 * PI).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * 2.0 * PI).sin() * (v * PI).sin(),
            );
            mesh.positions.push((normal * radius).to_array());
            mesh.normals.push(normal.to_array());
            mesh.uvs.push([u, 1.0 - v]);
        }
    }

    let row = (w + 1) as u16;
    for iy in 0..h as u16 {
        for ix in 0..w as u16 {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h as u16 - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

const OCTAHEDRON_VERTICES: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 4],
    [0, 4, 3],
    [0, 3, 5],
    [0, 5, 2],
    [1, 2, 5],
    [1, 5, 3],
    [1, 3, 4],
    [1, 4, 2],
];

/// Octahedron inscribed in a sphere of `radius`.
///
/// Each face is split into `(detail + 1)^2` triangles projected back onto the
/// sphere. With `detail == 0` normals are per face (flat shading); otherwise
/// they point radially. The mesh is a non-indexed triangle list with
/// spherical UVs.
pub fn octahedron(radius: f32, detail: u32) -> MeshData {
    let mut triangles: Vec<[Vec3; 3]> = Vec::new();
    for face in OCTAHEDRON_FACES {
        let [a, b, c] = face.map(|i| Vec3::from_array(OCTAHEDRON_VERTICES[i]));
        subdivide_face(a, b, c, detail, &mut triangles);
    }

    let mut mesh = MeshData::new(Topology::Triangles);
    for tri in triangles {
        let tri = tri.map(|p| p.normalize() * radius);
        let face_normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
        for p in tri {
            let normal = if detail == 0 { face_normal } else { p.normalize() };
            mesh.positions.push(p.to_array());
            mesh.normals.push(normal.to_array());
            mesh.uvs.push(spherical_uv(p));
        }
    }
    mesh
}

fn subdivide_face(a: Vec3, b: Vec3, c: Vec3, detail: u32, out: &mut Vec<[Vec3; 3]>) {
    let cols = detail as usize + 1;
    let mut grid: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
    for i in 0..=cols {
        let t = i as f32 / cols as f32;
        let aj = a.lerp(c, t);
        let bj = b.lerp(c, t);
        let rows = cols - i;
        if rows == 0 {
            grid.push(vec![aj]);
            continue;
        }
        grid.push((0..=rows).map(|j| aj.lerp(bj, j as f32 / rows as f32)).collect());
    }

    for i in 0..cols {
        for j in 0..(2 * (cols - i) - 1) {
            let k = j / 2;
            if j % 2 == 0 {
                out.push([grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                out.push([grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
}

fn spherical_uv(p: Vec3) -> [f32; 2] {
    let azimuth = p.z.atan2(-p.x);
    let inclination = (-p.y).atan2((p.x * p.x + p.z * p.z).sqrt());
    [azimuth / (2.0 * PI) + 0.5, inclination / PI + 0.5]
}

/// Line list tracing every triangle edge of `mesh`.
///
/// Shared edges are emitted once per adjacent triangle, the same way a
/// triangle wireframe is drawn. `mesh` must have at most
/// [`MAX_INDEXED_VERTICES`] vertices.
pub fn wireframe(mesh: &MeshData) -> MeshData {
    debug_assert!(mesh.positions.len() as u64 <= MAX_INDEXED_VERTICES);
    let mut lines = MeshData::new(Topology::Lines);
    lines.positions = mesh.positions.clone();
    let triangle_indices: Vec<u16> = if mesh.indices.is_empty() {
        (0..mesh.positions.len()).map(|i| i as u16).collect()
    } else {
        mesh.indices.clone()
    };
    for tri in triangle_indices.chunks_exact(3) {
        lines
            .indices
            .extend_from_slice(&[tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]]);
    }
    lines
}
