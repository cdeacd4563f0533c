//! Procedural meshes for the two bodies: a per-face textured cube for the
//! satellite and a latitude/longitude sphere for the Earth.
//!
//! Both generators share one winding convention: seen from outside, every
//! triangle runs clockwise, so `(b - a) x (c - a)` points into the surface.
//! Texture coordinates use a bottom-left origin.

use glam::Vec3;
use std::f32::consts::PI;

/// Number of indices covering the cube face drawn with the primary texture.
pub const PRIMARY_FACE_INDEX_COUNT: u32 = 6;

/// Errors from mesh generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Sphere strip counts must both be at least one.
    #[error("sphere needs at least one latitude and longitude strip, got {latitude}x{longitude}")]
    InvalidStrips { latitude: u32, longitude: u32 },
}

/// CPU-side mesh data, built once and uploaded as immutable GPU buffers.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Unit outward normals, one per vertex.
    pub normals: Vec<Vec3>,
    /// Texture coordinates, one per vertex.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// One cube face: outward normal plus the in-plane axes with `u x v = normal`.
struct CubeFace {
    normal: Vec3,
    u: Vec3,
    v: Vec3,
}

/// Face order matters: the first face owns the primary texture.
const CUBE_FACES: [CubeFace; 6] = [
    // front
    CubeFace { normal: Vec3::Z, u: Vec3::X, v: Vec3::Y },
    // back
    CubeFace { normal: Vec3::NEG_Z, u: Vec3::NEG_X, v: Vec3::Y },
    // top
    CubeFace { normal: Vec3::Y, u: Vec3::X, v: Vec3::NEG_Z },
    // bottom
    CubeFace { normal: Vec3::NEG_Y, u: Vec3::X, v: Vec3::Z },
    // right
    CubeFace { normal: Vec3::X, u: Vec3::NEG_Z, v: Vec3::Y },
    // left
    CubeFace { normal: Vec3::NEG_X, u: Vec3::Z, v: Vec3::Y },
];

/// Generate the satellite cube: 24 vertices (4 unshared per face) and 36 indices.
///
/// Each face maps the full `[0,1]x[0,1]` texture square. The first
/// [`PRIMARY_FACE_INDEX_COUNT`] indices cover the front (+Z) face.
pub fn generate_cube(half_extent: f32) -> Mesh {
    let mut mesh = Mesh {
        positions: Vec::with_capacity(24),
        normals: Vec::with_capacity(24),
        uvs: Vec::with_capacity(24),
        indices: Vec::with_capacity(36),
    };

    for face in &CUBE_FACES {
        let base = mesh.positions.len() as u32;
        let corners = [
            (face.normal - face.u - face.v, [0.0, 0.0]),
            (face.normal + face.u - face.v, [1.0, 0.0]),
            (face.normal + face.u + face.v, [1.0, 1.0]),
            (face.normal - face.u + face.v, [0.0, 1.0]),
        ];
        for (corner, uv) in corners {
            mesh.positions.push(corner * half_extent);
            mesh.normals.push(face.normal);
            mesh.uvs.push(uv);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    mesh
}

/// Generate a latitude/longitude sphere with `(M+1)(N+1)` vertices and `6MN` indices.
///
/// Row `i` sweeps the polar angle `i*pi/M` from the +Y pole; column `j` sweeps
/// the azimuth `2*j*pi/N`. The seam column is duplicated so texture
/// coordinates can run the full range.
pub fn generate_sphere(
    latitude_strips: u32,
    longitude_strips: u32,
    radius: f32,
) -> Result<Mesh, GeometryError> {
    if latitude_strips == 0 || longitude_strips == 0 {
        return Err(GeometryError::InvalidStrips {
            latitude: latitude_strips,
            longitude: longitude_strips,
        });
    }

    let m = latitude_strips;
    let n = longitude_strips;
    let vertex_count = ((m + 1) * (n + 1)) as usize;

    let mut mesh = Mesh {
        positions: Vec::with_capacity(vertex_count),
        normals: Vec::with_capacity(vertex_count),
        uvs: Vec::with_capacity(vertex_count),
        indices: Vec::with_capacity((6 * m * n) as usize),
    };

    for i in 0..=m {
        let polar = i as f32 * PI / m as f32;
        let (sin_polar, cos_polar) = polar.sin_cos();
        for j in 0..=n {
            let azimuth = 2.0 * j as f32 * PI / n as f32;
            let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();

            let normal = Vec3::new(sin_polar * cos_azimuth, cos_polar, sin_polar * sin_azimuth);
            mesh.normals.push(normal);
            mesh.positions.push(normal * radius);
            mesh.uvs.push(sphere_uv(i, j, m, n));
        }
    }

    for i in 0..m {
        for j in 0..n {
            let v1 = i * (n + 1) + j;
            let v2 = v1 + n + 1;
            let v3 = v1 + 1;
            let v4 = v2 + 1;
            mesh.indices.extend_from_slice(&[v1, v2, v3, v3, v2, v4]);
        }
    }

    Ok(mesh)
}

/// Texture coordinate for sphere grid point `(i, j)`, flipped on both axes so
/// the image is upright and not mirrored.
fn sphere_uv(i: u32, j: u32, m: u32, n: u32) -> [f32; 2] {
    [(n - j) as f32 / n as f32, (m - i) as f32 / m as f32]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    /// Signed winding of triangle `t` relative to the outward direction `out`.
    fn winding(mesh: &Mesh, t: usize, out: Vec3) -> f32 {
        let a = mesh.positions[mesh.indices[t * 3] as usize];
        let b = mesh.positions[mesh.indices[t * 3 + 1] as usize];
        let c = mesh.positions[mesh.indices[t * 3 + 2] as usize];
        (b - a).cross(c - a).dot(out)
    }

    #[test]
    fn test_sphere_counts() {
        for (m, n) in [(1, 1), (1, 5), (3, 4), (30, 30), (7, 2)] {
            let mesh = generate_sphere(m, n, 2.0).unwrap();
            assert_eq!(mesh.vertex_count(), ((m + 1) * (n + 1)) as usize);
            assert_eq!(mesh.indices.len(), (6 * m * n) as usize);
            assert_eq!(mesh.normals.len(), mesh.vertex_count());
            assert_eq!(mesh.uvs.len(), mesh.vertex_count());
        }
    }

    #[test]
    fn test_sphere_rejects_zero_strips() {
        assert_eq!(
            generate_sphere(0, 4, 1.0).unwrap_err(),
            GeometryError::InvalidStrips {
                latitude: 0,
                longitude: 4
            }
        );
        assert!(generate_sphere(4, 0, 1.0).is_err());
    }

    #[test]
    fn test_sphere_position_is_scaled_normal() {
        let radius = 8.0;
        let mesh = generate_sphere(9, 13, radius).unwrap();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((*p - *n * radius).length() < EPS);
            assert!((n.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_sphere_uv_formula() {
        let (m, n) = (6, 8);
        let mesh = generate_sphere(m, n, 1.0).unwrap();
        for i in 0..=m {
            for j in 0..=n {
                let uv = mesh.uvs[(i * (n + 1) + j) as usize];
                assert!((uv[0] - (n - j) as f32 / n as f32).abs() < EPS);
                assert!((uv[1] - (m - i) as f32 / m as f32).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_sphere_uv_corners() {
        let (m, n) = (5, 7);
        let mesh = generate_sphere(m, n, 1.0).unwrap();
        assert_eq!(mesh.uvs[0], [1.0, 1.0]);
        assert_eq!(mesh.uvs[mesh.vertex_count() - 1], [0.0, 0.0]);
    }

    #[test]
    fn test_sphere_poles() {
        let mesh = generate_sphere(4, 4, 3.0).unwrap();
        assert!((mesh.positions[0] - Vec3::new(0.0, 3.0, 0.0)).length() < EPS);
        let last = mesh.positions[mesh.vertex_count() - 1];
        assert!((last - Vec3::new(0.0, -3.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_sphere_indices_in_bounds() {
        let mesh = generate_sphere(12, 24, 1.0).unwrap();
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&idx| idx < count));
    }

    #[test]
    fn test_sphere_first_cell_indices() {
        let n = 4;
        let mesh = generate_sphere(3, n, 1.0).unwrap();
        // v1 = 0, v2 = N+1, v3 = 1, v4 = N+2
        assert_eq!(&mesh.indices[..6], &[0, n + 1, 1, 1, n + 1, n + 2]);
    }

    #[test]
    fn test_cube_counts_are_fixed() {
        for half in [0.5, 1.0, 3.0] {
            let mesh = generate_cube(half);
            assert_eq!(mesh.vertex_count(), 24);
            assert_eq!(mesh.indices.len(), 36);
        }
    }

    #[test]
    fn test_cube_normals_constant_per_face() {
        let mesh = generate_cube(1.0);
        for face in mesh.normals.chunks(4) {
            assert!(face.iter().all(|n| *n == face[0]));
            assert!((face[0].length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_cube_vertices_lie_on_their_face() {
        let half = 2.0;
        let mesh = generate_cube(half);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((p.dot(*n) - half).abs() < EPS);
        }
    }

    #[test]
    fn test_cube_faces_map_full_texture() {
        let mesh = generate_cube(1.0);
        for face in mesh.uvs.chunks(4) {
            assert_eq!(face, &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        }
    }

    #[test]
    fn test_cube_primary_face_is_front() {
        let mesh = generate_cube(1.0);
        let primary = &mesh.indices[..PRIMARY_FACE_INDEX_COUNT as usize];
        for &idx in primary {
            assert_eq!(mesh.normals[idx as usize], Vec3::Z);
        }
    }

    #[test]
    fn test_cube_and_sphere_share_winding() {
        let cube = generate_cube(1.0);
        for t in 0..cube.triangle_count() {
            let out = cube.normals[cube.indices[t * 3] as usize];
            assert!(winding(&cube, t, out) < 0.0, "cube triangle {t}");
        }

        let sphere = generate_sphere(8, 8, 1.0).unwrap();
        for t in 0..sphere.triangle_count() {
            let a = sphere.positions[sphere.indices[t * 3] as usize];
            let b = sphere.positions[sphere.indices[t * 3 + 1] as usize];
            let c = sphere.positions[sphere.indices[t * 3 + 2] as usize];
            let area = (b - a).cross(c - a).length();
            // Triangles touching a pole collapse to zero area.
            if area < EPS {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(winding(&sphere, t, centroid) < 0.0, "sphere triangle {t}");
        }
    }
}
