//! Procedurally generated meshes.

use crate::render::Mesh;

/// Axis-aligned cube of edge `size` centered at the origin, 36 vertices.
pub fn cube(size: f32) -> Mesh {
    let h = size * 0.5;
    // (normal, tangent u, tangent v) per face; u × v == normal keeps faces CCW.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let corners: [(f32, f32); 6] = [
        (-1.0, -1.0),
        (1.0, -1.0),
        (1.0, 1.0),
        (-1.0, -1.0),
        (1.0, 1.0),
        (-1.0, 1.0),
    ];

    let mut mesh = Mesh::new();
    for (n, u, v) in faces {
        for (cu, cv) in corners {
            let position = [
                (n[0] + u[0] * cu + v[0] * cv) * h,
                (n[1] + u[1] * cu + v[1] * cv) * h,
                (n[2] + u[2] * cu + v[2] * cv) * h,
            ];
            let uv = [(cu + 1.0) * 0.5, 1.0 - (cv + 1.0) * 0.5];
            mesh.add_vertex(position, uv, n);
        }
    }
    mesh
}

/// Square pyramid with base edge `size` and height `size`, 18 vertices.
pub fn pyramid(size: f32) -> Mesh {
    let h = size * 0.5;
    let apex = [0.0, h, 0.0];
    let base = [[-h, -h, h], [h, -h, h], [h, -h, -h], [-h, -h, -h]];

    let mut mesh = Mesh::new();
    for i in 0..4 {
        let a = base[i];
        let b = base[(i + 1) % 4];
        let n = face_normal(a, b, apex);
        mesh.add_vertex(a, [0.0, 1.0], n);
        mesh.add_vertex(b, [1.0, 1.0], n);
        mesh.add_vertex(apex, [0.5, 0.0], n);
    }

    let down = [0.0, -1.0, 0.0];
    for [a, b, c] in [[base[0], base[3], base[2]], [base[0], base[2], base[1]]] {
        mesh.add_vertex(a, [0.0, 0.0], down);
        mesh.add_vertex(b, [0.0, 1.0], down);
        mesh.add_vertex(c, [1.0, 1.0], down);
    }
    mesh
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let ab = glam::Vec3::from(b) - glam::Vec3::from(a);
    let ac = glam::Vec3::from(c) - glam::Vec3::from(a);
    ab.cross(ac).normalize_or_zero().into()
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn triangles(mesh: &Mesh) -> Vec<[Vec3; 4]> {
        mesh.vertices()
            .chunks_exact(24)
            .map(|t| {
                [
                    Vec3::new(t[0], t[1], t[2]),
                    Vec3::new(t[8], t[9], t[10]),
                    Vec3::new(t[16], t[17], t[18]),
                    Vec3::new(t[5], t[6], t[7]),
                ]
            })
            .collect()
    }

    #[test]
    fn cube_has_36_vertices_within_bounds() {
        let mesh = cube(2.0);
        assert_eq!(mesh.vertex_count(), 36);
        for p in mesh.vertices().chunks_exact(8) {
            assert!(p[..3].iter().all(|c| c.abs() <= 1.0 + 1e-6));
        }
    }

    #[test]
    fn cube_winding_agrees_with_normals() {
        for [a, b, c, n] in triangles(&cube(1.0)) {
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn pyramid_winding_agrees_with_normals() {
        let mesh = pyramid(1.0);
        assert_eq!(mesh.vertex_count(), 18);
        for [a, b, c, n] in triangles(&mesh) {
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }
}
