use super::mesh::Mesh;

/// Two triangles covering clip space `[-1, 1]²`, position/uv/normal interleaved.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 48] = [
    // position          uv          normal
    -1.0, -1.0, 0.0,     0.0, 1.0,   0.0, 0.0, 1.0,
     1.0, -1.0, 0.0,     1.0, 1.0,   0.0, 0.0, 1.0,
     1.0,  1.0, 0.0,     1.0, 0.0,   0.0, 0.0, 1.0,

    -1.0, -1.0, 0.0,     0.0, 1.0,   0.0, 0.0, 1.0,
     1.0,  1.0, 0.0,     1.0, 0.0,   0.0, 0.0, 1.0,
    -1.0,  1.0, 0.0,     0.0, 0.0,   0.0, 0.0, 1.0,
];

/// Builds the full-screen quad used as the composite draw target.
pub fn quad_mesh() -> Mesh {
    let mut mesh = Mesh::new();
    for v in QUAD_VERTICES.chunks_exact(8) {
        mesh.add_vertex([v[0], v[1], v[2]], [v[3], v[4]], [v[5], v[6], v[7]]);
    }
    mesh
}
