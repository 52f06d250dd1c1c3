use glam::{Vec2, Vec3};
use crate::renderer::shader_data::PerVertexData;

/// Unindexed triangle list, drawn with `draw_arrays`. Vertices are kept in
/// their buffer layout so uploading is a plain copy.
#[derive(Debug)]
pub struct Mesh {
    pub vertices: Vec<PerVertexData>,
}

impl Mesh {
    pub fn new(vertices: Vec<PerVertexData>) -> Self {
        Self { vertices }
    }

    /// Unit cube centered on the origin, two triangles per face
    pub fn new_cube() -> Self {
        // Normal, then corners counter-clockwise seen from outside,
        // starting bottom left of the face
        let faces: [(Vec3, [[f32; 3]; 4]); 6] = [
            (Vec3::NEG_Z, [ // Back
                [0.5, -0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [-0.5, 0.5, -0.5],
                [0.5, 0.5, -0.5],
            ]),
            (Vec3::Z, [ // Front
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
            ]),
            (Vec3::NEG_X, [ // Left
                [-0.5, -0.5, -0.5],
                [-0.5, -0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, 0.5, -0.5],
            ]),
            (Vec3::X, [ // Right
                [0.5, -0.5, 0.5],
                [0.5, -0.5, -0.5],
                [0.5, 0.5, -0.5],
                [0.5, 0.5, 0.5],
            ]),
            (Vec3::NEG_Y, [ // Bottom
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, 0.5],
                [-0.5, -0.5, 0.5],
            ]),
            (Vec3::Y, [ // Top
                [-0.5, 0.5, 0.5],
                [0.5, 0.5, 0.5],
                [0.5, 0.5, -0.5],
                [-0.5, 0.5, -0.5],
            ]),
        ];
        let texcoords: [Vec2; 4] = [
            [0.0, 0.0].into(),
            [1.0, 0.0].into(),
            [1.0, 1.0].into(),
            [0.0, 1.0].into(),
        ];

        let vertices = faces
            .iter()
            .flat_map(|(normal, corners)| {
                [0, 1, 2, 2, 3, 0].map(|i| PerVertexData {
                    position: corners[i].into(),
                    normal: *normal,
                    texcoord: texcoords[i],
                })
            })
            .collect();

        Self::new(vertices)
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertices.len() as i32
    }

    pub fn into_shader_data(self) -> Vec<PerVertexData> {
        self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_faces_of_two_triangles() {
        let cube = Mesh::new_cube();
        assert_eq!(cube.vertex_count(), 36);
        assert_eq!(cube.into_shader_data().len(), 36);
    }

    #[test]
    fn cube_winding_agrees_with_normals() {
        let cube = Mesh::new_cube();

        for triangle in cube.vertices.chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]];
            let face_normal = (b.position - a.position).cross(c.position - a.position).normalize();
            assert!(face_normal.abs_diff_eq(a.normal, 1e-6), "{face_normal} != {}", a.normal);
            assert_eq!(a.normal, b.normal);
            assert_eq!(a.normal, c.normal);
        }
    }
}
