use glam::Vec4;

/// Decoded RGBA8 texture data, ready for GPU upload.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

/// Base-color material. The viewer's shading model only needs the factor
/// and an optional texture; everything else in the glTF material is ignored.
#[derive(Debug, Clone)]
pub struct Material {
    pub base_color: Vec4,
    pub base_color_texture: Option<ImageData>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
            base_color_texture: None,
        }
    }
}

/// CPU-side mesh data for one glTF primitive.
///
/// `joints`/`weights` are empty for static meshes; when present they have
/// one entry per vertex and the mesh is skinned against the node's skeleton.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
    pub material: Material,
}

impl Mesh {
    #[inline]
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        !self.joints.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
