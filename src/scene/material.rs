use glam::Vec3;
use rustc_hash::FxHashMap;

use super::{Material, Texture, COLOR, MAIN_TEXTURE, OPACITY};
use crate::gl::{TextureId, TextureTarget};

/// A texture handle and the target it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef {
    /// GL texture object.
    pub id: TextureId,
    /// Binding point.
    pub target: TextureTarget,
}

impl TextureRef {
    /// Describe an existing GL texture.
    #[must_use]
    pub const fn new(id: TextureId, target: TextureTarget) -> Self {
        Self { id, target }
    }
}

impl Texture for TextureRef {
    fn target(&self) -> TextureTarget {
        self.target
    }

    fn id(&self) -> TextureId {
        self.id
    }
}

/// Hash-map backed material: named textures, vectors and scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMaterial {
    textures: FxHashMap<String, TextureRef>,
    vectors: FxHashMap<String, Vec3>,
    floats: FxHashMap<String, f32>,
}

impl PropertyMaterial {
    /// Material with no properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Material sampling `texture` with the given tint and opacity.
    #[must_use]
    pub fn unlit(texture: TextureRef, color: Vec3, opacity: f32) -> Self {
        let mut material = Self::new();
        material.set_texture(MAIN_TEXTURE, texture);
        material.set_vec3(COLOR, color);
        material.set_float(OPACITY, opacity);
        material
    }

    /// Store a texture under `key`, replacing any previous one.
    pub fn set_texture(&mut self, key: &str, texture: TextureRef) {
        let _ = self.textures.insert(key.to_owned(), texture);
    }

    /// Store a vector under `key`.
    pub fn set_vec3(&mut self, key: &str, value: Vec3) {
        let _ = self.vectors.insert(key.to_owned(), value);
    }

    /// Store a scalar under `key`.
    pub fn set_float(&mut self, key: &str, value: f32) {
        let _ = self.floats.insert(key.to_owned(), value);
    }
}

impl Material for PropertyMaterial {
    fn texture(&self, key: &str) -> Option<&dyn Texture> {
        let texture: &dyn Texture = self.textures.get(key)?;
        Some(texture)
    }

    fn vec3(&self, key: &str) -> Option<Vec3> {
        self.vectors.get(key).copied()
    }

    fn float(&self, key: &str) -> Option<f32> {
        self.floats.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    #[test]
    fn unlit_material_exposes_standard_keys() {
        let texture = TextureRef::new(
            TextureId::new(NonZeroU32::MIN),
            TextureTarget::CubeMap,
        );
        let material =
            PropertyMaterial::unlit(texture, Vec3::new(0.5, 1.0, 0.25), 0.8);

        let main = material.texture(MAIN_TEXTURE).unwrap();
        assert_eq!(main.target(), TextureTarget::CubeMap);
        assert_eq!(material.vec3(COLOR), Some(Vec3::new(0.5, 1.0, 0.25)));
        assert_eq!(material.float(OPACITY), Some(0.8));
        assert!(material.texture("normal_map").is_none());
    }
}
