//! Shared fixtures for unit tests.

use std::num::NonZeroU32;

use glam::Vec3;

use crate::gl::{TextureId, TextureTarget};
use crate::scene::{DrawItem, IndexedMesh, PropertyMaterial, TextureRef};

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn texture_id(raw: u32) -> TextureId {
    TextureId::new(NonZeroU32::new(raw).unwrap())
}

/// Unit quad with a white, opaque material sampling one texture.
pub(crate) struct Fixture {
    pub(crate) mesh: IndexedMesh,
    pub(crate) material: PropertyMaterial,
    pub(crate) texture: TextureRef,
}

impl Fixture {
    pub(crate) fn item(&self) -> DrawItem<'_> {
        DrawItem::new(&self.mesh, &self.material)
    }
}

pub(crate) fn quad_fixture(target: TextureTarget) -> Fixture {
    let texture = TextureRef::new(texture_id(41), target);
    Fixture {
        mesh: IndexedMesh::quad(),
        material: PropertyMaterial::unlit(texture, Vec3::ONE, 1.0),
        texture,
    }
}
