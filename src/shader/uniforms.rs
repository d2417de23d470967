use glam::{Mat4, Vec3};

use super::descriptor::UniformSlot;
use crate::gl::{GlApi, UniformLocation};
use crate::scene::Texture;

/// Transform matrices for one draw.
///
/// Each variant uploads only the matrices its descriptor lists; the rest
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTransforms {
    /// Model (object to world).
    pub model: Mat4,
    /// Model-view (object to eye).
    pub model_view: Mat4,
    /// Inverse transpose of the model-view matrix.
    pub model_view_inverse_transpose: Mat4,
    /// Inverse view (eye to world).
    pub view_inverse: Mat4,
    /// Model-view-projection (object to clip).
    pub model_view_projection: Mat4,
}

impl Default for DrawTransforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            model_view: Mat4::IDENTITY,
            model_view_inverse_transpose: Mat4::IDENTITY,
            view_inverse: Mat4::IDENTITY,
            model_view_projection: Mat4::IDENTITY,
        }
    }
}

/// Variant-specific uniform beyond the shared set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraUniform {
    /// Nothing extra. A variant with an eye selector draws the left eye.
    #[default]
    None,
    /// Stereo eye selector: `false` samples the top half, `true` the bottom.
    Right(bool),
}

/// Material values read once per draw.
pub(crate) struct MaterialInputs<'a> {
    pub(crate) texture: &'a dyn Texture,
    pub(crate) color: Vec3,
    pub(crate) opacity: f32,
}

/// Upload every resolved uniform in descriptor order.
///
/// Slots whose location did not resolve are skipped. The texture itself is
/// bound to `texture_unit` even when the sampler location is missing.
/// `u_right` is always written, `0` unless `extra` selects the right eye.
pub(crate) fn upload<A: GlApi + ?Sized>(
    api: &A,
    uniforms: &[(UniformSlot, Option<UniformLocation>)],
    transforms: &DrawTransforms,
    extra: ExtraUniform,
    material: &MaterialInputs<'_>,
    texture_unit: u32,
) {
    for &(slot, location) in uniforms {
        if slot == UniformSlot::Texture {
            api.active_texture(texture_unit);
            api.bind_texture(
                material.texture.target(),
                Some(material.texture.id()),
            );
        }
        let Some(location) = location else {
            continue;
        };
        match slot {
            UniformSlot::Model => api.uniform_matrix4(location, &transforms.model),
            UniformSlot::ModelView => {
                api.uniform_matrix4(location, &transforms.model_view);
            }
            UniformSlot::ModelViewInverseTranspose => api.uniform_matrix4(
                location,
                &transforms.model_view_inverse_transpose,
            ),
            UniformSlot::ModelViewProjection => {
                api.uniform_matrix4(location, &transforms.model_view_projection);
            }
            UniformSlot::ViewInverse => {
                api.uniform_matrix4(location, &transforms.view_inverse);
            }
            UniformSlot::Texture => match i32::try_from(texture_unit) {
                Ok(unit) => api.uniform_1i(location, unit),
                Err(_) => log::error!("texture unit {texture_unit} out of range"),
            },
            UniformSlot::Color => api.uniform_3f(location, material.color),
            UniformSlot::Opacity => api.uniform_1f(location, material.opacity),
            UniformSlot::Right => {
                let right = matches!(extra, ExtraUniform::Right(true));
                api.uniform_1i(location, i32::from(right));
            }
        }
    }
}
