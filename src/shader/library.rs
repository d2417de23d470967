//! All four variants built against one context, with per-request dispatch.

use std::rc::Rc;

use glam::Mat4;

use super::cubemap::CubemapShader;
use super::cubemap_reflection::CubemapReflectionShader;
use super::descriptor::VariantKind;
use super::oes::OesShader;
use super::variant::DrawReport;
use super::vertical_stereo::VerticalStereoShader;
use crate::error::ShaderError;
use crate::gl::GlApi;
use crate::options::ShaderOptions;
use crate::scene::RenderData;

/// Which variant to draw with, plus the transforms it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawRequest {
    /// See [`CubemapShader::render`].
    Cubemap {
        /// Model matrix.
        model: Mat4,
        /// Model-view-projection matrix.
        mvp: Mat4,
    },
    /// See [`CubemapReflectionShader::render`].
    CubemapReflection {
        /// Model-view matrix.
        mv: Mat4,
        /// Inverse transpose of `mv`.
        mv_it: Mat4,
        /// Inverse view matrix.
        view_inverse: Mat4,
        /// Model-view-projection matrix.
        mvp: Mat4,
    },
    /// See [`OesShader::render`].
    Oes {
        /// Model-view-projection matrix.
        mvp: Mat4,
    },
    /// See [`VerticalStereoShader::render`].
    VerticalStereo {
        /// Model-view-projection matrix.
        mvp: Mat4,
        /// Eye selector.
        right: bool,
    },
}

impl DrawRequest {
    /// Variant this request is routed to.
    #[must_use]
    pub const fn kind(&self) -> VariantKind {
        match self {
            Self::Cubemap { .. } => VariantKind::Cubemap,
            Self::CubemapReflection { .. } => VariantKind::CubemapReflection,
            Self::Oes { .. } => VariantKind::Oes,
            Self::VerticalStereo { .. } => VariantKind::VerticalStereo,
        }
    }
}

/// One instance of every variant, sharing a GL context.
///
/// Instances are independent: two libraries on the same context own distinct
/// programs, and recycling one leaves the other usable.
pub struct ShaderLibrary<A: GlApi + ?Sized> {
    cubemap: CubemapShader<A>,
    cubemap_reflection: CubemapReflectionShader<A>,
    oes: OesShader<A>,
    vertical_stereo: VerticalStereoShader<A>,
}

impl<A: GlApi + ?Sized> ShaderLibrary<A> {
    /// Build every variant.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::InvalidOptions`] or the first
    /// [`ShaderError::Link`]. Variants built before the failure are released.
    pub fn new(api: &Rc<A>, options: &ShaderOptions) -> Result<Self, ShaderError> {
        let library = Self {
            cubemap: CubemapShader::new(Rc::clone(api), options)?,
            cubemap_reflection: CubemapReflectionShader::new(Rc::clone(api), options)?,
            oes: OesShader::new(Rc::clone(api), options)?,
            vertical_stereo: VerticalStereoShader::new(Rc::clone(api), options)?,
        };
        log::info!("built {} shader variants", VariantKind::ALL.len());
        Ok(library)
    }

    /// The cube map variant.
    #[must_use]
    pub fn cubemap(&self) -> &CubemapShader<A> {
        &self.cubemap
    }

    /// The reflective cube map variant.
    #[must_use]
    pub fn cubemap_reflection(&self) -> &CubemapReflectionShader<A> {
        &self.cubemap_reflection
    }

    /// The external texture variant.
    #[must_use]
    pub fn oes(&self) -> &OesShader<A> {
        &self.oes
    }

    /// The vertical stereo variant.
    #[must_use]
    pub fn vertical_stereo(&self) -> &VerticalStereoShader<A> {
        &self.vertical_stereo
    }

    /// Route `request` to its variant and draw `render_data`.
    ///
    /// # Errors
    ///
    /// Whatever the selected variant's `render` returns.
    pub fn render<R: RenderData + ?Sized>(
        &self,
        request: &DrawRequest,
        render_data: &R,
    ) -> Result<DrawReport, ShaderError> {
        match *request {
            DrawRequest::Cubemap { model, mvp } => {
                self.cubemap.render(&model, &mvp, render_data)
            }
            DrawRequest::CubemapReflection {
                mv,
                mv_it,
                view_inverse,
                mvp,
            } => self.cubemap_reflection.render(
                &mv,
                &mv_it,
                &view_inverse,
                &mvp,
                render_data,
            ),
            DrawRequest::Oes { mvp } => self.oes.render(&mvp, render_data),
            DrawRequest::VerticalStereo { mvp, right } => {
                self.vertical_stereo.render(&mvp, render_data, right)
            }
        }
    }

    /// Release every program. Idempotent.
    pub fn recycle_all(&mut self) {
        self.cubemap.recycle();
        self.cubemap_reflection.recycle();
        self.oes.recycle();
        self.vertical_stereo.recycle();
    }
}
