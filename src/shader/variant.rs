use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;

use super::binding::{self, BoundGeometry};
use super::descriptor::{
    UniformSlot, VariantDescriptor, VariantKind, VertexAttribute,
};
use super::uniforms::{self, DrawTransforms, ExtraUniform, MaterialInputs};
use crate::error::ShaderError;
use crate::gl::error_check::drain_errors;
use crate::gl::{GlApi, GlErrorCode, GlProgram, ProgramId, UniformLocation};
use crate::options::{BindingStrategy, ShaderOptions};
use crate::scene::{Mesh, RenderData, COLOR, MAIN_TEXTURE, OPACITY};

/// Outcome of a submitted draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawReport {
    /// Variant that drew.
    pub variant: VariantKind,
    /// Indices submitted (three per triangle).
    pub index_count: usize,
    /// Strategy actually used to bind vertex data.
    pub strategy: BindingStrategy,
    /// GL errors drained after the draw. Already logged; never fatal.
    pub gl_errors: Vec<GlErrorCode>,
}

/// One shader variant: an owned program plus its resolved locations.
///
/// Built from a static [`VariantDescriptor`]. Locations are resolved once at
/// construction; names the linker did not keep resolve to `None` and are
/// skipped when binding.
pub struct ShaderVariant<A: GlApi + ?Sized> {
    descriptor: &'static VariantDescriptor,
    program: GlProgram<A>,
    attributes: Vec<(VertexAttribute, Option<u32>)>,
    uniforms: Vec<(UniformSlot, Option<UniformLocation>)>,
    options: ShaderOptions,
    warned_missing_vertex_array: Cell<bool>,
}

impl<A: GlApi + ?Sized> ShaderVariant<A> {
    /// Compile and link `descriptor`'s sources and resolve its locations.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::InvalidOptions`] for out-of-range options and
    /// [`ShaderError::Link`] if the program cannot be built. Nothing
    /// allocated on the failing path outlives the call.
    pub fn new(
        api: Rc<A>,
        descriptor: &'static VariantDescriptor,
        options: &ShaderOptions,
    ) -> Result<Self, ShaderError> {
        let kind = descriptor.kind;
        options.validate()?;
        let bindings: Vec<(u32, &str)> = descriptor
            .attributes
            .iter()
            .map(|attribute| (attribute.location(), attribute.name()))
            .collect();
        let program = GlProgram::new(
            api,
            descriptor.vertex_source,
            descriptor.fragment_source,
            &bindings,
        )
        .map_err(|error| {
            log::error!("{kind}: {error}");
            ShaderError::Link {
                variant: kind,
                error,
            }
        })?;

        let attributes = descriptor
            .attributes
            .iter()
            .map(|&attribute| {
                let location = program.attrib_location(attribute.name());
                if location.is_none() {
                    log::warn!(
                        "{kind}: attribute '{}' not active",
                        attribute.name()
                    );
                }
                (attribute, location)
            })
            .collect();
        let uniforms = descriptor
            .uniforms
            .iter()
            .map(|&slot| {
                let location = program.uniform_location(slot.name());
                if location.is_none() {
                    log::warn!("{kind}: uniform '{}' not active", slot.name());
                }
                (slot, location)
            })
            .collect();

        log::debug!("{kind}: built with {:?}", options.binding.strategy);
        Ok(Self {
            descriptor,
            program,
            attributes,
            uniforms,
            options: options.clone(),
            warned_missing_vertex_array: Cell::new(false),
        })
    }

    /// Which variant this is.
    #[must_use]
    pub fn kind(&self) -> VariantKind {
        self.descriptor.kind
    }

    /// The static description this variant was built from.
    #[must_use]
    pub fn descriptor(&self) -> &'static VariantDescriptor {
        self.descriptor
    }

    /// The owned program id, `None` after [`recycle`](Self::recycle).
    #[must_use]
    pub fn program_id(&self) -> Option<ProgramId> {
        self.program.id()
    }

    /// Whether the program has been released.
    #[must_use]
    pub fn is_recycled(&self) -> bool {
        self.program.is_recycled()
    }

    /// Resolved location of `attribute`, `None` if inactive or not used by
    /// this variant. Active attributes always sit at
    /// [`VertexAttribute::location`].
    #[must_use]
    pub fn attribute_location(&self, attribute: VertexAttribute) -> Option<u32> {
        self.attributes
            .iter()
            .find(|(candidate, _)| *candidate == attribute)
            .and_then(|&(_, location)| location)
    }

    /// Resolved location of `slot`, `None` if inactive or not used.
    #[must_use]
    pub fn uniform_location(&self, slot: UniformSlot) -> Option<UniformLocation> {
        self.uniforms
            .iter()
            .find(|(candidate, _)| *candidate == slot)
            .and_then(|&(_, location)| location)
    }

    /// Validate the material, bind everything and draw `render_data`.
    ///
    /// The texture target is checked before any GL call, so a rejected draw
    /// leaves GL state untouched. Binding state (current program, texture
    /// unit) is not restored afterwards.
    ///
    /// # Errors
    ///
    /// - [`ShaderError::Recycled`] after [`recycle`](Self::recycle)
    /// - [`ShaderError::MissingTexture`] if the material has no main texture
    /// - [`ShaderError::InvalidTextureTarget`] if its target is not the
    ///   variant's
    pub fn draw<R: RenderData + ?Sized>(
        &self,
        transforms: &DrawTransforms,
        extra: ExtraUniform,
        render_data: &R,
    ) -> Result<DrawReport, ShaderError> {
        let kind = self.descriptor.kind;
        let program = self
            .program
            .id()
            .ok_or(ShaderError::Recycled { variant: kind })?;

        let material = render_data.material();
        let texture = material
            .texture(MAIN_TEXTURE)
            .ok_or(ShaderError::MissingTexture { variant: kind })?;
        if texture.target() != self.descriptor.required_target {
            return Err(ShaderError::InvalidTextureTarget {
                variant: kind,
                expected: self.descriptor.required_target,
                actual: texture.target(),
            });
        }
        let inputs = MaterialInputs {
            texture,
            color: material.vec3(COLOR).unwrap_or(Vec3::ONE),
            opacity: material.float(OPACITY).unwrap_or(1.0),
        };

        let api = self.program.api();
        let mesh = render_data.mesh();
        api.use_program(Some(program));

        let geometry = self.bind_geometry(api, mesh);
        uniforms::upload(
            api,
            &self.uniforms,
            transforms,
            extra,
            &inputs,
            self.options.binding.texture_unit,
        );
        let index_count = binding::draw_triangles(api, mesh, geometry);

        let gl_errors = if self.options.debug.check_gl_errors {
            drain_errors(
                api,
                kind.label(),
                self.options.debug.max_reported_errors,
            )
        } else {
            Vec::new()
        };

        Ok(DrawReport {
            variant: kind,
            index_count,
            strategy: geometry.strategy(),
            gl_errors,
        })
    }

    fn bind_geometry(&self, api: &A, mesh: &dyn Mesh) -> BoundGeometry {
        if self.options.binding.strategy == BindingStrategy::VertexArray {
            if let Some(bound) = binding::bind_vertex_array(api, mesh) {
                return bound;
            }
            if !self.warned_missing_vertex_array.replace(true) {
                log::warn!(
                    "{}: mesh has no vertex array, using client arrays",
                    self.descriptor.kind
                );
            }
        }
        binding::bind_client_arrays(api, mesh, &self.attributes)
    }

    /// Release the program. Idempotent; dropping afterwards does not release
    /// it again.
    pub fn recycle(&mut self) {
        if !self.program.is_recycled() {
            log::debug!("{}: recycling", self.descriptor.kind);
        }
        self.program.recycle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{names, GlCall, RecordingGl, TextureTarget};
    use crate::shader::cubemap::DESCRIPTOR as CUBEMAP;
    use crate::shader::vertical_stereo::DESCRIPTOR as STEREO;
    use crate::test_util;

    fn build(
        gl: &Rc<RecordingGl>,
        options: &ShaderOptions,
    ) -> ShaderVariant<RecordingGl> {
        ShaderVariant::new(Rc::clone(gl), &CUBEMAP, options).unwrap()
    }

    fn draw_plain(
        variant: &ShaderVariant<RecordingGl>,
        fixture: &test_util::Fixture,
    ) -> Result<DrawReport, ShaderError> {
        variant.draw(
            &DrawTransforms::default(),
            ExtraUniform::None,
            &fixture.item(),
        )
    }

    #[test]
    fn rejected_draw_issues_no_gl_calls() {
        test_util::init_logging();
        let gl = Rc::new(RecordingGl::new());
        let variant = build(&gl, &ShaderOptions::default());
        gl.clear_calls();
        let fixture = test_util::quad_fixture(TextureTarget::ExternalOes);

        let err = draw_plain(&variant, &fixture).err().unwrap();

        assert!(matches!(
            err,
            ShaderError::InvalidTextureTarget {
                variant: VariantKind::Cubemap,
                expected: TextureTarget::CubeMap,
                actual: TextureTarget::ExternalOes,
            }
        ));
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn missing_uniform_is_skipped_not_fatal() {
        let gl = Rc::new(RecordingGl::new());
        gl.hide_name(names::U_MODEL);
        let variant = build(&gl, &ShaderOptions::default());
        assert_eq!(variant.uniform_location(UniformSlot::Model), None);
        gl.clear_calls();
        let fixture = test_util::quad_fixture(TextureTarget::CubeMap);

        let report = draw_plain(&variant, &fixture).unwrap();

        assert_eq!(report.index_count, 6);
        let matrices = gl
            .calls()
            .iter()
            .filter(|call| matches!(call, GlCall::UniformMatrix4 { .. }))
            .count();
        // u_mvp only
        assert_eq!(matrices, 1);
    }

    #[test]
    fn texture_goes_to_configured_unit() {
        let gl = Rc::new(RecordingGl::new());
        let mut options = ShaderOptions::default();
        options.binding.texture_unit = 2;
        let variant = build(&gl, &options);
        let sampler = variant.uniform_location(UniformSlot::Texture).unwrap();
        gl.clear_calls();
        let fixture = test_util::quad_fixture(TextureTarget::CubeMap);

        let _report = draw_plain(&variant, &fixture).unwrap();

        let calls = gl.calls();
        assert!(calls.contains(&GlCall::ActiveTexture(2)));
        assert!(calls.contains(&GlCall::BindTexture {
            target: TextureTarget::CubeMap,
            texture: Some(fixture.texture.id),
        }));
        assert!(calls.contains(&GlCall::Uniform1i {
            location: sampler,
            value: 2,
        }));
    }

    #[test]
    fn gl_errors_are_reported_but_not_fatal() {
        let gl = Rc::new(RecordingGl::new());
        let variant = build(&gl, &ShaderOptions::default());
        let fixture = test_util::quad_fixture(TextureTarget::CubeMap);
        gl.push_error(GlErrorCode::InvalidOperation);

        let report = draw_plain(&variant, &fixture).unwrap();

        assert_eq!(report.gl_errors, [GlErrorCode::InvalidOperation]);
        assert_eq!(gl.draw_calls().len(), 1);
    }

    #[test]
    fn error_check_can_be_disabled() {
        let gl = Rc::new(RecordingGl::new());
        let mut options = ShaderOptions::default();
        options.debug.check_gl_errors = false;
        let variant = build(&gl, &options);
        let fixture = test_util::quad_fixture(TextureTarget::CubeMap);
        gl.push_error(GlErrorCode::InvalidOperation);

        let report = draw_plain(&variant, &fixture).unwrap();

        assert!(report.gl_errors.is_empty());
        assert_eq!(gl.get_error(), Some(GlErrorCode::InvalidOperation));
    }

    #[test]
    fn draw_after_recycle_is_an_error() {
        let gl = Rc::new(RecordingGl::new());
        let mut variant = build(&gl, &ShaderOptions::default());
        variant.recycle();
        gl.clear_calls();
        let fixture = test_util::quad_fixture(TextureTarget::CubeMap);

        let err = draw_plain(&variant, &fixture).err().unwrap();

        assert!(matches!(err, ShaderError::Recycled { .. }));
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn eye_selector_resets_to_left_without_extra() {
        let gl = Rc::new(RecordingGl::new());
        let variant = ShaderVariant::new(
            Rc::clone(&gl),
            &STEREO,
            &ShaderOptions::default(),
        )
        .unwrap();
        let right = variant.uniform_location(UniformSlot::Right).unwrap();
        let fixture = test_util::quad_fixture(TextureTarget::Texture2D);
        let _right_eye = variant
            .draw(
                &DrawTransforms::default(),
                ExtraUniform::Right(true),
                &fixture.item(),
            )
            .unwrap();
        gl.clear_calls();

        let _report = draw_plain(&variant, &fixture).unwrap();

        assert!(gl.calls().contains(&GlCall::Uniform1i {
            location: right,
            value: 0,
        }));
    }

    #[test]
    fn out_of_range_options_build_nothing() {
        let gl = Rc::new(RecordingGl::new());
        let mut options = ShaderOptions::default();
        options.binding.texture_unit = u32::MAX;

        let result = ShaderVariant::new(Rc::clone(&gl), &CUBEMAP, &options);

        assert!(matches!(result, Err(ShaderError::InvalidOptions(_))));
        assert!(gl.calls().is_empty());
    }
}
