//! End-to-end draws against the recording backend.

use std::num::NonZeroU32;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use unlit_shaders::gl::{
    names, DrawCall, DrawMode, GlCall, IndexSource, RecordingGl, TextureId,
    TextureTarget,
};
use unlit_shaders::options::{BindingStrategy, ShaderOptions};
use unlit_shaders::scene::{
    DrawItem, IndexedMesh, PropertyMaterial, TextureRef, MAIN_TEXTURE,
};
use unlit_shaders::shader::{
    DrawRequest, ShaderLibrary, UniformSlot, VariantKind, VerticalStereoShader,
};
use unlit_shaders::ShaderError;

#[test]
fn stereo_quad_left_eye() {
    let gl = Rc::new(RecordingGl::new());
    let shader =
        VerticalStereoShader::new(Rc::clone(&gl), &ShaderOptions::default())
            .unwrap();
    let right = shader
        .variant()
        .uniform_location(UniformSlot::Right)
        .unwrap();
    let opacity = shader
        .variant()
        .uniform_location(UniformSlot::Opacity)
        .unwrap();
    let texture = TextureRef::new(
        TextureId::new(NonZeroU32::new(3).unwrap()),
        TextureTarget::Texture2D,
    );
    let mesh = IndexedMesh::quad();
    let material =
        PropertyMaterial::unlit(texture, Vec3::new(1.0, 0.5, 0.5), 0.75);
    gl.clear_calls();

    let report = shader
        .render(&Mat4::IDENTITY, &DrawItem::new(&mesh, &material), false)
        .unwrap();

    assert_eq!(report.variant, VariantKind::VerticalStereo);
    assert!(report.gl_errors.is_empty());
    assert_eq!(
        gl.draw_calls(),
        [DrawCall {
            mode: DrawMode::Triangles,
            count: 6,
            source: IndexSource::Client,
        }]
    );
    let calls = gl.calls();
    assert!(calls.contains(&GlCall::Uniform1i {
        location: right,
        value: 0,
    }));
    assert!(calls.contains(&GlCall::Uniform1f {
        location: opacity,
        value: 0.75,
    }));
}

#[test]
fn library_routes_every_request() {
    let gl = Rc::new(RecordingGl::new());
    let mut options = ShaderOptions::default();
    options.binding.strategy = BindingStrategy::ClientArrays;
    let library = ShaderLibrary::new(&gl, &options).unwrap();
    let mesh = IndexedMesh::quad();
    let cube = PropertyMaterial::unlit(
        TextureRef::new(
            TextureId::new(NonZeroU32::new(1).unwrap()),
            TextureTarget::CubeMap,
        ),
        Vec3::ONE,
        1.0,
    );
    let external = PropertyMaterial::unlit(
        TextureRef::new(
            TextureId::new(NonZeroU32::new(2).unwrap()),
            TextureTarget::ExternalOes,
        ),
        Vec3::ONE,
        1.0,
    );
    let requests = [
        (
            DrawRequest::Cubemap {
                model: Mat4::IDENTITY,
                mvp: Mat4::IDENTITY,
            },
            &cube,
        ),
        (
            DrawRequest::CubemapReflection {
                mv: Mat4::IDENTITY,
                mv_it: Mat4::IDENTITY,
                view_inverse: Mat4::IDENTITY,
                mvp: Mat4::IDENTITY,
            },
            &cube,
        ),
        (DrawRequest::Oes { mvp: Mat4::IDENTITY }, &external),
    ];

    for (request, material) in requests {
        let report = library
            .render(&request, &DrawItem::new(&mesh, material))
            .unwrap();
        assert_eq!(report.variant, request.kind());
        assert_eq!(report.strategy, BindingStrategy::ClientArrays);
    }
    assert_eq!(gl.draw_calls().len(), 3);

    let stereo = DrawRequest::VerticalStereo {
        mvp: Mat4::IDENTITY,
        right: true,
    };
    let err = library
        .render(&stereo, &DrawItem::new(&mesh, &cube))
        .unwrap_err();
    assert!(matches!(err, ShaderError::InvalidTextureTarget { .. }));
    assert_eq!(gl.draw_calls().len(), 3);
}

#[test]
fn material_without_texture_is_rejected() {
    let gl = Rc::new(RecordingGl::new());
    let library = ShaderLibrary::new(&gl, &ShaderOptions::default()).unwrap();
    let mesh = IndexedMesh::quad();
    let material = PropertyMaterial::new();

    let err = library
        .render(
            &DrawRequest::Oes { mvp: Mat4::IDENTITY },
            &DrawItem::new(&mesh, &material),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ShaderError::MissingTexture {
            variant: VariantKind::Oes
        }
    ));
}

#[test]
fn optimized_out_sampler_still_binds_texture() {
    let gl = Rc::new(RecordingGl::new());
    gl.hide_name(names::U_TEXTURE);
    let library = ShaderLibrary::new(&gl, &ShaderOptions::default()).unwrap();
    assert_eq!(
        library
            .cubemap()
            .variant()
            .uniform_location(UniformSlot::Texture),
        None
    );
    let id = TextureId::new(NonZeroU32::new(9).unwrap());
    let mesh = IndexedMesh::quad();
    let material = PropertyMaterial::unlit(
        TextureRef::new(id, TextureTarget::CubeMap),
        Vec3::ONE,
        1.0,
    );
    gl.clear_calls();

    let _report = library
        .render(
            &DrawRequest::Cubemap {
                model: Mat4::IDENTITY,
                mvp: Mat4::IDENTITY,
            },
            &DrawItem::new(&mesh, &material),
        )
        .unwrap();

    assert!(gl.calls().contains(&GlCall::BindTexture {
        target: TextureTarget::CubeMap,
        texture: Some(id),
    }));
}

#[test]
fn missing_color_and_opacity_fall_back_to_white_opaque() {
    let gl = Rc::new(RecordingGl::new());
    let shader =
        VerticalStereoShader::new(Rc::clone(&gl), &ShaderOptions::default())
            .unwrap();
    let color = shader
        .variant()
        .uniform_location(UniformSlot::Color)
        .unwrap();
    let opacity = shader
        .variant()
        .uniform_location(UniformSlot::Opacity)
        .unwrap();
    let mesh = IndexedMesh::quad();
    let mut material = PropertyMaterial::new();
    material.set_texture(
        MAIN_TEXTURE,
        TextureRef::new(
            TextureId::new(NonZeroU32::new(5).unwrap()),
            TextureTarget::Texture2D,
        ),
    );
    gl.clear_calls();

    let _report = shader
        .render(&Mat4::IDENTITY, &DrawItem::new(&mesh, &material), true)
        .unwrap();

    let calls = gl.calls();
    assert!(calls.contains(&GlCall::Uniform3f {
        location: color,
        value: Vec3::ONE,
    }));
    assert!(calls.contains(&GlCall::Uniform1f {
        location: opacity,
        value: 1.0,
    }));
}
