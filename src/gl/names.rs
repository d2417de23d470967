//! Attribute, uniform and varying identifiers shared by every shader source.
//!
//! Sources are assembled with `concat!` from the `gl_name!` macro, and location
//! lookups use the constants below, so the GLSL text and the resolved names
//! cannot drift apart.

/// Expands to the string literal of a standard shader identifier.
macro_rules! gl_name {
    (a_normal) => {
        "a_normal"
    };
    (a_position) => {
        "a_position"
    };
    (a_tex_coord) => {
        "a_tex_coord"
    };
    (u_color) => {
        "u_color"
    };
    (u_model) => {
        "u_model"
    };
    (u_mv) => {
        "u_mv"
    };
    (u_mv_it) => {
        "u_mv_it"
    };
    (u_mvp) => {
        "u_mvp"
    };
    (u_opacity) => {
        "u_opacity"
    };
    (u_right) => {
        "u_right"
    };
    (u_texture) => {
        "u_texture"
    };
    (u_view_i) => {
        "u_view_i"
    };
    (v_tex_coord) => {
        "v_tex_coord"
    };
}

pub(crate) use gl_name;

/// Object-space vertex normal.
pub const A_NORMAL: &str = gl_name!(a_normal);
/// Object-space vertex position.
pub const A_POSITION: &str = gl_name!(a_position);
/// Vertex texture coordinate.
pub const A_TEX_COORD: &str = gl_name!(a_tex_coord);

/// Material tint (vec3).
pub const U_COLOR: &str = gl_name!(u_color);
/// Model matrix.
pub const U_MODEL: &str = gl_name!(u_model);
/// Model-view matrix.
pub const U_MV: &str = gl_name!(u_mv);
/// Inverse transpose of the model-view matrix.
pub const U_MV_IT: &str = gl_name!(u_mv_it);
/// Model-view-projection matrix.
pub const U_MVP: &str = gl_name!(u_mvp);
/// Material opacity (float).
pub const U_OPACITY: &str = gl_name!(u_opacity);
/// Eye selector for stereo-split textures (int, 0 or 1).
pub const U_RIGHT: &str = gl_name!(u_right);
/// Main texture sampler.
pub const U_TEXTURE: &str = gl_name!(u_texture);
/// Inverse view matrix.
pub const U_VIEW_I: &str = gl_name!(u_view_i);

/// Texture coordinate (or cube-map direction) passed to the fragment stage.
pub const V_TEX_COORD: &str = gl_name!(v_tex_coord);
