//! CPU mirrors of the per-vertex and per-fragment math in the GLSL sources.
//!
//! Used to check expected lookups without a GPU and by hosts that need the
//! same direction or texture coordinate on the CPU (picking, thumbnails).

use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};

/// Cube map lookup direction of the plain cube map variant.
///
/// The object-space position is moved to world space, normalized and its z
/// negated. A position at the model origin yields the zero vector.
#[must_use]
pub fn cubemap_direction(model: &Mat4, position: Vec3) -> Vec3 {
    let direction = (*model * position.extend(1.0)).xyz().normalize_or_zero();
    flip_z(direction)
}

/// Cube map lookup direction of the reflective variant.
///
/// The normal is transformed with w = 1, matching the vertex stage.
#[must_use]
pub fn reflection_direction(
    mv: &Mat4,
    mv_it: &Mat4,
    view_inverse: &Mat4,
    position: Vec3,
    normal: Vec3,
) -> Vec3 {
    let eye4 = *mv * position.extend(1.0);
    let eye = eye4.xyz() / eye4.w;
    let eye_normal = (*mv_it * normal.extend(1.0)).xyz().normalize_or_zero();
    let reflected = reflect(eye, eye_normal);
    flip_z((*view_inverse * reflected.extend(1.0)).xyz())
}

/// Texture coordinate sampled by the vertical stereo variant.
///
/// The left eye maps v into `[0, 0.5]`, the right eye into `[0.5, 1]`.
#[must_use]
pub fn stereo_tex_coord(uv: Vec2, right: bool) -> Vec2 {
    let offset = if right { 1.0 } else { 0.0 };
    Vec2::new(uv.x, 0.5 * (uv.y + offset))
}

/// Final fragment color shared by all variants.
#[must_use]
pub fn unlit_color(sample: Vec4, color: Vec3, opacity: f32) -> Vec4 {
    (sample.xyz() * color * opacity).extend(sample.w * opacity)
}

// GLSL reflect(): i - 2 * dot(n, i) * n, with n normalized.
fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

fn flip_z(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, -v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn cubemap_direction_negates_z() {
        let direction =
            cubemap_direction(&Mat4::IDENTITY, Vec3::new(0.0, 0.0, 2.0));
        assert!(direction.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPS));

        let translated = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));
        let direction = cubemap_direction(&translated, Vec3::ZERO);
        assert!(direction.abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn cubemap_direction_at_origin_is_zero() {
        assert_eq!(cubemap_direction(&Mat4::IDENTITY, Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn head_on_reflection_points_back() {
        // Eye at the origin looking down -z at a surface facing +z.
        let mv = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let mv_it = mv.inverse().transpose();
        let direction = reflection_direction(
            &mv,
            &mv_it,
            &Mat4::IDENTITY,
            Vec3::ZERO,
            Vec3::Z,
        );
        // reflected eye ray is +5z; the lookup frame flips it
        assert!(direction.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), EPS));
    }

    #[test]
    fn identity_reflection_negates_naive_z() {
        let cases = [
            (Vec3::new(1.0, 2.0, -3.0), Vec3::Z),
            (Vec3::new(1.0, 0.0, -4.0), Vec3::new(1.0, 1.0, 0.0)),
        ];
        for (position, normal) in cases {
            let naive = reflect(position, normal.normalize());
            let direction = reflection_direction(
                &Mat4::IDENTITY,
                &Mat4::IDENTITY,
                &Mat4::IDENTITY,
                position,
                normal,
            );
            assert!(direction.abs_diff_eq(flip_z(naive), EPS));
            assert!((direction.z + naive.z).abs() < EPS);
        }
        let direction = reflection_direction(
            &Mat4::IDENTITY,
            &Mat4::IDENTITY,
            &Mat4::IDENTITY,
            Vec3::new(1.0, 0.0, -4.0),
            Vec3::new(1.0, 1.0, 0.0),
        );
        assert!(direction.abs_diff_eq(Vec3::new(0.0, -1.0, 4.0), EPS));
    }

    #[test]
    fn grazing_reflection_keeps_tangent() {
        let incident = Vec3::new(1.0, -1.0, 0.0);
        let reflected = reflect(incident, Vec3::Y);
        assert!(reflected.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), EPS));
    }

    #[test]
    fn stereo_halves() {
        for v in [0.0, 0.25, 1.0] {
            let left = stereo_tex_coord(Vec2::new(0.3, v), false);
            let right = stereo_tex_coord(Vec2::new(0.3, v), true);
            assert!((0.0..=0.5).contains(&left.y));
            assert!((0.5..=1.0).contains(&right.y));
            assert!((left.x - 0.3).abs() < EPS);
            assert!((right.y - left.y - 0.5).abs() < EPS);
        }
    }

    #[test]
    fn opacity_scales_all_channels() {
        let out = unlit_color(
            Vec4::new(1.0, 0.5, 0.25, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            0.5,
        );
        assert!(out.abs_diff_eq(Vec4::new(0.5, 0.25, 0.0, 0.5), EPS));
    }
}
