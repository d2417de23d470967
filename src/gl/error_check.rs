//! Post-draw GL error reporting. Errors are drained and logged, never turned
//! into failures.

use super::{GlApi, GlErrorCode};

/// Drain pending GL errors, logging each one against `label`.
///
/// Stops after `limit` codes. Returns the codes that were drained.
pub fn drain_errors<A: GlApi + ?Sized>(
    api: &A,
    label: &str,
    limit: usize,
) -> Vec<GlErrorCode> {
    let mut errors = Vec::new();
    while errors.len() < limit {
        let Some(code) = api.get_error() else {
            break;
        };
        log::error!("{label}: {code}");
        errors.push(code);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::RecordingGl;

    #[test]
    fn drains_in_order() {
        let gl = RecordingGl::new();
        gl.push_error(GlErrorCode::InvalidOperation);
        gl.push_error(GlErrorCode::InvalidValue);

        let errors = drain_errors(&gl, "test", 8);

        assert_eq!(
            errors,
            [GlErrorCode::InvalidOperation, GlErrorCode::InvalidValue]
        );
        assert_eq!(gl.get_error(), None);
    }

    #[test]
    fn stops_at_limit() {
        let gl = RecordingGl::new();
        for _ in 0..5 {
            gl.push_error(GlErrorCode::OutOfMemory);
        }

        assert_eq!(drain_errors(&gl, "test", 2).len(), 2);
        assert_eq!(drain_errors(&gl, "test", 0).len(), 0);
        assert_eq!(drain_errors(&gl, "test", 8).len(), 3);
    }
}
