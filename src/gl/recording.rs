//! Every call is appended to a log that tests inspect. Shader "compilation"
//! scans the source for `attribute` and `uniform` declarations, so location
//! queries behave like a real linker's: declared names resolve, anything
//! else (or anything hidden with [`RecordingGl::hide_name`]) does not.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::num::NonZeroU32;

use glam::{Mat4, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};

use super::{
    DrawMode, GlApi, GlErrorCode, ProgramId, ShaderId, ShaderStage,
    TextureId, TextureTarget, UniformLocation, VertexArrayId,
};

/// Where a recorded draw took its indices from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// Element buffer of the bound vertex array.
    VertexArray,
    /// Index list passed with the call.
    Client,
}

/// A recorded `glDrawElements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// Primitive topology.
    pub mode: DrawMode,
    /// Number of u16 indices drawn.
    pub count: usize,
    /// Index origin.
    pub source: IndexSource,
}

/// One recorded GL call.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum GlCall {
    CreateShader(ShaderStage, ShaderId),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, ShaderId),
    DetachShader(ProgramId, ShaderId),
    BindAttribLocation {
        program: ProgramId,
        location: u32,
        name: String,
    },
    LinkProgram(ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    UniformMatrix4 {
        location: UniformLocation,
        value: Mat4,
    },
    Uniform1i {
        location: UniformLocation,
        value: i32,
    },
    Uniform1f {
        location: UniformLocation,
        value: f32,
    },
    Uniform3f {
        location: UniformLocation,
        value: Vec3,
    },
    ActiveTexture(u32),
    BindTexture {
        target: TextureTarget,
        texture: Option<TextureId>,
    },
    BindVertexArray(Option<VertexArrayId>),
    ClientAttribArray {
        location: u32,
        components: i32,
        len: usize,
    },
    DrawElements(DrawCall),
}

struct ShaderRecord {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct ProgramRecord {
    attached: Vec<ShaderId>,
    linked: bool,
    log: String,
    bound_attributes: FxHashMap<String, u32>,
    attributes: FxHashMap<String, u32>,
    uniforms: FxHashMap<String, UniformLocation>,
}

#[derive(Default)]
struct RecordingState {
    next_name: u32,
    shaders: FxHashMap<ShaderId, ShaderRecord>,
    programs: FxHashMap<ProgramId, ProgramRecord>,
    hidden_names: FxHashSet<String>,
    compile_failure: Option<ShaderStage>,
    unsupported_tokens: Vec<String>,
    link_failure: bool,
    pending_errors: VecDeque<GlErrorCode>,
    calls: Vec<GlCall>,
}

impl RecordingState {
    fn next_name(&mut self) -> NonZeroU32 {
        self.next_name += 1;
        NonZeroU32::MIN.saturating_add(self.next_name - 1)
    }

    fn record(&mut self, call: GlCall) {
        self.calls.push(call);
    }
}

/// A [`GlApi`] that records calls instead of talking to a driver.
#[derive(Default)]
pub struct RecordingGl {
    state: RefCell<RecordingState>,
}

impl RecordingGl {
    /// An empty recorder with no injected failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next compile of `stage` fail.
    pub fn fail_compile(&self, stage: ShaderStage) {
        self.state.borrow_mut().compile_failure = Some(stage);
    }

    /// Fail every compile whose source mentions `token`, the way a driver
    /// lacking an extension rejects `#extension ... : require`.
    pub fn reject_token(&self, token: &str) {
        self.state.borrow_mut().unsupported_tokens.push(token.to_owned());
    }

    /// Make the next link fail.
    pub fn fail_link(&self) {
        self.state.borrow_mut().link_failure = true;
    }

    /// Treat `name` as optimized out by the linker in programs linked from
    /// now on.
    pub fn hide_name(&self, name: &str) {
        let _ = self.state.borrow_mut().hidden_names.insert(name.to_owned());
    }

    /// Queue an error for `get_error` to report.
    pub fn push_error(&self, code: GlErrorCode) {
        self.state.borrow_mut().pending_errors.push_back(code);
    }

    /// Snapshot of every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Forget recorded calls (object bookkeeping is kept).
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Recorded draws, in order.
    #[must_use]
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                GlCall::DrawElements(draw) => Some(*draw),
                _ => None,
            })
            .collect()
    }

    /// Programs created and not yet deleted.
    #[must_use]
    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    /// Shader objects created and not yet deleted.
    #[must_use]
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Whether `program` exists and linked successfully.
    #[must_use]
    pub fn is_linked(&self, program: ProgramId) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|record| record.linked)
    }
}

/// Names declared with `qualifier` (`attribute` or `uniform`), in order.
fn declared_names<'s>(
    source: &'s str,
    qualifier: &'s str,
) -> impl Iterator<Item = &'s str> {
    source.lines().filter_map(move |line| {
        let rest = line.trim().strip_prefix(qualifier)?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let declaration = rest.trim().trim_end_matches(';');
        declaration.split_whitespace().last()
    })
}

impl GlApi for RecordingGl {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        let mut state = self.state.borrow_mut();
        let id = ShaderId::new(state.next_name());
        let _ = state.shaders.insert(
            id,
            ShaderRecord {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        state.record(GlCall::CreateShader(stage, id));
        Ok(id)
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        if let Some(record) = self.state.borrow_mut().shaders.get_mut(&shader)
        {
            source.clone_into(&mut record.source);
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if let Some(record) = state.shaders.get_mut(&shader) {
            let unsupported = state
                .unsupported_tokens
                .iter()
                .any(|token| record.source.contains(token.as_str()));
            let injected = state.compile_failure == Some(record.stage);
            record.compiled = !unsupported && !injected;
            if injected {
                state.compile_failure = None;
            }
        }
        state.record(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|record| record.compiled)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(record) if !record.compiled => {
                format!("0:1: injected {} compile failure", record.stage)
            }
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        let _ = state.shaders.remove(&shader);
        state.record(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        let mut state = self.state.borrow_mut();
        let id = ProgramId::new(state.next_name());
        let _ = state.programs.insert(id, ProgramRecord::default());
        state.record(GlCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.programs.get_mut(&program) {
            record.attached.push(shader);
        }
        state.record(GlCall::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.programs.get_mut(&program) {
            record.attached.retain(|attached| *attached != shader);
        }
        state.record(GlCall::DetachShader(program, shader));
    }

    fn bind_attrib_location(&self, program: ProgramId, location: u32, name: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.programs.get_mut(&program) {
            let _ = record.bound_attributes.insert(name.to_owned(), location);
        }
        state.record(GlCall::BindAttribLocation {
            program,
            location,
            name: name.to_owned(),
        });
    }

    fn link_program(&self, program: ProgramId) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.record(GlCall::LinkProgram(program));
        let Some(record) = state.programs.get_mut(&program) else {
            return;
        };

        if std::mem::take(&mut state.link_failure) {
            record.linked = false;
            "error: injected link failure".clone_into(&mut record.log);
            return;
        }

        let mut declared: Vec<&str> = Vec::new();
        let mut uniforms = FxHashMap::default();
        for shader in &record.attached {
            let Some(stage) = state.shaders.get(shader) else {
                continue;
            };
            for name in declared_names(&stage.source, "attribute") {
                if state.hidden_names.contains(name)
                    || declared.contains(&name)
                {
                    continue;
                }
                declared.push(name);
            }
            for name in declared_names(&stage.source, "uniform") {
                if state.hidden_names.contains(name)
                    || uniforms.contains_key(name)
                {
                    continue;
                }
                let next = UniformLocation(uniforms.len() as u32);
                let _ = uniforms.insert(name.to_owned(), next);
            }
        }
        // Bound names keep their slot; the rest fill the lowest free ones.
        let mut attributes: FxHashMap<String, u32> = declared
            .iter()
            .filter_map(|&name| {
                let location = record.bound_attributes.get(name)?;
                Some((name.to_owned(), *location))
            })
            .collect();
        let mut next = 0;
        for name in declared {
            if attributes.contains_key(name) {
                continue;
            }
            while attributes.values().any(|&taken| taken == next) {
                next += 1;
            }
            let _ = attributes.insert(name.to_owned(), next);
        }
        record.attributes = attributes;
        record.uniforms = uniforms;
        record.linked = true;
        record.log.clear();
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.is_linked(program)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|record| record.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&program).is_none() {
            state.pending_errors.push_back(GlErrorCode::InvalidValue);
        }
        state.record(GlCall::DeleteProgram(program));
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .filter(|record| record.linked)
            .and_then(|record| record.attributes.get(name).copied())
    }

    fn uniform_location(
        &self,
        program: ProgramId,
        name: &str,
    ) -> Option<UniformLocation> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .filter(|record| record.linked)
            .and_then(|record| record.uniforms.get(name).copied())
    }

    fn use_program(&self, program: Option<ProgramId>) {
        self.state.borrow_mut().record(GlCall::UseProgram(program));
    }

    fn uniform_matrix4(&self, location: UniformLocation, value: &Mat4) {
        self.state.borrow_mut().record(GlCall::UniformMatrix4 {
            location,
            value: *value,
        });
    }

    fn uniform_1i(&self, location: UniformLocation, value: i32) {
        self.state
            .borrow_mut()
            .record(GlCall::Uniform1i { location, value });
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        self.state
            .borrow_mut()
            .record(GlCall::Uniform1f { location, value });
    }

    fn uniform_3f(&self, location: UniformLocation, value: Vec3) {
        self.state
            .borrow_mut()
            .record(GlCall::Uniform3f { location, value });
    }

    fn active_texture(&self, unit: u32) {
        self.state.borrow_mut().record(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureId>) {
        self.state
            .borrow_mut()
            .record(GlCall::BindTexture { target, texture });
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) {
        self.state
            .borrow_mut()
            .record(GlCall::BindVertexArray(vertex_array));
    }

    fn client_attrib_array(&self, location: u32, components: i32, data: &[f32]) {
        self.state.borrow_mut().record(GlCall::ClientAttribArray {
            location,
            components,
            len: data.len(),
        });
    }

    fn draw_elements_bound(&self, mode: DrawMode, count: usize) {
        self.state.borrow_mut().record(GlCall::DrawElements(DrawCall {
            mode,
            count,
            source: IndexSource::VertexArray,
        }));
    }

    fn draw_elements_client(&self, mode: DrawMode, indices: &[u16]) {
        self.state.borrow_mut().record(GlCall::DrawElements(DrawCall {
            mode,
            count: indices.len(),
            source: IndexSource::Client,
        }));
    }

    fn get_error(&self) -> Option<GlErrorCode> {
        self.state.borrow_mut().pending_errors.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_names_skip_other_qualifiers() {
        let src = "attribute vec4 a_position;\n\
                   uniform mat4 u_mvp;\n\
                   varying vec2 v_tex_coord;\n\
                   uniformity is not a keyword;\n";
        let attributes: Vec<_> = declared_names(src, "attribute").collect();
        let uniforms: Vec<_> = declared_names(src, "uniform").collect();
        assert_eq!(attributes, ["a_position"]);
        assert_eq!(uniforms, ["u_mvp"]);
    }

    #[test]
    fn hidden_names_do_not_resolve() {
        let gl = RecordingGl::new();
        gl.hide_name("u_color");
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, "uniform mat4 u_mvp;\nuniform vec3 u_color;\n");
        gl.compile_shader(vs);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, vs);
        gl.link_program(program);

        assert!(gl.program_link_status(program));
        assert_eq!(
            gl.uniform_location(program, "u_mvp"),
            Some(UniformLocation(0))
        );
        assert_eq!(gl.uniform_location(program, "u_color"), None);
    }

    #[test]
    fn deleting_unknown_program_flags_invalid_value() {
        let gl = RecordingGl::new();
        let program = gl.create_program().unwrap();
        gl.delete_program(program);
        assert_eq!(gl.get_error(), None);

        gl.delete_program(program);
        assert_eq!(gl.get_error(), Some(GlErrorCode::InvalidValue));
        assert_eq!(gl.get_error(), None);
    }

    #[test]
    fn rejected_token_fails_every_matching_compile() {
        let gl = RecordingGl::new();
        gl.reject_token("samplerExternalOES");
        for _ in 0..2 {
            let fs = gl.create_shader(ShaderStage::Fragment).unwrap();
            gl.shader_source(fs, "uniform samplerExternalOES u_texture;\n");
            gl.compile_shader(fs);
            assert!(!gl.shader_compile_status(fs));
            assert!(!gl.shader_info_log(fs).is_empty());
        }

        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(vs, "uniform mat4 u_mvp;\n");
        gl.compile_shader(vs);
        assert!(gl.shader_compile_status(vs));
    }

    #[test]
    fn unbound_attributes_skip_bound_slots() {
        let gl = RecordingGl::new();
        let vs = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(
            vs,
            "attribute vec4 a_position;\nattribute vec3 a_normal;\n",
        );
        gl.compile_shader(vs);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, vs);
        gl.bind_attrib_location(program, 0, "a_normal");
        gl.link_program(program);

        assert_eq!(gl.attrib_location(program, "a_normal"), Some(0));
        assert_eq!(gl.attrib_location(program, "a_position"), Some(1));
    }
}
