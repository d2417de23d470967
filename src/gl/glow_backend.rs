use std::cell::{Cell, RefCell};

use glam::{Mat4, Vec3};
use glow::HasContext;
use rustc_hash::FxHashMap;

use super::{
    DrawMode, GlApi, GlErrorCode, ProgramId, ShaderId, ShaderStage,
    TextureId, TextureTarget, UniformLocation, VertexArrayId,
};

/// [`GlApi`] over a live `glow` context.
///
/// GL ES 3 has no client-side vertex arrays, so the client-array path streams
/// each attribute through a scratch buffer (one per attribute location) and
/// indices through a scratch element buffer.
pub struct GlowGl {
    gl: glow::Context,
    scratch_vertices: RefCell<FxHashMap<u32, glow::NativeBuffer>>,
    scratch_indices: Cell<Option<glow::NativeBuffer>>,
}

impl GlowGl {
    /// Wrap a context that is current on the calling thread.
    #[must_use]
    pub fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            scratch_vertices: RefCell::default(),
            scratch_indices: Cell::new(None),
        }
    }

    /// The wrapped context.
    #[must_use]
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    fn scratch_vertex_buffer(&self, location: u32) -> Option<glow::NativeBuffer> {
        let mut buffers = self.scratch_vertices.borrow_mut();
        if let Some(buffer) = buffers.get(&location) {
            return Some(*buffer);
        }
        // SAFETY: the context is current on this thread (type contract).
        match unsafe { self.gl.create_buffer() } {
            Ok(buffer) => {
                let _ = buffers.insert(location, buffer);
                Some(buffer)
            }
            Err(e) => {
                log::error!("scratch vertex buffer for location {location}: {e}");
                None
            }
        }
    }

    fn scratch_index_buffer(&self) -> Option<glow::NativeBuffer> {
        if let Some(buffer) = self.scratch_indices.get() {
            return Some(buffer);
        }
        // SAFETY: the context is current on this thread (type contract).
        match unsafe { self.gl.create_buffer() } {
            Ok(buffer) => {
                self.scratch_indices.set(Some(buffer));
                Some(buffer)
            }
            Err(e) => {
                log::error!("scratch index buffer: {e}");
                None
            }
        }
    }
}

impl Drop for GlowGl {
    fn drop(&mut self) {
        let buffers = self.scratch_vertices.get_mut();
        // SAFETY: buffers were created by this context and are not shared.
        unsafe {
            for (_, buffer) in buffers.drain() {
                self.gl.delete_buffer(buffer);
            }
            if let Some(buffer) = self.scratch_indices.take() {
                self.gl.delete_buffer(buffer);
            }
        }
    }
}

const fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

const fn mode_enum(mode: DrawMode) -> u32 {
    match mode {
        DrawMode::Triangles => glow::TRIANGLES,
    }
}

const fn shader(id: ShaderId) -> glow::NativeShader {
    glow::NativeShader(id.get())
}

const fn program(id: ProgramId) -> glow::NativeProgram {
    glow::NativeProgram(id.get())
}

const fn uniform(location: UniformLocation) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location.0)
}

// SAFETY (all methods below): `GlowGl` is only constructed from a context
// the caller made current on this thread, and every handle passed in was
// created by that same context.
impl GlApi for GlowGl {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        unsafe { self.gl.create_shader(stage_enum(stage)) }
            .map(|shader| ShaderId::new(shader.0))
    }

    fn shader_source(&self, id: ShaderId, source: &str) {
        unsafe { self.gl.shader_source(shader(id), source) }
    }

    fn compile_shader(&self, id: ShaderId) {
        unsafe { self.gl.compile_shader(shader(id)) }
    }

    fn shader_compile_status(&self, id: ShaderId) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader(id)) }
    }

    fn shader_info_log(&self, id: ShaderId) -> String {
        unsafe { self.gl.get_shader_info_log(shader(id)) }
    }

    fn delete_shader(&self, id: ShaderId) {
        unsafe { self.gl.delete_shader(shader(id)) }
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        unsafe { self.gl.create_program() }
            .map(|program| ProgramId::new(program.0))
    }

    fn attach_shader(&self, id: ProgramId, stage: ShaderId) {
        unsafe { self.gl.attach_shader(program(id), shader(stage)) }
    }

    fn detach_shader(&self, id: ProgramId, stage: ShaderId) {
        unsafe { self.gl.detach_shader(program(id), shader(stage)) }
    }

    fn bind_attrib_location(&self, id: ProgramId, location: u32, name: &str) {
        unsafe { self.gl.bind_attrib_location(program(id), location, name) }
    }

    fn link_program(&self, id: ProgramId) {
        unsafe { self.gl.link_program(program(id)) }
    }

    fn program_link_status(&self, id: ProgramId) -> bool {
        unsafe { self.gl.get_program_link_status(program(id)) }
    }

    fn program_info_log(&self, id: ProgramId) -> String {
        unsafe { self.gl.get_program_info_log(program(id)) }
    }

    fn delete_program(&self, id: ProgramId) {
        unsafe { self.gl.delete_program(program(id)) }
    }

    fn attrib_location(&self, id: ProgramId, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program(id), name) }
    }

    fn uniform_location(
        &self,
        id: ProgramId,
        name: &str,
    ) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(program(id), name) }
            .map(|location| UniformLocation(location.0))
    }

    fn use_program(&self, id: Option<ProgramId>) {
        unsafe { self.gl.use_program(id.map(program)) }
    }

    fn uniform_matrix4(&self, location: UniformLocation, value: &Mat4) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(
                Some(&uniform(location)),
                false,
                &value.to_cols_array(),
            );
        }
    }

    fn uniform_1i(&self, location: UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(&uniform(location)), value) }
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(&uniform(location)), value) }
    }

    fn uniform_3f(&self, location: UniformLocation, value: Vec3) {
        unsafe {
            self.gl.uniform_3_f32(
                Some(&uniform(location)),
                value.x,
                value.y,
                value.z,
            );
        }
    }

    fn active_texture(&self, unit: u32) {
        let Some(texture) = glow::TEXTURE0.checked_add(unit) else {
            log::error!("texture unit {unit} out of range");
            return;
        };
        unsafe { self.gl.active_texture(texture) }
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureId>) {
        let texture = texture.map(|id| glow::NativeTexture(id.get()));
        unsafe { self.gl.bind_texture(target.raw(), texture) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) {
        let vertex_array =
            vertex_array.map(|id| glow::NativeVertexArray(id.get()));
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn client_attrib_array(&self, location: u32, components: i32, data: &[f32]) {
        let Some(buffer) = self.scratch_vertex_buffer(location) else {
            return;
        };
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STREAM_DRAW,
            );
            self.gl.vertex_attrib_pointer_f32(
                location,
                components,
                glow::FLOAT,
                false,
                0,
                0,
            );
            self.gl.enable_vertex_attrib_array(location);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn draw_elements_bound(&self, mode: DrawMode, count: usize) {
        unsafe {
            self.gl.draw_elements(
                mode_enum(mode),
                count as i32,
                glow::UNSIGNED_SHORT,
                0,
            );
        }
    }

    fn draw_elements_client(&self, mode: DrawMode, indices: &[u16]) {
        let Some(buffer) = self.scratch_index_buffer() else {
            return;
        };
        unsafe {
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STREAM_DRAW,
            );
            self.gl.draw_elements(
                mode_enum(mode),
                indices.len() as i32,
                glow::UNSIGNED_SHORT,
                0,
            );
        }
    }

    fn get_error(&self) -> Option<GlErrorCode> {
        GlErrorCode::from_raw(unsafe { self.gl.get_error() })
    }
}
