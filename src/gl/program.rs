use std::fmt;
use std::rc::Rc;

use super::{GlApi, ProgramId, ShaderId, ShaderStage, UniformLocation};

/// Step of program construction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStage {
    /// Allocating a shader object for the given stage.
    CreateShader(ShaderStage),
    /// Compiling the given stage.
    Compile(ShaderStage),
    /// Allocating the program object.
    CreateProgram,
    /// Linking the compiled stages.
    Link,
}

impl fmt::Display for LinkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateShader(stage) => {
                write!(f, "creating {stage} shader")
            }
            Self::Compile(stage) => write!(f, "compiling {stage} shader"),
            Self::CreateProgram => f.write_str("creating program"),
            Self::Link => f.write_str("linking program"),
        }
    }
}

/// Program creation, compilation or link failure, with the driver's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkError {
    /// Where construction stopped.
    pub stage: LinkStage,
    /// Driver info log (may be empty).
    pub log: String,
}

impl LinkError {
    /// Build an error for `stage` carrying the driver's `log`.
    #[must_use]
    pub fn new(stage: LinkStage, log: impl Into<String>) -> Self {
        Self {
            stage,
            log: log.into(),
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.log.is_empty() {
            write!(f, "{} failed", self.stage)
        } else {
            write!(f, "{} failed: {}", self.stage, self.log.trim_end())
        }
    }
}

impl std::error::Error for LinkError {}

/// A compiled shader stage, deleted when dropped.
struct StageObject<'a, A: GlApi + ?Sized> {
    api: &'a A,
    id: ShaderId,
}

impl<'a, A: GlApi + ?Sized> StageObject<'a, A> {
    fn compile(
        api: &'a A,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self, LinkError> {
        let id = api
            .create_shader(stage)
            .map_err(|log| LinkError::new(LinkStage::CreateShader(stage), log))?;
        let object = Self { api, id };
        api.shader_source(id, source);
        api.compile_shader(id);
        if !api.shader_compile_status(id) {
            return Err(LinkError::new(
                LinkStage::Compile(stage),
                api.shader_info_log(id),
            ));
        }
        Ok(object)
    }
}

impl<A: GlApi + ?Sized> Drop for StageObject<'_, A> {
    fn drop(&mut self) {
        self.api.delete_shader(self.id);
    }
}

/// Exclusive owner of one linked GL program.
///
/// The program is deleted by [`recycle`](Self::recycle) or on drop,
/// whichever comes first; deleting is idempotent.
pub struct GlProgram<A: GlApi + ?Sized> {
    api: Rc<A>,
    id: Option<ProgramId>,
}

impl<A: GlApi + ?Sized> GlProgram<A> {
    /// Compile both stages and link them.
    ///
    /// Each `(location, name)` in `attribute_bindings` is bound before the
    /// link, so vertex arrays built against those locations work with every
    /// program sharing them. Attributes not listed get driver-chosen slots.
    ///
    /// Every object allocated along the way is released again if a later
    /// step fails. Stage objects are detached and deleted after a successful
    /// link; the program keeps its binaries.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] naming the failing step and the driver log.
    pub fn new(
        api: Rc<A>,
        vertex_source: &str,
        fragment_source: &str,
        attribute_bindings: &[(u32, &str)],
    ) -> Result<Self, LinkError> {
        let id = api
            .create_program()
            .map_err(|log| LinkError::new(LinkStage::CreateProgram, log))?;
        let program = Self { api, id: Some(id) };
        {
            let gl = &*program.api;
            let vertex =
                StageObject::compile(gl, ShaderStage::Vertex, vertex_source)?;
            let fragment = StageObject::compile(
                gl,
                ShaderStage::Fragment,
                fragment_source,
            )?;

            gl.attach_shader(id, vertex.id);
            gl.attach_shader(id, fragment.id);
            for &(location, name) in attribute_bindings {
                gl.bind_attrib_location(id, location, name);
            }
            gl.link_program(id);
            gl.detach_shader(id, vertex.id);
            gl.detach_shader(id, fragment.id);

            if !gl.program_link_status(id) {
                return Err(LinkError::new(
                    LinkStage::Link,
                    gl.program_info_log(id),
                ));
            }
        }
        log::debug!("linked program {id}");
        Ok(program)
    }

    /// The program id, `None` once recycled.
    #[must_use]
    pub fn id(&self) -> Option<ProgramId> {
        self.id
    }

    /// Whether the program has been released.
    #[must_use]
    pub fn is_recycled(&self) -> bool {
        self.id.is_none()
    }

    /// The GL context this program lives in.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Look up an attribute location; `None` when absent or recycled.
    #[must_use]
    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        self.id.and_then(|id| self.api.attrib_location(id, name))
    }

    /// Look up a uniform location; `None` when absent or recycled.
    #[must_use]
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.id.and_then(|id| self.api.uniform_location(id, name))
    }

    /// Delete the program. Later calls do nothing.
    pub fn recycle(&mut self) {
        if let Some(id) = self.id.take() {
            self.api.delete_program(id);
            log::debug!("deleted program {id}");
        }
    }
}

impl<A: GlApi + ?Sized> Drop for GlProgram<A> {
    fn drop(&mut self) {
        self.recycle();
    }
}
