use super::{Material, Mesh, RenderData};

/// Borrowed mesh + material pair for one draw.
#[derive(Clone, Copy)]
pub struct DrawItem<'a> {
    mesh: &'a dyn Mesh,
    material: &'a dyn Material,
}

impl<'a> DrawItem<'a> {
    /// Pair `mesh` with `material`.
    #[must_use]
    pub fn new(mesh: &'a dyn Mesh, material: &'a dyn Material) -> Self {
        Self { mesh, material }
    }
}

impl RenderData for DrawItem<'_> {
    fn mesh(&self) -> &dyn Mesh {
        self.mesh
    }

    fn material(&self) -> &dyn Material {
        self.material
    }
}
