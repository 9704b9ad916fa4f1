//! Operators coupling two meshes
use crate::geometry::Mesh;
use crate::linalg::{BlockView, Matrix};
use crate::operators::common::{add_hypersingular, double_layer, hypersingular_rows, single_layer};
use crate::quadrature::Integrator;
use crate::traits::{MatrixSink, OperatorBlock};
use log::debug;

/// The operators coupling two meshes
///
/// Rows are indexed by the first mesh and columns by the second one, except for D* whose
/// rows are the triangles of the second mesh.
pub struct NonDiagonalBlock<'a> {
    mesh1: &'a Mesh,
    mesh2: &'a Mesh,
    integrator: &'a Integrator,
    s_coeff: Option<f64>,
}

impl<'a> NonDiagonalBlock<'a> {
    /// Create a block
    pub fn new(mesh1: &'a Mesh, mesh2: &'a Mesh, integrator: &'a Integrator) -> Self {
        Self {
            mesh1,
            mesh2,
            integrator,
            s_coeff: None,
        }
    }

    fn same_mesh(&self) -> bool {
        std::ptr::eq(self.mesh1, self.mesh2)
    }

    /// Set S(T1, T2) for every triangle T1 of the first mesh and T2 of the second mesh
    pub fn single_layer<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        debug!(
            "Operator S (meshes {} and {})",
            self.mesh1.name(),
            self.mesh2.name()
        );
        single_layer(self.mesh1, self.mesh2, self.integrator, false, coeff, matrix);
    }

    /// Add the hypersingular operator, reusing the S block of `matrix` if it was computed
    ///
    /// A vertex paired with itself gets twice the weight of the other pairs.
    pub fn hypersingular<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        debug!(
            "Operator N (meshes {} and {})",
            self.mesh1.name(),
            self.mesh2.name()
        );
        let (mesh1, mesh2) = (self.mesh1, self.mesh2);
        let rows = match self.s_coeff {
            Some(s_coeff) if s_coeff != 0.0 => {
                let stored = &*matrix;
                hypersingular_rows(
                    mesh1,
                    mesh2,
                    |t1, t2| {
                        stored.get(mesh1.triangle_index(t1), mesh2.triangle_index(t2)) / s_coeff
                    },
                    false,
                )
            }
            _ => {
                let mut view = BlockView::new(
                    Matrix::zeros(mesh1.ntriangles(), mesh2.ntriangles()),
                    mesh1.triangle_index(0),
                    mesh2.triangle_index(0),
                );
                self.single_layer(1.0, &mut view);
                let s = view.into_inner();
                hypersingular_rows(mesh1, mesh2, |t1, t2| s.get(t1, t2), false)
            }
        };
        let same_mesh = self.same_mesh();
        add_hypersingular(
            mesh1,
            mesh2,
            &rows,
            |v1, v2| if same_mesh && v1 == v2 { 0.5 } else { 0.25 },
            coeff,
            matrix,
        );
    }

    /// Add the double layer operator, rows indexed by the triangles of the first mesh
    pub fn double_layer<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        debug!(
            "Operator D (meshes {} and {})",
            self.mesh1.name(),
            self.mesh2.name()
        );
        double_layer(self.mesh1, self.mesh2, self.integrator, coeff, matrix);
    }

    /// Add the adjoint double layer operator, rows indexed by the triangles of the second mesh
    pub fn adjoint_double_layer<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        debug!(
            "Operator D* (meshes {} and {})",
            self.mesh1.name(),
            self.mesh2.name()
        );
        double_layer(self.mesh2, self.mesh1, self.integrator, coeff, matrix);
    }
}

impl OperatorBlock for NonDiagonalBlock<'_> {
    fn set_s_block<M: MatrixSink>(&mut self, coeff: f64, matrix: &mut M) {
        if !self.mesh1.current_barrier() && !self.mesh2.current_barrier() {
            self.single_layer(coeff, matrix);
            self.s_coeff = Some(coeff);
        }
    }

    fn set_n_block<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        self.hypersingular(coeff, matrix);
    }

    fn set_d_block<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        if !self.mesh1.current_barrier() {
            self.double_layer(coeff, matrix);
        }
    }

    fn set_dstar_block<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        if !self.same_mesh() && !self.mesh2.current_barrier() {
            self.adjoint_double_layer(coeff, matrix);
        }
    }
}
