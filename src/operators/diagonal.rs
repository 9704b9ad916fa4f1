//! Operators coupling a mesh with itself
use crate::geometry::Mesh;
use crate::linalg::{BlockView, SymmetricMatrix};
use crate::operators::common::{add_hypersingular, double_layer, hypersingular_rows, single_layer};
use crate::quadrature::Integrator;
use crate::traits::{MatrixSink, OperatorBlock};
use log::debug;

/// The operators of a mesh with itself, written into a symmetric matrix
///
/// Only one of the two mirrored entries is written, so the target must store (i, j) and
/// (j, i) in the same cell.
pub struct DiagonalBlock<'a> {
    mesh: &'a Mesh,
    integrator: &'a Integrator,
    s_coeff: Option<f64>,
}

impl<'a> DiagonalBlock<'a> {
    /// Create a block
    pub fn new(mesh: &'a Mesh, integrator: &'a Integrator) -> Self {
        Self {
            mesh,
            integrator,
            s_coeff: None,
        }
    }

    /// The mesh
    pub fn mesh(&self) -> &Mesh {
        self.mesh
    }

    /// Set S(T1, T2) for T2 >= T1
    pub fn single_layer<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        debug!("Operator S (mesh {})", self.mesh.name());
        single_layer(self.mesh, self.mesh, self.integrator, true, coeff, matrix);
    }

    /// Add the hypersingular operator, reusing the S block of `matrix` if it was computed
    pub fn hypersingular<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        debug!("Operator N (mesh {})", self.mesh.name());
        let mesh = self.mesh;
        let rows = match self.s_coeff {
            Some(s_coeff) if s_coeff != 0.0 => {
                let stored = &*matrix;
                hypersingular_rows(
                    mesh,
                    mesh,
                    |t1, t2| {
                        stored.get(mesh.triangle_index(t1), mesh.triangle_index(t2)) / s_coeff
                    },
                    true,
                )
            }
            _ => {
                let first = mesh.triangle_index(0);
                let mut view = BlockView::new(SymmetricMatrix::new(mesh.ntriangles()), first, first);
                self.single_layer(1.0, &mut view);
                let s = view.into_inner();
                hypersingular_rows(mesh, mesh, |t1, t2| s.get(t1, t2), true)
            }
        };
        add_hypersingular(mesh, mesh, &rows, |_, _| 0.25, coeff, matrix);
    }

    /// Add the double layer operator
    pub fn double_layer<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        debug!("Operator D (mesh {})", self.mesh.name());
        double_layer(self.mesh, self.mesh, self.integrator, coeff, matrix);
    }

    /// Add `coeff` times the P1-P0 mass matrix, `area / 3` at (T, V) for each vertex V of T
    pub fn add_identity<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        debug!("Operator Id (mesh {})", self.mesh.name());
        for (t, triangle) in self.mesh.triangles().iter().enumerate() {
            for v in triangle.vertices() {
                matrix.add(
                    self.mesh.triangle_index(t),
                    self.mesh.vertex_index(*v),
                    coeff * triangle.area() / 3.0,
                );
            }
        }
    }
}

impl OperatorBlock for DiagonalBlock<'_> {
    fn set_s_block<M: MatrixSink>(&mut self, coeff: f64, matrix: &mut M) {
        if !self.mesh.current_barrier() {
            self.single_layer(coeff, matrix);
            self.s_coeff = Some(coeff);
        }
    }

    fn set_n_block<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        self.hypersingular(coeff, matrix);
    }

    fn set_d_block<M: MatrixSink>(&self, coeff: f64, matrix: &mut M) {
        if !self.mesh.current_barrier() {
            self.double_layer(coeff, matrix);
        }
    }

    /// D* of a mesh with itself is the transpose of D, already held by the symmetric storage
    fn set_dstar_block<M: MatrixSink>(&self, _coeff: f64, _matrix: &mut M) {}
}
