//! Operators between a mesh and isolated evaluation points
use crate::geometry::Mesh;
use crate::kernels::{AnalyticD3, AnalyticS};
use crate::operators::common::for_each_row;
use crate::traits::{AnalyticKernel, MatrixSink};
use crate::types::Point;
use log::debug;

/// The S and D kernels of a mesh evaluated at points, without quadrature
///
/// Points are given with the row they fill in the output matrix.
pub struct PartialBlock<'a> {
    mesh: &'a Mesh,
}

impl<'a> PartialBlock<'a> {
    /// Create a block
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    /// Add the D kernel of every triangle at (point, vertex)
    pub fn add_d<M: MatrixSink>(&self, coeff: f64, points: &[(usize, Point)], matrix: &mut M) {
        debug!("Partial operator D (mesh {})", self.mesh.name());
        let kernels = self
            .mesh
            .triangles()
            .iter()
            .map(AnalyticD3::new)
            .collect::<Vec<_>>();
        for_each_row(
            points.len(),
            |i| {
                let mut row = vec![0.0; self.mesh.nvertices()];
                for (kernel, triangle) in kernels.iter().zip(self.mesh.triangles()) {
                    let values = kernel.evaluate(&points[i].1);
                    for (v, value) in triangle.vertices().iter().zip(values) {
                        row[*v] += value;
                    }
                }
                row
            },
            |i, row| {
                for (v, value) in row.iter().enumerate() {
                    matrix.add(points[i].0, self.mesh.vertex_index(v), coeff * value);
                }
            },
        );
    }

    /// Add the S kernel of every triangle at (point, triangle)
    pub fn add_s<M: MatrixSink>(&self, coeff: f64, points: &[(usize, Point)], matrix: &mut M) {
        debug!("Partial operator S (mesh {})", self.mesh.name());
        let kernels = self
            .mesh
            .triangles()
            .iter()
            .map(AnalyticS::new)
            .collect::<Vec<_>>();
        for_each_row(
            points.len(),
            |i| {
                kernels
                    .iter()
                    .map(|kernel| kernel.evaluate(&points[i].1))
                    .collect::<Vec<_>>()
            },
            |i, row| {
                for (t, value) in row.iter().enumerate() {
                    matrix.add(points[i].0, self.mesh.triangle_index(t), coeff * value);
                }
            },
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::shapes::regular_sphere;
    use crate::linalg::Matrix;
    use approx::*;
    use std::f64::consts::PI;

    #[test]
    fn test_d_closure() {
        // the D kernels of a closed outward surface sum to -4 pi inside and vanish outside
        let mesh = regular_sphere("sphere", 1, 1.0, [0.0, 0.0, 0.0]).unwrap();
        let points = [(0, [0.1, 0.2, -0.1]), (1, [3.0, 0.0, 0.0])];
        let mut m = Matrix::zeros(2, mesh.nvertices());
        PartialBlock::new(&mesh).add_d(1.0, &points, &mut m);
        let inside: f64 = m.row(0).iter().sum();
        let outside: f64 = m.row(1).iter().sum();
        assert_relative_eq!(inside, -4.0 * PI, max_relative = 1e-10);
        assert_abs_diff_eq!(outside, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_s_far_field() {
        let mesh = regular_sphere("sphere", 1, 1.0, [0.0, 0.0, 0.0]).unwrap();
        let points = [(1, [50.0, 0.0, 0.0])];
        let mut m = Matrix::zeros(2, mesh.nvertices() + mesh.ntriangles());
        PartialBlock::new(&mesh).add_s(2.0, &points, &mut m);
        let total: f64 = m.row(1).iter().sum();
        assert_relative_eq!(total, 2.0 * mesh.area() / 50.0, max_relative = 1e-3);
        assert!(m.row(0).iter().all(|x| *x == 0.0));
    }
}
