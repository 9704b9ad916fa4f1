//! Operator kernels shared by the diagonal and non-diagonal blocks
use crate::geometry::vector::dot;
use crate::geometry::Mesh;
use crate::kernels::{AnalyticD3, AnalyticS};
use crate::quadrature::Integrator;
use crate::traits::MatrixSink;
use rayon::prelude::*;

/// Number of rows computed in parallel before they are written
const ROW_BATCH: usize = 256;

/// Compute rows in parallel, batch by batch, and hand them to `write` in order
pub(crate) fn for_each_row<T, F, W>(nrows: usize, compute: F, mut write: W)
where
    T: Send,
    F: Fn(usize) -> T + Sync,
    W: FnMut(usize, T),
{
    let mut start = 0;
    while start < nrows {
        let end = usize::min(start + ROW_BATCH, nrows);
        let rows = (start..end).into_par_iter().map(&compute).collect::<Vec<_>>();
        for (i, row) in rows.into_iter().enumerate() {
            write(start + i, row);
        }
        start = end;
    }
}

/// S(T1, T2), the S kernel of T1 integrated over T2, for every triangle pair
///
/// With `upper` set the two meshes are the same and only the pairs with T2 >= T1 are
/// computed.
pub(crate) fn single_layer<M: MatrixSink>(
    mesh1: &Mesh,
    mesh2: &Mesh,
    integrator: &Integrator,
    upper: bool,
    coeff: f64,
    matrix: &mut M,
) {
    let triangles2 = mesh2.triangles();
    for_each_row(
        mesh1.ntriangles(),
        |t1| {
            let kernel = AnalyticS::new(&mesh1.triangles()[t1]);
            let start = if upper { t1 } else { 0 };
            triangles2[start..]
                .iter()
                .map(|t2| integrator.integrate(&kernel, t2))
                .collect::<Vec<_>>()
        },
        |t1, row| {
            let start = if upper { t1 } else { 0 };
            for (k, value) in row.iter().enumerate() {
                matrix.set(
                    mesh1.triangle_index(t1),
                    mesh2.triangle_index(start + k),
                    coeff * value,
                );
            }
        },
    );
}

/// The D kernel of every triangle of `sources` integrated over every triangle of `targets`,
/// added at (target triangle, source vertex)
pub(crate) fn double_layer<M: MatrixSink>(
    targets: &Mesh,
    sources: &Mesh,
    integrator: &Integrator,
    coeff: f64,
    matrix: &mut M,
) {
    let kernels = sources
        .triangles()
        .iter()
        .map(AnalyticD3::new)
        .collect::<Vec<_>>();
    for_each_row(
        targets.ntriangles(),
        |t1| {
            let triangle1 = &targets.triangles()[t1];
            let mut row = vec![0.0; sources.nvertices()];
            for (kernel, triangle2) in kernels.iter().zip(sources.triangles()) {
                let total = integrator.integrate(kernel, triangle1);
                for (v, value) in triangle2.vertices().iter().zip(total) {
                    row[*v] += value;
                }
            }
            row
        },
        |t1, row| {
            for (v, value) in row.iter().enumerate() {
                matrix.add(
                    targets.triangle_index(t1),
                    sources.vertex_index(v),
                    coeff * value,
                );
            }
        },
    );
}

/// Sums of `dot(CB1, CB2) S(T1, T2) / (area(T1) area(T2))` for every pair of local vertices
///
/// The sums run over the triangles incident to each vertex, CB being the edge opposite to the
/// vertex, and `s_value(t1, t2)` gives S(T1, T2) at coefficient one for local triangle
/// indices. With `upper` set the two meshes are the same and row v1 stops at v1.
pub(crate) fn hypersingular_rows<S>(
    mesh1: &Mesh,
    mesh2: &Mesh,
    s_value: S,
    upper: bool,
) -> Vec<Vec<f64>>
where
    S: Fn(usize, usize) -> f64 + Sync,
{
    (0..mesh1.nvertices())
        .into_par_iter()
        .map(|v1| {
            let mut row = vec![0.0; mesh2.nvertices()];
            for t1 in mesh1.incident_triangles(v1) {
                let triangle1 = &mesh1.triangles()[*t1];
                let Some(p1) = triangle1.position(v1) else {
                    continue;
                };
                let cb1 = triangle1.opposite_edge(p1);
                for (t2, triangle2) in mesh2.triangles().iter().enumerate() {
                    let weight = s_value(*t1, t2) / (triangle1.area() * triangle2.area());
                    for (p2, v2) in triangle2.vertices().iter().enumerate() {
                        row[*v2] += dot(&cb1, &triangle2.opposite_edge(p2)) * weight;
                    }
                }
            }
            if upper {
                row.truncate(v1 + 1);
            }
            row
        })
        .collect()
}

/// Add `-factor(v1, v2) * coeff` times the sums of [hypersingular_rows] at (v1, v2)
pub(crate) fn add_hypersingular<M, F>(
    mesh1: &Mesh,
    mesh2: &Mesh,
    rows: &[Vec<f64>],
    factor: F,
    coeff: f64,
    matrix: &mut M,
) where
    M: MatrixSink,
    F: Fn(usize, usize) -> f64,
{
    for (v1, row) in rows.iter().enumerate() {
        for (v2, value) in row.iter().enumerate() {
            matrix.add(
                mesh1.vertex_index(v1),
                mesh2.vertex_index(v2),
                -factor(v1, v2) * coeff * value,
            );
        }
    }
}
