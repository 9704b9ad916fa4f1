//! Removal of the constant null space of isolated conductors
use crate::geometry::Geometry;
use crate::traits::MatrixSink;
use log::debug;

/// Deflate a head matrix
///
/// The potential of a conductor enclosed by current barriers is defined up to a constant. For
/// each isolated part, `M(i, i) / n` is added to every vertex pair of the same outermost mesh,
/// where `i` is the first vertex of the first outermost mesh and `n` the number of vertices of
/// the outermost meshes of the part.
pub fn deflate<M: MatrixSink>(matrix: &mut M, geometry: &Geometry) {
    for part in geometry.isolated_parts() {
        let outermost = part
            .iter()
            .map(|m| geometry.mesh(*m))
            .filter(|mesh| mesh.outermost())
            .collect::<Vec<_>>();
        let nb_vertices: usize = outermost.iter().map(|mesh| mesh.nvertices()).sum();
        let Some(i_first) = outermost
            .first()
            .filter(|mesh| mesh.nvertices() > 0)
            .map(|mesh| mesh.vertex_index(0))
        else {
            continue;
        };
        let coef = matrix.get(i_first, i_first) / nb_vertices as f64;
        debug!("Deflating {} meshes with coefficient {coef:e}", outermost.len());

        for mesh in outermost {
            for v1 in mesh.vertex_range() {
                for v2 in v1..mesh.vertex_range().end {
                    matrix.add(v1, v2, coef);
                }
            }
        }
    }
}
