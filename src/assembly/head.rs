//! Head matrix assembly
use crate::assembly::deflate;
use crate::geometry::Geometry;
use crate::linalg::{Matrix, SymmetricMatrix};
use crate::operators::{DiagonalBlock, NonDiagonalBlock};
use crate::quadrature::Integrator;
use crate::traits::{BlockSelector, HeadMatrixLayout, MatrixSink, OperatorBlock};
use crate::types::{MeshId, K};
use log::{debug, info};

/// Assemble every communicating pair
#[derive(Clone, Copy, Debug, Default)]
pub struct AllBlocks;

impl BlockSelector for AllBlocks {
    fn disabled(&self, _mesh1: MeshId, _mesh2: MeshId) -> bool {
        false
    }
}

/// Assemble every communicating pair except the self block of one mesh
#[derive(Clone, Copy, Debug)]
pub struct AllButBlock(pub MeshId);

impl BlockSelector for AllButBlock {
    fn disabled(&self, mesh1: MeshId, mesh2: MeshId) -> bool {
        mesh1 == self.0 && mesh2 == self.0
    }
}

/// Assemble the head matrix of a geometry into the layout `L`
///
/// The matrix has one row per vertex and one row per triangle of the meshes that are not
/// current barriers. Pairs disabled by the selector are left at zero, then the matrix is
/// deflated.
pub fn head_matrix<L: HeadMatrixLayout, S: BlockSelector>(
    geometry: &Geometry,
    integrator: &Integrator,
    selector: &S,
) -> L {
    let size = geometry.size();
    info!("Assembling head matrix of dimension {size}");
    let mut matrix = L::allocate(size);

    for pair in geometry.communicating_mesh_pairs() {
        let (m1, m2) = (pair.mesh1(), pair.mesh2());
        matrix.prepare_blocks(geometry, m1, m2);
        if selector.disabled(m1, m2) {
            debug!("Skipping block ({m1}, {m2})");
            continue;
        }

        let factor = f64::from(pair.relative_orientation()) * K;
        let coeffs = [
            factor * geometry.sigma_inv(m1, m2),
            factor * geometry.sigma(m1, m2),
            -factor * geometry.indicator(m1, m2),
        ];
        let (mesh1, mesh2) = (geometry.mesh(m1), geometry.mesh(m2));
        if m1 == m2 {
            DiagonalBlock::new(mesh1, integrator).set_blocks(&coeffs, &mut matrix);
        } else {
            NonDiagonalBlock::new(mesh1, mesh2, integrator).set_blocks(&coeffs, &mut matrix);
        }
    }

    deflate(&mut matrix, geometry);
    info!("Head matrix assembled");
    matrix
}

/// Assemble the head matrix into packed symmetric storage
pub fn head_mat(geometry: &Geometry, integrator: &Integrator) -> SymmetricMatrix {
    head_matrix(geometry, integrator, &AllBlocks)
}

/// The head matrix without the rows of one mesh
///
/// The self block of `cortex` is not assembled and its rows are removed. The rows of the other
/// meshes are copied in order, vertex rows before triangle rows for each mesh, followed by
/// `extension` rows of zeros.
pub fn head_matrix_without(
    geometry: &Geometry,
    cortex: MeshId,
    integrator: &Integrator,
    extension: usize,
) -> Matrix {
    let full: SymmetricMatrix = head_matrix(geometry, integrator, &AllButBlock(cortex));
    let size = geometry.size();

    let rows = geometry
        .meshes()
        .iter()
        .enumerate()
        .filter(|(m, _)| *m != cortex)
        .flat_map(|(_, mesh)| {
            let triangles = if mesh.current_barrier() {
                0..0
            } else {
                mesh.triangle_range()
            };
            mesh.vertex_range().chain(triangles)
        })
        .collect::<Vec<_>>();

    let mut reduced = Matrix::zeros(rows.len() + extension, size);
    for (i, row) in rows.iter().enumerate() {
        for j in 0..size {
            reduced.set(i, j, full.get(*row, j));
        }
    }
    reduced
}
