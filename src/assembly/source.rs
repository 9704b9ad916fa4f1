//! Source matrices: right-hand sides of the head matrix system
use crate::geometry::{Geometry, Mesh};
use crate::kernels::Dipole;
use crate::linalg::Matrix;
use crate::operators::{dipole_potential, dipole_potential_derivative, NonDiagonalBlock};
use crate::quadrature::Integrator;
use crate::traits::OperatorBlock;
use crate::types::{DomainId, Error, Result, K};
use log::{debug, info};
use rayon::prelude::*;

/// Source matrix of a distributed source mesh
///
/// The source mesh must lie inside a single conductive domain. It is flagged as a current
/// barrier and numbered on its own, then coupled to the meshes bounding its domain. The matrix
/// has one row per unknown of the head matrix and one column per vertex of the source mesh.
pub fn surf_source_mat(
    geometry: &Geometry,
    source: &mut Mesh,
    integrator: &Integrator,
) -> Result<Matrix> {
    let domain_id = geometry.check_source_mesh(source)?;
    let domain = geometry.domain(domain_id);
    if !domain.is_conductive() {
        return Err(Error::OverlappingSourceMesh(source.name().to_string()));
    }
    source.set_current_barrier(true);
    source.index_standalone();
    let source: &Mesh = source;

    info!(
        "Assembling source matrix of mesh {} in domain {}",
        source.name(),
        domain.name()
    );
    let mut matrix = Matrix::zeros(geometry.size(), source.nvertices());
    let l = -1.0 / domain.conductivity();
    for boundary in domain.boundaries() {
        let factor_n = if boundary.inside() { K } else { -K };
        for om in boundary.interface().oriented_meshes() {
            let coeff_n = factor_n * f64::from(om.orientation());
            let block = NonDiagonalBlock::new(geometry.mesh(om.mesh()), source, integrator);
            block.set_n_block(coeff_n, &mut matrix);
            block.set_d_block(coeff_n * l, &mut matrix);
        }
    }
    Ok(matrix)
}

/// Source matrix of a set of dipoles
///
/// Each dipole gives a column. The domain of the dipoles is looked up by name when given,
/// otherwise from the position of each dipole. Dipoles in a non-conductive domain give a zero
/// column.
pub fn dip_source_mat(
    geometry: &Geometry,
    dipoles: &[Dipole],
    domain: Option<&str>,
    integrator: &Integrator,
) -> Result<Matrix> {
    let domains = dipoles
        .iter()
        .map(|dipole| dipole_domain(geometry, dipole, domain))
        .collect::<Result<Vec<_>>>()?;

    info!("Assembling source matrix of {} dipoles", dipoles.len());
    let size = geometry.size();
    let columns = dipoles
        .par_iter()
        .zip(domains.par_iter())
        .map(|(dipole, domain_id)| {
            let mut rhs = vec![0.0; size];
            let domain = geometry.domain(*domain_id);
            if !domain.is_conductive() {
                return rhs;
            }
            let sigma = domain.conductivity();
            for boundary in domain.boundaries() {
                let factor_d = if boundary.inside() { K } else { -K };
                for om in boundary.interface().oriented_meshes() {
                    let coeff_d = factor_d * f64::from(om.orientation());
                    let mesh = geometry.mesh(om.mesh());
                    dipole_potential_derivative(dipole, mesh, coeff_d, integrator, &mut rhs);
                    if !mesh.current_barrier() {
                        dipole_potential(dipole, mesh, -coeff_d / sigma, integrator, &mut rhs);
                    }
                }
            }
            rhs
        })
        .collect::<Vec<_>>();

    let mut matrix = Matrix::zeros(size, dipoles.len());
    for (s, column) in columns.iter().enumerate() {
        matrix.set_col(s, column)?;
    }
    Ok(matrix)
}

/// The domain of a dipole, by name or by position
pub(crate) fn dipole_domain(
    geometry: &Geometry,
    dipole: &Dipole,
    name: Option<&str>,
) -> Result<DomainId> {
    match name {
        Some(name) => geometry.domain_by_name(name),
        None => {
            let domain = geometry.domain_of(dipole.position()).ok_or_else(|| {
                Error::UnknownDomain(format!("no domain contains {:?}", dipole.position()))
            })?;
            debug!(
                "Dipole at {:?} in domain {}",
                dipole.position(),
                geometry.domain(domain).name()
            );
            Ok(domain)
        }
    }
}
