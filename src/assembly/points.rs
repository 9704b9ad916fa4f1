//! Matrices giving the potential at points inside the conductor
use crate::assembly::source::dipole_domain;
use crate::geometry::Geometry;
use crate::kernels::Dipole;
use crate::linalg::Matrix;
use crate::operators::PartialBlock;
use crate::traits::MatrixSink;
use crate::types::{DomainId, Point, Result, K};
use log::{info, warn};

/// Keep the points that lie in a conductive domain, with their domain
fn conductive_points(geometry: &Geometry, points: &[Point]) -> Vec<(Point, DomainId)> {
    points
        .iter()
        .filter_map(|p| match geometry.domain_of(p) {
            Some(d) if geometry.domain(d).is_conductive() => Some((*p, d)),
            Some(d) => {
                warn!(
                    "Point {p:?} is in the non-conductive domain {} and is ignored",
                    geometry.domain(d).name()
                );
                None
            }
            None => {
                warn!("Point {p:?} is outside every domain and is ignored");
                None
            }
        })
        .collect()
}

/// Matrix mapping the head matrix unknowns to the potential at points
///
/// Points outside the conductor are dropped, so row `i` is the `i`-th accepted point.
pub fn surf_to_vol_mat(geometry: &Geometry, points: &[Point]) -> Matrix {
    let accepted = conductive_points(geometry, points);
    info!(
        "Assembling surface to volume matrix for {} of {} points",
        accepted.len(),
        points.len()
    );
    let mut matrix = Matrix::zeros(accepted.len(), geometry.size());

    for (d, domain) in geometry.domains().iter().enumerate() {
        let domain_points = accepted
            .iter()
            .enumerate()
            .filter(|(_, (_, pd))| *pd == d)
            .map(|(i, (p, _))| (i, *p))
            .collect::<Vec<_>>();
        if domain_points.is_empty() {
            continue;
        }
        for boundary in domain.boundaries() {
            for om in boundary.interface().oriented_meshes() {
                let mesh = geometry.mesh(om.mesh());
                let coeff = f64::from(boundary.mesh_orientation(om)) * K;
                let block = PartialBlock::new(mesh);
                block.add_d(-coeff, &domain_points, &mut matrix);
                if !mesh.current_barrier() {
                    block.add_s(coeff / domain.conductivity(), &domain_points, &mut matrix);
                }
            }
        }
    }
    matrix
}

/// Potential of dipoles in an infinite medium at points
///
/// Entry (i, s) is `K / sigma * q.(x - r) / |x - r|^3` when point `i` lies in the domain of
/// dipole `s`, zero otherwise. Points outside the conductor are dropped.
pub fn dip_source_to_internal_pot_mat(
    geometry: &Geometry,
    dipoles: &[Dipole],
    points: &[Point],
    domain: Option<&str>,
) -> Result<Matrix> {
    let domains = dipoles
        .iter()
        .map(|dipole| dipole_domain(geometry, dipole, domain))
        .collect::<Result<Vec<_>>>()?;
    let accepted = conductive_points(geometry, points);

    let mut matrix = Matrix::zeros(accepted.len(), dipoles.len());
    for (s, (dipole, dipole_domain)) in dipoles.iter().zip(&domains).enumerate() {
        let sigma = geometry.domain(*dipole_domain).conductivity();
        if sigma == 0.0 {
            continue;
        }
        for (i, (p, d)) in accepted.iter().enumerate() {
            if d == dipole_domain {
                matrix.add(i, s, K / sigma * dipole.potential(p));
            }
        }
    }
    Ok(matrix)
}
