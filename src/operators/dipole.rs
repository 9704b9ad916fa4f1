//! Right-hand sides of a dipolar source
use crate::geometry::Mesh;
use crate::kernels::{AnalyticDipPot, AnalyticDipPotDer, Dipole};
use crate::quadrature::Integrator;

/// Add `coeff` times the normal derivative of the dipole potential against the P1 functions of
/// a mesh, at the global vertex indices
pub fn dipole_potential_derivative(
    dipole: &Dipole,
    mesh: &Mesh,
    coeff: f64,
    integrator: &Integrator,
    rhs: &mut [f64],
) {
    for triangle in mesh.triangles() {
        let values = integrator.integrate(&AnalyticDipPotDer::new(dipole, triangle), triangle);
        for (v, value) in triangle.vertices().iter().zip(values) {
            rhs[mesh.vertex_index(*v)] += coeff * value;
        }
    }
}

/// Add `coeff` times the dipole potential against the P0 functions of a mesh, at the global
/// triangle indices
pub fn dipole_potential(
    dipole: &Dipole,
    mesh: &Mesh,
    coeff: f64,
    integrator: &Integrator,
    rhs: &mut [f64],
) {
    let kernel = AnalyticDipPot::new(dipole);
    for (t, triangle) in mesh.triangles().iter().enumerate() {
        rhs[mesh.triangle_index(t)] += coeff * integrator.integrate(&kernel, triangle);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::shapes::regular_sphere;
    use crate::quadrature::IntegratorOptions;
    use crate::types::K;
    use approx::*;

    #[test]
    fn test_flux_through_sphere() {
        // a dipole at the centre of a sphere has zero flux and zero mean potential
        let mesh = regular_sphere("sphere", 2, 1.0, [0.0, 0.0, 0.0]).unwrap();
        let integrator = Integrator::new(&IntegratorOptions::default()).unwrap();
        let dipole = Dipole::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let size = mesh.nvertices() + mesh.ntriangles();

        let mut rhs = vec![0.0; size];
        dipole_potential_derivative(&dipole, &mesh, K, &integrator, &mut rhs);
        let flux: f64 = rhs[..mesh.nvertices()].iter().sum();
        assert_abs_diff_eq!(flux, 0.0, epsilon = 1e-10);
        assert!(rhs.iter().any(|x| x.abs() > 1e-3));

        let mut rhs = vec![0.0; size];
        dipole_potential(&dipole, &mesh, 1.0, &integrator, &mut rhs);
        let total: f64 = rhs[mesh.nvertices()..].iter().sum();
        assert_abs_diff_eq!(total, 0.0, epsilon = 1e-10);
        assert!(rhs[..mesh.nvertices()].iter().all(|x| *x == 0.0));
    }
}
