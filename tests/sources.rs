use approx::*;
use headmat::assembly::{
    dip_source_mat, dip_source_to_internal_pot_mat, head_mat, surf_source_mat, surf_to_vol_mat,
};
use headmat::geometry::shapes::{nested_spheres, regular_sphere};
use headmat::kernels::Dipole;
use headmat::linalg::SparseMatrix;
use headmat::quadrature::{Integrator, IntegratorOptions};
use headmat::traits::{MatrixSink, SparseIO};
use headmat::types::K;

extern crate blas_src;
extern crate lapack_src;

fn integrator() -> Integrator {
    Integrator::new(&IntegratorOptions::default()).unwrap()
}

#[test]
fn test_surface_source_persistence() {
    let geometry = nested_spheres(1, &[0.5, 1.0], &[1.0, 0.25, 0.0]).unwrap();
    let mut source = regular_sphere("source", 1, 0.2, [0.0, 0.0, 0.0]).unwrap();
    let matrix = surf_source_mat(&geometry, &mut source, &integrator()).unwrap();
    assert_eq!(matrix.nrows(), geometry.size());
    assert_eq!(matrix.ncols(), source.nvertices());

    let sparse = SparseMatrix::from_dense(&matrix);
    assert!(sparse.nnz() > 0);
    let path = std::env::temp_dir().join("_test_headmat_surf_source.bin");
    sparse.save_binary(&path).unwrap();
    let loaded = SparseMatrix::load_binary(&path).unwrap();
    assert_eq!(loaded, sparse);
    assert_eq!(loaded.to_dense().data(), matrix.data());
}

#[test]
fn test_dipole_linearity() {
    let geometry = nested_spheres(2, &[0.5, 1.0], &[1.0, 0.25, 0.0]).unwrap();
    let position = [0.1, -0.05, 0.2];
    let dipoles = [
        Dipole::new(position, [1.0, 0.0, 0.0]),
        Dipole::new(position, [0.0, 1.0, 0.0]),
        Dipole::new(position, [1.0, 1.0, 0.0]),
    ];
    let matrix = dip_source_mat(&geometry, &dipoles, Some("domain0"), &integrator()).unwrap();
    let difference = (0..matrix.nrows())
        .map(|i| (matrix.get(i, 2) - matrix.get(i, 0) - matrix.get(i, 1)).powi(2))
        .sum::<f64>()
        .sqrt();
    let scale = matrix.col(2).iter().map(|x| x * x).sum::<f64>().sqrt();
    assert!(scale > 0.0);
    assert!(difference < 1e-2 * scale);
}

/// Potential of a unit conductivity sphere of radius R around a dipole at its centre
fn centred_dipole_potential(moment: &[f64; 3], x: &[f64; 3], radius: f64) -> f64 {
    let r = x.iter().map(|v| v * v).sum::<f64>().sqrt();
    let qx = moment.iter().zip(x).map(|(a, b)| a * b).sum::<f64>();
    K * qx * (1.0 / r.powi(3) + 2.0 / radius.powi(3))
}

#[test]
fn test_forward_pipeline() {
    // homogeneous unit sphere split by an inner interface, with a dipole at the centre
    let geometry = nested_spheres(3, &[0.8, 1.0], &[1.0, 1.0, 0.0]).unwrap();
    let integrator = integrator();
    let head = head_mat(&geometry, &integrator);
    let dipole = Dipole::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
    let source = dip_source_mat(&geometry, &[dipole], None, &integrator).unwrap();
    let solution = head.solve(&source.col(0)).unwrap();

    // 3 K cos(theta) / (sigma R^2) on the scalp
    let scalp = geometry.mesh(geometry.mesh_by_name("sphere1").unwrap());
    let peak = 3.0 * K;
    for (point, v) in scalp.points().iter().zip(scalp.vertex_range()) {
        let exact = centred_dipole_potential(dipole.moment(), point, 1.0);
        assert_abs_diff_eq!(solution[v], exact, epsilon = 0.05 * peak);
        if point[2].abs() > 1.0 - 1e-12 {
            assert_relative_eq!(solution[v], point[2] * peak, max_relative = 0.05);
        }
    }

    let points = [[0.0, 0.0, 0.3], [0.0, 0.0, 3.0], [0.2, 0.0, -0.4]];
    let surf_to_vol = surf_to_vol_mat(&geometry, &points);
    let internal = dip_source_to_internal_pot_mat(&geometry, &[dipole], &points, None).unwrap();
    // the point in air is dropped
    assert_eq!(surf_to_vol.nrows(), 2);
    assert_eq!(internal.nrows(), 2);
    assert_relative_eq!(internal.get(0, 0), K * 0.3 / 0.027, max_relative = 1e-12);

    let potential = surf_to_vol.mul_vec(&solution).unwrap();
    for (row, point) in [points[0], points[2]].iter().enumerate() {
        let exact = centred_dipole_potential(dipole.moment(), point, 1.0);
        assert_relative_eq!(
            potential[row] + internal.get(row, 0),
            exact,
            max_relative = 0.01
        );
    }
}
