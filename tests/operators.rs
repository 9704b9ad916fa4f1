use approx::*;
use headmat::geometry::shapes::{regular_sphere, screen_triangles};
use headmat::kernels::AnalyticS;
use headmat::linalg::SymmetricMatrix;
use headmat::operators::{DiagonalBlock, NonDiagonalBlock};
use headmat::quadrature::{Integrator, IntegratorOptions};
use headmat::traits::{MatrixSink, OperatorBlock};

extern crate blas_src;
extern crate lapack_src;

fn symmetry_tolerance() -> f64 {
    std::env::var("HEADMAT_S_SYMMETRY_TOL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1e-5)
}

fn accurate_integrator() -> Integrator {
    let mut options = IntegratorOptions::default();
    options.set_tolerance(1e-6);
    Integrator::new(&options).unwrap()
}

/// Integral of 1/|x - y| over T x T for a flat triangle with sides a, b, c
fn self_term(a: f64, b: f64, c: f64) -> f64 {
    let s = 0.5 * (a + b + c);
    let area = (s * (s - a) * (s - b) * (s - c)).sqrt();
    let term = |a: f64, b: f64, c: f64| {
        ((a + b).powi(2) - c * c).ln() / a - (b * b - (c - a).powi(2)).ln() / a
    };
    4.0 * area * area / 3.0 * (term(a, b, c) + term(b, c, a) + term(c, a, b))
}

#[test]
fn test_screen_self_terms() {
    let mut mesh = screen_triangles("screen", 1).unwrap();
    mesh.index_standalone();
    let integrator = accurate_integrator();
    let mut m = SymmetricMatrix::new(mesh.nvertices() + mesh.ntriangles());
    DiagonalBlock::new(&mesh, &integrator).single_layer(1.0, &mut m);

    let exact = self_term(2.0_f64.sqrt(), 1.0, 1.0);
    for t in mesh.triangle_range() {
        assert_relative_eq!(m.get(t, t), exact, max_relative = 1e-6);
    }
}

#[test]
fn test_s_symmetry_on_screen() {
    let mesh = screen_triangles("screen", 2).unwrap();
    let integrator = accurate_integrator();
    let tol = symmetry_tolerance();
    let triangles = mesh.triangles();
    for t1 in triangles {
        for t2 in triangles {
            let a = integrator.integrate(&AnalyticS::new(t1), t2);
            let b = integrator.integrate(&AnalyticS::new(t2), t1);
            assert_relative_eq!(a, b, max_relative = tol);
        }
    }
}

#[test]
fn test_s_symmetry_between_spheres() {
    let inner = regular_sphere("inner", 1, 0.5, [0.0, 0.0, 0.0]).unwrap();
    let outer = regular_sphere("outer", 1, 1.0, [0.0, 0.0, 0.0]).unwrap();
    let integrator = accurate_integrator();
    let tol = symmetry_tolerance();
    for t1 in inner.triangles().iter().step_by(3) {
        for t2 in outer.triangles().iter().step_by(5) {
            let a = integrator.integrate(&AnalyticS::new(t1), t2);
            let b = integrator.integrate(&AnalyticS::new(t2), t1);
            assert_relative_eq!(a, b, max_relative = tol);
        }
    }
}

#[test]
fn test_double_layer_closure() {
    // seen from the surface itself, a closed outward surface subtends -2 pi
    let mut mesh = regular_sphere("sphere", 2, 1.0, [0.0, 0.0, 0.0]).unwrap();
    mesh.index_standalone();
    let integrator = accurate_integrator();
    let mut m = SymmetricMatrix::new(mesh.nvertices() + mesh.ntriangles());
    DiagonalBlock::new(&mesh, &integrator).double_layer(headmat::types::K, &mut m);

    let total: f64 = mesh
        .triangle_range()
        .flat_map(|t| mesh.vertex_range().map(move |v| (t, v)))
        .map(|(t, v)| m.get(t, v))
        .sum();
    assert_relative_eq!(total / mesh.area(), -0.5, max_relative = 1e-4);
}

#[test]
fn test_nondiagonal_blocks_fill_disjoint_regions() {
    let mut inner = regular_sphere("inner", 1, 0.5, [0.0, 0.0, 0.0]).unwrap();
    let mut outer = regular_sphere("outer", 1, 1.0, [0.0, 0.0, 0.0]).unwrap();
    inner.set_offsets(0, 36);
    outer.set_offsets(18, 68);
    let integrator = Integrator::new(&IntegratorOptions::default()).unwrap();
    let mut m = SymmetricMatrix::new(100);
    NonDiagonalBlock::new(&inner, &outer, &integrator).set_blocks(&[1.0, 1.0, 1.0], &mut m);

    // nothing is written within a single mesh
    for (r1, r2) in [(0..18, 0..18), (18..36, 18..36), (36..68, 36..68), (68..100, 68..100)] {
        for i in r1.clone() {
            for j in r2.clone() {
                assert_eq!(m.get(i, j), 0.0);
            }
        }
    }
    assert!(m.get(36, 68) > 0.0);
}
