//! Adaptive integration over triangles
use crate::geometry::vector::{add, cross, midpoint, norm, scale, sub};
use crate::geometry::Triangle;
use crate::quadrature::triangle_rules::{triangle_rule, TriangleRule};
use crate::traits::{AnalyticKernel, IntegrandValue};
use crate::types::{Error, Point, Result};

/// Number of points of the rule used for each quadrature order
const RULE_SIZES: [usize; 4] = [3, 6, 7, 16];

/// Options for an [Integrator]
#[derive(Debug, Clone)]
pub struct IntegratorOptions {
    /// Quadrature order, from 0 (3 points) to 3 (16 points)
    order: usize,
    /// Maximum number of adaptive refinements
    max_levels: usize,
    /// Relative tolerance of the adaptive refinement
    tolerance: f64,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            order: 3,
            max_levels: 10,
            tolerance: 0.001,
        }
    }
}

impl IntegratorOptions {
    /// Set the quadrature order
    pub fn set_order(&mut self, order: usize) -> &mut Self {
        self.order = order;
        self
    }
    /// Set the maximum number of adaptive refinements; zero disables adaptivity
    pub fn set_max_levels(&mut self, max_levels: usize) -> &mut Self {
        self.max_levels = max_levels;
        self
    }
    /// Set the relative tolerance of the adaptive refinement
    pub fn set_tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.tolerance = tolerance;
        self
    }
    /// Quadrature order
    pub fn order(&self) -> usize {
        self.order
    }
    /// Maximum number of adaptive refinements
    pub fn max_levels(&self) -> usize {
        self.max_levels
    }
    /// Relative tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Adaptive integrator of kernels over triangles
///
/// The triangle is split in four at the edge midpoints as long as the split changes the
/// integral by more than the relative tolerance, up to the maximum number of levels.
#[derive(Debug, Clone)]
pub struct Integrator {
    rule: &'static TriangleRule,
    max_levels: usize,
    tolerance: f64,
}

impl Integrator {
    /// Create an integrator
    pub fn new(options: &IntegratorOptions) -> Result<Self> {
        let npoints = RULE_SIZES.get(options.order).ok_or_else(|| {
            Error::Unsupported(format!("quadrature order {}", options.order))
        })?;
        Ok(Self {
            rule: triangle_rule(*npoints)?,
            max_levels: options.max_levels,
            tolerance: options.tolerance,
        })
    }

    /// Number of points of the underlying rule
    pub fn npoints(&self) -> usize {
        self.rule.npoints
    }

    /// Integrate a kernel over a triangle
    pub fn integrate<K: AnalyticKernel>(&self, kernel: &K, triangle: &Triangle) -> K::Output {
        self.integrate_points(kernel, triangle.points())
    }

    /// Integrate a kernel over the triangle with the given vertices
    pub fn integrate_points<K: AnalyticKernel>(&self, kernel: &K, vertices: &[Point; 3]) -> K::Output {
        let area = 0.5 * norm(&cross(
            &sub(&vertices[1], &vertices[0]),
            &sub(&vertices[2], &vertices[0]),
        ));
        let i0 = self.apply_rule(kernel, vertices, area);
        if self.max_levels == 0 {
            i0
        } else {
            self.adaptive(kernel, vertices, area, &i0, 0)
        }
    }

    fn apply_rule<K: AnalyticKernel>(&self, kernel: &K, v: &[Point; 3], area: f64) -> K::Output {
        let e1 = sub(&v[1], &v[0]);
        let e2 = sub(&v[2], &v[0]);
        let mut result = K::Output::zero();
        for (p, w) in self.rule.points.chunks(2).zip(&self.rule.weights) {
            let x = add(&v[0], &add(&scale(&e1, p[0]), &scale(&e2, p[1])));
            result.add_scaled(&kernel.evaluate(&x), 2.0 * w * area);
        }
        result
    }

    fn adaptive<K: AnalyticKernel>(
        &self,
        kernel: &K,
        v: &[Point; 3],
        area: f64,
        i0: &K::Output,
        level: usize,
    ) -> K::Output {
        let m0 = midpoint(&v[1], &v[2]);
        let m1 = midpoint(&v[2], &v[0]);
        let m2 = midpoint(&v[0], &v[1]);
        let children = [
            [v[0], m2, m1],
            [v[1], m0, m2],
            [v[2], m1, m0],
            [m0, m1, m2],
        ];
        let child_area = 0.25 * area;
        let values = children
            .iter()
            .map(|c| self.apply_rule(kernel, c, child_area))
            .collect::<Vec<_>>();
        let mut sum = K::Output::zero();
        for value in &values {
            sum.add_scaled(value, 1.0);
        }
        if level + 1 < self.max_levels && sum.distance(i0) > self.tolerance * i0.magnitude() {
            sum = K::Output::zero();
            for (c, value) in children.iter().zip(&values) {
                sum.add_scaled(&self.adaptive(kernel, c, child_area, value, level + 1), 1.0);
            }
        }
        sum
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Mesh;
    use crate::kernels::AnalyticS;
    use crate::quadrature::triangle_rules::available_rules;
    use approx::*;

    struct Polynomial;

    impl AnalyticKernel for Polynomial {
        type Output = [f64; 3];
        fn evaluate(&self, x: &Point) -> [f64; 3] {
            [1.0, x[0] * x[1], x[0].powi(3)]
        }
    }

    /// Closed form of the integral of 1/|x - y| over T x T for a flat triangle with sides a, b, c
    fn self_term(a: f64, b: f64, c: f64) -> f64 {
        let s = 0.5 * (a + b + c);
        let area = (s * (s - a) * (s - b) * (s - c)).sqrt();
        let term = |a: f64, b: f64, c: f64| {
            ((a + b).powi(2) - c * c).ln() / a - (b * b - (c - a).powi(2)).ln() / a
        };
        4.0 * area * area / 3.0 * (term(a, b, c) + term(b, c, a) + term(c, a, b))
    }

    fn single_triangle(points: [Point; 3]) -> Mesh {
        Mesh::new("t", points.to_vec(), &[[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_polynomial() {
        let mesh = single_triangle([[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let mut options = IntegratorOptions::default();
        options.set_order(2).set_max_levels(0);
        let integrator = Integrator::new(&options).unwrap();
        assert_eq!(integrator.npoints(), 7);
        let value = integrator.integrate(&Polynomial, &mesh.triangles()[0]);
        assert_relative_eq!(value[0], 1.0, max_relative = 1e-12);
        // integral of x y and x^3 over the triangle (0,0), (2,0), (0,1)
        assert_relative_eq!(value[1], 1.0 / 6.0, max_relative = 1e-12);
        assert_relative_eq!(value[2], 0.8, max_relative = 1e-12);
    }

    #[test]
    fn test_orders_cover_rules() {
        let mut options = IntegratorOptions::default();
        let sizes = (0..RULE_SIZES.len())
            .map(|order| {
                options.set_order(order);
                Integrator::new(&options).unwrap().npoints()
            })
            .collect::<Vec<_>>();
        assert_eq!(sizes, available_rules());
    }

    #[test]
    fn test_unknown_order() {
        let mut options = IntegratorOptions::default();
        options.set_order(4);
        assert!(matches!(
            Integrator::new(&options),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_equilateral_self_term() {
        let h = 0.5 * 3.0_f64.sqrt();
        let mesh = single_triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, h, 0.0]]);
        let mut options = IntegratorOptions::default();
        options.set_tolerance(1e-6);
        let integrator = Integrator::new(&options).unwrap();
        let t = &mesh.triangles()[0];
        let value = integrator.integrate(&AnalyticS::new(t), t);
        assert_relative_eq!(value, 0.75 * 3.0_f64.ln(), max_relative = 1e-6);
        assert_relative_eq!(self_term(1.0, 1.0, 1.0), 0.75 * 3.0_f64.ln(), max_relative = 1e-12);
    }

    #[test]
    fn test_default_tolerance_self_term() {
        let mesh = single_triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let integrator = Integrator::new(&IntegratorOptions::default()).unwrap();
        let t = &mesh.triangles()[0];
        let value = integrator.integrate(&AnalyticS::new(t), t);
        let exact = self_term(2.0_f64.sqrt(), 1.0, 1.0);
        assert_relative_eq!(value, exact, max_relative = 1e-3);
    }
}
