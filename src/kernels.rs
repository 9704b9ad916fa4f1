//! Closed form integrals of the Laplace Green's function and its derivatives over flat triangles
//!
//! Each kernel is built from the geometry of one triangle (or one dipole) and is evaluated at
//! an observation point. The factor 1/(4 pi) is not included.
use crate::geometry::vector::{cross, dot, norm, scale, sub};
use crate::geometry::Triangle;
use crate::traits::AnalyticKernel;
use crate::types::Point;

/// Signed solid angle subtended by a triangle at a point
///
/// The sign is negative when the point lies on the side opposite to the triangle normal, so a
/// closed outward oriented surface subtends -4 pi at its interior points.
pub fn solid_angle(point: &Point, triangle: &[Point; 3]) -> f64 {
    let y = [
        sub(&triangle[0], point),
        sub(&triangle[1], point),
        sub(&triangle[2], point),
    ];
    let n = [norm(&y[0]), norm(&y[1]), norm(&y[2])];
    if n.iter().any(|x| *x == 0.0) {
        return 0.0;
    }
    let d = dot(&y[0], &cross(&y[1], &y[2]));
    let denominator = n[0] * n[1] * n[2]
        + n[0] * dot(&y[1], &y[2])
        + n[1] * dot(&y[2], &y[0])
        + n[2] * dot(&y[0], &y[1]);
    -2.0 * d.atan2(denominator)
}

/// Barycentric coordinates of the projection of a point onto the plane of a triangle
fn barycentric(point: &Point, triangle: &Triangle) -> [f64; 3] {
    let p = triangle.points();
    let n = triangle.normal();
    let twice_area = 2.0 * triangle.area();
    let lambda = |a: &Point, b: &Point| {
        dot(&cross(&sub(a, point), &sub(b, point)), n) / twice_area
    };
    [
        lambda(&p[1], &p[2]),
        lambda(&p[2], &p[0]),
        lambda(&p[0], &p[1]),
    ]
}

/// Integral of 1/|x - y| over a triangle, as a function of x
#[derive(Clone, Debug)]
pub struct AnalyticS {
    points: [Point; 3],
    normal: Point,
    tangents: [Point; 3],
    edge_normals: [Point; 3],
    lengths: [f64; 3],
}

impl AnalyticS {
    /// Create the kernel of a triangle
    pub fn new(triangle: &Triangle) -> Self {
        let points = *triangle.points();
        let normal = *triangle.normal();
        let mut tangents = [[0.0; 3]; 3];
        let mut edge_normals = [[0.0; 3]; 3];
        let mut lengths = [0.0; 3];
        for i in 0..3 {
            let e = sub(&points[(i + 1) % 3], &points[i]);
            lengths[i] = norm(&e);
            tangents[i] = scale(&e, 1.0 / lengths[i]);
            edge_normals[i] = cross(&tangents[i], &normal);
        }
        Self {
            points,
            normal,
            tangents,
            edge_normals,
            lengths,
        }
    }
}

impl AnalyticKernel for AnalyticS {
    type Output = f64;

    fn evaluate(&self, x: &Point) -> f64 {
        let h = dot(&sub(x, &self.points[0]), &self.normal).abs();
        let mut result = 0.0;
        for i in 0..3 {
            let a = sub(&self.points[i], x);
            let b = sub(&self.points[(i + 1) % 3], x);
            let t0 = dot(&a, &self.edge_normals[i]);
            if t0.abs() < 1e-14 * self.lengths[i] {
                continue;
            }
            let s_minus = dot(&a, &self.tangents[i]);
            let s_plus = dot(&b, &self.tangents[i]);
            let r_minus = norm(&a);
            let r_plus = norm(&b);
            let r0_squared = t0 * t0 + h * h;
            // ln(r + s), written without cancellation for negative s
            let log_term = |r: f64, s: f64| {
                if s >= 0.0 {
                    (r + s).ln()
                } else {
                    (r0_squared / (r - s)).ln()
                }
            };
            result += t0 * (log_term(r_plus, s_plus) - log_term(r_minus, s_minus))
                - h * ((t0 * s_plus / (r0_squared + h * r_plus)).atan()
                    - (t0 * s_minus / (r0_squared + h * r_minus)).atan());
        }
        result
    }
}

/// Integrals over a triangle of the normal derivative of 1/|x - y| times each P1 basis function
///
/// The three values sum to the signed [solid_angle] of the triangle.
#[derive(Clone, Debug)]
pub struct AnalyticD3 {
    points: [Point; 3],
}

impl AnalyticD3 {
    /// Create the kernel of a triangle
    pub fn new(triangle: &Triangle) -> Self {
        Self {
            points: *triangle.points(),
        }
    }
}

impl AnalyticKernel for AnalyticD3 {
    type Output = [f64; 3];

    fn evaluate(&self, x: &Point) -> [f64; 3] {
        let y1 = sub(&self.points[0], x);
        let y2 = sub(&self.points[1], x);
        let y3 = sub(&self.points[2], x);
        let n1 = norm(&y1);
        let n2 = norm(&y2);
        let n3 = norm(&y3);
        let d = dot(&y1, &cross(&y3, &y2));
        if d.abs() <= 1e-12 * n1 * n2 * n3 {
            return [0.0; 3];
        }
        let omega = 2.0
            * d.atan2(
                n1 * n2 * n3 + n1 * dot(&y2, &y3) + n2 * dot(&y3, &y1) + n3 * dot(&y1, &y2),
            );

        let z1 = cross(&y2, &y3);
        let z2 = cross(&y3, &y1);
        let z3 = cross(&y1, &y2);
        let d1 = sub(&y2, &y1);
        let d2 = sub(&y3, &y2);
        let d3 = sub(&y1, &y3);

        let g = |ya: &Point, na: f64, yb: &Point, nb: f64, e: &Point| {
            let ne = norm(e);
            ((nb * ne + dot(yb, e)) / (na * ne + dot(ya, e))).ln() / ne
        };
        let g1 = g(&y1, n1, &y2, n2, &d1);
        let g2 = g(&y2, n2, &y3, n3, &d2);
        let g3 = g(&y3, n3, &y1, n1, &d3);

        let n = [
            z1[0] + z2[0] + z3[0],
            z1[1] + z2[1] + z3[1],
            z1[2] + z2[2] + z3[2],
        ];
        let a = dot(&n, &n);
        let s = [
            d1[0] * g1 + d2[0] * g2 + d3[0] * g3,
            d1[1] * g1 + d2[1] * g2 + d3[1] * g3,
            d1[2] * g1 + d2[2] * g2 + d3[2] * g3,
        ];

        [
            (dot(&z1, &n) * omega + d * dot(&d2, &s)) / a,
            (dot(&z2, &n) * omega + d * dot(&d3, &s)) / a,
            (dot(&z3, &n) * omega + d * dot(&d1, &s)) / a,
        ]
    }
}

/// A current dipole
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dipole {
    position: Point,
    moment: Point,
}

impl Dipole {
    /// Create a dipole
    pub fn new(position: Point, moment: Point) -> Self {
        Self { position, moment }
    }

    /// Position
    pub fn position(&self) -> &Point {
        &self.position
    }

    /// Moment
    pub fn moment(&self) -> &Point {
        &self.moment
    }

    /// q.(x - r0) / |x - r0|^3
    pub fn potential(&self, x: &Point) -> f64 {
        let r = sub(x, &self.position);
        let n = norm(&r);
        dot(&self.moment, &r) / (n * n * n)
    }

    /// Gradient of the potential with respect to x
    pub fn potential_gradient(&self, x: &Point) -> Point {
        let r = sub(x, &self.position);
        let inv_norm2 = 1.0 / dot(&r, &r);
        let qr = dot(&self.moment, &r);
        let factor = inv_norm2 * inv_norm2.sqrt();
        [
            (self.moment[0] - 3.0 * qr * r[0] * inv_norm2) * factor,
            (self.moment[1] - 3.0 * qr * r[1] * inv_norm2) * factor,
            (self.moment[2] - 3.0 * qr * r[2] * inv_norm2) * factor,
        ]
    }
}

/// The potential of a dipole, to be integrated over a triangle
#[derive(Clone, Debug)]
pub struct AnalyticDipPot {
    dipole: Dipole,
}

impl AnalyticDipPot {
    /// Create the kernel of a dipole
    pub fn new(dipole: &Dipole) -> Self {
        Self { dipole: *dipole }
    }
}

impl AnalyticKernel for AnalyticDipPot {
    type Output = f64;

    fn evaluate(&self, x: &Point) -> f64 {
        self.dipole.potential(x)
    }
}

/// The normal derivative of a dipole potential times each P1 basis function of a triangle
#[derive(Clone, Debug)]
pub struct AnalyticDipPotDer {
    dipole: Dipole,
    triangle: Triangle,
}

impl AnalyticDipPotDer {
    /// Create the kernel of a dipole seen from a triangle
    pub fn new(dipole: &Dipole, triangle: &Triangle) -> Self {
        Self {
            dipole: *dipole,
            triangle: triangle.clone(),
        }
    }
}

impl AnalyticKernel for AnalyticDipPotDer {
    type Output = [f64; 3];

    fn evaluate(&self, x: &Point) -> [f64; 3] {
        let derivative = dot(&self.dipole.potential_gradient(x), self.triangle.normal());
        let lambda = barycentric(x, &self.triangle);
        [
            derivative * lambda[0],
            derivative * lambda[1],
            derivative * lambda[2],
        ]
    }
}
