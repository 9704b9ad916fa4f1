//! Small helpers for three dimensional vectors
use crate::types::Point;

/// a + b
pub fn add(a: &Point, b: &Point) -> Point {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// a - b
pub fn sub(a: &Point, b: &Point) -> Point {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// s * a
pub fn scale(a: &Point, s: f64) -> Point {
    [s * a[0], s * a[1], s * a[2]]
}

/// Dot product
pub fn dot(a: &Point, b: &Point) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product
pub fn cross(a: &Point, b: &Point) -> Point {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean norm
pub fn norm(a: &Point) -> f64 {
    dot(a, a).sqrt()
}

/// Distance between two points
pub fn distance(a: &Point, b: &Point) -> f64 {
    norm(&sub(a, b))
}

/// Midpoint of two points
pub fn midpoint(a: &Point, b: &Point) -> Point {
    [
        0.5 * (a[0] + b[0]),
        0.5 * (a[1] + b[1]),
        0.5 * (a[2] + b[2]),
    ]
}

/// Determinant of the matrix with columns a, b and c
pub fn det(a: &Point, b: &Point, c: &Point) -> f64 {
    dot(a, &cross(b, c))
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::*;

    #[test]
    fn test_cross_is_orthogonal() {
        let a = [1.0, 2.0, -0.5];
        let b = [-3.0, 0.25, 4.0];
        let c = cross(&a, &b);
        assert_abs_diff_eq!(dot(&a, &c), 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(dot(&b, &c), 0.0, epsilon = 1e-14);
        assert_relative_eq!(det(&a, &b, &c), dot(&c, &c), max_relative = 1e-14);
    }
}
