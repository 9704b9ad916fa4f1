//! Symmetric quadrature rules on the reference triangle.
use crate::types::{Error, Result};
use std::collections::HashMap;

/// A quadrature rule on the reference triangle with vertices (0, 0), (1, 0) and (0, 1)
#[derive(Debug, Clone)]
pub struct TriangleRule {
    /// The order of the quadrature rule.
    pub order: usize,
    /// The number of points of the quadrature rule.
    pub npoints: usize,
    /// The point coordinates (x0, y0, x1, y1, ...)
    pub points: Vec<f64>,
    /// The weights; they sum to the area of the reference triangle
    pub weights: Vec<f64>,
}

/// Append the orbit of a symmetric point given by barycentric coordinates (a, a, b)
fn orbit3(points: &mut Vec<f64>, weights: &mut Vec<f64>, a: f64, b: f64, w: f64) {
    for (x, y) in [(a, a), (a, b), (b, a)] {
        points.push(x);
        points.push(y);
        weights.push(0.5 * w);
    }
}

/// Append the orbit of a point given by barycentric coordinates (a, b, c)
fn orbit6(points: &mut Vec<f64>, weights: &mut Vec<f64>, a: f64, b: f64, c: f64, w: f64) {
    for (x, y) in [(b, c), (c, b), (a, c), (c, a), (a, b), (b, a)] {
        points.push(x);
        points.push(y);
        weights.push(0.5 * w);
    }
}

fn rule(order: usize, build: impl Fn(&mut Vec<f64>, &mut Vec<f64>)) -> (usize, TriangleRule) {
    let mut points = vec![];
    let mut weights = vec![];
    build(&mut points, &mut weights);
    let npoints = weights.len();
    (
        npoints,
        TriangleRule {
            order,
            npoints,
            points,
            weights,
        },
    )
}

lazy_static! {
    static ref TRIANGLE_RULE_DEFINITIONS: HashMap<usize, TriangleRule> = HashMap::from([
        rule(2, |p, w| orbit3(p, w, 1.0 / 6.0, 2.0 / 3.0, 1.0 / 3.0)),
        rule(4, |p, w| {
            orbit3(p, w, 0.445948490915965, 0.108103018168070, 0.223381589678011);
            orbit3(p, w, 0.091576213509771, 0.816847572980459, 0.109951743655322);
        }),
        rule(5, |p, w| {
            p.extend([1.0 / 3.0, 1.0 / 3.0]);
            w.push(0.5 * 0.225);
            orbit3(p, w, 0.470142064105115, 0.059715871789770, 0.132394152788506);
            orbit3(p, w, 0.101286507323456, 0.797426985353087, 0.125939180544827);
        }),
        rule(8, |p, w| {
            p.extend([1.0 / 3.0, 1.0 / 3.0]);
            w.push(0.5 * 0.144315607677787);
            orbit3(p, w, 0.459292588292723, 0.081414823414554, 0.095091634267285);
            orbit3(p, w, 0.170569307751760, 0.658861384496480, 0.103217370534718);
            orbit3(p, w, 0.050547228317031, 0.898905543365938, 0.032458497623198);
            orbit6(
                p,
                w,
                0.008394777409958,
                0.263112829634638,
                0.728492392955404,
                0.027230314174435,
            );
        }),
    ]);
}

/// Return a triangle rule for a given number of points.
///
/// If the rule does not exist, `Error::Unsupported` is returned.
pub fn triangle_rule(npoints: usize) -> Result<&'static TriangleRule> {
    TRIANGLE_RULE_DEFINITIONS
        .get(&npoints)
        .ok_or_else(|| Error::Unsupported(format!("no {npoints} point rule on triangles")))
}

/// Return a vector with the numbers of points for which triangle rules are available.
pub fn available_rules() -> Vec<usize> {
    let mut rules = TRIANGLE_RULE_DEFINITIONS.keys().copied().collect::<Vec<_>>();
    rules.sort();
    rules
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::*;
    use paste::paste;

    #[test]
    fn test_available_rules() {
        assert_eq!(available_rules(), vec![3, 6, 7, 16]);
        assert!(matches!(triangle_rule(5), Err(Error::Unsupported(_))));
    }

    macro_rules! test_rule {
        ($($npoints:literal),+) => {
        $(
            paste! {
                #[test]
                fn [<test_area_ $npoints>]() {
                    let rule = triangle_rule($npoints).unwrap();
                    assert_eq!(rule.npoints, $npoints);
                    assert_eq!(rule.points.len(), 2 * $npoints);
                    let area: f64 = rule.weights.iter().sum();
                    assert_relative_eq!(area, 0.5, max_relative = 1e-12);
                    for p in rule.points.chunks(2) {
                        assert!(p[0] > 0.0 && p[1] > 0.0 && p[0] + p[1] < 1.0);
                    }
                }

                #[test]
                fn [<test_exactness_ $npoints>]() {
                    // integral of x^i y^j over the reference triangle is i! j! / (i + j + 2)!
                    let rule = triangle_rule($npoints).unwrap();
                    let factorial = |n: usize| (1..=n).product::<usize>() as f64;
                    for i in 0..=rule.order {
                        for j in 0..=rule.order - i {
                            let approx: f64 = rule
                                .points
                                .chunks(2)
                                .zip(&rule.weights)
                                .map(|(p, w)| w * p[0].powi(i as i32) * p[1].powi(j as i32))
                                .sum();
                            let exact = factorial(i) * factorial(j) / factorial(i + j + 2);
                            assert_relative_eq!(approx, exact, max_relative = 1e-10);
                        }
                    }
                }
            }
        )*
        };
    }

    test_rule!(3, 6, 7, 16);
}
