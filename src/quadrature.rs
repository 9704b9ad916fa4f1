//! Quadrature over triangles

mod integrator;
mod triangle_rules;

pub use integrator::{Integrator, IntegratorOptions};
pub use triangle_rules::{available_rules, triangle_rule, TriangleRule};
