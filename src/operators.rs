//! Boundary integral operator blocks
//!
//! The blocks add the single layer `S`, double layer `D`, adjoint double layer `D*` and
//! hypersingular `N` operators coupling one or two meshes into any [MatrixSink], addressed
//! by the global vertex and triangle indices of the meshes.
//!
//! [MatrixSink]: crate::traits::MatrixSink

mod common;
mod diagonal;
mod dipole;
mod non_diagonal;
mod partial;

pub use diagonal::DiagonalBlock;
pub use dipole::{dipole_potential, dipole_potential_derivative};
pub use non_diagonal::NonDiagonalBlock;
pub use partial::PartialBlock;
