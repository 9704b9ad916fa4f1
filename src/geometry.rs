//! Meshes, domains and the geometry of a piecewise homogeneous conductor

mod domain;
mod mesh;
mod model;
pub mod shapes;
pub mod vector;

pub use domain::{Boundary, Domain, Interface, OrientedMesh};
pub use mesh::{Mesh, Triangle};
pub use model::{Geometry, MeshPair};
