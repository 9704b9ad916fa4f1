//! Headmat
//!
//! Assembly of the symmetric boundary element system of the electromagnetic forward problem
//! in a piecewise homogeneous conductor bounded by nested triangulated surfaces.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod assembly;
pub mod geometry;
pub mod io;
pub mod kernels;
pub mod linalg;
pub mod operators;
pub mod quadrature;
pub mod traits;
pub mod types;

pub use types::{Error, Result};
