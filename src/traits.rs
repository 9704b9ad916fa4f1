//! Trait definitions

mod io;
mod kernel;
mod matrix;
mod operators;

pub use io::SparseIO;
pub use kernel::{AnalyticKernel, IntegrandValue};
pub use matrix::{HeadMatrixLayout, MatrixSink};
pub use operators::{BlockSelector, OperatorBlock};
