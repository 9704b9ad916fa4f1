//! Dense, packed symmetric, block and sparse matrices

mod block;
mod dense;
mod sparse;
mod symmetric;

pub use block::{BlockView, SymmetricBlockMatrix};
pub use dense::Matrix;
pub use sparse::SparseMatrix;
pub use symmetric::SymmetricMatrix;
