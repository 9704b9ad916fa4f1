//! Sparse matrices in triplet form
use crate::linalg::Matrix;
use crate::traits::MatrixSink;

/// A sparse matrix stored as (row, column, value) triplets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseMatrix {
    /// Values
    pub data: Vec<f64>,
    /// Rows
    pub rows: Vec<usize>,
    /// Columns
    pub cols: Vec<usize>,
    /// Shape of the matrix
    pub shape: [usize; 2],
}

impl SparseMatrix {
    /// Create an empty sparse matrix
    pub fn new(shape: [usize; 2]) -> Self {
        Self {
            data: vec![],
            rows: vec![],
            cols: vec![],
            shape,
        }
    }

    /// Create an empty sparse matrix with room for a known number of entries
    pub fn new_known_size(shape: [usize; 2], size: usize) -> Self {
        Self {
            data: Vec::with_capacity(size),
            rows: Vec::with_capacity(size),
            cols: Vec::with_capacity(size),
            shape,
        }
    }

    /// Append an entry
    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.shape[0] && col < self.shape[1]);
        self.rows.push(row);
        self.cols.push(col);
        self.data.push(value);
    }

    /// Append the entries of another sparse matrix of the same shape
    pub fn add(&mut self, other: SparseMatrix) {
        debug_assert!(self.shape[0] == other.shape[0]);
        debug_assert!(self.shape[1] == other.shape[1]);
        self.rows.extend(&other.rows);
        self.cols.extend(&other.cols);
        self.data.extend(&other.data);
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Iterate over the stored (row, column, value) triplets
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.data)
            .map(|((r, c), v)| (*r, *c, *v))
    }

    /// The non-zero entries of a dense matrix
    pub fn from_dense(matrix: &Matrix) -> Self {
        let mut out = Self::new(matrix.shape());
        for j in 0..matrix.ncols() {
            for i in 0..matrix.nrows() {
                let value = matrix.get(i, j);
                if value != 0.0 {
                    out.push(i, j, value);
                }
            }
        }
        out
    }

    /// Dense copy; repeated entries are summed
    pub fn to_dense(&self) -> Matrix {
        let mut out = Matrix::zeros(self.shape[0], self.shape[1]);
        for (r, c, v) in self.triplets() {
            out.add(r, c, v);
        }
        out
    }
}
