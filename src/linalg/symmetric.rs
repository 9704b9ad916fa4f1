//! Symmetric matrices in packed storage
use crate::linalg::Matrix;
use crate::traits::{HeadMatrixLayout, MatrixSink};
use crate::types::{Error, Result};
use lapack::{dpptrf, dpptri};
use log::info;
use rlst::RlstError;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A symmetric matrix storing its upper triangle column by column
///
/// The entries (i, j) and (j, i) are the same cell, located at `min + max (max + 1) / 2`.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricMatrix {
    size: usize,
    data: Vec<f64>,
}

impl SymmetricMatrix {
    /// Create a zero matrix
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * (size + 1) / 2],
        }
    }

    /// Create an identity matrix
    pub fn identity(size: usize) -> Self {
        let mut out = Self::new(size);
        for i in 0..size {
            out.set(i, i, 1.0);
        }
        out
    }

    /// Create a matrix from its packed upper triangle
    pub fn from_packed(size: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != size * (size + 1) / 2 {
            return Err(Error::DimensionMismatch {
                expected: [size * (size + 1) / 2, 1],
                found: [data.len(), 1],
            });
        }
        Ok(Self { size, data })
    }

    /// Symmetric part of a square dense matrix, taken from its upper triangle
    pub fn from_dense(matrix: &Matrix) -> Result<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(Error::DimensionMismatch {
                expected: [matrix.nrows(), matrix.nrows()],
                found: [matrix.nrows(), matrix.ncols()],
            });
        }
        let mut out = Self::new(matrix.nrows());
        for j in 0..out.size {
            for i in 0..=j {
                out.set(i, j, matrix.get(i, j));
            }
        }
        Ok(out)
    }

    /// Dimension
    pub fn size(&self) -> usize {
        self.size
    }

    /// Packed upper triangle
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable packed upper triangle
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "index ({row}, {col}) out of range for a symmetric matrix of size {}",
            self.size
        );
        let (i, j) = if row <= col { (row, col) } else { (col, row) };
        i + j * (j + 1) / 2
    }

    /// Set every entry to a value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Copy of a row
    pub fn row(&self, row: usize) -> Vec<f64> {
        (0..self.size).map(|j| self.get(row, j)).collect()
    }

    /// Overwrite a row, and therefore the matching column
    pub fn set_row(&mut self, row: usize, values: &[f64]) -> Result<()> {
        if values.len() != self.size {
            return Err(Error::DimensionMismatch {
                expected: [1, self.size],
                found: [1, values.len()],
            });
        }
        for (j, v) in values.iter().enumerate() {
            self.set(row, j, *v);
        }
        Ok(())
    }

    /// Dense copy
    pub fn to_dense(&self) -> Matrix {
        let mut out = Matrix::zeros(self.size, self.size);
        for j in 0..self.size {
            for i in 0..=j {
                let v = self.get(i, j);
                out.set(i, j, v);
                out.set(j, i, v);
            }
        }
        out
    }

    /// Matrix-vector product
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.to_dense().mul_vec(x)
    }

    /// Product with a dense matrix
    pub fn mul_dense(&self, other: &Matrix) -> Result<Matrix> {
        self.to_dense().mul(other)
    }

    /// Product with another symmetric matrix; the result is not symmetric in general
    pub fn mul_symmetric(&self, other: &SymmetricMatrix) -> Result<Matrix> {
        if other.size != self.size {
            return Err(Error::DimensionMismatch {
                expected: [self.size, self.size],
                found: [other.size, other.size],
            });
        }
        self.to_dense().mul(&other.to_dense())
    }

    /// Principal sub-matrix of dimension `size` starting at (start, start)
    pub fn submat_symmetric(&self, start: usize, size: usize) -> SymmetricMatrix {
        let mut out = SymmetricMatrix::new(size);
        for j in 0..size {
            for i in 0..=j {
                out.set(i, j, self.get(start + i, start + j));
            }
        }
        out
    }

    /// Copy of the block of `nrows` rows and `ncols` columns starting at (row0, col0)
    pub fn submat(&self, row0: usize, nrows: usize, col0: usize, ncols: usize) -> Matrix {
        let mut out = Matrix::zeros(nrows, ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                out.set(i, j, self.get(row0 + i, col0 + j));
            }
        }
        out
    }

    /// Solve A x = b
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        if b.len() != self.size {
            return Err(Error::DimensionMismatch {
                expected: [self.size, 1],
                found: [b.len(), 1],
            });
        }
        let mut rhs = Matrix::zeros(self.size, 1);
        rhs.data_mut().copy_from_slice(b);
        Ok(self.solve_matrix(&rhs)?.col(0))
    }

    /// Solve A X = B for every column of B
    pub fn solve_matrix(&self, b: &Matrix) -> Result<Matrix> {
        self.to_dense().solve(b)
    }

    /// Inverse
    pub fn inverse(&self) -> Result<SymmetricMatrix> {
        SymmetricMatrix::from_dense(&self.to_dense().inverse()?)
    }

    /// Invert in place
    pub fn invert(&mut self) -> Result<()> {
        *self = self.inverse()?;
        Ok(())
    }

    /// Inverse of a positive definite matrix, through a packed Cholesky factorization
    pub fn posdef_inverse(&self) -> Result<SymmetricMatrix> {
        let mut out = self.clone();
        if self.size == 0 {
            return Ok(out);
        }
        let n = self.size as i32;
        let mut info = 0;
        unsafe { dpptrf(b'U', n, &mut out.data, &mut info) };
        if info == 0 {
            unsafe { dpptri(b'U', n, &mut out.data, &mut info) };
        }
        match info {
            0 => Ok(out),
            i if i > 0 => {
                let pivot = i as usize - 1;
                Err(Error::FactorizationFailed {
                    pivot,
                    value: out.get(pivot, pivot),
                })
            }
            i => Err(Error::LinearAlgebra(RlstError::LapackError(i))),
        }
    }

    /// Determinant
    pub fn det(&self) -> Result<f64> {
        self.to_dense().det()
    }

    /// Frobenius norm
    pub fn frobenius_norm(&self) -> f64 {
        let mut sum = 0.0;
        for j in 0..self.size {
            for i in 0..=j {
                let v = self.get(i, j);
                sum += if i == j { v * v } else { 2.0 * v * v };
            }
        }
        sum.sqrt()
    }

    /// Log the dimension and the extreme entries
    pub fn info(&self) {
        if self.size == 0 {
            info!("Symmetric matrix of size 0");
            return;
        }
        let (min, max) = self
            .data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(*x), hi.max(*x))
            });
        info!(
            "Symmetric matrix of size {}: min {min:e}, max {max:e}, first entry {:e}",
            self.size, self.data[0]
        );
    }

    fn check_same_size(&self, other: &SymmetricMatrix) {
        assert_eq!(
            self.size, other.size,
            "symmetric matrices of sizes {} and {}",
            self.size, other.size
        );
    }
}

impl MatrixSink for SymmetricMatrix {
    fn shape(&self) -> [usize; 2] {
        [self.size, self.size]
    }
    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.offset(row, col)]
    }
    fn set(&mut self, row: usize, col: usize, value: f64) {
        let offset = self.offset(row, col);
        self.data[offset] = value;
    }
    fn add(&mut self, row: usize, col: usize, value: f64) {
        let offset = self.offset(row, col);
        self.data[offset] += value;
    }
}

impl HeadMatrixLayout for SymmetricMatrix {
    fn allocate(size: usize) -> Self {
        Self::new(size)
    }
}

impl AddAssign<&SymmetricMatrix> for SymmetricMatrix {
    fn add_assign(&mut self, other: &SymmetricMatrix) {
        self.check_same_size(other);
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
    }
}

impl SubAssign<&SymmetricMatrix> for SymmetricMatrix {
    fn sub_assign(&mut self, other: &SymmetricMatrix) {
        self.check_same_size(other);
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= b;
        }
    }
}

impl MulAssign<f64> for SymmetricMatrix {
    fn mul_assign(&mut self, scale: f64) {
        for a in self.data.iter_mut() {
            *a *= scale;
        }
    }
}

impl Add<&SymmetricMatrix> for &SymmetricMatrix {
    type Output = SymmetricMatrix;
    fn add(self, other: &SymmetricMatrix) -> SymmetricMatrix {
        let mut out = self.clone();
        out += other;
        out
    }
}

impl Sub<&SymmetricMatrix> for &SymmetricMatrix {
    type Output = SymmetricMatrix;
    fn sub(self, other: &SymmetricMatrix) -> SymmetricMatrix {
        let mut out = self.clone();
        out -= other;
        out
    }
}

impl Mul<f64> for &SymmetricMatrix {
    type Output = SymmetricMatrix;
    fn mul(self, scale: f64) -> SymmetricMatrix {
        let mut out = self.clone();
        out *= scale;
        out
    }
}

impl Neg for &SymmetricMatrix {
    type Output = SymmetricMatrix;
    fn neg(self) -> SymmetricMatrix {
        self * -1.0
    }
}
