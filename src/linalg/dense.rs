//! Dense matrices
use crate::traits::MatrixSink;
use crate::types::{Error, Result};
use rlst::{
    empty_array, rlst_dynamic_array2, DynamicArray, MatrixLuDecomposition, MultIntoResize,
    RawAccess, RawAccessMut, RlstError, Shape, TransMode,
};

/// A dense matrix stored column by column
pub struct Matrix {
    data: DynamicArray<f64, 2>,
}

impl std::fmt::Debug for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matrix")
            .field("shape", &self.data.shape())
            .finish()
    }
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        let mut out = Self::zeros(self.nrows(), self.ncols());
        out.data.data_mut().copy_from_slice(self.data.data());
        out
    }
}

impl Matrix {
    /// Create a zero matrix
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: rlst_dynamic_array2!(f64, [nrows, ncols]),
        }
    }

    /// Create an identity matrix
    pub fn identity(size: usize) -> Self {
        let mut out = Self::zeros(size, size);
        for i in 0..size {
            out.set(i, i, 1.0);
        }
        out
    }

    /// Create a matrix from its rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut out = Self::zeros(rows.len(), ncols);
        for (i, row) in rows.iter().enumerate() {
            out.set_row(i, row)?;
        }
        Ok(out)
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.data.shape()[0]
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.data.shape()[1]
    }

    /// The underlying array
    pub fn array(&self) -> &DynamicArray<f64, 2> {
        &self.data
    }

    /// Entries in column-major order
    pub fn data(&self) -> &[f64] {
        self.data.data()
    }

    /// Mutable entries in column-major order
    pub fn data_mut(&mut self) -> &mut [f64] {
        self.data.data_mut()
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.nrows() && col < self.ncols(),
            "index ({row}, {col}) out of range for a {}x{} matrix",
            self.nrows(),
            self.ncols()
        );
        row + self.nrows() * col
    }

    /// Set every entry to a value
    pub fn fill(&mut self, value: f64) {
        self.data.data_mut().fill(value);
    }

    /// Copy of a row
    pub fn row(&self, row: usize) -> Vec<f64> {
        (0..self.ncols()).map(|j| self.get(row, j)).collect()
    }

    /// Overwrite a row
    pub fn set_row(&mut self, row: usize, values: &[f64]) -> Result<()> {
        if values.len() != self.ncols() {
            return Err(Error::DimensionMismatch {
                expected: [1, self.ncols()],
                found: [1, values.len()],
            });
        }
        for (j, v) in values.iter().enumerate() {
            self.set(row, j, *v);
        }
        Ok(())
    }

    /// Copy of a column
    pub fn col(&self, col: usize) -> Vec<f64> {
        let n = self.nrows();
        self.data.data()[n * col..n * (col + 1)].to_vec()
    }

    /// Overwrite a column
    pub fn set_col(&mut self, col: usize, values: &[f64]) -> Result<()> {
        let n = self.nrows();
        if values.len() != n {
            return Err(Error::DimensionMismatch {
                expected: [n, 1],
                found: [values.len(), 1],
            });
        }
        self.data.data_mut()[n * col..n * (col + 1)].copy_from_slice(values);
        Ok(())
    }

    /// Transpose
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.ncols(), self.nrows());
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }

    /// Copy of the block of `nrows` rows and `ncols` columns starting at (row0, col0)
    pub fn submat(&self, row0: usize, nrows: usize, col0: usize, ncols: usize) -> Self {
        let mut out = Self::zeros(nrows, ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                out.set(i, j, self.get(row0 + i, col0 + j));
            }
        }
        out
    }

    /// Matrix-vector product
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.ncols() {
            return Err(Error::DimensionMismatch {
                expected: [self.ncols(), 1],
                found: [x.len(), 1],
            });
        }
        let mut column = Self::zeros(x.len(), 1);
        column.data_mut().copy_from_slice(x);
        Ok(self.mul(&column)?.data().to_vec())
    }

    /// Matrix-matrix product
    pub fn mul(&self, other: &Matrix) -> Result<Matrix> {
        if other.nrows() != self.ncols() {
            return Err(Error::DimensionMismatch {
                expected: [self.ncols(), other.ncols()],
                found: [other.nrows(), other.ncols()],
            });
        }
        if self.nrows() == 0 || self.ncols() == 0 || other.ncols() == 0 {
            return Ok(Self::zeros(self.nrows(), other.ncols()));
        }
        Ok(Self {
            data: empty_array::<f64, 2>()
                .simple_mult_into_resize(self.data.view(), other.data.view()),
        })
    }

    fn check_square(&self) -> Result<()> {
        if self.nrows() != self.ncols() {
            return Err(Error::DimensionMismatch {
                expected: [self.nrows(), self.nrows()],
                found: [self.nrows(), self.ncols()],
            });
        }
        Ok(())
    }

    /// Turn a LAPACK failure into an error, reading the pivot from the factorized matrix
    fn factorization_error(&self, error: RlstError) -> Error {
        match error {
            RlstError::LapackError(info) if info > 0 => {
                let pivot = info as usize - 1;
                Error::FactorizationFailed {
                    pivot,
                    value: self.get(pivot, pivot),
                }
            }
            e => Error::LinearAlgebra(e),
        }
    }

    /// Solve A X = B through an LU factorization
    pub fn solve(&self, rhs: &Matrix) -> Result<Matrix> {
        self.check_square()?;
        if rhs.nrows() != self.nrows() {
            return Err(Error::DimensionMismatch {
                expected: [self.nrows(), rhs.ncols()],
                found: [rhs.nrows(), rhs.ncols()],
            });
        }
        let mut out = rhs.clone();
        if self.nrows() == 0 || rhs.ncols() == 0 {
            return Ok(out);
        }
        let mut factors = self.clone();
        let solved = match factors.data.view_mut().into_lu_alloc() {
            Ok(lu) => lu.solve_mat(TransMode::NoTrans, out.data.view_mut()),
            Err(e) => Err(e),
        };
        solved.map_err(|e| factors.factorization_error(e))?;
        Ok(out)
    }

    /// Inverse
    pub fn inverse(&self) -> Result<Matrix> {
        self.check_square()?;
        let mut out = self.clone();
        if self.nrows() == 0 {
            return Ok(out);
        }
        let inverted = out.data.view_mut().into_inverse_alloc();
        inverted.map_err(|e| out.factorization_error(e))?;
        Ok(out)
    }

    /// Determinant, from an LU factorization
    pub fn det(&self) -> Result<f64> {
        self.check_square()?;
        if self.nrows() == 0 {
            return Ok(1.0);
        }
        let mut factors = self.clone();
        let det = match factors.data.view_mut().into_lu_alloc() {
            Ok(lu) => Ok(lu.det()),
            Err(e) => Err(e),
        };
        det.map_err(|e| factors.factorization_error(e))
    }

    /// Frobenius norm
    pub fn frobenius_norm(&self) -> f64 {
        self.data.data().iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

impl MatrixSink for Matrix {
    fn shape(&self) -> [usize; 2] {
        self.data.shape()
    }
    fn get(&self, row: usize, col: usize) -> f64 {
        self.data.data()[self.offset(row, col)]
    }
    fn set(&mut self, row: usize, col: usize, value: f64) {
        let offset = self.offset(row, col);
        self.data.data_mut()[offset] = value;
    }
    fn add(&mut self, row: usize, col: usize, value: f64) {
        let offset = self.offset(row, col);
        self.data.data_mut()[offset] += value;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::*;

    #[test]
    fn test_product() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let b = a.transpose();
        let c = a.mul(&b).unwrap();
        assert_eq!(c.shape(), [2, 2]);
        assert_relative_eq!(c.get(0, 0), 14.0);
        assert_relative_eq!(c.get(0, 1), 32.0);
        assert_relative_eq!(c.get(1, 0), 32.0);
        assert_relative_eq!(c.get(1, 1), 77.0);
        assert!(matches!(
            a.mul(&a),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_lu_solve() {
        let a = Matrix::from_rows(&[
            vec![0.0, 2.0, 1.0],
            vec![1.0, 1.0, 0.0],
            vec![3.0, 0.0, 1.0],
        ])
        .unwrap();
        let b = Matrix::from_rows(&[vec![5.0, 1.0], vec![3.0, 0.0], vec![6.0, 2.0]]).unwrap();
        let x = a.solve(&b).unwrap();
        let residual = a.mul(&x).unwrap();
        for (u, v) in residual.data().iter().zip(b.data()) {
            assert_relative_eq!(u, v, epsilon = 1e-13);
        }
        assert_relative_eq!(a.det().unwrap(), -5.0, max_relative = 1e-13);

        let inverse = a.inverse().unwrap();
        let product = inverse.mul(&a).unwrap();
        for j in 0..3 {
            for i in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product.get(i, j), expected, epsilon = 1e-13);
            }
        }
        assert!(matches!(
            Matrix::zeros(2, 3).inverse(),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_singular_pivot() {
        let a = Matrix::from_rows(&[
            vec![1.0, 2.0, 0.0],
            vec![2.0, 4.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        match a.inverse() {
            Err(Error::FactorizationFailed { pivot, value }) => {
                assert_eq!(pivot, 1);
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(matches!(
            a.det(),
            Err(Error::FactorizationFailed { pivot: 1, .. })
        ));
    }

    #[test]
    fn test_rows_and_columns() {
        let mut a = Matrix::zeros(3, 2);
        a.set_row(1, &[1.0, 2.0]).unwrap();
        a.set_col(0, &[7.0, 8.0, 9.0]).unwrap();
        a.add(2, 1, 0.5);
        assert_eq!(a.row(1), vec![8.0, 2.0]);
        assert_eq!(a.col(1), vec![0.0, 2.0, 0.5]);
        assert_eq!(a.submat(1, 2, 1, 1).col(0), vec![2.0, 0.5]);
        assert!(a.set_row(0, &[1.0]).is_err());
        let b = a.clone();
        assert_eq!(b.data(), a.data());
    }
}
