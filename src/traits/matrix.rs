//! Matrix storage
use crate::geometry::Geometry;
use crate::types::MeshId;

pub trait MatrixSink: Sync {
    //! Matrix entries addressed by (row, column)
    //!
    //! Sinks are `Sync` so that operator blocks can read previously assembled entries from
    //! parallel tasks.
    /// Number of rows and columns
    fn shape(&self) -> [usize; 2];
    /// Get an entry
    fn get(&self, row: usize, col: usize) -> f64;
    /// Set an entry
    fn set(&mut self, row: usize, col: usize, value: f64);
    /// Add to an entry
    fn add(&mut self, row: usize, col: usize, value: f64) {
        let current = self.get(row, col);
        self.set(row, col, current + value);
    }
}

impl<M: MatrixSink + ?Sized> MatrixSink for &mut M {
    fn shape(&self) -> [usize; 2] {
        (**self).shape()
    }
    fn get(&self, row: usize, col: usize) -> f64 {
        (**self).get(row, col)
    }
    fn set(&mut self, row: usize, col: usize, value: f64) {
        (**self).set(row, col, value)
    }
    fn add(&mut self, row: usize, col: usize, value: f64) {
        (**self).add(row, col, value)
    }
}

pub trait HeadMatrixLayout: MatrixSink + Sized {
    //! A symmetric matrix layout that a head matrix can be assembled into
    /// Create a zero matrix of the given dimension
    fn allocate(size: usize) -> Self;

    /// Make room for the entries coupling two meshes
    fn prepare_blocks(&mut self, _geometry: &Geometry, _mesh1: MeshId, _mesh2: MeshId) {}
}
