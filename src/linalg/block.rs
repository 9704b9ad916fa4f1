//! Offset views and block-structured symmetric matrices
use crate::geometry::Geometry;
use crate::linalg::{Matrix, SymmetricMatrix};
use crate::traits::{HeadMatrixLayout, MatrixSink};
use crate::types::MeshId;
use itertools::Itertools;
use std::collections::HashMap;
use std::ops::Range;

/// A view of a matrix whose indices are shifted by a row and a column offset
///
/// Entry (i, j) of the view is entry (i - row0, j - col0) of the wrapped matrix, so that a
/// small matrix can be filled using global indices.
#[derive(Debug)]
pub struct BlockView<M: MatrixSink> {
    inner: M,
    row0: usize,
    col0: usize,
}

impl<M: MatrixSink> BlockView<M> {
    /// Create a view
    pub fn new(inner: M, row0: usize, col0: usize) -> Self {
        Self { inner, row0, col0 }
    }

    /// The wrapped matrix
    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Unwrap the matrix
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: MatrixSink> MatrixSink for BlockView<M> {
    fn shape(&self) -> [usize; 2] {
        let [m, n] = self.inner.shape();
        [self.row0 + m, self.col0 + n]
    }
    fn get(&self, row: usize, col: usize) -> f64 {
        self.inner.get(row - self.row0, col - self.col0)
    }
    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.inner.set(row - self.row0, col - self.col0, value)
    }
    fn add(&mut self, row: usize, col: usize, value: f64) {
        self.inner.add(row - self.row0, col - self.col0, value)
    }
}

/// A symmetric matrix made of dense blocks between index ranges
///
/// Only the blocks above the diagonal are stored. Reading an entry of a block that was never
/// added gives zero, writing to it panics.
#[derive(Debug, Clone)]
pub struct SymmetricBlockMatrix {
    size: usize,
    ranges: Vec<Range<usize>>,
    blocks: HashMap<(usize, usize), Matrix>,
}

impl SymmetricBlockMatrix {
    /// Create a matrix with no blocks
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ranges: vec![],
            blocks: HashMap::new(),
        }
    }

    /// Dimension
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored blocks
    pub fn nb_blocks(&self) -> usize {
        self.blocks.len()
    }

    fn register(&mut self, range: &Range<usize>) {
        assert!(
            range.end <= self.size,
            "range {range:?} out of a matrix of size {}",
            self.size
        );
        let position = self.ranges.partition_point(|r| r.start < range.start);
        if self.ranges.get(position) == Some(range) {
            return;
        }
        let overlaps_next = self
            .ranges
            .get(position)
            .is_some_and(|r| r.start < range.end);
        let overlaps_previous = position > 0 && self.ranges[position - 1].end > range.start;
        assert!(
            !overlaps_next && !overlaps_previous,
            "range {range:?} overlaps an existing range"
        );
        self.ranges.insert(position, range.clone());
    }

    /// Allocate the block coupling two index ranges, and its transpose
    pub fn add_block(&mut self, rows: Range<usize>, cols: Range<usize>) {
        if rows.is_empty() || cols.is_empty() {
            return;
        }
        self.register(&rows);
        self.register(&cols);
        let (r, c) = if rows.start <= cols.start {
            (rows, cols)
        } else {
            (cols, rows)
        };
        self.blocks
            .entry((r.start, c.start))
            .or_insert_with(|| Matrix::zeros(r.len(), c.len()));
    }

    fn range_of(&self, index: usize) -> Option<&Range<usize>> {
        let position = self.ranges.partition_point(|r| r.end <= index);
        self.ranges.get(position).filter(|r| r.contains(&index))
    }

    /// Canonical block key and local indices of an entry
    fn locate(&self, row: usize, col: usize) -> Option<((usize, usize), usize, usize)> {
        let r = self.range_of(row)?;
        let c = self.range_of(col)?;
        if r.start <= c.start {
            Some(((r.start, c.start), row - r.start, col - c.start))
        } else {
            Some(((c.start, r.start), col - c.start, row - r.start))
        }
    }

    fn block_mut(&mut self, row: usize, col: usize) -> (&mut Matrix, usize, usize, bool) {
        let located = self.locate(row, col);
        let block = located.and_then(|(key, i, j)| {
            self.blocks
                .get_mut(&key)
                .map(|b| (b, i, j, key.0 == key.1))
        });
        match block {
            Some(b) => b,
            None => panic!("entry ({row}, {col}) is not in an allocated block"),
        }
    }

    /// Dense packed copy
    pub fn to_symmetric(&self) -> SymmetricMatrix {
        let mut out = SymmetricMatrix::new(self.size);
        for ((r, c), block) in &self.blocks {
            for j in 0..block.ncols() {
                for i in 0..block.nrows() {
                    out.set(r + i, c + j, block.get(i, j));
                }
            }
        }
        out
    }
}

impl MatrixSink for SymmetricBlockMatrix {
    fn shape(&self) -> [usize; 2] {
        [self.size, self.size]
    }
    fn get(&self, row: usize, col: usize) -> f64 {
        self.locate(row, col)
            .and_then(|(key, i, j)| self.blocks.get(&key).map(|b| b.get(i, j)))
            .unwrap_or(0.0)
    }
    fn set(&mut self, row: usize, col: usize, value: f64) {
        let (block, i, j, diagonal) = self.block_mut(row, col);
        block.set(i, j, value);
        if diagonal {
            block.set(j, i, value);
        }
    }
    fn add(&mut self, row: usize, col: usize, value: f64) {
        let (block, i, j, diagonal) = self.block_mut(row, col);
        block.add(i, j, value);
        if diagonal && i != j {
            block.add(j, i, value);
        }
    }
}

impl HeadMatrixLayout for SymmetricBlockMatrix {
    fn allocate(size: usize) -> Self {
        Self::new(size)
    }

    fn prepare_blocks(&mut self, geometry: &Geometry, mesh1: MeshId, mesh2: MeshId) {
        let ranges = |m: MeshId| {
            let mesh = geometry.mesh(m);
            let mut out = vec![mesh.vertex_range()];
            if !mesh.current_barrier() {
                out.push(mesh.triangle_range());
            }
            out
        };
        for (rows, cols) in ranges(mesh1).into_iter().cartesian_product(ranges(mesh2)) {
            self.add_block(rows, cols);
        }
    }
}
