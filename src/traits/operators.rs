//! Operator blocks
use crate::traits::MatrixSink;
use crate::types::MeshId;

pub trait OperatorBlock {
    //! The boundary integral operators coupling two meshes
    /// Set the single layer operator S
    fn set_s_block<M: MatrixSink>(&mut self, coeff: f64, matrix: &mut M);
    /// Add the hypersingular operator N
    fn set_n_block<M: MatrixSink>(&self, coeff: f64, matrix: &mut M);
    /// Add the double layer operator D
    fn set_d_block<M: MatrixSink>(&self, coeff: f64, matrix: &mut M);
    /// Add the adjoint double layer operator D*
    fn set_dstar_block<M: MatrixSink>(&self, coeff: f64, matrix: &mut M);

    /// Add S, N, D and D* with the coefficients of a mesh pair, in this order
    fn set_blocks<M: MatrixSink>(&mut self, coeffs: &[f64; 3], matrix: &mut M) {
        let [s_coeff, n_coeff, d_coeff] = *coeffs;
        self.set_s_block(s_coeff, matrix);
        self.set_n_block(n_coeff, matrix);
        self.set_d_block(d_coeff, matrix);
        self.set_dstar_block(d_coeff, matrix);
    }
}

pub trait BlockSelector {
    //! Choice of the mesh pairs left out of a head matrix
    /// Is the block coupling two meshes left out?
    fn disabled(&self, mesh1: MeshId, mesh2: MeshId) -> bool;
}
