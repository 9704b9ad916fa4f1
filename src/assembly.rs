//! Assembly of the head matrix and of the source and observation matrices
mod deflation;
mod head;
mod points;
mod source;

pub use deflation::deflate;
pub use head::{head_mat, head_matrix, head_matrix_without, AllBlocks, AllButBlock};
pub use points::{dip_source_to_internal_pot_mat, surf_to_vol_mat};
pub use source::{dip_source_mat, surf_source_mat};
