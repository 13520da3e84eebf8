//! CPU reference kernels for the probe drivers.
//!
//! Plain in-place functions over host slices; the drivers call them once
//! per batch element on the pristine pre-transfer host copies.

pub mod spmv;
pub mod syr;
pub mod transfer;

pub use spmv::spmv;
pub use syr::syr;
pub use transfer::copy_submatrix;
