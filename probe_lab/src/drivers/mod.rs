//! One driver per kernel family under test.
//!
//! Every driver walks the same pipeline: validate the shape arguments,
//! size the buffers, seed deterministic inputs, move data to the device,
//! invoke the kernel, move results back, run the CPU reference over the
//! pristine host copies, and compare. Validation failures and device
//! statuses short-circuit; buffer and handle release is the drop scope.

pub mod set_get_matrix;
pub mod spmv_strided_batched;
pub mod syr_strided_batched;
