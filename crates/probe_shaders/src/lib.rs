//! WGSL sources for the wgpu device kernels.

pub mod compute {
    pub const SPMV_STRIDED_BATCHED: &str = include_str!("kernels/spmv_strided_batched.wgsl");
    pub const SYR_STRIDED_BATCHED: &str = include_str!("kernels/syr_strided_batched.wgsl");
}
