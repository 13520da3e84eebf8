//! Device-side capability for the batch-probe harness.
//!
//! The device kernel library is consumed through the narrow
//! [`DeviceKernels`] trait: allocation and transfer primitives plus one
//! entry point per (operation, binding) pair. Two devices ship here: a
//! software device emulating a separate address space on the CPU, and a
//! wgpu compute device running the WGSL kernels from `probe_shaders`.

pub mod backend;
pub mod software;
pub mod wgpu_backend;

pub use backend::DeviceKernels;
pub use software::SoftwareDevice;
pub use wgpu_backend::WgpuDevice;
