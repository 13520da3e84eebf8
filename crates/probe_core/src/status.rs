//! Status and error taxonomy shared across the harness.

use thiserror::Error;

/// Status returned by device kernel entry points.
///
/// Non-success values returned by a kernel are propagated to the driver's
/// caller verbatim; they are data, not panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelStatus {
    Success,
    /// A shape/stride/increment argument violates the entry point's
    /// preconditions.
    InvalidValue,
    /// The kernel launched but did not complete successfully.
    ExecutionFailed,
    /// The backend cannot run this (operation, precision) pair at all.
    NotSupported,
}

impl KernelStatus {
    pub fn is_success(self) -> bool {
        matches!(self, KernelStatus::Success)
    }
}

impl core::fmt::Display for KernelStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            KernelStatus::Success => "success",
            KernelStatus::InvalidValue => "invalid value",
            KernelStatus::ExecutionFailed => "execution failed",
            KernelStatus::NotSupported => "not supported",
        };
        f.write_str(name)
    }
}

/// Infrastructure failures underneath the kernel interface: acquiring the
/// device, moving bytes, mapping staging memory. Distinct from
/// [`KernelStatus`], which models the device library's own return codes.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no compatible device adapter available")]
    NoAdapter,

    #[error("failed to acquire device: {0}")]
    DeviceRequest(String),

    #[error("device allocation of {elements} elements failed")]
    Allocation { elements: usize },

    #[error("host/device transfer failed: {0}")]
    Transfer(String),

    #[error("staging buffer readback failed: {0}")]
    Readback(String),
}
