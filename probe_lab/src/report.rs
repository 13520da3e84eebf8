//! Terminal outcome of one driver invocation.

use probe_core::{ComparisonResult, KernelStatus, Mismatch};

/// What one probe concluded. Device statuses are carried verbatim;
/// comparison failures are data rather than errors, so resources release
/// normally and the runner decides what to do with them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Device and reference agree, or the invocation was a valid no-op.
    Passed,
    /// Rejected by the argument validator, before any allocation.
    InvalidArgument,
    /// The device entry point returned a non-success status.
    DeviceError(KernelStatus),
    /// Unit check failed at the first divergent coordinate.
    Mismatch(Mismatch),
    /// Norm check failed in aggregate.
    NormExceeded { error: f64, threshold: f64 },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    pub fn from_comparison(result: ComparisonResult) -> Self {
        match result {
            ComparisonResult::Pass => Verdict::Passed,
            ComparisonResult::Mismatch(m) => Verdict::Mismatch(m),
            ComparisonResult::NormExceeded { error, threshold } => {
                Verdict::NormExceeded { error, threshold }
            }
        }
    }
}

impl core::fmt::Display for Verdict {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Verdict::Passed => write!(f, "passed"),
            Verdict::InvalidArgument => write!(f, "invalid argument (rejected before allocation)"),
            Verdict::DeviceError(status) => write!(f, "device error: {status}"),
            Verdict::Mismatch(m) => write!(
                f,
                "mismatch at batch {}, ({}, {}): expected {}, got {} (|delta| = {:.3e})",
                m.batch,
                m.row,
                m.col,
                m.expected,
                m.actual,
                m.magnitude()
            ),
            Verdict::NormExceeded { error, threshold } => {
                write!(f, "norm check failed: {error:.3e} > {threshold:.3e}")
            }
        }
    }
}
