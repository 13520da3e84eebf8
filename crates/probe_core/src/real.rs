//! Element trait binding the supported numeric precisions.

use bytemuck::Pod;

/// Scalar element of a kernel operand. Implemented for `f32` and `f64`.
///
/// The `Pod` bound keeps buffers castable to raw bytes for device transfer.
pub trait Real:
    Pod + Copy + PartialOrd + core::fmt::Debug + Default + Send + Sync + 'static
{
    /// Precision tag used in log lines and runner output.
    const NAME: &'static str;

    /// Machine epsilon of the precision.
    const EPS: f64;

    /// Per-element tolerance for the unit check. Tight enough that any
    /// addressing bug is a guaranteed failure, loose enough to absorb
    /// device fma contraction.
    const UNIT_EPS: f64;

    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Real for f32 {
    const NAME: &'static str = "f32";
    const EPS: f64 = f32::EPSILON as f64;
    const UNIT_EPS: f64 = 1e-5;

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Real for f64 {
    const NAME: &'static str = "f64";
    const EPS: f64 = f64::EPSILON;
    const UNIT_EPS: f64 = 1e-12;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }
}
