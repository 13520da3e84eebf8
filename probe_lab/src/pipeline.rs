//! Shared orchestration helpers for the drivers.
//!
//! Buffers live on the driver's stack and drop on every exit path; these
//! helpers only bundle the allocate-then-copy steps so the drivers read
//! like the pipeline they implement.

use std::time::Instant;

use probe_core::{ProbeError, Real};
use probe_device::DeviceKernels;

/// Allocates a device buffer sized for `host` and uploads the host copy.
pub fn upload<T: Real, B: DeviceKernels<T>>(
    backend: &mut B,
    host: &[T],
) -> Result<B::Buffer, ProbeError> {
    let mut buffer = backend.alloc(host.len())?;
    backend.copy_to_device(&mut buffer, host)?;
    Ok(buffer)
}

/// Reads a device buffer back into a fresh host-resident result vector,
/// distinct from any pristine host copy the reference path will use.
pub fn download<T: Real, B: DeviceKernels<T>>(
    backend: &mut B,
    buffer: &B::Buffer,
    len: usize,
) -> Result<Vec<T>, ProbeError> {
    let mut host = vec![T::default(); len];
    backend.copy_to_host(buffer, &mut host)?;
    Ok(host)
}

/// Wall-clock guard around the device invocation, active only when the
/// timing flag is set. Reporting goes through tracing; the verdict never
/// depends on it.
pub struct InvocationTimer {
    op: &'static str,
    start: Option<Instant>,
}

impl InvocationTimer {
    pub fn start(op: &'static str, enabled: bool) -> Self {
        Self {
            op,
            start: enabled.then(Instant::now),
        }
    }

    pub fn finish(self) {
        if let Some(start) = self.start {
            tracing::debug!(
                op = self.op,
                elapsed_us = start.elapsed().as_micros() as u64,
                "device invocation"
            );
        }
    }
}
