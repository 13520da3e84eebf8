//! Instrumented device for driver tests: counts allocations and kernel
//! invocations, and can inject kernel failures or a skewed alpha to force
//! comparison mismatches.
#![allow(dead_code)]

use probe_core::{FillMode, KernelStatus, ProbeError, Real};
use probe_device::software::SoftwareBuffer;
use probe_device::{DeviceKernels, SoftwareDevice};

#[derive(Default)]
pub struct InstrumentedDevice {
    inner: SoftwareDevice,
    pub allocations: usize,
    pub kernel_calls: usize,
    pub fail_kernels: bool,
    pub skew_alpha: bool,
}

impl InstrumentedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_kernels: true,
            ..Self::default()
        }
    }

    pub fn skewed() -> Self {
        Self {
            skew_alpha: true,
            ..Self::default()
        }
    }

    fn enter_kernel(&mut self) -> Option<KernelStatus> {
        self.kernel_calls += 1;
        self.fail_kernels.then_some(KernelStatus::ExecutionFailed)
    }

    fn skew<T: Real>(&self, alpha: T) -> T {
        if self.skew_alpha {
            T::from_f64(alpha.to_f64() * 2.0)
        } else {
            alpha
        }
    }
}

impl<T: Real> DeviceKernels<T> for InstrumentedDevice {
    type Buffer = SoftwareBuffer<T>;

    fn alloc(&mut self, len: usize) -> Result<Self::Buffer, ProbeError> {
        self.allocations += 1;
        self.inner.alloc(len)
    }

    fn copy_to_device(&mut self, dst: &mut Self::Buffer, src: &[T]) -> Result<(), ProbeError> {
        self.inner.copy_to_device(dst, src)
    }

    fn copy_to_host(&mut self, src: &Self::Buffer, dst: &mut [T]) -> Result<(), ProbeError> {
        self.inner.copy_to_host(src, dst)
    }

    fn set_matrix(
        &mut self,
        rows: i32,
        cols: i32,
        src: &[T],
        lda: i32,
        dst: &mut Self::Buffer,
        ldc: i32,
    ) -> KernelStatus {
        if let Some(status) = self.enter_kernel() {
            return status;
        }
        self.inner.set_matrix(rows, cols, src, lda, dst, ldc)
    }

    fn get_matrix(
        &mut self,
        rows: i32,
        cols: i32,
        src: &Self::Buffer,
        ldc: i32,
        dst: &mut [T],
        ldb: i32,
    ) -> KernelStatus {
        if let Some(status) = self.enter_kernel() {
            return status;
        }
        self.inner.get_matrix(rows, cols, src, ldc, dst, ldb)
    }

    fn spmv_strided_batched(
        &mut self,
        uplo: FillMode,
        n: i32,
        alpha: T,
        ap: &Self::Buffer,
        stride_a: i64,
        x: &Self::Buffer,
        incx: i32,
        stride_x: i64,
        beta: T,
        y: &mut Self::Buffer,
        incy: i32,
        stride_y: i64,
        batch_count: i32,
    ) -> KernelStatus {
        if let Some(status) = self.enter_kernel() {
            return status;
        }
        let alpha = self.skew(alpha);
        self.inner.spmv_strided_batched(
            uplo, n, alpha, ap, stride_a, x, incx, stride_x, beta, y, incy, stride_y, batch_count,
        )
    }

    fn syr_strided_batched(
        &mut self,
        uplo: FillMode,
        n: i32,
        alpha: T,
        x: &Self::Buffer,
        incx: i32,
        stride_x: i64,
        a: &mut Self::Buffer,
        lda: i32,
        stride_a: i64,
        batch_count: i32,
    ) -> KernelStatus {
        if let Some(status) = self.enter_kernel() {
            return status;
        }
        let alpha = self.skew(alpha);
        self.inner
            .syr_strided_batched(uplo, n, alpha, x, incx, stride_x, a, lda, stride_a, batch_count)
    }
}
