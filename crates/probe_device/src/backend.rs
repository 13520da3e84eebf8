//! The narrow interface to the device kernel library.

use probe_core::{FillMode, KernelStatus, ProbeError, Real};

/// Allocation, transfer, and kernel entry points of one device.
///
/// A value implementing this trait is the device handle: it is created at
/// invocation start, owned exclusively by that invocation (`&mut`
/// receivers), and released by drop on every exit path.
///
/// Kernel entry points return a [`KernelStatus`] rather than a `Result`;
/// drivers propagate non-success statuses to their caller verbatim.
/// Transfer primitives return [`ProbeError`] because their failures are
/// infrastructure faults, not device status codes.
///
/// The `_fortran` entry points mirror the alternate-binding variants of
/// the underlying library; they delegate to the native entry points unless
/// a device distinguishes the two. Drivers resolve the binding tag into a
/// function value once at setup instead of branching per call.
pub trait DeviceKernels<T: Real> {
    type Buffer;

    fn alloc(&mut self, len: usize) -> Result<Self::Buffer, ProbeError>;

    fn copy_to_device(&mut self, dst: &mut Self::Buffer, src: &[T]) -> Result<(), ProbeError>;

    fn copy_to_host(&mut self, src: &Self::Buffer, dst: &mut [T]) -> Result<(), ProbeError>;

    /// Transfers the `rows x cols` sub-matrix of a host buffer at leading
    /// dimension `lda` into a device buffer at leading dimension `ldc`.
    fn set_matrix(
        &mut self,
        rows: i32,
        cols: i32,
        src: &[T],
        lda: i32,
        dst: &mut Self::Buffer,
        ldc: i32,
    ) -> KernelStatus;

    /// Transfers the `rows x cols` sub-matrix of a device buffer at
    /// leading dimension `ldc` into a host buffer at leading dimension
    /// `ldb`.
    fn get_matrix(
        &mut self,
        rows: i32,
        cols: i32,
        src: &Self::Buffer,
        ldc: i32,
        dst: &mut [T],
        ldb: i32,
    ) -> KernelStatus;

    /// `y = alpha * A * x + beta * y` over packed symmetric storage, per
    /// batch.
    #[allow(clippy::too_many_arguments)]
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
    ) -> KernelStatus;

    /// `A = A + alpha * x * x^T` over the stored triangle of a dense
    /// matrix, per batch.
    #[allow(clippy::too_many_arguments)]
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
    ) -> KernelStatus;

    fn set_matrix_fortran(
        &mut self,
        rows: i32,
        cols: i32,
        src: &[T],
        lda: i32,
        dst: &mut Self::Buffer,
        ldc: i32,
    ) -> KernelStatus {
        self.set_matrix(rows, cols, src, lda, dst, ldc)
    }

    fn get_matrix_fortran(
        &mut self,
        rows: i32,
        cols: i32,
        src: &Self::Buffer,
        ldc: i32,
        dst: &mut [T],
        ldb: i32,
    ) -> KernelStatus {
        self.get_matrix(rows, cols, src, ldc, dst, ldb)
    }

    #[allow(clippy::too_many_arguments)]
    fn spmv_strided_batched_fortran(
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
        self.spmv_strided_batched(
            uplo, n, alpha, ap, stride_a, x, incx, stride_x, beta, y, incy, stride_y, batch_count,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn syr_strided_batched_fortran(
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
        self.syr_strided_batched(
            uplo, n, alpha, x, incx, stride_x, a, lda, stride_a, batch_count,
        )
    }
}
