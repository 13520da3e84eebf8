//! Software device: a CPU emulation of the device kernel library.
//!
//! Device allocations own their storage, so the "device address space" is
//! genuinely separate from host buffers; data only crosses through the
//! transfer primitives. Kernel math accumulates in `f64` regardless of the
//! element precision, which keeps the device result stable against
//! summation-order choices in the reference path.

use probe_core::layout::{packed_index, packed_len, vector_index};
use probe_core::{FillMode, KernelStatus, ProbeError, Real};

use crate::backend::DeviceKernels;

/// The emulated device. Stateless between invocations; each allocation is
/// an independent block of device memory.
#[derive(Debug, Default)]
pub struct SoftwareDevice;

impl SoftwareDevice {
    pub fn new() -> Self {
        Self
    }
}

/// One device-resident allocation.
#[derive(Debug)]
pub struct SoftwareBuffer<T> {
    data: Vec<T>,
}

impl<T> SoftwareBuffer<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Last element index touched by `count` logical elements at `inc`.
fn vector_extent(count: usize, inc: i32) -> usize {
    if count == 0 {
        0
    } else {
        (count - 1) * inc.unsigned_abs() as usize + 1
    }
}

fn matrix_extent(rows: usize, cols: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (cols - 1) * ld + rows
    }
}

impl<T: Real> DeviceKernels<T> for SoftwareDevice {
    type Buffer = SoftwareBuffer<T>;

    fn alloc(&mut self, len: usize) -> Result<Self::Buffer, ProbeError> {
        Ok(SoftwareBuffer {
            data: vec![T::default(); len],
        })
    }

    fn copy_to_device(&mut self, dst: &mut Self::Buffer, src: &[T]) -> Result<(), ProbeError> {
        if src.len() > dst.data.len() {
            return Err(ProbeError::Transfer(format!(
                "host source of {} elements exceeds device allocation of {}",
                src.len(),
                dst.data.len()
            )));
        }
        dst.data[..src.len()].copy_from_slice(src);
        Ok(())
    }

    fn copy_to_host(&mut self, src: &Self::Buffer, dst: &mut [T]) -> Result<(), ProbeError> {
        if dst.len() > src.data.len() {
            return Err(ProbeError::Transfer(format!(
                "host destination of {} elements exceeds device allocation of {}",
                dst.len(),
                src.data.len()
            )));
        }
        dst.copy_from_slice(&src.data[..dst.len()]);
        Ok(())
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
        if rows < 0 || cols < 0 || lda <= 0 || ldc <= 0 || lda < rows || ldc < rows {
            return KernelStatus::InvalidValue;
        }
        let (rows, cols, lda, ldc) = (rows as usize, cols as usize, lda as usize, ldc as usize);
        if src.len() < matrix_extent(rows, cols, lda)
            || dst.data.len() < matrix_extent(rows, cols, ldc)
        {
            return KernelStatus::ExecutionFailed;
        }
        for j in 0..cols {
            let s = j * lda;
            let d = j * ldc;
            dst.data[d..d + rows].copy_from_slice(&src[s..s + rows]);
        }
        KernelStatus::Success
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
        if rows < 0 || cols < 0 || ldc <= 0 || ldb <= 0 || ldc < rows || ldb < rows {
            return KernelStatus::InvalidValue;
        }
        let (rows, cols, ldc, ldb) = (rows as usize, cols as usize, ldc as usize, ldb as usize);
        if src.data.len() < matrix_extent(rows, cols, ldc)
            || dst.len() < matrix_extent(rows, cols, ldb)
        {
            return KernelStatus::ExecutionFailed;
        }
        for j in 0..cols {
            let s = j * ldc;
            let d = j * ldb;
            dst[d..d + rows].copy_from_slice(&src.data[s..s + rows]);
        }
        KernelStatus::Success
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
        if n < 0 || incx == 0 || incy == 0 || batch_count < 0 {
            return KernelStatus::InvalidValue;
        }
        if stride_a < 0 || stride_x < 0 || stride_y < 0 {
            return KernelStatus::InvalidValue;
        }
        if n == 0 || batch_count == 0 {
            return KernelStatus::Success;
        }

        let n = n as usize;
        let batches = batch_count as usize;
        let (stride_a, stride_x, stride_y) =
            (stride_a as usize, stride_x as usize, stride_y as usize);
        if ap.data.len() < (batches - 1) * stride_a + packed_len(n as i32)
            || x.data.len() < (batches - 1) * stride_x + vector_extent(n, incx)
            || y.data.len() < (batches - 1) * stride_y + vector_extent(n, incy)
        {
            return KernelStatus::ExecutionFailed;
        }

        let alpha = alpha.to_f64();
        let beta = beta.to_f64();
        for b in 0..batches {
            let a_base = b * stride_a;
            let x_base = b * stride_x;
            let y_base = b * stride_y;
            for row in 0..n {
                let mut acc = 0.0f64;
                for col in 0..n {
                    let a = ap.data[a_base + packed_index(uplo, n, row, col)].to_f64();
                    let xv = x.data[x_base + vector_index(n, incx, col)].to_f64();
                    acc += a * xv;
                }
                let yi = y_base + vector_index(n, incy, row);
                let old = y.data[yi].to_f64();
                y.data[yi] = T::from_f64(alpha * acc + beta * old);
            }
        }
        KernelStatus::Success
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
        if n < 0 || incx == 0 || lda < n.max(1) || batch_count < 0 {
            return KernelStatus::InvalidValue;
        }
        if stride_x < 0 || stride_a < 0 {
            return KernelStatus::InvalidValue;
        }
        if n == 0 || batch_count == 0 {
            return KernelStatus::Success;
        }

        let n = n as usize;
        let lda = lda as usize;
        let batches = batch_count as usize;
        let (stride_x, stride_a) = (stride_x as usize, stride_a as usize);
        if x.data.len() < (batches - 1) * stride_x + vector_extent(n, incx)
            || a.data.len() < (batches - 1) * stride_a + matrix_extent(n, n, lda)
        {
            return KernelStatus::ExecutionFailed;
        }

        let alpha = alpha.to_f64();
        for b in 0..batches {
            let x_base = b * stride_x;
            let a_base = b * stride_a;
            for col in 0..n {
                let xj = x.data[x_base + vector_index(n, incx, col)].to_f64();
                let (row_start, row_end) = match uplo {
                    FillMode::Upper => (0, col + 1),
                    FillMode::Lower => (col, n),
                };
                for row in row_start..row_end {
                    let xi = x.data[x_base + vector_index(n, incx, row)].to_f64();
                    let idx = a_base + col * lda + row;
                    let old = a.data[idx].to_f64();
                    a.data[idx] = T::from_f64(old + alpha * xi * xj);
                }
            }
        }
        KernelStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_and_host_copies_are_distinct_allocations() {
        let mut dev = SoftwareDevice::new();
        let host = vec![1.0f32, 2.0, 3.0];
        let mut buf = dev.alloc(3).unwrap();
        dev.copy_to_device(&mut buf, &host).unwrap();

        let mut back = vec![0.0f32; 3];
        dev.copy_to_host(&buf, &mut back).unwrap();
        assert_eq!(host, back);
    }

    #[test]
    fn set_matrix_rejects_bad_leading_dimensions() {
        let mut dev = SoftwareDevice::new();
        let mut buf = <SoftwareDevice as DeviceKernels<f32>>::alloc(&mut dev, 16).unwrap();
        let host = vec![0.0f32; 16];
        assert_eq!(
            dev.set_matrix(4, 2, &host, 3, &mut buf, 4),
            KernelStatus::InvalidValue
        );
        assert_eq!(
            dev.set_matrix(-1, 2, &host, 4, &mut buf, 4),
            KernelStatus::InvalidValue
        );
    }

    #[test]
    fn spmv_device_side_validation() {
        let mut dev = SoftwareDevice::new();
        let ap = <SoftwareDevice as DeviceKernels<f32>>::alloc(&mut dev, 8).unwrap();
        let x = <SoftwareDevice as DeviceKernels<f32>>::alloc(&mut dev, 8).unwrap();
        let mut y = <SoftwareDevice as DeviceKernels<f32>>::alloc(&mut dev, 8).unwrap();
        let status = dev.spmv_strided_batched(
            FillMode::Upper,
            2,
            1.0f32,
            &ap,
            3,
            &x,
            0,
            2,
            0.0,
            &mut y,
            1,
            2,
            1,
        );
        assert_eq!(status, KernelStatus::InvalidValue);
    }

    #[test]
    fn undersized_device_buffer_is_an_execution_fault() {
        let mut dev = SoftwareDevice::new();
        let ap = <SoftwareDevice as DeviceKernels<f32>>::alloc(&mut dev, 1).unwrap();
        let x = <SoftwareDevice as DeviceKernels<f32>>::alloc(&mut dev, 8).unwrap();
        let mut y = <SoftwareDevice as DeviceKernels<f32>>::alloc(&mut dev, 8).unwrap();
        let status = dev.spmv_strided_batched(
            FillMode::Upper,
            3,
            1.0f32,
            &ap,
            6,
            &x,
            1,
            3,
            0.0,
            &mut y,
            1,
            3,
            1,
        );
        assert_eq!(status, KernelStatus::ExecutionFailed);
    }
}
