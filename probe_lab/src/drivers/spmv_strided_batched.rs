//! Strided-batched symmetric packed matrix-vector product driver.
//!
//! This family accepts negative increments; only zero is rejected.

use probe_core::validate::{first_failure, IncrementPolicy};
use probe_core::{compare, datagen, layout};
use probe_core::{Binding, BufferLayout, KernelStatus, OperationArguments, ProbeError, Real};
use probe_device::DeviceKernels;

use crate::cpu;
use crate::pipeline::{self, InvocationTimer};
use crate::report::Verdict;

const INCREMENT_POLICY: IncrementPolicy = IncrementPolicy::NonZero;

pub fn run<T: Real, B: DeviceKernels<T>>(
    backend: &mut B,
    args: &OperationArguments,
) -> Result<Verdict, ProbeError> {
    let m = args.m;
    let (incx, incy) = (args.incx, args.incy);
    let batch_count = args.batch_count;
    let uplo = args.fill_mode();

    // quick return before any allocation
    let status = first_failure(&[
        (m < 0, KernelStatus::InvalidValue),
        (INCREMENT_POLICY.rejects(incx), KernelStatus::InvalidValue),
        (INCREMENT_POLICY.rejects(incy), KernelStatus::InvalidValue),
        (batch_count < 0, KernelStatus::InvalidValue),
    ]);
    if !status.is_success() {
        return Ok(Verdict::InvalidArgument);
    }
    // an empty batch is a valid no-op
    if batch_count == 0 {
        return Ok(Verdict::Passed);
    }

    let spmv_fn = match args.binding() {
        Binding::Native => B::spmv_strided_batched,
        Binding::Fortran => B::spmv_strided_batched_fortran,
    };

    let layout_a = BufferLayout::strided(layout::packed_len(m), args.stride_scale, batch_count);
    let layout_x = BufferLayout::strided(layout::vector_len(m, incx), args.stride_scale, batch_count);
    let layout_y = BufferLayout::strided(layout::vector_len(m, incy), args.stride_scale, batch_count);

    let alpha = args.get_alpha::<T>();
    let beta = args.get_beta::<T>();

    let mut h_a = vec![T::default(); layout_a.total];
    let mut h_x = vec![T::default(); layout_x.total];
    let mut h_y = vec![T::default(); layout_y.total];

    datagen::fill_random(&mut h_a, datagen::FILL_SEED);
    datagen::fill_random(&mut h_x, datagen::FILL_SEED);
    datagen::fill_random(&mut h_y, datagen::FILL_SEED);

    let d_a = pipeline::upload(backend, &h_a)?;
    let d_x = pipeline::upload(backend, &h_x)?;
    let mut d_y = pipeline::upload(backend, &h_y)?;

    let timer = InvocationTimer::start("spmv_strided_batched", args.timing);
    let status = spmv_fn(
        backend,
        uplo,
        m,
        alpha,
        &d_a,
        layout_a.stride as i64,
        &d_x,
        incx,
        layout_x.stride as i64,
        beta,
        &mut d_y,
        incy,
        layout_y.stride as i64,
        batch_count,
    );
    timer.finish();
    if !status.is_success() {
        return Ok(Verdict::DeviceError(status));
    }

    let h_res = pipeline::download(backend, &d_y, layout_y.total)?;

    let Some(mode) = args.check_mode() else {
        return Ok(Verdict::Passed);
    };

    // reference runs per batch over the pristine host copies
    for b in 0..batch_count as usize {
        let (a_range, x_range, y_range) = (
            layout_a.batch_range(b),
            layout_x.batch_range(b),
            layout_y.batch_range(b),
        );
        cpu::spmv(
            uplo,
            m as usize,
            alpha,
            &h_a[a_range],
            &h_x[x_range],
            incx,
            beta,
            &mut h_y[y_range],
            incy,
        );
    }

    let result = compare::check_vector::<T>(
        mode,
        m as usize,
        incy,
        layout_y.stride,
        batch_count as usize,
        &h_y,
        &h_res,
    );
    Ok(Verdict::from_comparison(result))
}
