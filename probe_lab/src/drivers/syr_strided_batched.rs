//! Strided-batched symmetric rank-1 update driver.
//!
//! This family's documented precondition requires a strictly positive
//! `incx`; that is per-family policy, not a harness-wide rule.

use probe_core::validate::{first_failure, IncrementPolicy};
use probe_core::{compare, datagen, layout};
use probe_core::{Binding, BufferLayout, KernelStatus, OperationArguments, ProbeError, Real};
use probe_device::DeviceKernels;

use crate::cpu;
use crate::pipeline::{self, InvocationTimer};
use crate::report::Verdict;

const INCREMENT_POLICY: IncrementPolicy = IncrementPolicy::StrictlyPositive;

pub fn run<T: Real, B: DeviceKernels<T>>(
    backend: &mut B,
    args: &OperationArguments,
) -> Result<Verdict, ProbeError> {
    let (m, n) = (args.m, args.n);
    let lda = args.lda;
    let incx = args.incx;
    let batch_count = args.batch_count;
    let uplo = args.fill_mode();

    // quick return before any allocation
    let status = first_failure(&[
        (m < 0, KernelStatus::InvalidValue),
        (n < 0, KernelStatus::InvalidValue),
        (lda < 0, KernelStatus::InvalidValue),
        (INCREMENT_POLICY.rejects(incx), KernelStatus::InvalidValue),
        (batch_count < 0, KernelStatus::InvalidValue),
    ]);
    if !status.is_success() {
        return Ok(Verdict::InvalidArgument);
    }
    // an empty batch is a valid no-op
    if batch_count == 0 {
        return Ok(Verdict::Passed);
    }

    let syr_fn = match args.binding() {
        Binding::Native => B::syr_strided_batched,
        Binding::Fortran => B::syr_strided_batched_fortran,
    };

    let layout_a = BufferLayout::strided(layout::dense_len(lda, n), args.stride_scale, batch_count);
    let layout_x = BufferLayout::strided(layout::vector_len(n, incx), args.stride_scale, batch_count);

    let alpha = args.get_alpha::<T>();

    let mut h_a = vec![T::default(); layout_a.total];
    let mut h_x = vec![T::default(); layout_x.total];

    datagen::fill_random(&mut h_a, datagen::FILL_SEED);
    datagen::fill_random(&mut h_x, datagen::FILL_SEED);
    let mut h_a_cpu = h_a.clone();

    let mut d_a = pipeline::upload(backend, &h_a)?;
    let d_x = pipeline::upload(backend, &h_x)?;

    let timer = InvocationTimer::start("syr_strided_batched", args.timing);
    let status = syr_fn(
        backend,
        uplo,
        n,
        alpha,
        &d_x,
        incx,
        layout_x.stride as i64,
        &mut d_a,
        lda,
        layout_a.stride as i64,
        batch_count,
    );
    timer.finish();
    if !status.is_success() {
        return Ok(Verdict::DeviceError(status));
    }

    let h_res = pipeline::download(backend, &d_a, layout_a.total)?;

    let Some(mode) = args.check_mode() else {
        return Ok(Verdict::Passed);
    };

    // reference runs per batch over the pristine host copies
    for b in 0..batch_count as usize {
        let (a_range, x_range) = (layout_a.batch_range(b), layout_x.batch_range(b));
        cpu::syr(
            uplo,
            n as usize,
            alpha,
            &h_x[x_range],
            incx,
            &mut h_a_cpu[a_range],
            lda as usize,
        );
    }

    let result = compare::check_matrix::<T>(
        mode,
        m as usize,
        n as usize,
        lda as usize,
        layout_a.stride,
        batch_count as usize,
        &h_a_cpu,
        &h_res,
    );
    Ok(Verdict::from_comparison(result))
}
