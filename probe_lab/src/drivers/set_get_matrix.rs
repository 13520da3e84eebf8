//! Matrix transfer driver.
//!
//! Pushes a host sub-matrix onto the device and pulls it back through the
//! set/get entry points, with three distinct leading dimensions in play
//! (host source, device, host destination), then checks the retrieved
//! region against a direct sub-matrix copy.

use probe_core::validate::first_failure;
use probe_core::{compare, datagen, layout};
use probe_core::{Binding, KernelStatus, OperationArguments, ProbeError, Real};
use probe_device::DeviceKernels;

use crate::cpu;
use crate::pipeline::{self, InvocationTimer};
use crate::report::Verdict;

pub fn run<T: Real, B: DeviceKernels<T>>(
    backend: &mut B,
    args: &OperationArguments,
) -> Result<Verdict, ProbeError> {
    let rows = args.rows;
    let cols = args.cols;
    let (lda, ldb, ldc) = (args.lda, args.ldb, args.ldc);

    // quick return before any allocation; dimension checks precede
    // leading-dimension checks
    let status = first_failure(&[
        (rows < 0, KernelStatus::InvalidValue),
        (cols < 0, KernelStatus::InvalidValue),
        (lda <= 0, KernelStatus::InvalidValue),
        (ldb <= 0, KernelStatus::InvalidValue),
        (ldc <= 0, KernelStatus::InvalidValue),
    ]);
    if !status.is_success() {
        return Ok(Verdict::InvalidArgument);
    }

    let set_fn = match args.binding() {
        Binding::Native => B::set_matrix,
        Binding::Fortran => B::set_matrix_fortran,
    };
    let get_fn = match args.binding() {
        Binding::Native => B::get_matrix,
        Binding::Fortran => B::get_matrix_fortran,
    };

    let a_len = layout::dense_len(lda, cols);
    let b_len = layout::dense_len(ldb, cols);
    let c_len = layout::dense_len(ldc, cols);

    let mut ha = vec![T::default(); a_len];
    let mut hb = vec![T::default(); b_len];
    let mut hb_ref = vec![T::default(); b_len];
    let mut hc = vec![T::default(); c_len];

    datagen::fill_random(&mut ha, datagen::FILL_SEED);
    datagen::fill_random(&mut hb, datagen::FILL_SEED);
    hb_ref.copy_from_slice(&hb);

    // device-visible prefill, recognizable while debugging; only the set
    // entry point may overwrite it
    datagen::fill_pattern(&mut hc, 100.0);
    let mut dc = pipeline::upload(backend, &hc)?;
    // scribbling the host copy proves the retrieved data came from the
    // device, not from host memory reuse
    datagen::fill_constant(&mut hc, 99.0);

    let timer = InvocationTimer::start("set_get_matrix", args.timing);
    let status_set = set_fn(backend, rows, cols, &ha, lda, &mut dc, ldc);
    let status_get = get_fn(backend, rows, cols, &dc, ldc, &mut hb, ldb);
    timer.finish();

    if !status_set.is_success() {
        return Ok(Verdict::DeviceError(status_set));
    }
    if !status_get.is_success() {
        return Ok(Verdict::DeviceError(status_get));
    }

    let Some(mode) = args.check_mode() else {
        return Ok(Verdict::Passed);
    };

    cpu::copy_submatrix(
        rows as usize,
        cols as usize,
        &ha,
        lda as usize,
        &mut hb_ref,
        ldb as usize,
    );

    let result = compare::check_matrix::<T>(
        mode,
        rows as usize,
        cols as usize,
        ldb as usize,
        b_len,
        1,
        &hb_ref,
        &hb,
    );
    Ok(Verdict::from_comparison(result))
}
