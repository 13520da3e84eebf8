//! Validation and short-circuit behavior of the drivers: invalid shape
//! arguments are rejected before any allocation, empty batches succeed as
//! no-ops, and device statuses propagate verbatim.

mod support;

use probe_core::{KernelStatus, OperationArguments};
use probe_lab::{drivers, Verdict};
use support::InstrumentedDevice;

fn square_args(n: i32) -> OperationArguments {
    OperationArguments {
        rows: n,
        cols: n,
        m: n,
        n,
        lda: n,
        ldb: n,
        ldc: n,
        ..Default::default()
    }
}

#[test]
fn negative_dimension_is_rejected_without_allocation() {
    let args = OperationArguments {
        m: -1,
        rows: -1,
        ..square_args(8)
    };

    let mut device = InstrumentedDevice::new();
    let verdict = drivers::set_get_matrix::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::InvalidArgument);

    let verdict = drivers::spmv_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::InvalidArgument);

    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::InvalidArgument);

    assert_eq!(device.allocations, 0);
    assert_eq!(device.kernel_calls, 0);
}

#[test]
fn non_positive_leading_dimension_is_rejected() {
    for (lda, ldb, ldc) in [(0, 5, 6), (4, -1, 6), (4, 5, 0)] {
        let args = OperationArguments {
            lda,
            ldb,
            ldc,
            ..square_args(3)
        };
        let mut device = InstrumentedDevice::new();
        let verdict = drivers::set_get_matrix::run::<f32, _>(&mut device, &args).unwrap();
        assert_eq!(verdict, Verdict::InvalidArgument);
        assert_eq!(device.allocations, 0);
    }
}

#[test]
fn spmv_rejects_zero_increments_only() {
    let mut device = InstrumentedDevice::new();

    let args = OperationArguments {
        incx: 0,
        ..square_args(4)
    };
    let verdict = drivers::spmv_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::InvalidArgument);

    let args = OperationArguments {
        incy: 0,
        ..square_args(4)
    };
    let verdict = drivers::spmv_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::InvalidArgument);
    assert_eq!(device.allocations, 0);

    // this family accepts negative increments
    let args = OperationArguments {
        incx: -1,
        ..square_args(4)
    };
    let verdict = drivers::spmv_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::Passed);
}

#[test]
fn syr_rejects_non_positive_incx() {
    // per-family policy: strictly positive increments only
    for incx in [0, -1, -3] {
        let args = OperationArguments {
            incx,
            ..square_args(4)
        };
        let mut device = InstrumentedDevice::new();
        let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
        assert_eq!(verdict, Verdict::InvalidArgument);
        assert_eq!(device.allocations, 0);
    }
}

#[test]
fn negative_batch_count_is_rejected() {
    let args = OperationArguments {
        batch_count: -2,
        ..square_args(4)
    };
    let mut device = InstrumentedDevice::new();

    let verdict = drivers::spmv_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::InvalidArgument);
    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::InvalidArgument);
    assert_eq!(device.allocations, 0);
}

#[test]
fn zero_batch_count_is_a_successful_noop() {
    let args = OperationArguments {
        batch_count: 0,
        ..square_args(16)
    };
    let mut device = InstrumentedDevice::new();

    let verdict = drivers::spmv_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::Passed);
    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::Passed);

    assert_eq!(device.allocations, 0);
    assert_eq!(device.kernel_calls, 0);
}

#[test]
fn device_failure_propagates_verbatim_and_skips_comparison() {
    let args = square_args(8);
    let mut device = InstrumentedDevice::failing();

    let verdict = drivers::spmv_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::DeviceError(KernelStatus::ExecutionFailed));
    assert_eq!(device.kernel_calls, 1);
    // buffers were allocated before the kernel ran
    assert_eq!(device.allocations, 3);

    let mut device = InstrumentedDevice::failing();
    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::DeviceError(KernelStatus::ExecutionFailed));
    assert_eq!(device.kernel_calls, 1);
}

#[test]
fn set_get_invokes_both_entry_points_before_reporting_failure() {
    let args = square_args(4);
    let mut device = InstrumentedDevice::failing();
    let verdict = drivers::set_get_matrix::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::DeviceError(KernelStatus::ExecutionFailed));
    // set and get both run; the set status is checked first
    assert_eq!(device.kernel_calls, 2);
}
