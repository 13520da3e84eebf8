//! End-to-end probes of the strided-batched symmetric rank-1 update.

mod support;

use probe_core::{KernelStatus, OperationArguments};
use probe_device::SoftwareDevice;
use probe_lab::{drivers, Verdict};
use support::InstrumentedDevice;

fn syr_args(n: i32, batch_count: i32) -> OperationArguments {
    OperationArguments {
        m: n,
        n,
        lda: n,
        batch_count,
        alpha: 1.5,
        ..Default::default()
    }
}

#[test]
fn two_batch_end_to_end_matches_reference() {
    let args = syr_args(6, 2);
    let mut device = SoftwareDevice::new();
    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::Passed);
}

#[test]
fn padded_lda_stride_and_increment() {
    let args = OperationArguments {
        lda: 9,
        incx: 2,
        stride_scale: 2.0,
        alpha: -0.5,
        ..syr_args(5, 3)
    };
    let mut device = SoftwareDevice::new();
    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::Passed);
}

#[test]
fn lower_fill_mode_end_to_end() {
    let args = OperationArguments {
        uplo: 'L',
        ..syr_args(7, 2)
    };
    let mut device = SoftwareDevice::new();
    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::Passed);
}

#[test]
fn f64_end_to_end() {
    let args = syr_args(8, 2);
    let mut device = SoftwareDevice::new();
    let verdict = drivers::syr_strided_batched::run::<f64, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::Passed);
}

#[test]
fn fortran_binding_end_to_end() {
    let args = OperationArguments {
        fortran_binding: true,
        ..syr_args(5, 2)
    };
    let mut device = SoftwareDevice::new();
    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::Passed);
}

#[test]
fn undersized_lda_is_rejected_by_the_device() {
    // the driver's own cascade only rejects lda < 0; the device entry
    // point rejects lda < n and that status must come back verbatim
    let args = OperationArguments {
        lda: 2,
        ..syr_args(4, 1)
    };
    let mut device = SoftwareDevice::new();
    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    assert_eq!(verdict, Verdict::DeviceError(KernelStatus::InvalidValue));
}

#[test]
fn skewed_device_result_reports_first_coordinate() {
    let args = syr_args(4, 2);
    let mut device = InstrumentedDevice::skewed();
    let verdict = drivers::syr_strided_batched::run::<f32, _>(&mut device, &args).unwrap();
    match verdict {
        Verdict::Mismatch(m) => {
            assert_eq!((m.batch, m.row, m.col), (0, 0, 0));
            assert!(m.magnitude() > 0.0);
        }
        other => panic!("expected a mismatch, got {other}"),
    }
}
