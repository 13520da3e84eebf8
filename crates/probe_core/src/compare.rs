//! Device-vs-reference result comparison.
//!
//! Two modes exist and exactly one runs per invocation: the unit check
//! walks the logical region element by element and reports the first
//! divergent coordinate; the norm check aggregates relative error over the
//! whole region. Both walk only the logical elements of each batch — the
//! padding introduced by leading dimensions, increments, or stride scale is
//! never inspected.

use crate::layout::vector_index;
use crate::real::Real;

/// Comparison mode for one invocation. Being an enum, unit and norm can
/// never both run against the same result pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    Unit,
    Norm,
}

/// First divergent coordinate found by a unit check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub batch: usize,
    pub row: usize,
    pub col: usize,
    pub expected: f64,
    pub actual: f64,
}

impl Mismatch {
    pub fn magnitude(&self) -> f64 {
        (self.expected - self.actual).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComparisonResult {
    Pass,
    Mismatch(Mismatch),
    NormExceeded { error: f64, threshold: f64 },
}

impl ComparisonResult {
    pub fn passed(&self) -> bool {
        matches!(self, ComparisonResult::Pass)
    }
}

fn near_equal<T: Real>(expected: f64, actual: f64) -> bool {
    (expected - actual).abs() <= T::UNIT_EPS * expected.abs().max(1.0)
}

fn norm_threshold<T: Real>() -> f64 {
    100.0 * T::EPS
}

/// Compares strided-batched column-major matrix regions of `rows x cols`
/// at leading dimension `ld`.
pub fn check_matrix<T: Real>(
    mode: CheckMode,
    rows: usize,
    cols: usize,
    ld: usize,
    stride: usize,
    batch_count: usize,
    expected: &[T],
    actual: &[T],
) -> ComparisonResult {
    match mode {
        CheckMode::Unit => unit_walk(rows, cols, batch_count, expected, actual, |b, i, j| {
            b * stride + j * ld + i
        }),
        CheckMode::Norm => norm_walk::<T>(rows, cols, batch_count, expected, actual, |b, i, j| {
            b * stride + j * ld + i
        }),
    }
}

/// Compares strided-batched incremented vectors of `n` logical elements.
pub fn check_vector<T: Real>(
    mode: CheckMode,
    n: usize,
    inc: i32,
    stride: usize,
    batch_count: usize,
    expected: &[T],
    actual: &[T],
) -> ComparisonResult {
    match mode {
        CheckMode::Unit => unit_walk(n, 1, batch_count, expected, actual, |b, i, _| {
            b * stride + vector_index(n, inc, i)
        }),
        CheckMode::Norm => norm_walk::<T>(n, 1, batch_count, expected, actual, |b, i, _| {
            b * stride + vector_index(n, inc, i)
        }),
    }
}

fn unit_walk<T: Real>(
    rows: usize,
    cols: usize,
    batch_count: usize,
    expected: &[T],
    actual: &[T],
    index: impl Fn(usize, usize, usize) -> usize,
) -> ComparisonResult {
    for b in 0..batch_count {
        for j in 0..cols {
            for i in 0..rows {
                let idx = index(b, i, j);
                let e = expected[idx].to_f64();
                let a = actual[idx].to_f64();
                if !near_equal::<T>(e, a) {
                    return ComparisonResult::Mismatch(Mismatch {
                        batch: b,
                        row: i,
                        col: j,
                        expected: e,
                        actual: a,
                    });
                }
            }
        }
    }
    ComparisonResult::Pass
}

fn norm_walk<T: Real>(
    rows: usize,
    cols: usize,
    batch_count: usize,
    expected: &[T],
    actual: &[T],
    index: impl Fn(usize, usize, usize) -> usize,
) -> ComparisonResult {
    let mut diff_sq = 0.0f64;
    let mut ref_sq = 0.0f64;
    for b in 0..batch_count {
        for j in 0..cols {
            for i in 0..rows {
                let idx = index(b, i, j);
                let e = expected[idx].to_f64();
                let a = actual[idx].to_f64();
                diff_sq += (e - a) * (e - a);
                ref_sq += e * e;
            }
        }
    }

    let threshold = norm_threshold::<T>();
    let error = if ref_sq > 0.0 {
        (diff_sq / ref_sq).sqrt()
    } else {
        diff_sq.sqrt()
    };
    if error <= threshold {
        ComparisonResult::Pass
    } else {
        ComparisonResult::NormExceeded { error, threshold }
    }
}
