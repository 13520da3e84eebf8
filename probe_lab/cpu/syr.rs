use probe_core::layout::vector_index;
use probe_core::{FillMode, Real};

/// `A = A + alpha * x * x^T` over the stored triangle of a dense
/// column-major matrix. The opposite triangle is left untouched.
pub fn syr<T: Real>(
    uplo: FillMode,
    n: usize,
    alpha: T,
    x: &[T],
    incx: i32,
    a: &mut [T],
    lda: usize,
) {
    let alpha = alpha.to_f64();
    for col in 0..n {
        let xj = x[vector_index(n, incx, col)].to_f64();
        let (row_start, row_end) = match uplo {
            FillMode::Upper => (0, col + 1),
            FillMode::Lower => (col, n),
        };
        for row in row_start..row_end {
            let xi = x[vector_index(n, incx, row)].to_f64();
            let idx = row + col * lda;
            a[idx] = T::from_f64(a[idx].to_f64() + alpha * xi * xj);
        }
    }
}
