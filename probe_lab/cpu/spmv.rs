use probe_core::layout::{packed_index, vector_index};
use probe_core::{FillMode, Real};

/// `y = alpha * A * x + beta * y` over packed symmetric storage.
///
/// Accumulates in `f64` regardless of element precision, like the rest of
/// the reference path.
#[allow(clippy::too_many_arguments)]
pub fn spmv<T: Real>(
    uplo: FillMode,
    n: usize,
    alpha: T,
    ap: &[T],
    x: &[T],
    incx: i32,
    beta: T,
    y: &mut [T],
    incy: i32,
) {
    let alpha = alpha.to_f64();
    let beta = beta.to_f64();
    let mut acc = vec![0.0f64; n];
    for col in 0..n {
        let xj = x[vector_index(n, incx, col)].to_f64();
        for row in 0..n {
            acc[row] += ap[packed_index(uplo, n, row, col)].to_f64() * xj;
        }
    }
    for row in 0..n {
        let yi = vector_index(n, incy, row);
        let old = y[yi].to_f64();
        y[yi] = T::from_f64(alpha * acc[row] + beta * old);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_a_dense_hand_computation() {
        // A = [[1, 2], [2, 5]] packed upper: [1, 2, 5]
        let ap = vec![1.0f64, 2.0, 5.0];
        let x = vec![3.0f64, -1.0];
        let mut y = vec![10.0f64, 20.0];
        spmv(FillMode::Upper, 2, 2.0, &ap, &x, 1, 0.5, &mut y, 1);
        // y0 = 2*(1*3 + 2*-1) + 0.5*10 = 7; y1 = 2*(2*3 + 5*-1) + 0.5*20 = 12
        assert_eq!(y, vec![7.0, 12.0]);
    }

    #[test]
    fn upper_and_lower_storage_agree() {
        // same symmetric matrix packed both ways:
        // [[4, 1, 2], [1, 5, 3], [2, 3, 6]]
        let upper = vec![4.0f32, 1.0, 5.0, 2.0, 3.0, 6.0];
        let lower = vec![4.0f32, 1.0, 2.0, 5.0, 3.0, 6.0];
        let x = vec![1.0f32, 2.0, 3.0];
        let mut y_u = vec![0.0f32; 3];
        let mut y_l = vec![0.0f32; 3];
        spmv(FillMode::Upper, 3, 1.0, &upper, &x, 1, 0.0, &mut y_u, 1);
        spmv(FillMode::Lower, 3, 1.0, &lower, &x, 1, 0.0, &mut y_l, 1);
        assert_eq!(y_u, y_l);
        assert_eq!(y_u, vec![12.0, 20.0, 26.0]);
    }

    #[test]
    fn negative_increments_read_and_write_reversed() {
        let ap = vec![1.0f64, 0.0, 1.0]; // identity, packed upper
        let x = vec![7.0f64, 9.0]; // incx = -1: logical x = [9, 7]
        let mut y = vec![0.0f64, 0.0];
        spmv(FillMode::Upper, 2, 1.0, &ap, &x, -1, 0.0, &mut y, -1);
        // logical y = [9, 7], stored reversed again
        assert_eq!(y, vec![7.0, 9.0]);
    }
}
