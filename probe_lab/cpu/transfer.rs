use probe_core::Real;

/// Copies the `rows x cols` logical sub-matrix between column-major
/// buffers with distinct leading dimensions. Elements outside the logical
/// region are left untouched on both sides.
pub fn copy_submatrix<T: Real>(
    rows: usize,
    cols: usize,
    src: &[T],
    lds: usize,
    dst: &mut [T],
    ldd: usize,
) {
    for j in 0..cols {
        for i in 0..rows {
            dst[i + j * ldd] = src[i + j * lds];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_across_differing_leading_dimensions() {
        // 2x2 logical region, source ld 3, destination ld 4
        let src = vec![1.0f32, 2.0, -1.0, 3.0, 4.0, -1.0];
        let mut dst = vec![0.0f32; 8];
        copy_submatrix(2, 2, &src, 3, &mut dst, 4);
        assert_eq!(dst, vec![1.0, 2.0, 0.0, 0.0, 3.0, 4.0, 0.0, 0.0]);
    }
}
