//! Buffer layout and batch address arithmetic for strided-batched operands.
//!
//! Everything here is a pure function of the shape parameters. The element
//! address of batch `b`, element `i` is `base + b * stride + i * increment`;
//! the stride may legally exceed the tight packing size (padding between
//! batches), and the harness trusts the caller's stride-scale factor rather
//! than forbidding overlap.

use core::ops::Range;

/// Which triangle of a symmetric matrix is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Upper,
    Lower,
}

/// Tight element count of a dense column-major matrix with leading
/// dimension `ld`.
pub fn dense_len(ld: i32, cols: i32) -> usize {
    ld.max(0) as usize * cols.max(0) as usize
}

/// Tight element count of a packed triangular matrix of dimension `n`.
pub fn packed_len(n: i32) -> usize {
    let n = n.max(0) as usize;
    n * (n + 1) / 2
}

/// Tight element count of a vector of `n` logical elements at increment
/// `inc` (sign does not change the footprint).
pub fn vector_len(n: i32, inc: i32) -> usize {
    n.max(0) as usize * inc.unsigned_abs() as usize
}

/// Storage index of logical element `i` of an incremented vector.
///
/// Negative increments address from the far end of the slot, as BLAS
/// specifies: element `i` lives at `(n - 1 - i) * |inc|`.
pub fn vector_index(n: usize, inc: i32, i: usize) -> usize {
    if inc >= 0 {
        i * inc as usize
    } else {
        (n - 1 - i) * inc.unsigned_abs() as usize
    }
}

/// Storage index of symmetric element `(row, col)` in packed triangular
/// storage of dimension `n`. Coordinates outside the stored triangle are
/// folded across the diagonal first.
pub fn packed_index(uplo: FillMode, n: usize, row: usize, col: usize) -> usize {
    match uplo {
        FillMode::Upper => {
            let (i, j) = if row <= col { (row, col) } else { (col, row) };
            j * (j + 1) / 2 + i
        }
        FillMode::Lower => {
            let (i, j) = if row >= col { (row, col) } else { (col, row) };
            // column j starts after the j full columns before it, each one
            // element shorter than the last
            j * (2 * n + 1 - j) / 2 + (i - j)
        }
    }
}

/// Per-operand layout: elements per batch instance, per-batch stride, and
/// the allocation size covering all batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLayout {
    pub elems_per_batch: usize,
    pub stride: usize,
    pub total: usize,
}

impl BufferLayout {
    /// Layout for a strided-batched operand. The stride is the tight
    /// packing size scaled by `stride_scale` and truncated to an integer,
    /// exactly as the shape parameters prescribe. A stride below the tight
    /// size (overlapping batches) is a legal degenerate request; the
    /// allocation still covers every batch's full extent.
    pub fn strided(elems_per_batch: usize, stride_scale: f64, batch_count: i32) -> Self {
        let stride = (elems_per_batch as f64 * stride_scale) as usize;
        let batches = batch_count.max(0) as usize;
        let total = if batches == 0 {
            0
        } else {
            (stride * batches).max(stride * (batches - 1) + elems_per_batch)
        };
        Self {
            elems_per_batch,
            stride,
            total,
        }
    }

    /// Layout for a single un-batched operand.
    pub fn contiguous(len: usize) -> Self {
        Self {
            elems_per_batch: len,
            stride: len,
            total: len,
        }
    }

    pub fn batch_offset(&self, batch: usize) -> usize {
        batch * self.stride
    }

    /// Element range of one batch instance within the allocation.
    pub fn batch_range(&self, batch: usize) -> Range<usize> {
        let start = self.batch_offset(batch);
        start..start + self.elems_per_batch
    }
}
