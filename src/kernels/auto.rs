//! Auto-vectorized kernel: compiler-driven SIMD
//!
//! No intrinsics here. B is transposed once, then every output element is a
//! dot product over two contiguous rows. The inner loop is a plain indexed
//! reduction over `i32`, which LLVM vectorizes for whatever instruction set
//! the binary targets (integer add and multiply wrap natively, so the
//! reduction is vectorizable without semantic change).

use crate::error::Result;
use crate::matrix::Matrix;

/// Auto-vectorized multiplication over a transposed copy of B
///
/// # Errors
///
/// Returns [`crate::Error::Conformability`] if `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = Matrix::product_buffer(a, b)?;
    let bt = b.transpose();
    accumulate_rows(a, &bt, 0, c.as_mut_slice());
    Ok(c)
}

/// Row-range accumulation against a pre-transposed B; shapes assumed
/// validated. `bt` is `P x M`.
pub(crate) fn accumulate_rows(a: &Matrix, bt: &Matrix, row0: usize, out: &mut [i32]) {
    let m = a.cols();
    let p = bt.rows();
    if p == 0 {
        return;
    }
    for (i, out_row) in out.chunks_exact_mut(p).enumerate() {
        let a_row = a.row(row0 + i);
        for (j, slot) in out_row.iter_mut().enumerate() {
            let bt_row = bt.row(j);
            let mut sum = 0i32;
            for k in 0..m {
                sum = sum.wrapping_add(a_row[k].wrapping_mul(bt_row[k]));
            }
            *slot = sum;
        }
    }
}
