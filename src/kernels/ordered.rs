//! Memory-order kernel: loop reordering for sequential access
//!
//! Swapping the j and k loops makes the innermost loop stride over B and C
//! contiguously, which is the cheapest large win over the schoolbook order.
//! A transposed-B variant turns the inner loop into a dot product over two
//! contiguous rows instead. Both produce results bit-identical to the
//! reference kernel.

use crate::error::Result;
use crate::matrix::Matrix;

/// (i, k, j) reordered multiplication
///
/// # Errors
///
/// Returns [`crate::Error::Conformability`] if `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = Matrix::product_buffer(a, b)?;
    accumulate_rows(a, b, 0, c.as_mut_slice());
    Ok(c)
}

/// (i, k, j) multiplication against a pre-transposed copy of B
///
/// The transposition is itself lossless (shape swapped, every element
/// relocated once); the inner loop then reads both operands with stride 1.
///
/// # Errors
///
/// Returns [`crate::Error::Conformability`] if `a.cols() != b.rows()`.
pub fn multiply_transposed(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = Matrix::product_buffer(a, b)?;
    let bt = b.transpose();
    let m = a.cols();
    let p = b.cols();
    if p == 0 {
        return Ok(c);
    }
    for (i, out_row) in c.as_mut_slice().chunks_exact_mut(p).enumerate() {
        let a_row = a.row(i);
        for (j, slot) in out_row.iter_mut().enumerate() {
            let bt_row = bt.row(j);
            let mut sum = 0i32;
            for k in 0..m {
                sum = sum.wrapping_add(a_row[k].wrapping_mul(bt_row[k]));
            }
            *slot = sum;
        }
    }
    Ok(c)
}

/// Row-range (i, k, j) accumulation; shapes assumed validated.
pub(crate) fn accumulate_rows(a: &Matrix, b: &Matrix, row0: usize, out: &mut [i32]) {
    let m = a.cols();
    let p = b.cols();
    if p == 0 {
        return;
    }
    for (i, out_row) in out.chunks_exact_mut(p).enumerate() {
        let a_row = a.row(row0 + i);
        for k in 0..m {
            let aik = a_row[k];
            let b_row = b.row(k);
            for j in 0..p {
                out_row[j] = out_row[j].wrapping_add(aik.wrapping_mul(b_row[j]));
            }
        }
    }
}
