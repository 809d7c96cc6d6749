//! Blocking (chunked) kernel: cache-tiled multiplication
//!
//! Partitions the (N, M, P) iteration space into fixed-size sub-blocks so
//! each block's working set stays resident in a fast cache level. Partial
//! block products accumulate into C in place across block passes. Edge
//! blocks are truncated, so no dimension needs to be a multiple of the
//! block edge.

use crate::error::Result;
use crate::matrix::Matrix;

/// Block edge length, in elements. 32x32 i32 blocks keep the three-operand
/// working set (~12 KiB) inside L1d.
const BLOCK: usize = 32;

/// Cache-blocked multiplication with a fixed block edge
///
/// # Errors
///
/// Returns [`crate::Error::Conformability`] if `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = Matrix::product_buffer(a, b)?;
    accumulate_rows(a, b, 0, c.as_mut_slice());
    Ok(c)
}

/// Row-range blocked accumulation; shapes assumed validated.
///
/// Iterates (ii, kk, jj) block triples, with an (i, k, j) loop nest inside
/// each block so the innermost loop strides contiguously through B and C.
pub(crate) fn accumulate_rows(a: &Matrix, b: &Matrix, row0: usize, out: &mut [i32]) {
    let m = a.cols();
    let p = b.cols();
    if p == 0 {
        return;
    }
    let rows = out.len() / p;

    for ii in (0..rows).step_by(BLOCK) {
        let i_end = (ii + BLOCK).min(rows);
        for kk in (0..m).step_by(BLOCK) {
            let k_end = (kk + BLOCK).min(m);
            for jj in (0..p).step_by(BLOCK) {
                let j_end = (jj + BLOCK).min(p);

                for i in ii..i_end {
                    let a_row = a.row(row0 + i);
                    let out_row = &mut out[i * p..(i + 1) * p];
                    for k in kk..k_end {
                        let aik = a_row[k];
                        let b_row = b.row(k);
                        for j in jj..j_end {
                            out_row[j] = out_row[j].wrapping_add(aik.wrapping_mul(b_row[j]));
                        }
                    }
                }
            }
        }
    }
}
