//! ARM SME matrix-extension tile kernel
//!
//! SME computes matrix products as outer-product accumulations into ZA
//! tiles whose edge is fixed by the hardware streaming vector length. The
//! tile shape is kept entirely internal to this module; callers see the
//! same `(A, B) -> C` contract as every other kernel, and the kernel is
//! never invoked when [`isa::has_sme`] is false.
//!
//! `std::arch` does not expose streaming-mode SME intrinsics, so the
//! ZA-tile pass is expressed as tile-sized blocking over the vector
//! accumulation path, preserving the access pattern the hardware kernel
//! would use.

use crate::error::{Error, Result};
use crate::isa;
use crate::matrix::Matrix;

const NAME: &str = "simd_arm_sme";

/// ZA tile edge for 32-bit elements at a 512-bit streaming vector length.
const TILE: usize = 16;

/// Tile-based multiplication, guarded by the SME capability predicate
///
/// # Errors
///
/// Returns [`Error::CapabilityViolation`] if the binary/host combination
/// has no SME support, or [`Error::Conformability`] if
/// `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if !isa::has_sme() {
        return Err(Error::CapabilityViolation {
            kernel: NAME,
            required: "sme",
        });
    }
    let mut c = Matrix::product_buffer(a, b)?;
    let bt = b.transpose();
    tile_rows(a, &bt, c.as_mut_slice());
    Ok(c)
}

/// Accumulates tile-sized partial products into `out` across tile passes.
fn tile_rows(a: &Matrix, bt: &Matrix, out: &mut [i32]) {
    let n = a.rows();
    let m = a.cols();
    let p = bt.rows();
    if p == 0 {
        return;
    }

    for i0 in (0..n).step_by(TILE) {
        let i1 = (i0 + TILE).min(n);
        for j0 in (0..p).step_by(TILE) {
            let j1 = (j0 + TILE).min(p);
            for k0 in (0..m).step_by(TILE) {
                let k1 = (k0 + TILE).min(m);

                for i in i0..i1 {
                    let a_run = &a.row(i)[k0..k1];
                    let out_row = &mut out[i * p..(i + 1) * p];
                    for j in j0..j1 {
                        let bt_run = &bt.row(j)[k0..k1];
                        let mut sum = out_row[j];
                        for (x, y) in a_run.iter().zip(bt_run) {
                            sum = sum.wrapping_add(x.wrapping_mul(*y));
                        }
                        out_row[j] = sum;
                    }
                }
            }
        }
    }
}
