//! 512-bit x86 integer SIMD kernel (AVX-512F)
//!
//! Sixteen `i32` lanes per step. The foundation subset already provides
//! packed 32-bit multiply-low and the horizontal reduction, so the kernel
//! is gated on `avx512f` alone.
//!
//! # Safety
//!
//! All intrinsics are isolated behind a safe entry point that verifies the
//! capability predicate before dispatching.

use std::arch::x86_64::*;

use crate::error::{Error, Result};
use crate::isa;
use crate::matrix::Matrix;

const NAME: &str = "simd_avx512";
const LANES: usize = 16;

/// AVX-512 multiplication over a transposed copy of B
///
/// # Errors
///
/// Returns [`Error::CapabilityViolation`] if the host CPU lacks AVX-512F,
/// or [`Error::Conformability`] if `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if !isa::has_avx512() {
        return Err(Error::CapabilityViolation {
            kernel: NAME,
            required: "avx512f",
        });
    }
    let mut c = Matrix::product_buffer(a, b)?;
    let bt = b.transpose();
    // SAFETY: host AVX-512F support verified above.
    unsafe { dot_rows(a, &bt, c.as_mut_slice()) };
    Ok(c)
}

#[target_feature(enable = "avx512f")]
unsafe fn dot_rows(a: &Matrix, bt: &Matrix, out: &mut [i32]) {
    let m = a.cols();
    let p = bt.rows();
    if p == 0 {
        return;
    }
    for (i, out_row) in out.chunks_exact_mut(p).enumerate() {
        let a_row = a.row(i);
        for (j, slot) in out_row.iter_mut().enumerate() {
            let bt_row = bt.row(j);

            let mut acc = _mm512_setzero_si512();
            let mut k = 0;
            while k + LANES <= m {
                let va = _mm512_loadu_si512(a_row.as_ptr().add(k) as *const _);
                let vb = _mm512_loadu_si512(bt_row.as_ptr().add(k) as *const _);
                acc = _mm512_add_epi32(acc, _mm512_mullo_epi32(va, vb));
                k += LANES;
            }
            let mut sum = _mm512_reduce_add_epi32(acc);

            // Scalar remainder tail
            for kk in k..m {
                sum = sum.wrapping_add(a_row[kk].wrapping_mul(bt_row[kk]));
            }
            *slot = sum;
        }
    }
}
