//! 128-bit x86 integer SIMD kernel (SSE4.1)
//!
//! Processes the inner accumulation dimension four `i32` lanes at a time.
//! Packed 32-bit multiply-low (`pmulld`) first appeared in SSE4.1, so this
//! kernel is gated on [`isa::has_sse41`] rather than the SSE2 baseline.
//! x86 has no integer fused multiply-add; the kernel pairs multiply with
//! add, which is the documented fallback for FMA-less families.
//!
//! # Safety
//!
//! All intrinsics are isolated behind a safe entry point that verifies the
//! capability predicate before dispatching.

use std::arch::x86_64::*;

use crate::error::{Error, Result};
use crate::isa;
use crate::matrix::Matrix;

const NAME: &str = "simd_sse41";
const LANES: usize = 4;

/// SSE4.1 multiplication over a transposed copy of B
///
/// # Errors
///
/// Returns [`Error::CapabilityViolation`] if the host CPU lacks SSE4.1,
/// or [`Error::Conformability`] if `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if !isa::has_sse41() {
        return Err(Error::CapabilityViolation {
            kernel: NAME,
            required: "sse4.1",
        });
    }
    let mut c = Matrix::product_buffer(a, b)?;
    let bt = b.transpose();
    // SAFETY: host SSE4.1 support verified above.
    unsafe { dot_rows(a, &bt, c.as_mut_slice()) };
    Ok(c)
}

#[target_feature(enable = "sse4.1")]
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

            let mut acc = _mm_setzero_si128();
            let mut k = 0;
            while k + LANES <= m {
                let va = _mm_loadu_si128(a_row.as_ptr().add(k) as *const __m128i);
                let vb = _mm_loadu_si128(bt_row.as_ptr().add(k) as *const __m128i);
                acc = _mm_add_epi32(acc, _mm_mullo_epi32(va, vb));
                k += LANES;
            }

            let mut lanes = [0i32; LANES];
            _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, acc);
            let mut sum = lanes.iter().fold(0i32, |s, &v| s.wrapping_add(v));

            // Scalar remainder tail
            for kk in k..m {
                sum = sum.wrapping_add(a_row[kk].wrapping_mul(bt_row[kk]));
            }
            *slot = sum;
        }
    }
}
