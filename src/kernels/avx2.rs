//! 256-bit x86 integer SIMD kernel (AVX2)
//!
//! Eight `i32` lanes per step with `vpmulld` + `vpaddd`. Integer AVX2 has
//! no fused multiply-add form, so the kernel pairs multiply with add; the
//! remainder tail completes inner dimensions that are not a multiple of
//! eight with scalar arithmetic.
//!
//! # Safety
//!
//! All intrinsics are isolated behind a safe entry point that verifies the
//! capability predicate before dispatching.

use std::arch::x86_64::*;

use crate::error::{Error, Result};
use crate::isa;
use crate::matrix::Matrix;

const NAME: &str = "simd_avx2";
const LANES: usize = 8;

/// AVX2 multiplication over a transposed copy of B
///
/// # Errors
///
/// Returns [`Error::CapabilityViolation`] if the host CPU lacks AVX2, or
/// [`Error::Conformability`] if `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if !isa::has_avx2() {
        return Err(Error::CapabilityViolation {
            kernel: NAME,
            required: "avx2",
        });
    }
    let mut c = Matrix::product_buffer(a, b)?;
    let bt = b.transpose();
    // SAFETY: host AVX2 support verified above.
    unsafe { dot_rows(a, &bt, c.as_mut_slice()) };
    Ok(c)
}

#[target_feature(enable = "avx2")]
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

            // Two independent accumulators hide the vpaddd latency.
            let mut acc0 = _mm256_setzero_si256();
            let mut acc1 = _mm256_setzero_si256();
            let mut k = 0;
            while k + 2 * LANES <= m {
                let va0 = _mm256_loadu_si256(a_row.as_ptr().add(k) as *const __m256i);
                let vb0 = _mm256_loadu_si256(bt_row.as_ptr().add(k) as *const __m256i);
                let va1 = _mm256_loadu_si256(a_row.as_ptr().add(k + LANES) as *const __m256i);
                let vb1 = _mm256_loadu_si256(bt_row.as_ptr().add(k + LANES) as *const __m256i);
                acc0 = _mm256_add_epi32(acc0, _mm256_mullo_epi32(va0, vb0));
                acc1 = _mm256_add_epi32(acc1, _mm256_mullo_epi32(va1, vb1));
                k += 2 * LANES;
            }
            while k + LANES <= m {
                let va = _mm256_loadu_si256(a_row.as_ptr().add(k) as *const __m256i);
                let vb = _mm256_loadu_si256(bt_row.as_ptr().add(k) as *const __m256i);
                acc0 = _mm256_add_epi32(acc0, _mm256_mullo_epi32(va, vb));
                k += LANES;
            }
            let acc = _mm256_add_epi32(acc0, acc1);

            let mut lanes = [0i32; LANES];
            _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);
            let mut sum = lanes.iter().fold(0i32, |s, &v| s.wrapping_add(v));

            // Scalar remainder tail
            for kk in k..m {
                sum = sum.wrapping_add(a_row[kk].wrapping_mul(bt_row[kk]));
            }
            *slot = sum;
        }
    }
}
