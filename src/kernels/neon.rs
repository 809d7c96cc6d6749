//! ARM NEON integer SIMD kernel (128-bit)
//!
//! Four `i32` lanes per step with `vmlaq_s32`, NEON's fused integer
//! multiply-accumulate, and `vaddvq_s32` for the horizontal sum. Large
//! shapes take an eight-accumulator unrolled path that keeps the
//! multiply-accumulate pipeline full; small shapes use the simple loop
//! where the unroll overhead is not paid back.
//!
//! # Safety
//!
//! All intrinsics are isolated behind a safe entry point that verifies the
//! capability predicate before dispatching.

use std::arch::aarch64::*;

use crate::error::{Error, Result};
use crate::isa;
use crate::matrix::Matrix;

const NAME: &str = "simd_neon";
const LANES: usize = 4;
const UNROLL: usize = 8;

/// Shapes with every dimension at or above this take the unrolled path.
const UNROLL_THRESHOLD: usize = 64;

/// NEON multiplication over a transposed copy of B
///
/// # Errors
///
/// Returns [`Error::CapabilityViolation`] if the host CPU lacks NEON, or
/// [`Error::Conformability`] if `a.cols() != b.rows()`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if !isa::has_neon() {
        return Err(Error::CapabilityViolation {
            kernel: NAME,
            required: "neon",
        });
    }
    let mut c = Matrix::product_buffer(a, b)?;
    let bt = b.transpose();
    let unrolled = a.rows() >= UNROLL_THRESHOLD
        && a.cols() >= UNROLL_THRESHOLD
        && b.cols() >= UNROLL_THRESHOLD;
    // SAFETY: host NEON support verified above.
    unsafe {
        if unrolled {
            dot_rows_unrolled(a, &bt, c.as_mut_slice());
        } else {
            dot_rows(a, &bt, c.as_mut_slice());
        }
    }
    Ok(c)
}

#[target_feature(enable = "neon")]
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

            let mut acc = vdupq_n_s32(0);
            let mut k = 0;
            while k + LANES <= m {
                let va = vld1q_s32(a_row.as_ptr().add(k));
                let vb = vld1q_s32(bt_row.as_ptr().add(k));
                acc = vmlaq_s32(acc, va, vb);
                k += LANES;
            }
            let mut sum = vaddvq_s32(acc);

            // Scalar remainder tail
            for kk in k..m {
                sum = sum.wrapping_add(a_row[kk].wrapping_mul(bt_row[kk]));
            }
            *slot = sum;
        }
    }
}

#[target_feature(enable = "neon")]
unsafe fn dot_rows_unrolled(a: &Matrix, bt: &Matrix, out: &mut [i32]) {
    let m = a.cols();
    let p = bt.rows();
    if p == 0 {
        return;
    }
    let step = LANES * UNROLL;

    for (i, out_row) in out.chunks_exact_mut(p).enumerate() {
        let a_row = a.row(i);
        for (j, slot) in out_row.iter_mut().enumerate() {
            let bt_row = bt.row(j);

            let mut acc = [vdupq_n_s32(0); UNROLL];
            let mut k = 0;
            while k + step <= m {
                for (u, lane_acc) in acc.iter_mut().enumerate() {
                    let off = k + LANES * u;
                    let va = vld1q_s32(a_row.as_ptr().add(off));
                    let vb = vld1q_s32(bt_row.as_ptr().add(off));
                    *lane_acc = vmlaq_s32(*lane_acc, va, vb);
                }
                k += step;
            }

            // Pairwise merge keeps the reduction latency logarithmic.
            let a01 = vaddq_s32(acc[0], acc[1]);
            let a23 = vaddq_s32(acc[2], acc[3]);
            let a45 = vaddq_s32(acc[4], acc[5]);
            let a67 = vaddq_s32(acc[6], acc[7]);
            let mut merged = vaddq_s32(vaddq_s32(a01, a23), vaddq_s32(a45, a67));

            while k + LANES <= m {
                let va = vld1q_s32(a_row.as_ptr().add(k));
                let vb = vld1q_s32(bt_row.as_ptr().add(k));
                merged = vmlaq_s32(merged, va, vb);
                k += LANES;
            }
            let mut sum = vaddvq_s32(merged);

            // Scalar remainder tail
            for kk in k..m {
                sum = sum.wrapping_add(a_row[kk].wrapping_mul(bt_row[kk]));
            }
            *slot = sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::trivial;

    #[test]
    fn test_matches_reference_simple_path() {
        if !isa::has_neon() {
            return;
        }
        for &(n, m, p) in &[(2, 4, 2), (3, 3, 3), (5, 17, 5), (16, 16, 16)] {
            let a = Matrix::from_fn(n, m, |i, j| ((i * m + j) % 21) as i32 - 10);
            let b = Matrix::from_fn(m, p, |i, j| ((i * p + j) % 17) as i32 - 8);
            assert_eq!(
                multiply(&a, &b).unwrap(),
                trivial::multiply(&a, &b).unwrap(),
                "shape {n}x{m}x{p}"
            );
        }
    }

    #[test]
    fn test_matches_reference_unrolled_path() {
        if !isa::has_neon() {
            return;
        }
        // 65 and 100 exercise the unrolled step, its 4-lane cleanup loop,
        // and the scalar tail.
        for &(n, m, p) in &[(64, 64, 64), (65, 100, 65)] {
            let a = Matrix::from_fn(n, m, |i, j| ((i * m + j) % 19) as i32 - 9);
            let b = Matrix::from_fn(m, p, |i, j| ((i * p + j) % 23) as i32 - 11);
            assert_eq!(
                multiply(&a, &b).unwrap(),
                trivial::multiply(&a, &b).unwrap(),
                "shape {n}x{m}x{p}"
            );
        }
    }

    #[test]
    fn test_capability_is_true_when_kernel_runs() {
        let a = Matrix::identity(4);
        if multiply(&a, &a).is_ok() {
            assert!(isa::has_neon());
        }
    }
}
