//! Reference kernel: schoolbook triple loop
//!
//! The (i, j, k) loop order with wrapping 32-bit accumulation defines the
//! ground truth every other kernel must match element-for-element. All
//! operands and accumulators are integral, so agreement is exact with zero
//! tolerance.

use crate::error::Result;
use crate::matrix::Matrix;

/// Schoolbook matrix multiplication: `C[i,j] = sum_k A[i,k] * B[k,j]`
///
/// # Errors
///
/// Returns [`crate::Error::Conformability`] if `a.cols() != b.rows()`.
///
/// # Example
///
/// ```
/// use molino::{kernels::trivial, Matrix};
///
/// let a = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
/// let b = Matrix::identity(2);
/// assert_eq!(trivial::multiply(&a, &b).unwrap(), a);
/// ```
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = Matrix::product_buffer(a, b)?;
    accumulate_rows(a, b, 0, c.as_mut_slice());
    Ok(c)
}

/// Computes output rows starting at `row0` into `out` (a whole number of
/// result rows). Shapes are assumed validated by the caller.
pub(crate) fn accumulate_rows(a: &Matrix, b: &Matrix, row0: usize, out: &mut [i32]) {
    let m = a.cols();
    let p = b.cols();
    if p == 0 {
        return;
    }
    for (i, out_row) in out.chunks_exact_mut(p).enumerate() {
        let a_row = a.row(row0 + i);
        for (j, slot) in out_row.iter_mut().enumerate() {
            let mut sum = 0i32;
            for k in 0..m {
                sum = sum.wrapping_add(a_row[k].wrapping_mul(b.row(k)[j]));
            }
            *slot = sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_concrete_2x4_4x2() {
        let a = Matrix::from_vec(2, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let b = Matrix::from_vec(4, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[50, 60, 114, 140]);
    }

    #[test]
    fn test_identity() {
        let a = Matrix::from_fn(4, 4, |i, j| (i * 4 + j) as i32);
        let c = multiply(&a, &Matrix::identity(4)).unwrap();
        assert_eq!(c, a);
    }

    #[test]
    fn test_result_shape() {
        let a = Matrix::zeros(3, 5);
        let b = Matrix::zeros(5, 7);
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (3, 7));
    }

    #[test]
    fn test_conformability_error() {
        let a = Matrix::zeros(2, 4);
        let b = Matrix::zeros(3, 2);
        assert!(matches!(
            multiply(&a, &b),
            Err(Error::Conformability { left_cols: 4, right_rows: 3, .. })
        ));
    }

    #[test]
    fn test_zero_dimension_operands() {
        let a = Matrix::zeros(0, 4);
        let b = Matrix::zeros(4, 3);
        assert_eq!(multiply(&a, &b).unwrap().shape(), (0, 3));

        // Empty inner dimension: every element is an empty sum.
        let a = Matrix::from_vec(2, 0, vec![]).unwrap();
        let b = Matrix::from_vec(0, 2, vec![]).unwrap();
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert!(c.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_wrapping_overflow() {
        let a = Matrix::from_vec(1, 2, vec![i32::MAX, i32::MAX]).unwrap();
        let b = Matrix::from_vec(2, 1, vec![2, 3]).unwrap();
        let c = multiply(&a, &b).unwrap();
        let expected = i32::MAX
            .wrapping_mul(2)
            .wrapping_add(i32::MAX.wrapping_mul(3));
        assert_eq!(c.as_slice(), &[expected]);
    }
}
