//! Dense row-major `i32` matrices and the shape/buffer contract
//!
//! Every kernel in this crate speaks the same language: two borrowed
//! [`Matrix`] operands in, one freshly owned [`Matrix`] out. The shape
//! validation and result allocation shared by all kernels lives here in
//! [`Matrix::product_buffer`], so no kernel re-validates dimensions.
//!
//! # Storage Layout
//!
//! Data is stored in row-major (C-style) order: for a 2x3 matrix
//! `[[a, b, c], [d, e, f]]` the backing vector is `[a, b, c, d, e, f]`.
//!
//! # Arithmetic Semantics
//!
//! All accumulation in this crate is modulo 2^32: scalar paths use
//! `wrapping_mul`/`wrapping_add`, which matches the wraparound behavior of
//! integer SIMD lanes, so scalar and vector kernels agree bit-for-bit even
//! on overflowing inputs.

use crate::error::{Error, Result};

/// A dense 2-D matrix of `i32` with row-major storage
///
/// Invariant: `data.len() == rows * cols`. Zero-row and zero-column
/// matrices are valid; their backing storage is empty.
///
/// # Example
///
/// ```
/// use molino::Matrix;
///
/// let m = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
/// assert_eq!(m.get(0, 1), Some(&2));
/// assert_eq!(m.shape(), (2, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

impl Matrix {
    /// Creates a matrix filled with zeros
    ///
    /// # Example
    ///
    /// ```
    /// use molino::Matrix;
    ///
    /// let m = Matrix::zeros(3, 4);
    /// assert_eq!(m.rows(), 3);
    /// assert_eq!(m.cols(), 4);
    /// assert_eq!(m.get(1, 1), Some(&0));
    /// ```
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Creates a matrix from a vector of data in row-major order
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<i32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidInput(format!(
                "data length {} does not match matrix dimensions {}x{} (expected {})",
                data.len(),
                rows,
                cols,
                rows * cols
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Creates a matrix by copying a slice of row-major data
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `data.len() != rows * cols`.
    pub fn from_slice(rows: usize, cols: usize, data: &[i32]) -> Result<Self> {
        Self::from_vec(rows, cols, data.to_vec())
    }

    /// Creates a matrix by evaluating `f(row, col)` for every element
    ///
    /// # Example
    ///
    /// ```
    /// use molino::Matrix;
    ///
    /// let m = Matrix::from_fn(2, 3, |i, j| (i * 3 + j) as i32);
    /// assert_eq!(m.get(1, 2), Some(&5));
    /// ```
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> i32) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Matrix { rows, cols, data }
    }

    /// Creates an identity matrix (square, 1s on the diagonal)
    pub fn identity(n: usize) -> Self {
        let mut data = vec![0; n * n];
        for i in 0..n {
            data[i * n + i] = 1;
        }
        Matrix {
            rows: n,
            cols: n,
            data,
        }
    }

    /// Returns the number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the shape as `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Gets a reference to the element at `(row, col)`, or `None` out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&i32> {
        if row >= self.rows || col >= self.cols {
            None
        } else {
            self.data.get(row * self.cols + col)
        }
    }

    /// Gets a mutable reference to the element at `(row, col)`, or `None` out of bounds
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut i32> {
        if row >= self.rows || col >= self.cols {
            None
        } else {
            let idx = row * self.cols + col;
            self.data.get_mut(idx)
        }
    }

    /// Returns row `i` as a contiguous slice
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[i32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Returns a reference to the underlying row-major data
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    /// Returns a mutable reference to the underlying row-major data
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.data
    }

    /// Returns the transposed matrix
    ///
    /// Every element is relocated exactly once and the shape is swapped;
    /// `m.transpose().transpose() == m` for all matrices.
    ///
    /// # Example
    ///
    /// ```
    /// use molino::Matrix;
    ///
    /// let m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// let t = m.transpose();
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t.get(2, 0), Some(&3));
    /// assert_eq!(t.get(0, 1), Some(&4));
    /// ```
    pub fn transpose(&self) -> Matrix {
        let mut data = vec![0; self.rows * self.cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Shape/buffer contract shared by every kernel entry point
    ///
    /// Validates that `a` and `b` are conformable (`a.cols == b.rows`) and
    /// allocates the zero-initialized `a.rows x b.cols` result the kernel
    /// will populate. Zero-dimension operands are conformable whenever the
    /// inner dimensions agree; they yield a valid empty result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conformability`] carrying all four operand
    /// dimensions when `a.cols != b.rows`. No storage is allocated on
    /// failure.
    pub fn product_buffer(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        if a.cols != b.rows {
            return Err(Error::Conformability {
                left_rows: a.rows,
                left_cols: a.cols,
                right_rows: b.rows,
                right_cols: b.cols,
            });
        }
        Ok(Matrix::zeros(a.rows, b.cols))
    }
}
