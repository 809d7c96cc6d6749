//! Molino: integer dense-matrix multiplication engine
//!
//! **Molino** (Spanish: "mill") multiplies dense `i32` matrices through
//! several interchangeable strategies behind one uniform `(A, B) -> C`
//! contract:
//!
//! 1. **Scalar** - reference triple loop, memory-ordered, cache-blocked
//! 2. **Vectorized** - explicit SSE4.1/AVX2/AVX-512/NEON kernels, a
//!    compiler-auto-vectorized kernel, and an ARM SME tile kernel
//! 3. **Multithreaded** - a row-parallel wrapper composable with any of
//!    the above
//!
//! # Design Principles
//!
//! - **Explicit strategy selection**: the caller picks a [`Strategy`];
//!   nothing silently falls back, so a build/deployment mismatch surfaces
//!   as [`Error::CapabilityViolation`] instead of hidden slow paths
//! - **One oracle**: every kernel agrees bit-for-bit with the schoolbook
//!   reference, for arbitrary non-square, non-power-of-two shapes
//! - **Zero unsafe in the public API**: `unsafe` is isolated inside the
//!   ISA kernels, each behind a capability predicate
//!
//! # Quick Start
//!
//! ```
//! use molino::{multiply, Matrix, Strategy};
//!
//! let a = Matrix::from_vec(2, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
//! let b = Matrix::from_vec(4, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
//!
//! let c = multiply(&a, &b, Strategy::Chunk).unwrap();
//! assert_eq!(c.as_slice(), &[50, 60, 114, 140]);
//! ```
//!
//! The [`isa`] module reports which instruction sets the binary was built
//! for and which the host CPU supports:
//!
//! ```
//! println!("{}", molino::isa::full_info());
//! if molino::Strategy::SimdAvx2.is_available() {
//!     // the 256-bit kernel is legal on this host
//! }
//! ```

pub mod error;
pub mod isa;
pub mod kernels;
pub mod matrix;
pub mod parallel;

pub use error::{Error, Result};
pub use kernels::{KernelFn, Strategy};
pub use matrix::Matrix;

/// Multiplies two matrices with the chosen strategy
///
/// Shape validation and result allocation are shared by all strategies:
/// conformability is checked exactly once, before any arithmetic, and the
/// result is returned by ownership transfer.
///
/// # Errors
///
/// - [`Error::Conformability`] if `a.cols() != b.rows()`
/// - [`Error::CapabilityViolation`] if the strategy's capability predicate
///   is false on this binary/host combination
///
/// # Example
///
/// ```
/// use molino::{multiply, Matrix, Strategy};
///
/// let a = Matrix::identity(3);
/// let b = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as i32);
/// let c = multiply(&a, &b, Strategy::Trivial).unwrap();
/// assert_eq!(c, b);
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(a, b), fields(
        strategy = strategy.name(),
        dims = %format!("{}x{} @ {}x{}", a.rows(), a.cols(), b.rows(), b.cols()),
    ))
)]
pub fn multiply(a: &Matrix, b: &Matrix, strategy: Strategy) -> Result<Matrix> {
    strategy.kernel()(a, b)
}
