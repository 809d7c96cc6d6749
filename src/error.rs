//! Error types for molino operations

use thiserror::Error;

/// Result type for molino operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during matrix multiplication
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Operand shapes are not conformable (`A.cols != B.rows`)
    #[error(
        "conformability failure: {left_rows}x{left_cols} * {right_rows}x{right_cols} \
         (inner dimensions {left_cols} and {right_rows} must match)"
    )]
    Conformability {
        /// Rows of the left operand
        left_rows: usize,
        /// Columns of the left operand
        left_cols: usize,
        /// Rows of the right operand
        right_rows: usize,
        /// Columns of the right operand
        right_cols: usize,
    },

    /// An ISA-specific kernel was invoked while its capability predicate is false
    ///
    /// This is a programming-contract violation, not a degraded-performance
    /// condition: the kernel never falls back silently, because a fallback
    /// would hide a build/deployment mismatch.
    #[error("capability violation: kernel `{kernel}` requires {required}, which this host does not support")]
    CapabilityViolation {
        /// Name of the offending kernel
        kernel: &'static str,
        /// Instruction-set extension the kernel requires
        required: &'static str,
    },

    /// Input data does not match the declared matrix dimensions
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The parallel wrapper could not build its worker pool
    #[error("worker pool error: {0}")]
    ThreadPool(String),
}
