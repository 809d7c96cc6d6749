//! Thread-parallel wrapper: row-partitioned multiplication
//!
//! Splits the output rows into contiguous, non-overlapping bands, one per
//! worker, and computes each band independently with the chosen inner
//! kernel. Bands are write-disjoint slices of the result buffer, so no
//! synchronization is needed on the output; the inputs are shared
//! read-only across workers without copying.
//!
//! The call is synchronous: the worker pool is built per call with exactly
//! the requested thread count and every band completes before the wrapper
//! returns. Output is bit-identical to single-threaded execution of the
//! same inner kernel for any worker count, because every element of C is
//! written by exactly one worker exactly once.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::kernels::{auto, chunk, trivial};
use crate::matrix::Matrix;

/// Inner kernel executed per row band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKernel {
    /// Reference (i, j, k) loop
    Trivial,
    /// Cache-blocked kernel
    Chunk,
    /// Auto-vectorized transposed dot products
    Auto,
}

/// Worker count matching the host's available parallelism
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Row-parallel multiplication with an explicit worker count
///
/// A worker count of zero is treated as one; counts larger than the row
/// count are clamped, so degenerate configurations (more workers than
/// rows, zero-row operands) complete without deadlock or out-of-bounds
/// access. The row-band kernels are infallible once the shape contract
/// has passed, so the only failure mode after validation is worker-pool
/// construction.
///
/// # Errors
///
/// Returns [`Error::Conformability`] if `a.cols() != b.rows()`, or
/// [`Error::ThreadPool`] if the worker pool cannot be built.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(a, b), fields(rows = a.rows(), cols = b.cols()))
)]
pub fn multiply(a: &Matrix, b: &Matrix, inner: RowKernel, workers: usize) -> Result<Matrix> {
    let mut c = Matrix::product_buffer(a, b)?;
    let rows = a.rows();
    let p = b.cols();
    if rows == 0 || p == 0 {
        return Ok(c);
    }

    let workers = workers.clamp(1, rows);
    if workers == 1 {
        run_band(a, b, inner, 0, c.as_mut_slice());
        return Ok(c);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    let rows_per_worker = rows.div_ceil(workers);
    let band = rows_per_worker * p;
    let out = c.as_mut_slice();

    match inner {
        RowKernel::Trivial => pool.install(|| {
            out.par_chunks_mut(band).enumerate().for_each(|(w, rows_out)| {
                trivial::accumulate_rows(a, b, w * rows_per_worker, rows_out);
            });
        }),
        RowKernel::Chunk => pool.install(|| {
            out.par_chunks_mut(band).enumerate().for_each(|(w, rows_out)| {
                chunk::accumulate_rows(a, b, w * rows_per_worker, rows_out);
            });
        }),
        RowKernel::Auto => {
            // Transpose once; workers share the copy read-only.
            let bt = b.transpose();
            pool.install(|| {
                out.par_chunks_mut(band).enumerate().for_each(|(w, rows_out)| {
                    auto::accumulate_rows(a, &bt, w * rows_per_worker, rows_out);
                });
            });
        }
    }
    Ok(c)
}

fn run_band(a: &Matrix, b: &Matrix, inner: RowKernel, row0: usize, out: &mut [i32]) {
    match inner {
        RowKernel::Trivial => trivial::accumulate_rows(a, b, row0, out),
        RowKernel::Chunk => chunk::accumulate_rows(a, b, row0, out),
        RowKernel::Auto => {
            let bt = b.transpose();
            auto::accumulate_rows(a, &bt, row0, out);
        }
    }
}
