//! Kernel implementations and the dispatch table
//!
//! Every kernel implements the same contract: borrow two matrices, return
//! a freshly owned product or an error. The set of strategies is closed
//! and statically enumerated — which vectorized kernels are legal depends
//! on the compile-time target and the host CPU, so there is no runtime
//! plugin registration, only [`Strategy`] variants guarded by capability
//! predicates.
//!
//! # Kernels
//!
//! - `trivial`: (i, j, k) schoolbook loop, the correctness oracle
//! - `ordered`: (i, k, j) memory-order kernel, plus a transposed-B form
//! - `chunk`: cache-blocked kernel with truncated edge blocks
//! - `auto`: compiler-auto-vectorized transposed dot products
//! - `sse41` / `avx2` / `avx512`: explicit x86 integer SIMD widths
//! - `neon`: ARM 128-bit fused multiply-accumulate
//! - `sme`: ARM matrix-extension tile kernel

pub mod auto;
pub mod chunk;
pub mod ordered;
pub mod sme;
pub mod trivial;

#[cfg(target_arch = "x86_64")]
pub mod avx2;
#[cfg(target_arch = "x86_64")]
pub mod avx512;
#[cfg(target_arch = "x86_64")]
pub mod sse41;

#[cfg(target_arch = "aarch64")]
pub mod neon;

use crate::error::Result;
use crate::isa;
use crate::matrix::Matrix;
use crate::parallel::{self, RowKernel};

/// Uniform kernel contract: `(A, B) -> C`, synchronous, newly owned result
pub type KernelFn = fn(&Matrix, &Matrix) -> Result<Matrix>;

/// A named multiplication strategy bound to one concrete kernel
///
/// The multithreaded variants run on a worker pool sized to the host's
/// available parallelism; [`crate::parallel::multiply`] takes an explicit
/// worker count instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Reference (i, j, k) triple loop
    Trivial,
    /// Memory-ordered (i, k, j) loop
    Ordered,
    /// Cache-blocked kernel
    Chunk,
    /// Compiler-auto-vectorized kernel
    AutoSimd,
    /// Widest explicitly vectorized kernel the binary was compiled for
    Simd,
    /// x86 128-bit integer SIMD (SSE4.1)
    SimdSse41,
    /// x86 256-bit integer SIMD (AVX2)
    SimdAvx2,
    /// x86 512-bit integer SIMD (AVX-512F)
    SimdAvx512,
    /// ARM 128-bit integer SIMD (NEON)
    SimdNeon,
    /// ARM matrix-extension tile kernel (SME)
    SimdSme,
    /// Row-parallel reference kernel
    Multithread,
    /// Row-parallel cache-blocked kernel
    MultithreadChunk,
    /// Row-parallel auto-vectorized kernel
    MultithreadSimd,
}

impl Strategy {
    /// Every strategy, in dispatch-table order
    pub const ALL: [Strategy; 13] = [
        Strategy::Trivial,
        Strategy::Ordered,
        Strategy::Chunk,
        Strategy::AutoSimd,
        Strategy::Simd,
        Strategy::SimdSse41,
        Strategy::SimdAvx2,
        Strategy::SimdAvx512,
        Strategy::SimdNeon,
        Strategy::SimdSme,
        Strategy::Multithread,
        Strategy::MultithreadChunk,
        Strategy::MultithreadSimd,
    ];

    /// The strategy's wire name, as exposed to binding layers
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Trivial => "trivial",
            Strategy::Ordered => "ordered",
            Strategy::Chunk => "chunk",
            Strategy::AutoSimd => "auto_simd",
            Strategy::Simd => "simd",
            Strategy::SimdSse41 => "simd_sse41",
            Strategy::SimdAvx2 => "simd_avx2",
            Strategy::SimdAvx512 => "simd_avx512",
            Strategy::SimdNeon => "simd_neon",
            Strategy::SimdSme => "simd_arm_sme",
            Strategy::Multithread => "multithread",
            Strategy::MultithreadChunk => "multithread_chunk",
            Strategy::MultithreadSimd => "multithread_simd",
        }
    }

    /// Looks a strategy up by its wire name
    pub fn from_name(name: &str) -> Option<Strategy> {
        Strategy::ALL.into_iter().find(|s| s.name() == name)
    }

    /// The concrete kernel bound to this strategy
    pub fn kernel(self) -> KernelFn {
        match self {
            Strategy::Trivial => trivial::multiply,
            Strategy::Ordered => ordered::multiply,
            Strategy::Chunk => chunk::multiply,
            Strategy::AutoSimd => auto::multiply,
            Strategy::Simd => simd,
            Strategy::SimdSse41 => {
                #[cfg(target_arch = "x86_64")]
                {
                    sse41::multiply
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    off_target::sse41
                }
            }
            Strategy::SimdAvx2 => {
                #[cfg(target_arch = "x86_64")]
                {
                    avx2::multiply
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    off_target::avx2
                }
            }
            Strategy::SimdAvx512 => {
                #[cfg(target_arch = "x86_64")]
                {
                    avx512::multiply
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    off_target::avx512
                }
            }
            Strategy::SimdNeon => {
                #[cfg(target_arch = "aarch64")]
                {
                    neon::multiply
                }
                #[cfg(not(target_arch = "aarch64"))]
                {
                    off_target::neon
                }
            }
            Strategy::SimdSme => sme::multiply,
            Strategy::Multithread => multithread,
            Strategy::MultithreadChunk => multithread_chunk,
            Strategy::MultithreadSimd => multithread_simd,
        }
    }

    /// Capability predicate: is this strategy legal on this binary/host?
    ///
    /// Invoking the kernel of an unavailable strategy returns
    /// [`crate::Error::CapabilityViolation`] rather than falling back.
    pub fn is_available(self) -> bool {
        match self {
            Strategy::Trivial
            | Strategy::Ordered
            | Strategy::Chunk
            | Strategy::AutoSimd
            | Strategy::Multithread
            | Strategy::MultithreadChunk
            | Strategy::MultithreadSimd => true,
            Strategy::SimdSse41 => isa::has_sse41(),
            Strategy::SimdAvx2 => isa::has_avx2(),
            Strategy::SimdAvx512 => isa::has_avx512(),
            Strategy::SimdNeon => isa::has_neon(),
            Strategy::SimdSme => isa::has_sme(),
            // Mirrors the compile-time resolution in `simd`.
            Strategy::Simd => {
                if cfg!(target_feature = "avx512f") {
                    isa::has_avx512()
                } else if cfg!(target_feature = "avx2") {
                    isa::has_avx2()
                } else if cfg!(target_feature = "sse4.1") {
                    isa::has_sse41()
                } else if cfg!(target_arch = "aarch64") {
                    isa::has_neon()
                } else {
                    true
                }
            }
        }
    }
}

/// Widest explicitly vectorized kernel the binary was compiled for
///
/// Resolution happens at compile time, matching the closed kernel set: a
/// binary targeting AVX-512 dispatches to the 512-bit kernel, an AVX2
/// target to the 256-bit kernel, and so on. Binaries built without any
/// explicit x86 vector target (or on architectures without an explicit
/// kernel here) use the auto-vectorized path, which is what the compiler
/// emits for them anyway.
fn simd(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    #[cfg(target_arch = "x86_64")]
    {
        if cfg!(target_feature = "avx512f") {
            return avx512::multiply(a, b);
        }
        if cfg!(target_feature = "avx2") {
            return avx2::multiply(a, b);
        }
        if cfg!(target_feature = "sse4.1") {
            return sse41::multiply(a, b);
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        neon::multiply(a, b)
    }
    #[cfg(not(target_arch = "aarch64"))]
    {
        auto::multiply(a, b)
    }
}

fn multithread(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    parallel::multiply(a, b, RowKernel::Trivial, parallel::default_workers())
}

fn multithread_chunk(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    parallel::multiply(a, b, RowKernel::Chunk, parallel::default_workers())
}

fn multithread_simd(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    parallel::multiply(a, b, RowKernel::Auto, parallel::default_workers())
}

/// Stubs for ISA kernels the target architecture cannot compile; they
/// report the same capability violation their real counterparts would.
mod off_target {
    use super::{Matrix, Result};
    use crate::error::Error;

    #[cfg(not(target_arch = "x86_64"))]
    pub fn sse41(_a: &Matrix, _b: &Matrix) -> Result<Matrix> {
        Err(Error::CapabilityViolation {
            kernel: "simd_sse41",
            required: "sse4.1",
        })
    }

    #[cfg(not(target_arch = "x86_64"))]
    pub fn avx2(_a: &Matrix, _b: &Matrix) -> Result<Matrix> {
        Err(Error::CapabilityViolation {
            kernel: "simd_avx2",
            required: "avx2",
        })
    }

    #[cfg(not(target_arch = "x86_64"))]
    pub fn avx512(_a: &Matrix, _b: &Matrix) -> Result<Matrix> {
        Err(Error::CapabilityViolation {
            kernel: "simd_avx512",
            required: "avx512f",
        })
    }

    #[cfg(not(target_arch = "aarch64"))]
    pub fn neon(_a: &Matrix, _b: &Matrix) -> Result<Matrix> {
        Err(Error::CapabilityViolation {
            kernel: "simd_neon",
            required: "neon",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for strategy in Strategy::ALL {
            assert_eq!(Strategy::from_name(strategy.name()), Some(strategy));
        }
        assert_eq!(Strategy::from_name("does_not_exist"), None);
    }

    #[test]
    fn test_scalar_strategies_always_available() {
        assert!(Strategy::Trivial.is_available());
        assert!(Strategy::Ordered.is_available());
        assert!(Strategy::Chunk.is_available());
        assert!(Strategy::AutoSimd.is_available());
        assert!(Strategy::Multithread.is_available());
    }

    #[test]
    fn test_available_strategies_match_oracle() {
        let a = Matrix::from_vec(2, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let b = Matrix::from_vec(4, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        for strategy in Strategy::ALL {
            if !strategy.is_available() {
                continue;
            }
            let c = strategy.kernel()(&a, &b).unwrap();
            assert_eq!(c.as_slice(), &[50, 60, 114, 140], "{}", strategy.name());
        }
    }

    #[test]
    fn test_unavailable_strategies_report_violation() {
        use crate::error::Error;
        let a = Matrix::identity(4);
        for strategy in Strategy::ALL {
            if strategy.is_available() {
                continue;
            }
            assert!(
                matches!(
                    strategy.kernel()(&a, &a),
                    Err(Error::CapabilityViolation { .. })
                ),
                "{}",
                strategy.name()
            );
        }
    }
}
