//! ISA capability registry
//!
//! Reports which vector instruction sets the running binary was compiled
//! for (`compiled_*` predicates, resolved at compile time from the target
//! configuration) and which the host CPU supports (`has_*` predicates,
//! resolved once at startup from runtime feature detection).
//!
//! Kernel legality is gated on the `has_*` predicates: every ISA kernel in
//! this crate is compiled with `#[target_feature]` per function, so a
//! kernel is safe to invoke exactly when the host CPU supports its
//! instruction set, regardless of the baseline the binary targets. The
//! `compiled_*` predicates and string queries exist for diagnostics, so a
//! deployment can verify what the binary was actually built to emit.
//!
//! All queries are pure and stable for the lifetime of the process: the
//! host snapshot is computed on first use and never invalidated.

use std::sync::OnceLock;

/// Host CPU capability snapshot, computed once per process
#[derive(Debug, Clone, Copy)]
struct HostCaps {
    sse2: bool,
    sse41: bool,
    avx: bool,
    avx2: bool,
    avx512: bool,
    neon: bool,
    fma: bool,
    sme: bool,
}

static HOST: OnceLock<HostCaps> = OnceLock::new();

fn host() -> &'static HostCaps {
    HOST.get_or_init(HostCaps::detect)
}

impl HostCaps {
    #[cfg(target_arch = "x86_64")]
    fn detect() -> Self {
        HostCaps {
            sse2: is_x86_feature_detected!("sse2"),
            sse41: is_x86_feature_detected!("sse4.1"),
            avx: is_x86_feature_detected!("avx"),
            avx2: is_x86_feature_detected!("avx2"),
            avx512: is_x86_feature_detected!("avx512f"),
            neon: false,
            fma: is_x86_feature_detected!("fma"),
            sme: false,
        }
    }

    #[cfg(target_arch = "aarch64")]
    fn detect() -> Self {
        HostCaps {
            sse2: false,
            sse41: false,
            avx: false,
            avx2: false,
            avx512: false,
            neon: std::arch::is_aarch64_feature_detected!("neon"),
            // No stable runtime probe for SME; report the compile-time target.
            sme: cfg!(target_feature = "sme"),
            fma: false,
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    fn detect() -> Self {
        HostCaps {
            sse2: false,
            sse41: false,
            avx: false,
            avx2: false,
            avx512: false,
            neon: false,
            fma: false,
            sme: false,
        }
    }
}

/// True if the host CPU supports SSE2 (x86_64 baseline)
pub fn has_sse2() -> bool {
    host().sse2
}

/// True if the host CPU supports SSE4.1
///
/// The 128-bit integer kernel is gated here rather than on SSE2 because
/// packed 32-bit multiply-low (`pmulld`) first appeared in SSE4.1.
pub fn has_sse41() -> bool {
    host().sse41
}

/// True if the host CPU supports AVX
pub fn has_avx() -> bool {
    host().avx
}

/// True if the host CPU supports AVX2
pub fn has_avx2() -> bool {
    host().avx2
}

/// True if the host CPU supports AVX-512 (foundation subset)
pub fn has_avx512() -> bool {
    host().avx512
}

/// True if the host CPU supports ARM NEON
pub fn has_neon() -> bool {
    host().neon
}

/// True if the host CPU supports FMA
///
/// x86 FMA covers floating-point only; the integer kernels document their
/// multiply+add pairing instead. NEON's `vmlaq_s32` is the fused integer
/// form and is covered by [`has_neon`].
pub fn has_fma() -> bool {
    host().fma
}

/// True if the ARM SME matrix extension is available to this binary
pub fn has_sme() -> bool {
    host().sme
}

/// True if the binary targets SSE2
pub const fn compiled_sse2() -> bool {
    cfg!(target_feature = "sse2")
}

/// True if the binary targets SSE4.1
pub const fn compiled_sse41() -> bool {
    cfg!(target_feature = "sse4.1")
}

/// True if the binary targets AVX
pub const fn compiled_avx() -> bool {
    cfg!(target_feature = "avx")
}

/// True if the binary targets AVX2
pub const fn compiled_avx2() -> bool {
    cfg!(target_feature = "avx2")
}

/// True if the binary targets AVX-512F
pub const fn compiled_avx512() -> bool {
    cfg!(target_feature = "avx512f")
}

/// True if the binary targets NEON
pub const fn compiled_neon() -> bool {
    cfg!(target_feature = "neon")
}

/// True if the binary targets FMA
pub const fn compiled_fma() -> bool {
    cfg!(target_feature = "fma")
}

/// True if the binary targets the ARM SME matrix extension
pub const fn compiled_sme() -> bool {
    cfg!(target_feature = "sme")
}

/// Target architecture and the widest SIMD family the binary was built for
///
/// # Example
///
/// ```
/// let info = molino::isa::target_architecture();
/// assert!(info.starts_with("Architecture: "));
/// ```
pub fn target_architecture() -> String {
    let mut info = format!("Architecture: {}", std::env::consts::ARCH);

    info.push_str(" | SIMD: ");
    let mut features = Vec::new();

    // Widest-first within each family, matching how the binary dispatches.
    if compiled_avx512() {
        features.push("AVX512");
    } else if compiled_avx2() {
        features.push("AVX2");
    } else if compiled_avx() {
        features.push("AVX");
    } else if compiled_sse41() {
        features.push("SSE4.1");
    } else if compiled_sse2() {
        features.push("SSE2");
    }
    if compiled_neon() {
        features.push("NEON");
    }
    if compiled_fma() {
        features.push("FMA");
    }
    if compiled_sme() {
        features.push("SME");
    }

    if features.is_empty() {
        info.push_str("None");
    } else {
        info.push_str(&features.join(" "));
    }
    info
}

/// Identity of the compiler that produced this binary
pub fn compiler_identity() -> String {
    format!("Compiler: {}", env!("MOLINO_RUSTC_VERSION"))
}

/// Build configuration of this binary
pub fn build_configuration() -> String {
    let profile = if cfg!(debug_assertions) {
        "Debug"
    } else {
        "Release"
    };
    let tracing = if cfg!(feature = "tracing") { "Yes" } else { "No" };
    format!("Build: {profile} | Tracing: {tracing}")
}

/// Complete capability report: target, compiler, and build configuration
pub fn full_info() -> String {
    format!(
        "{}\n{}\n{}",
        target_architecture(),
        compiler_identity(),
        build_configuration()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_are_stable() {
        assert_eq!(has_avx2(), has_avx2());
        assert_eq!(has_neon(), has_neon());
        assert_eq!(target_architecture(), target_architecture());
    }

    #[test]
    fn test_target_architecture_names_the_arch() {
        assert!(target_architecture().contains(std::env::consts::ARCH));
    }

    #[test]
    fn test_full_info_has_three_lines() {
        let info = full_info();
        assert_eq!(info.lines().count(), 3);
        assert!(info.contains("Compiler: "));
        assert!(info.contains("Build: "));
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_x86_feature_ladder_is_consistent() {
        // Wider extensions imply the narrower ones on real CPUs.
        if has_avx512() {
            assert!(has_avx2());
        }
        if has_avx2() {
            assert!(has_avx());
        }
        if has_avx() {
            assert!(has_sse41());
        }
        if has_sse41() {
            assert!(has_sse2());
        }
        // SSE2 is the x86_64 baseline.
        assert!(has_sse2());
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_x86_has_no_arm_features() {
        assert!(!has_neon());
        assert!(!has_sme());
    }
}
