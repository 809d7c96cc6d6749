//! Kernel Correctness Suite
//!
//! Every strategy must agree with the schoolbook reference kernel
//! element-for-element, with zero tolerance: all operands and accumulators
//! are integral, so there is no rounding to hide behind. Shapes cover
//! non-square, non-power-of-two, and block-boundary-straddling sizes.

use proptest::prelude::*;
use molino::{multiply, parallel, Matrix, Strategy};
use molino::parallel::RowKernel;

const PROPTEST_CASES: u32 = 64;

/// Deterministic pseudo-random fill in [-10, 10)
fn noise(seed: usize) -> i32 {
    let h = (seed as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 33;
    (h % 20) as i32 - 10
}

fn sample(n: usize, m: usize, p: usize) -> (Matrix, Matrix) {
    let a = Matrix::from_fn(n, m, |i, j| noise(i * m + j));
    let b = Matrix::from_fn(m, p, |i, j| noise(1_000_000 + i * p + j));
    (a, b)
}

// ============================================================================
// ORACLE AGREEMENT
// ============================================================================

#[test]
fn all_strategies_agree_with_reference_across_shape_grid() {
    const SIZES: [usize; 8] = [1, 2, 3, 5, 16, 17, 64, 65];
    for &n in &SIZES {
        for &m in &SIZES {
            for &p in &SIZES {
                let (a, b) = sample(n, m, p);
                let oracle = multiply(&a, &b, Strategy::Trivial).unwrap();
                for strategy in Strategy::ALL {
                    if strategy == Strategy::Trivial || !strategy.is_available() {
                        continue;
                    }
                    let c = multiply(&a, &b, strategy).unwrap();
                    assert_eq!(c, oracle, "{} at {n}x{m}x{p}", strategy.name());
                }
            }
        }
    }
}

#[test]
fn all_strategies_agree_on_512_spanning_shapes() {
    for &(n, m, p) in &[(512, 16, 5), (2, 512, 3), (64, 512, 17)] {
        let (a, b) = sample(n, m, p);
        let oracle = multiply(&a, &b, Strategy::Trivial).unwrap();
        for strategy in Strategy::ALL {
            if !strategy.is_available() {
                continue;
            }
            let c = multiply(&a, &b, strategy).unwrap();
            assert_eq!(c, oracle, "{} at {n}x{m}x{p}", strategy.name());
        }
    }
}

#[test]
fn random_square_agreement_256() {
    let (a, b) = sample(256, 256, 256);
    let oracle = multiply(&a, &b, Strategy::Ordered).unwrap();
    for strategy in Strategy::ALL {
        if strategy == Strategy::Ordered || !strategy.is_available() {
            continue;
        }
        assert_eq!(
            multiply(&a, &b, strategy).unwrap(),
            oracle,
            "{}",
            strategy.name()
        );
    }
}

#[test]
#[ignore = "large; run with --ignored in release builds"]
fn random_square_agreement_1024() {
    let (a, b) = sample(1024, 1024, 1024);
    let oracle = multiply(&a, &b, Strategy::Ordered).unwrap();
    for strategy in Strategy::ALL {
        if strategy == Strategy::Ordered || !strategy.is_available() {
            continue;
        }
        assert_eq!(
            multiply(&a, &b, strategy).unwrap(),
            oracle,
            "{}",
            strategy.name()
        );
    }
}

#[test]
fn concrete_2x4_4x2_scenario() {
    // Inner dimension 4 does not fill a full vector on wide instruction
    // sets; every kernel must still reproduce the exact product.
    let a = Matrix::from_vec(2, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    let b = Matrix::from_vec(4, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    for strategy in Strategy::ALL {
        if !strategy.is_available() {
            continue;
        }
        let c = multiply(&a, &b, strategy).unwrap();
        assert_eq!(c.as_slice(), &[50, 60, 114, 140], "{}", strategy.name());
    }
}

// ============================================================================
// SHAPE CONTRACT
// ============================================================================

#[test]
fn result_shape_always_matches_operands() {
    for &(n, m, p) in &[(1, 7, 3), (5, 1, 9), (33, 32, 31)] {
        let (a, b) = sample(n, m, p);
        for strategy in Strategy::ALL {
            if !strategy.is_available() {
                continue;
            }
            let c = multiply(&a, &b, strategy).unwrap();
            assert_eq!(c.rows(), a.rows(), "{}", strategy.name());
            assert_eq!(c.cols(), b.cols(), "{}", strategy.name());
        }
    }
}

#[test]
fn conformability_violation_for_every_strategy() {
    let a = Matrix::zeros(2, 4);
    let b = Matrix::zeros(3, 2);
    for strategy in Strategy::ALL {
        if !strategy.is_available() {
            continue;
        }
        assert_eq!(
            multiply(&a, &b, strategy),
            Err(molino::Error::Conformability {
                left_rows: 2,
                left_cols: 4,
                right_rows: 3,
                right_cols: 2,
            }),
            "{}",
            strategy.name()
        );
    }
}

#[test]
fn zero_dimension_shapes_yield_empty_results() {
    for strategy in Strategy::ALL {
        if !strategy.is_available() {
            continue;
        }
        let c = multiply(&Matrix::zeros(0, 4), &Matrix::zeros(4, 3), strategy).unwrap();
        assert_eq!(c.shape(), (0, 3), "{}", strategy.name());

        let c = multiply(&Matrix::zeros(3, 0), &Matrix::zeros(0, 2), strategy).unwrap();
        assert_eq!(c.shape(), (3, 2), "{}", strategy.name());
        assert!(c.as_slice().iter().all(|&v| v == 0), "{}", strategy.name());
    }
}

// ============================================================================
// CAPABILITY CONSISTENCY
// ============================================================================

#[test]
fn successful_kernel_run_implies_true_predicate() {
    let (a, b) = sample(4, 8, 4);
    for strategy in Strategy::ALL {
        if multiply(&a, &b, strategy).is_ok() {
            assert!(strategy.is_available(), "{}", strategy.name());
        }
    }
}

#[test]
fn unavailable_strategy_reports_capability_violation() {
    let (a, b) = sample(4, 8, 4);
    for strategy in Strategy::ALL {
        if strategy.is_available() {
            continue;
        }
        assert!(
            matches!(
                multiply(&a, &b, strategy),
                Err(molino::Error::CapabilityViolation { .. })
            ),
            "{}",
            strategy.name()
        );
    }
}

#[test]
fn registry_reports_are_stable() {
    assert_eq!(molino::isa::full_info(), molino::isa::full_info());
    assert_eq!(molino::isa::has_avx2(), molino::isa::has_avx2());
}

// ============================================================================
// PARALLEL WRAPPER
// ============================================================================

#[test]
fn parallel_output_invariant_under_worker_count() {
    let (a, b) = sample(19, 41, 11);
    for inner in [RowKernel::Trivial, RowKernel::Chunk, RowKernel::Auto] {
        let single = parallel::multiply(&a, &b, inner, 1).unwrap();
        for workers in [2, 8, a.rows() + 1] {
            let c = parallel::multiply(&a, &b, inner, workers).unwrap();
            assert_eq!(c, single, "inner {inner:?}, workers {workers}");
        }
    }
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    /// Scalar, blocked, auto-vectorized, and parallel kernels all agree
    /// with the reference for arbitrary shapes and values.
    #[test]
    fn prop_kernels_agree_with_reference(
        n in 1usize..24,
        m in 1usize..40,
        p in 1usize..24,
        seed in any::<i32>(),
        workers in 1usize..9,
    ) {
        let a = Matrix::from_fn(n, m, |i, j| noise((i * m + j) ^ seed as usize));
        let b = Matrix::from_fn(m, p, |i, j| seed.wrapping_add(noise(i * p + j)));
        let oracle = multiply(&a, &b, Strategy::Trivial).unwrap();

        prop_assert_eq!(&multiply(&a, &b, Strategy::Ordered).unwrap(), &oracle);
        prop_assert_eq!(&multiply(&a, &b, Strategy::Chunk).unwrap(), &oracle);
        prop_assert_eq!(&multiply(&a, &b, Strategy::AutoSimd).unwrap(), &oracle);
        prop_assert_eq!(
            &parallel::multiply(&a, &b, RowKernel::Chunk, workers).unwrap(),
            &oracle
        );
    }

    /// Wraparound semantics are identical across kernels even when every
    /// product overflows.
    #[test]
    fn prop_wrapping_agreement_on_extreme_values(
        n in 1usize..8,
        m in 1usize..24,
        p in 1usize..8,
    ) {
        let a = Matrix::from_fn(n, m, |i, j| {
            if (i + j) % 2 == 0 { i32::MAX - (j as i32) } else { i32::MIN + (i as i32) }
        });
        let b = Matrix::from_fn(m, p, |i, j| {
            if (i * p + j) % 3 == 0 { i32::MIN + (j as i32) } else { i32::MAX - (i as i32) }
        });
        let oracle = multiply(&a, &b, Strategy::Trivial).unwrap();
        for strategy in Strategy::ALL {
            if !strategy.is_available() {
                continue;
            }
            prop_assert_eq!(&multiply(&a, &b, strategy).unwrap(), &oracle);
        }
    }

    /// Transposition is lossless: shape swapped, double transpose is the
    /// identity, and every element lands at its mirrored index.
    #[test]
    fn prop_transpose_lossless(
        rows in 0usize..32,
        cols in 0usize..32,
    ) {
        let m = Matrix::from_fn(rows, cols, |i, j| noise(i * cols + j));
        let t = m.transpose();
        prop_assert_eq!(t.shape(), (cols, rows));
        for i in 0..rows {
            for j in 0..cols {
                prop_assert_eq!(m.get(i, j), t.get(j, i));
            }
        }
        prop_assert_eq!(t.transpose(), m);
    }
}
