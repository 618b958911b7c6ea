//! Oracle and diffusion operator synthesis.
//!
//! Both operators are built over the operand order used by the assembler:
//! the first operand is the most significant bit of the matrix index. For
//! the oracle the data qubits come first and the ancilla last, so index
//! `2s + a` reads "data register holds `s`, ancilla holds `a`".

use std::f64::consts::PI;

use grover_ir::{MAX_MATRIX_QUBITS, UnitaryMatrix};
use num_complex::Complex64;

use crate::error::{GroverError, GroverResult};

/// Oracle `Uf` on `n + 1` qubits: the identity with columns `2s` and
/// `2s + 1` exchanged, i.e. the ancilla flips exactly when the data
/// register holds `s`.
pub fn oracle_matrix(n: u32, s: u64) -> GroverResult<UnitaryMatrix> {
    check_width(n, n.saturating_add(1))?;
    check_marked(n, s)?;

    let mut matrix = UnitaryMatrix::identity(n + 1)?;
    let column = 2 * s as usize;
    matrix.swap_columns(column, column + 1)?;
    Ok(matrix)
}

/// Diffusion operator ("special") on `n` qubits: `-I` except for `+1` at
/// `(0, 0)`.
pub fn diffusion_matrix(n: u32) -> GroverResult<UnitaryMatrix> {
    check_width(n, n)?;

    let dim = 1_usize << n;
    let diagonal = (0..dim).map(|i| {
        if i == 0 {
            Complex64::new(1.0, 0.0)
        } else {
            Complex64::new(-1.0, 0.0)
        }
    });
    Ok(UnitaryMatrix::from_diagonal(diagonal)?)
}

/// Number of oracle/diffusion rounds: `floor(pi * 2^(n/2) / 4)`.
pub fn iteration_count(n: u32) -> u32 {
    (PI * 2f64.powf(f64::from(n) / 2.0) / 4.0).floor() as u32
}

fn check_width(n: u32, width: u32) -> GroverResult<()> {
    if n == 0 {
        return Err(GroverError::NoDataQubits);
    }
    if width > MAX_MATRIX_QUBITS {
        return Err(GroverError::QubitRange {
            requested: width as usize,
            available: MAX_MATRIX_QUBITS as usize,
        });
    }
    Ok(())
}

/// Check `0 <= s < 2^n`.
pub(crate) fn check_marked(n: u32, s: u64) -> GroverResult<()> {
    let in_range = n >= 64 || s < (1_u64 << n);
    if in_range {
        Ok(())
    } else {
        Err(GroverError::MarkedIndexRange {
            marked: s,
            qubits: n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(m: &UnitaryMatrix, row: usize, col: usize) -> f64 {
        let value = m.get(row, col).unwrap();
        assert!(value.im.abs() < 1e-12);
        value.re
    }

    #[test]
    fn test_oracle_single_qubit() {
        // n = 1, s = 1: swap columns 2 and 3, a CNOT controlled by the data qubit.
        let uf = oracle_matrix(1, 1).unwrap();
        assert_eq!(uf.dim(), 4);
        assert_eq!(entry(&uf, 0, 0), 1.0);
        assert_eq!(entry(&uf, 1, 1), 1.0);
        assert_eq!(entry(&uf, 2, 3), 1.0);
        assert_eq!(entry(&uf, 3, 2), 1.0);
        assert_eq!(entry(&uf, 2, 2), 0.0);
    }

    #[test]
    fn test_oracle_marked_zero() {
        let uf = oracle_matrix(2, 0).unwrap();
        assert_eq!(entry(&uf, 0, 1), 1.0);
        assert_eq!(entry(&uf, 1, 0), 1.0);
        for i in 2..8 {
            assert_eq!(entry(&uf, i, i), 1.0);
        }
    }

    #[test]
    fn test_oracle_rejects_bad_input() {
        assert!(matches!(oracle_matrix(0, 0), Err(GroverError::NoDataQubits)));
        assert!(matches!(
            oracle_matrix(2, 4),
            Err(GroverError::MarkedIndexRange {
                marked: 4,
                qubits: 2
            })
        ));
        assert!(matches!(
            oracle_matrix(12, 0),
            Err(GroverError::QubitRange { .. })
        ));
    }

    #[test]
    fn test_diffusion_structure() {
        let special = diffusion_matrix(3).unwrap();
        assert_eq!(special.dim(), 8);
        assert!(special.is_diagonal());
        assert_eq!(entry(&special, 0, 0), 1.0);
        for i in 1..8 {
            assert_eq!(entry(&special, i, i), -1.0);
        }
        assert!(special.matmul(&special).unwrap().is_identity());
    }

    #[test]
    fn test_diffusion_rejects_zero_qubits() {
        assert!(matches!(diffusion_matrix(0), Err(GroverError::NoDataQubits)));
    }

    #[test]
    fn test_iteration_count() {
        assert_eq!(iteration_count(1), 1);
        assert_eq!(iteration_count(2), 1);
        assert_eq!(iteration_count(3), 2);
        assert_eq!(iteration_count(4), 3);
        assert_eq!(iteration_count(6), 6);
        assert_eq!(iteration_count(9), 17);
    }

    proptest! {
        #[test]
        fn oracle_is_self_inverse_permutation(n in 1u32..=6, seed in any::<u64>()) {
            let s = seed % (1u64 << n);
            let uf = oracle_matrix(n, s).unwrap();
            prop_assert!(uf.is_permutation());
            prop_assert!(uf.is_unitary());
            prop_assert!(uf.matmul(&uf).unwrap().is_identity());

            // Only the marked pair moves.
            let column = 2 * s as usize;
            prop_assert_eq!(entry(&uf, column + 1, column), 1.0);
            prop_assert_eq!(entry(&uf, column, column + 1), 1.0);
        }

        #[test]
        fn diffusion_squares_to_identity(n in 1u32..=7) {
            let special = diffusion_matrix(n).unwrap();
            prop_assert!(special.is_diagonal());
            prop_assert!(special.matmul(&special).unwrap().is_identity());
        }

        #[test]
        fn marked_index_outside_register_rejected(n in 1u32..=8, extra in 0u64..1000) {
            let s = (1u64 << n) + extra;
            let is_range_error = matches!(
                oracle_matrix(n, s),
                Err(GroverError::MarkedIndexRange { .. })
            );
            prop_assert!(is_range_error);
        }
    }
}
