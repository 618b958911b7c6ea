//! Dense unitary matrices for named gate definitions.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Largest operator width a dense matrix may span.
///
/// A 12-qubit operator already holds 2^24 complex entries (256 MiB).
pub const MAX_MATRIX_QUBITS: u32 = 12;

/// Absolute tolerance for the structural predicates.
const TOLERANCE: f64 = 1e-10;

/// A dense square matrix acting on `num_qubits` qubits.
///
/// Entries are stored row-major; the dimension is always `2^num_qubits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryMatrix {
    num_qubits: u32,
    dim: usize,
    data: Vec<Complex64>,
}

impl UnitaryMatrix {
    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: u32) -> IrResult<Self> {
        let dim = dimension(num_qubits)?;
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = Complex64::new(1.0, 0.0);
        }
        Ok(Self {
            num_qubits,
            dim,
            data,
        })
    }

    /// A diagonal matrix. The number of entries fixes the qubit count and
    /// must be a power of two.
    pub fn from_diagonal(diagonal: impl IntoIterator<Item = Complex64>) -> IrResult<Self> {
        let diagonal: Vec<_> = diagonal.into_iter().collect();
        let num_qubits = qubits_for_dim(diagonal.len())?;
        let mut matrix = Self::identity(num_qubits)?;
        for (i, value) in diagonal.into_iter().enumerate() {
            matrix.data[i * matrix.dim + i] = value;
        }
        Ok(matrix)
    }

    /// Number of qubits this operator acts on.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Row (and column) count.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at `(row, col)`, or `None` outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        if row < self.dim && col < self.dim {
            Some(self.data[row * self.dim + col])
        } else {
            None
        }
    }

    /// Row-major entries.
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Exchange two columns in place.
    pub fn swap_columns(&mut self, a: usize, b: usize) -> IrResult<()> {
        if a >= self.dim || b >= self.dim {
            return Err(IrError::InvalidDimension(format!(
                "column swap ({a}, {b}) outside {0}x{0} matrix",
                self.dim
            )));
        }
        if a != b {
            for row in 0..self.dim {
                self.data.swap(row * self.dim + a, row * self.dim + b);
            }
        }
        Ok(())
    }

    /// Matrix product `self · other`.
    pub fn matmul(&self, other: &Self) -> IrResult<Self> {
        if self.dim != other.dim {
            return Err(IrError::InvalidDimension(format!(
                "cannot multiply {0}x{0} by {1}x{1}",
                self.dim, other.dim
            )));
        }
        let n = self.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); n * n];
        for i in 0..n {
            for k in 0..n {
                let a = self.data[i * n + k];
                if a.norm_sqr() == 0.0 {
                    continue;
                }
                for j in 0..n {
                    data[i * n + j] += a * other.data[k * n + j];
                }
            }
        }
        Ok(Self {
            num_qubits: self.num_qubits,
            dim: n,
            data,
        })
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        let n = self.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); n * n];
        for i in 0..n {
            for j in 0..n {
                data[j * n + i] = self.data[i * n + j].conj();
            }
        }
        Self {
            num_qubits: self.num_qubits,
            dim: n,
            data,
        }
    }

    /// Whether every entry matches the identity within tolerance.
    pub fn is_identity(&self) -> bool {
        self.entries().all(|(i, j, v)| {
            let expected = if i == j { 1.0 } else { 0.0 };
            (v - Complex64::new(expected, 0.0)).norm() < TOLERANCE
        })
    }

    /// Whether all off-diagonal entries vanish.
    pub fn is_diagonal(&self) -> bool {
        self.entries()
            .all(|(i, j, v)| i == j || v.norm() < TOLERANCE)
    }

    /// Whether the matrix is a 0/1 permutation matrix.
    pub fn is_permutation(&self) -> bool {
        let n = self.dim;
        let mut row_ones = vec![0usize; n];
        let mut col_ones = vec![0usize; n];
        for (i, j, v) in self.entries() {
            if (v - Complex64::new(1.0, 0.0)).norm() < TOLERANCE {
                row_ones[i] += 1;
                col_ones[j] += 1;
            } else if v.norm() >= TOLERANCE {
                return false;
            }
        }
        row_ones.iter().all(|&c| c == 1) && col_ones.iter().all(|&c| c == 1)
    }

    /// Whether `U† · U` is the identity.
    pub fn is_unitary(&self) -> bool {
        self.adjoint()
            .matmul(self)
            .is_ok_and(|product| product.is_identity())
    }

    fn entries(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        let n = self.dim;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, &v)| (idx / n, idx % n, v))
    }
}

fn dimension(num_qubits: u32) -> IrResult<usize> {
    if num_qubits == 0 {
        return Err(IrError::InvalidDimension(
            "an operator must act on at least one qubit".into(),
        ));
    }
    if num_qubits > MAX_MATRIX_QUBITS {
        return Err(IrError::InvalidDimension(format!(
            "{num_qubits}-qubit operator exceeds the dense limit of {MAX_MATRIX_QUBITS} qubits"
        )));
    }
    Ok(1usize << num_qubits)
}

fn qubits_for_dim(dim: usize) -> IrResult<u32> {
    if dim < 2 || !dim.is_power_of_two() {
        return Err(IrError::InvalidDimension(format!(
            "dimension {dim} is not a power of two >= 2"
        )));
    }
    let num_qubits = dim.trailing_zeros();
    dimension(num_qubits)?;
    Ok(num_qubits)
}
