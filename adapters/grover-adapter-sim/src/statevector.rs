//! Statevector simulation engine.
//!
//! Qubits are dense indices `0..num_qubits`; qubit `q` is bit `q` of a basis
//! index. Named unitaries follow the circuit's operand convention instead:
//! the first operand is the most significant bit of the matrix index.

use grover_ir::UnitaryMatrix;
use num_complex::Complex64;
use rand::Rng;

/// A single-qubit Pauli error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pauli {
    X,
    Y,
    Z,
}

impl Pauli {
    /// Draw X, Y or Z uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => Pauli::X,
            1 => Pauli::Y,
            _ => Pauli::Z,
        }
    }
}

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self { amplitudes }
    }

    pub fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    pub fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    pub fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    pub fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    pub fn apply_pauli(&mut self, pauli: Pauli, qubit: usize) {
        match pauli {
            Pauli::X => self.apply_x(qubit),
            Pauli::Y => self.apply_y(qubit),
            Pauli::Z => self.apply_z(qubit),
        }
    }

    /// Apply a dense `2^k x 2^k` matrix to `qubits` (first operand = MSB).
    ///
    /// The caller guarantees `qubits.len() == matrix.num_qubits()` and that
    /// the operands are distinct.
    pub fn apply_unitary(&mut self, matrix: &UnitaryMatrix, qubits: &[usize]) {
        let k = qubits.len();
        let dim = matrix.dim();
        // Basis offset contributed by each local index.
        let offsets: Vec<usize> = (0..dim)
            .map(|local| {
                qubits
                    .iter()
                    .enumerate()
                    .filter(|&(pos, _)| (local >> (k - 1 - pos)) & 1 == 1)
                    .fold(0, |acc, (_, &q)| acc | (1 << q))
            })
            .collect();
        let operand_mask = offsets[dim - 1];
        let entries = matrix.as_slice();

        let mut gathered = vec![Complex64::new(0.0, 0.0); dim];
        for base in 0..self.amplitudes.len() {
            if base & operand_mask != 0 {
                continue;
            }
            for (local, &offset) in offsets.iter().enumerate() {
                gathered[local] = self.amplitudes[base | offset];
            }
            for (row, &offset) in offsets.iter().enumerate() {
                let mut acc = Complex64::new(0.0, 0.0);
                for (col, &amp) in gathered.iter().enumerate() {
                    let entry = entries[row * dim + col];
                    if entry.re != 0.0 || entry.im != 0.0 {
                        acc += entry * amp;
                    }
                }
                self.amplitudes[base | offset] = acc;
            }
        }
    }

    /// Measurement probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sample a measurement outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Rounding can leave the total just below 1.
        self.amplitudes.len() - 1
    }
}

/// Cumulative distribution for repeated sampling from a fixed state.
pub struct Sampler {
    cumulative: Vec<f64>,
}

impl Sampler {
    pub fn new(state: &Statevector) -> Self {
        let mut total = 0.0;
        let cumulative = state
            .probabilities()
            .into_iter()
            .map(|p| {
                total += p;
                total
            })
            .collect();
        Self { cumulative }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();
        let last = self.cumulative.len().saturating_sub(1);
        self.cumulative.partition_point(|&c| c <= r).min(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn real(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], real(1.0)));
        for i in 1..4 {
            assert!(approx_eq(sv.amplitudes[i], real(0.0)));
        }
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], real(sqrt2_inv)));
        assert!(approx_eq(sv.amplitudes[1], real(sqrt2_inv)));
    }

    #[test]
    fn test_x_gate() {
        let mut sv = Statevector::new(1);
        sv.apply_x(0);

        assert!(approx_eq(sv.amplitudes[0], real(0.0)));
        assert!(approx_eq(sv.amplitudes[1], real(1.0)));
    }

    #[test]
    fn test_paulis_square_to_identity() {
        let mut sv = Statevector::new(2);
        sv.apply_h(0);
        sv.apply_x(1);
        let before = sv.clone();
        for pauli in [Pauli::X, Pauli::Y, Pauli::Z] {
            sv.apply_pauli(pauli, 1);
            sv.apply_pauli(pauli, 1);
        }
        for i in 0..4 {
            assert!(approx_eq(sv.amplitudes[i], before.amplitudes[i]));
        }
    }

    #[test]
    fn test_unitary_first_operand_is_msb() {
        // CNOT with control = first operand: identity with columns 2 and 3 swapped.
        let mut cnot = UnitaryMatrix::identity(2).unwrap();
        cnot.swap_columns(2, 3).unwrap();

        // Control on dense qubit 1, target on dense qubit 0.
        let mut sv = Statevector::new(2);
        sv.apply_x(1);
        sv.apply_unitary(&cnot, &[1, 0]);
        assert!(approx_eq(sv.amplitudes[0b11], real(1.0)));

        // Swapped operands: control on qubit 0, which is |0⟩, so nothing happens.
        let mut sv = Statevector::new(2);
        sv.apply_x(1);
        sv.apply_unitary(&cnot, &[0, 1]);
        assert!(approx_eq(sv.amplitudes[0b10], real(1.0)));
    }

    #[test]
    fn test_unitary_on_subset_leaves_spectators() {
        let diag = UnitaryMatrix::from_diagonal([real(1.0), real(-1.0)]).unwrap();
        let mut sv = Statevector::new(3);
        sv.apply_x(2);
        sv.apply_x(1);
        sv.apply_unitary(&diag, &[1]);
        assert!(approx_eq(sv.amplitudes[0b110], real(-1.0)));
        let norm: f64 = sv.probabilities().iter().sum();
        assert!((norm - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_sample_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sv = Statevector::new(1);
        sv.apply_x(0);

        let sampler = Sampler::new(&sv);
        for _ in 0..100 {
            assert_eq!(sv.sample(&mut rng), 1);
            assert_eq!(sampler.sample(&mut rng), 1);
        }
    }

    #[test]
    fn test_sampler_uniform_split() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut sv = Statevector::new(1);
        sv.apply_h(0);
        let sampler = Sampler::new(&sv);
        let ones = (0..2000).filter(|_| sampler.sample(&mut rng) == 1).count();
        assert!((800..1200).contains(&ones), "ones = {ones}");
    }
}
