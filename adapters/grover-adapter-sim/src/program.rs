//! Lowering of a [`Circuit`] onto dense statevector indices.

use grover_hal::{HalError, HalResult, NoiseProfile, TrialOutcome};
use grover_ir::{Circuit, ClbitId, Gate, InstructionKind, QubitId, StandardGate, UnitaryMatrix};
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::statevector::{Pauli, Sampler, Statevector};

/// A gate with operands resolved to dense qubit indices.
#[derive(Debug)]
enum Op<'c> {
    H(usize),
    X(usize),
    Unitary {
        matrix: &'c UnitaryMatrix,
        qubits: Vec<usize>,
    },
}

impl Op<'_> {
    fn operands(&self) -> &[usize] {
        match self {
            Op::H(q) | Op::X(q) => std::slice::from_ref(q),
            Op::Unitary { qubits, .. } => qubits,
        }
    }

    fn apply(&self, state: &mut Statevector) {
        match self {
            Op::H(q) => state.apply_h(*q),
            Op::X(q) => state.apply_x(*q),
            Op::Unitary { matrix, qubits } => state.apply_unitary(matrix, qubits),
        }
    }
}

/// A circuit ready to execute on a statevector.
#[derive(Debug)]
pub struct Program<'c> {
    num_qubits: usize,
    ops: Vec<Op<'c>>,
    /// Dense qubit read for each requested classical bit; `None` reads 0.
    readout: Vec<Option<usize>>,
}

impl<'c> Program<'c> {
    /// Resolve operands and measurements. Physical ids are compacted in
    /// ascending order, so the statevector only spans declared qubits.
    pub fn compile(circuit: &'c Circuit, registers: &[ClbitId]) -> HalResult<Self> {
        let mut physical: Vec<QubitId> = circuit.qubits().to_vec();
        physical.sort_unstable();
        physical.dedup();
        let dense: FxHashMap<QubitId, usize> = physical
            .iter()
            .enumerate()
            .map(|(index, &q)| (q, index))
            .collect();
        let resolve = |q: &QubitId| {
            dense
                .get(q)
                .copied()
                .ok_or_else(|| HalError::InvalidCircuit(format!("{q} is not declared")))
        };

        let mut ops = Vec::new();
        let mut measured: FxHashMap<ClbitId, usize> = FxHashMap::default();
        let mut collapsed = vec![false; physical.len()];

        for instruction in circuit.instructions() {
            let qubits = instruction
                .qubits
                .iter()
                .map(resolve)
                .collect::<HalResult<Vec<_>>>()?;

            match &instruction.kind {
                InstructionKind::Measure => {
                    for (&q, &c) in qubits.iter().zip(&instruction.clbits) {
                        collapsed[q] = true;
                        measured.insert(c, q);
                    }
                }
                InstructionKind::Gate(gate) => {
                    if qubits.iter().any(|&q| collapsed[q]) {
                        return Err(HalError::Unsupported(format!(
                            "gate '{}' after measurement",
                            gate.name()
                        )));
                    }
                    ops.push(lower(circuit, gate, qubits)?);
                }
            }
        }

        let readout = registers
            .iter()
            .map(|c| {
                if (c.0 as usize) < circuit.num_clbits() {
                    Ok(measured.get(c).copied())
                } else {
                    Err(HalError::InvalidCircuit(format!(
                        "classical bit {c} is not declared"
                    )))
                }
            })
            .collect::<HalResult<Vec<_>>>()?;

        Ok(Self {
            num_qubits: physical.len(),
            ops,
            readout,
        })
    }

    /// Number of dense qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of gates.
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Evolve |0…0⟩ through every gate without noise.
    pub fn evolve(&self) -> Statevector {
        let mut state = Statevector::new(self.num_qubits);
        for op in &self.ops {
            op.apply(&mut state);
        }
        state
    }

    /// Evolve once and draw `trials` outcomes from the final distribution.
    pub fn run_noiseless<R: Rng + ?Sized>(&self, trials: u32, rng: &mut R) -> Vec<TrialOutcome> {
        let sampler = Sampler::new(&self.evolve());
        (0..trials)
            .map(|_| self.read(sampler.sample(rng)))
            .collect()
    }

    /// One trajectory per trial: after each gate every operand suffers a
    /// random Pauli with the gate's error rate, and every read bit flips
    /// with the readout error.
    pub fn run_noisy<R: Rng + ?Sized>(
        &self,
        trials: u32,
        noise: &NoiseProfile,
        rng: &mut R,
    ) -> Vec<TrialOutcome> {
        (0..trials)
            .map(|_| {
                let mut state = Statevector::new(self.num_qubits);
                for op in &self.ops {
                    op.apply(&mut state);
                    let operands = op.operands();
                    let p = noise.gate_error(operands.len());
                    if p > 0.0 {
                        for &q in operands {
                            if rng.gen_bool(p) {
                                state.apply_pauli(Pauli::random(rng), q);
                            }
                        }
                    }
                }
                let outcome = self.read(state.sample(rng));
                if noise.readout_error > 0.0 {
                    let bits = outcome
                        .bits()
                        .iter()
                        .map(|&b| b ^ rng.gen_bool(noise.readout_error))
                        .collect();
                    TrialOutcome::new(bits)
                } else {
                    outcome
                }
            })
            .collect()
    }

    /// Read the requested classical bits out of a basis index.
    fn read(&self, basis: usize) -> TrialOutcome {
        TrialOutcome::new(
            self.readout
                .iter()
                .map(|q| q.is_some_and(|q| (basis >> q) & 1 == 1))
                .collect(),
        )
    }
}

fn lower<'c>(circuit: &'c Circuit, gate: &Gate, qubits: Vec<usize>) -> HalResult<Op<'c>> {
    if qubits.len() != gate.num_qubits() as usize {
        return Err(HalError::InvalidCircuit(format!(
            "gate '{}' expects {} operands, got {}",
            gate.name(),
            gate.num_qubits(),
            qubits.len()
        )));
    }
    if (1..qubits.len()).any(|i| qubits[..i].contains(&qubits[i])) {
        return Err(HalError::InvalidCircuit(format!(
            "gate '{}' repeats an operand",
            gate.name()
        )));
    }
    match gate {
        Gate::Standard(StandardGate::H) => Ok(Op::H(qubits[0])),
        Gate::Standard(StandardGate::X) => Ok(Op::X(qubits[0])),
        Gate::Unitary { name, .. } => {
            let definition = circuit
                .definition(name)
                .ok_or_else(|| HalError::InvalidCircuit(format!("undefined unitary '{name}'")))?;
            if definition.matrix.num_qubits() as usize != qubits.len() {
                return Err(HalError::InvalidCircuit(format!(
                    "unitary '{name}' spans {} qubits but is applied to {}",
                    definition.matrix.num_qubits(),
                    qubits.len()
                )));
            }
            Ok(Op::Unitary {
                matrix: &definition.matrix,
                qubits,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cnot() -> UnitaryMatrix {
        let mut m = UnitaryMatrix::identity(2).unwrap();
        m.swap_columns(2, 3).unwrap();
        m
    }

    #[test]
    fn test_compile_compacts_physical_ids() {
        let mut circuit = Circuit::with_qubits("bell", [QubitId(16), QubitId(6)], 2);
        circuit.define_unitary("cnot", cnot()).unwrap();
        circuit.h(QubitId(16)).unwrap();
        circuit
            .apply_unitary("cnot", [QubitId(16), QubitId(6)])
            .unwrap();
        circuit.measure(QubitId(16), ClbitId(0)).unwrap();
        circuit.measure(QubitId(6), ClbitId(1)).unwrap();

        let program = Program::compile(&circuit, &[ClbitId(0), ClbitId(1)]).unwrap();
        assert_eq!(program.num_qubits(), 2);
        assert_eq!(program.num_ops(), 2);

        let mut rng = StdRng::seed_from_u64(1);
        for outcome in program.run_noiseless(200, &mut rng) {
            assert_eq!(outcome.bits()[0], outcome.bits()[1]);
        }
    }

    #[test]
    fn test_unmeasured_register_reads_zero() {
        let mut circuit = Circuit::with_qubits("x", [QubitId(11)], 2);
        circuit.x(QubitId(11)).unwrap();
        circuit.measure(QubitId(11), ClbitId(1)).unwrap();

        let program = Program::compile(&circuit, &[ClbitId(0), ClbitId(1)]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let outcomes = program.run_noiseless(10, &mut rng);
        assert!(outcomes.iter().all(|o| o.bitstring() == "01"));
    }

    #[test]
    fn test_register_out_of_range() {
        let circuit = Circuit::with_qubits("empty", [QubitId(0)], 1);
        let err = Program::compile(&circuit, &[ClbitId(4)]).unwrap_err();
        assert!(matches!(err, HalError::InvalidCircuit(_)));
    }

    #[test]
    fn test_gate_after_measurement_rejected() {
        let mut circuit = Circuit::with_qubits("mid", [QubitId(0)], 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        let err = Program::compile(&circuit, &[ClbitId(0)]).unwrap_err();
        assert!(matches!(err, HalError::Unsupported(_)));
    }

    #[test]
    fn test_full_readout_noise_flips_every_bit() {
        let mut circuit = Circuit::with_qubits("flip", [QubitId(0), QubitId(1)], 2);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.measure(QubitId(1), ClbitId(1)).unwrap();
        let program = Program::compile(&circuit, &[ClbitId(0), ClbitId(1)]).unwrap();

        let noise = NoiseProfile {
            readout_error: 1.0,
            ..NoiseProfile::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let outcomes = program.run_noisy(20, &noise, &mut rng);
        assert_eq!(outcomes.len(), 20);
        assert!(outcomes.iter().all(|o| o.bitstring() == "11"));
    }

    #[test]
    fn test_noiseless_profile_matches_ideal_run() {
        let mut circuit = Circuit::with_qubits("x", [QubitId(3)], 1);
        circuit.x(QubitId(3)).unwrap();
        circuit.measure(QubitId(3), ClbitId(0)).unwrap();
        let program = Program::compile(&circuit, &[ClbitId(0)]).unwrap();

        let mut rng = StdRng::seed_from_u64(9);
        let outcomes = program.run_noisy(50, &NoiseProfile::noiseless(), &mut rng);
        assert!(outcomes.iter().all(|o| o.bitstring() == "1"));
    }
}
