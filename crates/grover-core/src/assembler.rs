//! Grover circuit assembly.
//!
//! The emitted program, for `n` data qubits `d[0..n]` and ancilla `a`:
//!
//! ```text
//! defgate Uf       (2^(n+1) x 2^(n+1))
//! defgate special  (2^n x 2^n)
//! h d[i]                          for every data qubit
//! x a; h a                        ancilla in |->
//! repeat `repeats` times:
//!     Uf d[0] .. d[n-1] a
//!     h d[i]
//!     special d[0] .. d[n-1]
//!     h d[i]
//! measure d[i] -> c[i]
//! ```

use grover_ir::{Circuit, ClbitId, QubitId, render_ids};
use tracing::{debug, instrument};

use crate::error::{GroverError, GroverResult};
use crate::mapping::QubitAllocator;
use crate::operators::{check_marked, diffusion_matrix, iteration_count, oracle_matrix};

/// Name under which the oracle is registered.
pub const ORACLE_NAME: &str = "Uf";

/// Name under which the diffusion operator is registered.
pub const DIFFUSION_NAME: &str = "special";

/// An assembled search circuit and the parameters it was built from.
#[derive(Debug, Clone)]
pub struct GroverCircuit {
    circuit: Circuit,
    qubits: u32,
    marked: u64,
    repeats: u32,
    data: Vec<QubitId>,
    ancilla: QubitId,
}

impl GroverCircuit {
    /// The executable circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Number of data qubits `n`.
    pub fn qubits(&self) -> u32 {
        self.qubits
    }

    /// The marked index `s`.
    pub fn marked(&self) -> u64 {
        self.marked
    }

    /// Number of oracle/diffusion rounds.
    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Physical ids of the data qubits, in logical order.
    pub fn data_qubits(&self) -> &[QubitId] {
        &self.data
    }

    /// Physical id of the ancilla.
    pub fn ancilla(&self) -> QubitId {
        self.ancilla
    }

    /// Classical bits holding the data register, bit 0 first.
    pub fn registers(&self) -> Vec<ClbitId> {
        (0..self.qubits).map(ClbitId).collect()
    }
}

/// Builds [`GroverCircuit`]s on the qubits an allocator hands out.
#[derive(Debug, Clone, Copy)]
pub struct CircuitAssembler<'a> {
    allocator: &'a QubitAllocator,
}

impl<'a> CircuitAssembler<'a> {
    /// Create an assembler drawing qubits from `allocator`.
    pub fn new(allocator: &'a QubitAllocator) -> Self {
        Self { allocator }
    }

    /// Assemble the search circuit for `n` data qubits and marked index `s`.
    #[instrument(skip(self))]
    pub fn assemble(&self, n: u32, s: u64) -> GroverResult<GroverCircuit> {
        if n == 0 {
            return Err(GroverError::NoDataQubits);
        }
        let physical = self.allocator.allocate(n as usize + 1)?;
        check_marked(n, s)?;

        let (data, ancilla) = physical.split_at(n as usize);
        let ancilla = ancilla[0];
        let repeats = iteration_count(n);

        let mut circuit =
            Circuit::with_qubits(format!("grover_{n}_{s}"), physical.iter().copied(), n);
        circuit.define_unitary(ORACLE_NAME, oracle_matrix(n, s)?)?;
        circuit.define_unitary(DIFFUSION_NAME, diffusion_matrix(n)?)?;

        for &q in data {
            circuit.h(q)?;
        }
        circuit.x(ancilla)?.h(ancilla)?;

        for _ in 0..repeats {
            circuit.apply_unitary(ORACLE_NAME, physical.iter().copied())?;
            for &q in data {
                circuit.h(q)?;
            }
            circuit.apply_unitary(DIFFUSION_NAME, data.iter().copied())?;
            for &q in data {
                circuit.h(q)?;
            }
        }

        for (i, &q) in data.iter().enumerate() {
            circuit.measure(q, ClbitId(i as u32))?;
        }

        debug!(
            qubits = %render_ids(physical),
            repeats,
            instructions = circuit.len(),
            "assembled search circuit"
        );

        Ok(GroverCircuit {
            circuit,
            qubits: n,
            marked: s,
            repeats,
            data: data.to_vec(),
            ancilla,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::QubitMapping;
    use grover_ir::InstructionKind;

    fn assemble(n: u32, s: u64) -> GroverResult<GroverCircuit> {
        let allocator = QubitAllocator::default();
        CircuitAssembler::new(&allocator).assemble(n, s)
    }

    #[test]
    fn test_two_qubit_layout() {
        let grover = assemble(2, 3).unwrap();
        assert_eq!(grover.qubits(), 2);
        assert_eq!(grover.marked(), 3);
        assert_eq!(grover.repeats(), 1);
        assert_eq!(grover.data_qubits(), &[QubitId(11), QubitId(6)]);
        assert_eq!(grover.ancilla(), QubitId(16));
        assert_eq!(grover.registers(), vec![ClbitId(0), ClbitId(1)]);

        let lines: Vec<String> = grover
            .circuit()
            .instructions()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                "h 11",
                "h 6",
                "x 16",
                "h 16",
                "Uf 11 6 16",
                "h 11",
                "h 6",
                "special 11 6",
                "h 11",
                "h 6",
                "measure 11 c0",
                "measure 6 c1",
            ]
        );
    }

    #[test]
    fn test_definitions_registered() {
        let grover = assemble(3, 5).unwrap();
        let circuit = grover.circuit();
        assert_eq!(circuit.definitions().len(), 2);
        assert_eq!(
            circuit.definition(ORACLE_NAME).unwrap().matrix.num_qubits(),
            4
        );
        assert_eq!(
            circuit.definition(DIFFUSION_NAME).unwrap().matrix.num_qubits(),
            3
        );
        assert_eq!(circuit.count_ops(ORACLE_NAME), 2);
        assert_eq!(circuit.count_ops(DIFFUSION_NAME), 2);
        assert_eq!(circuit.num_clbits(), 3);
    }

    #[test]
    fn test_op_counts_follow_repeats() {
        for n in 1..=4 {
            let grover = assemble(n, 0).unwrap();
            let repeats = iteration_count(n) as usize;
            let circuit = grover.circuit();
            let n = n as usize;
            assert_eq!(circuit.count_ops(ORACLE_NAME), repeats);
            assert_eq!(circuit.count_ops("h"), n + 1 + 2 * n * repeats);
            assert_eq!(circuit.count_ops("x"), 1);
            let measures = circuit
                .instructions()
                .iter()
                .filter(|i| matches!(i.kind, InstructionKind::Measure))
                .count();
            assert_eq!(measures, n);
        }
    }

    #[test]
    fn test_rejects_invalid_requests() {
        assert!(matches!(assemble(0, 0), Err(GroverError::NoDataQubits)));
        assert!(matches!(
            assemble(10, 0),
            Err(GroverError::QubitRange {
                requested: 11,
                available: 10
            })
        ));
        assert!(matches!(
            assemble(2, 4),
            Err(GroverError::MarkedIndexRange { .. })
        ));
    }

    #[test]
    fn test_largest_reference_search() {
        let grover = assemble(9, 511).unwrap();
        assert_eq!(grover.ancilla(), QubitId(0));
        assert_eq!(grover.repeats(), 17);
    }

    #[test]
    fn test_custom_mapping() {
        let mapping = QubitMapping::new([QubitId(2), QubitId(7)]).unwrap();
        let allocator = QubitAllocator::new(mapping);
        let grover = CircuitAssembler::new(&allocator).assemble(1, 1).unwrap();
        assert_eq!(grover.data_qubits(), &[QubitId(2)]);
        assert_eq!(grover.ancilla(), QubitId(7));
        assert!(CircuitAssembler::new(&allocator).assemble(2, 0).is_err());
    }
}
