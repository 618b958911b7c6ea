//! High-level circuit builder API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::matrix::UnitaryMatrix;
use crate::qubit::{ClbitId, QubitId};

/// A named unitary registered on a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryDefinition {
    /// Name used by instructions that apply it.
    pub name: String,
    /// The operator.
    pub matrix: UnitaryMatrix,
}

/// A quantum circuit.
///
/// Qubits are declared up front by physical id; classical bits are numbered
/// `0..num_clbits`. Every emission validates its operands, so a circuit that
/// exists is always well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Declared qubits, in declaration order.
    qubits: Vec<QubitId>,
    /// Number of classical bits.
    num_clbits: u32,
    /// Named unitary definitions, in definition order.
    definitions: Vec<UnitaryDefinition>,
    /// Instructions, in emission order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            num_clbits: 0,
            definitions: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit over the given physical qubits with `num_clbits`
    /// classical bits. Repeated ids are declared once.
    pub fn with_qubits(
        name: impl Into<String>,
        qubits: impl IntoIterator<Item = QubitId>,
        num_clbits: u32,
    ) -> Self {
        let mut circuit = Self::new(name);
        for q in qubits {
            // Ignoring the duplicate error keeps the first declaration.
            let _ = circuit.add_qubit(q);
        }
        circuit.num_clbits = num_clbits;
        circuit
    }

    /// Declare a physical qubit.
    pub fn add_qubit(&mut self, qubit: QubitId) -> IrResult<QubitId> {
        if self.qubits.contains(&qubit) {
            return Err(IrError::QubitAlreadyDeclared(qubit));
        }
        self.qubits.push(qubit);
        Ok(qubit)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::H, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::X, qubit))?;
        Ok(self)
    }

    /// Register `matrix` under `name` so later instructions can apply it.
    pub fn define_unitary(
        &mut self,
        name: impl Into<String>,
        matrix: UnitaryMatrix,
    ) -> IrResult<&mut Self> {
        let name = name.into();
        if name.is_empty() || name.contains(char::is_whitespace) || StandardGate::is_reserved(&name)
        {
            return Err(IrError::InvalidName(name));
        }
        if self.definition(&name).is_some() {
            return Err(IrError::DuplicateDefinition(name));
        }
        self.definitions.push(UnitaryDefinition { name, matrix });
        Ok(self)
    }

    /// Apply a previously defined unitary to `qubits`. The first operand is
    /// the most significant bit of the matrix index.
    pub fn apply_unitary(
        &mut self,
        name: &str,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let num_qubits = self
            .definition(name)
            .map(|d| d.matrix.num_qubits())
            .ok_or_else(|| IrError::UndefinedUnitary(name.to_string()))?;
        let gate = Gate::Unitary {
            name: name.to_string(),
            num_qubits,
        };
        self.push(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Validate and append an instruction.
    fn push(&mut self, instruction: Instruction) -> IrResult<()> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let Some(gate) = instruction.as_gate() {
            let expected = gate.num_qubits();
            let got = instruction.qubits.len() as u32;
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        for (i, q) in instruction.qubits.iter().enumerate() {
            if !self.qubits.contains(q) {
                return Err(IrError::QubitNotFound {
                    qubit: *q,
                    gate_name: gate_name.clone(),
                });
            }
            if instruction.qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for c in &instruction.clbits {
            if c.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound { clbit: *c });
            }
        }

        self.instructions.push(instruction);
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared qubits, in declaration order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in emission order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether no instruction has been emitted.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Named unitary definitions, in definition order.
    pub fn definitions(&self) -> &[UnitaryDefinition] {
        &self.definitions
    }

    /// Look up a definition by name.
    pub fn definition(&self, name: &str) -> Option<&UnitaryDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Count instructions with the given name.
    pub fn count_ops(&self, name: &str) -> usize {
        self.instructions.iter().filter(|i| i.name() == name).count()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for def in &self.definitions {
            writeln!(
                f,
                "# defgate {} ({}x{})",
                def.name,
                def.matrix.dim(),
                def.matrix.dim()
            )?;
        }
        for inst in &self.instructions {
            writeln!(f, "{inst}")?;
        }
        Ok(())
    }
}
