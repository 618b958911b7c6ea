//! Grover Circuit Intermediate Representation
//!
//! This crate provides the data structures a Grover search program is built
//! from: physical qubit identifiers, classical bits, the two standard gates
//! the search needs, named unitary definitions backed by dense matrices, and
//! an ordered instruction list.
//!
//! # Overview
//!
//! A [`Circuit`] is a flat, ordered sequence of [`Instruction`]s. Instructions
//! are applied in emission order; there is no reordering or optimization.
//! Qubits are addressed by their *physical* identifier ([`QubitId`]), so the
//! same id that a hardware connectivity map hands out is the one that shows
//! up in every instruction.
//!
//! Arbitrary operators enter a circuit through [`Circuit::define_unitary`],
//! which registers a [`UnitaryMatrix`] under a name. Later
//! [`Circuit::apply_unitary`] calls reference that name.
//!
//! # Example: Marking a state with a named unitary
//!
//! ```rust
//! use grover_ir::{Circuit, ClbitId, QubitId, UnitaryMatrix};
//!
//! let q = [QubitId(4), QubitId(9)];
//! let mut circuit = Circuit::with_qubits("mark", q, 1);
//!
//! // Flip qubit 9 when qubit 4 is |1>.
//! let mut cnot = UnitaryMatrix::identity(2).unwrap();
//! cnot.swap_columns(2, 3).unwrap();
//! circuit.define_unitary("cnot", cnot).unwrap();
//!
//! circuit.x(q[0]).unwrap();
//! circuit.apply_unitary("cnot", q).unwrap();
//! circuit.measure(q[1], ClbitId(0)).unwrap();
//!
//! assert_eq!(circuit.len(), 3);
//! ```
//!
//! # Matrix index convention
//!
//! When a named unitary is applied to the operands `[q0, q1, …, qk-1]`, `q0`
//! is the most significant bit of the matrix row/column index and `qk-1` the
//! least significant one.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod matrix;
pub mod qubit;

pub use circuit::{Circuit, UnitaryDefinition};
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use matrix::{MAX_MATRIX_QUBITS, UnitaryMatrix};
pub use qubit::{ClbitId, QubitId, render_ids};
