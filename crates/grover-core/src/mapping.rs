//! Logical-to-physical qubit mapping.
//!
//! Logical qubit `i` of a search runs on `mapping[i]`. Data qubits take
//! positions `0..n`, the ancilla takes position `n`.

use grover_ir::{QubitId, render_ids};
use serde::{Deserialize, Serialize};

use crate::error::{GroverError, GroverResult};

/// Physical ids of the reference connectivity subset, in allocation order.
pub const REFERENCE_MAPPING: [u32; 10] = [11, 6, 16, 17, 10, 12, 7, 1, 5, 0];

/// An ordered, duplicate-free list of physical qubit ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct QubitMapping {
    ids: Vec<QubitId>,
}

impl QubitMapping {
    /// Build a mapping. Rejects an empty list and repeated ids.
    pub fn new(ids: impl IntoIterator<Item = QubitId>) -> GroverResult<Self> {
        let ids: Vec<QubitId> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(GroverError::Config("qubit mapping is empty".into()));
        }
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                return Err(GroverError::Config(format!(
                    "qubit mapping lists {id} twice"
                )));
            }
        }
        Ok(Self { ids })
    }

    /// The reference connectivity subset.
    pub fn reference() -> Self {
        Self {
            ids: REFERENCE_MAPPING.iter().copied().map(QubitId).collect(),
        }
    }

    /// The ids in allocation order.
    pub fn ids(&self) -> &[QubitId] {
        &self.ids
    }

    /// Number of ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always `false` for a constructed mapping.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Largest `n` this mapping can host (one id is kept for the ancilla).
    pub fn max_data_qubits(&self) -> u32 {
        (self.ids.len() - 1) as u32
    }
}

impl Default for QubitMapping {
    fn default() -> Self {
        Self::reference()
    }
}

impl TryFrom<Vec<u32>> for QubitMapping {
    type Error = GroverError;

    fn try_from(ids: Vec<u32>) -> GroverResult<Self> {
        Self::new(ids.into_iter().map(QubitId))
    }
}

impl From<QubitMapping> for Vec<u32> {
    fn from(mapping: QubitMapping) -> Self {
        mapping.ids.into_iter().map(|q| q.0).collect()
    }
}

/// Hands out physical ids from a [`QubitMapping`].
#[derive(Debug, Clone, Default)]
pub struct QubitAllocator {
    mapping: QubitMapping,
}

impl QubitAllocator {
    /// Create an allocator over `mapping`.
    pub fn new(mapping: QubitMapping) -> Self {
        Self { mapping }
    }

    /// The underlying mapping.
    pub fn mapping(&self) -> &QubitMapping {
        &self.mapping
    }

    /// The first `count` physical ids.
    pub fn allocate(&self, count: usize) -> GroverResult<&[QubitId]> {
        self.mapping
            .ids
            .get(..count)
            .ok_or(GroverError::QubitRange {
                requested: count,
                available: self.mapping.len(),
            })
    }

    /// The physical id at logical position `index`.
    pub fn physical(&self, index: usize) -> GroverResult<QubitId> {
        self.mapping
            .ids
            .get(index)
            .copied()
            .ok_or(GroverError::QubitRange {
                requested: index + 1,
                available: self.mapping.len(),
            })
    }

    /// The first `count` ids as a space-separated list, e.g. `"11 6 16"`.
    pub fn render(&self, count: usize) -> GroverResult<String> {
        Ok(render_ids(self.allocate(count)?))
    }
}
