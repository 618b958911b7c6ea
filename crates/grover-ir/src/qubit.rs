//! Qubit and classical bit types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical identifier of a qubit.
///
/// Ids are whatever the device hands out; they need not be contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Index of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// Render qubit ids as a whitespace-separated list of their numeric values,
/// in the given order: `[11, 6, 16]` becomes `"11 6 16"`.
pub fn render_ids<'a>(ids: impl IntoIterator<Item = &'a QubitId>) -> String {
    ids.into_iter()
        .map(|q| q.0.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(11)), "q11");
        assert_eq!(format!("{}", ClbitId(0)), "c0");
    }

    #[test]
    fn test_render_ids_preserves_order() {
        let ids = [QubitId(11), QubitId(6), QubitId(16)];
        assert_eq!(render_ids(&ids), "11 6 16");
        let empty: [QubitId; 0] = [];
        assert_eq!(render_ids(&empty), "");
    }
}
