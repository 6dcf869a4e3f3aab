//! Per-opcode functional units: fixed latency, single-instance occupancy.

use std::collections::HashMap;

use crate::instruction::Opcode;

/// A single-instance resource dedicated to one opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionalUnit {
    /// Fixed cycle cost of one dispatch through this unit.
    pub latency: u64,
    /// Earliest cycle at which the unit is free again.
    pub free_at: u64,
}

impl FunctionalUnit {
    fn new(latency: u64) -> Self {
        Self { latency, free_at: 0 }
    }
}

/// Canonical opcode -> functional unit table (§3). Unrecognized opcodes
/// (`Opcode::Unknown`) are not part of the canonical table; they are
/// lazily given a zero-latency unit the first time they are referenced,
/// matching the original implementation's `map::operator[]`
/// default-construction behavior for opcodes it has never seen.
#[derive(Clone, Debug)]
pub struct FunctionalUnitTable {
    units: HashMap<Opcode, FunctionalUnit>,
}

impl FunctionalUnitTable {
    pub fn new() -> Self {
        let mut units = HashMap::new();
        units.insert(Opcode::FaddS, FunctionalUnit::new(3));
        units.insert(Opcode::FsubS, FunctionalUnit::new(3));
        units.insert(Opcode::FaddD, FunctionalUnit::new(5));
        units.insert(Opcode::FsubD, FunctionalUnit::new(5));
        units.insert(Opcode::FmulS, FunctionalUnit::new(4));
        units.insert(Opcode::FmulD, FunctionalUnit::new(6));
        units.insert(Opcode::FdivS, FunctionalUnit::new(10));
        units.insert(Opcode::FdivD, FunctionalUnit::new(16));
        units.insert(Opcode::FmovS, FunctionalUnit::new(1));
        units.insert(Opcode::FmovD, FunctionalUnit::new(1));
        Self { units }
    }

    fn entry(&mut self, op: &Opcode) -> &mut FunctionalUnit {
        self.units
            .entry(op.clone())
            .or_insert_with(|| FunctionalUnit::new(0))
    }

    pub fn latency(&self, op: &Opcode) -> u64 {
        self.units.get(op).map(|u| u.latency).unwrap_or(0)
    }

    pub fn is_available(&self, op: &Opcode, at: u64) -> bool {
        self.units.get(op).map(|u| u.free_at).unwrap_or(0) <= at
    }

    pub fn free_at(&self, op: &Opcode) -> u64 {
        self.units.get(op).map(|u| u.free_at).unwrap_or(0)
    }

    pub fn reserve(&mut self, op: &Opcode, free_at: u64) {
        self.entry(op).free_at = free_at;
    }
}

impl Default for FunctionalUnitTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latencies_match_canonical_table() {
        let fu = FunctionalUnitTable::new();
        assert_eq!(fu.latency(&Opcode::FaddS), 3);
        assert_eq!(fu.latency(&Opcode::FaddD), 5);
        assert_eq!(fu.latency(&Opcode::FmulS), 4);
        assert_eq!(fu.latency(&Opcode::FmulD), 6);
        assert_eq!(fu.latency(&Opcode::FdivS), 10);
        assert_eq!(fu.latency(&Opcode::FdivD), 16);
        assert_eq!(fu.latency(&Opcode::FmovS), 1);
        assert_eq!(fu.latency(&Opcode::FmovD), 1);
    }

    #[test]
    fn reserve_advances_free_at() {
        let mut fu = FunctionalUnitTable::new();
        assert!(fu.is_available(&Opcode::FmulS, 0));
        fu.reserve(&Opcode::FmulS, 4);
        assert!(!fu.is_available(&Opcode::FmulS, 3));
        assert!(fu.is_available(&Opcode::FmulS, 4));
    }

    #[test]
    fn unknown_opcode_gets_zero_latency_unit() {
        let fu = FunctionalUnitTable::new();
        let op = Opcode::Unknown("FOO.S".to_string());
        assert_eq!(fu.latency(&op), 0);
        assert!(fu.is_available(&op, 0));
    }
}
