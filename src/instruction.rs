//! Instruction representation: opcode, precision, and register operands.

use std::fmt;

use crate::error::SimError;

/// Floating-point opcode mnemonic, precision folded in (spec.md §3).
///
/// `Unknown` covers any `<mnemonic>.<S|D>` token whose mnemonic is not one
/// of the eight recognized ones: the trace grammar is still well-formed
/// (there is a `.` suffix), so this is not a parse error — it is left to
/// the evaluator, which produces a quiet NaN for it (§4.3, §7).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    FaddS,
    FaddD,
    FsubS,
    FsubD,
    FmulS,
    FmulD,
    FdivS,
    FdivD,
    FmovS,
    FmovD,
    Unknown(String),
}

impl Opcode {
    pub fn is_double(&self) -> bool {
        matches!(
            self,
            Opcode::FaddD | Opcode::FsubD | Opcode::FmulD | Opcode::FdivD | Opcode::FmovD
        ) || matches!(self, Opcode::Unknown(s) if s.ends_with(".D"))
    }

    pub fn is_fmov(&self) -> bool {
        matches!(self, Opcode::FmovS | Opcode::FmovD)
    }

    /// Parses `"<mnemonic>.<S|D>"`. The `.` suffix must be present and be
    /// `S` or `D` (a missing/invalid suffix is a fatal trace error, §7);
    /// an unrecognized mnemonic with a valid suffix becomes `Unknown`.
    pub fn parse(token: &str) -> Result<Self, SimError> {
        let (mnemonic, suffix) = token
            .split_once('.')
            .ok_or_else(|| SimError::InvalidOpcode {
                line: 0,
                token: token.to_string(),
            })?;
        if suffix != "S" && suffix != "D" {
            return Err(SimError::InvalidOpcode {
                line: 0,
                token: token.to_string(),
            });
        }
        let op = match (mnemonic, suffix) {
            ("FADD", "S") => Opcode::FaddS,
            ("FADD", "D") => Opcode::FaddD,
            ("FSUB", "S") => Opcode::FsubS,
            ("FSUB", "D") => Opcode::FsubD,
            ("FMUL", "S") => Opcode::FmulS,
            ("FMUL", "D") => Opcode::FmulD,
            ("FDIV", "S") => Opcode::FdivS,
            ("FDIV", "D") => Opcode::FdivD,
            ("FMOV", "S") => Opcode::FmovS,
            ("FMOV", "D") => Opcode::FmovD,
            _ => Opcode::Unknown(token.to_string()),
        };
        Ok(op)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Opcode::FaddS => "FADD.S",
            Opcode::FaddD => "FADD.D",
            Opcode::FsubS => "FSUB.S",
            Opcode::FsubD => "FSUB.D",
            Opcode::FmulS => "FMUL.S",
            Opcode::FmulD => "FMUL.D",
            Opcode::FdivS => "FDIV.S",
            Opcode::FdivD => "FDIV.D",
            Opcode::FmovS => "FMOV.S",
            Opcode::FmovD => "FMOV.D",
            Opcode::Unknown(token) => token,
        };
        write!(f, "{s}")
    }
}

/// Sentinel value for an absent `src2` operand (FMOV variants).
pub const NO_SRC: i16 = -1;

/// One parsed trace line. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub arrival_cycle: u64,
    pub op: Opcode,
    pub is_double: bool,
    pub dst: u8,
    pub src1: u8,
    pub src2: i16,
}

impl Instruction {
    pub fn new(arrival_cycle: u64, op: Opcode, dst: u8, src1: u8, src2: i16) -> Self {
        let is_double = op.is_double();
        Self {
            arrival_cycle,
            op,
            is_double,
            dst,
            src1,
            src2,
        }
    }

    /// Reconstructed RISC-style assembly string used in the output schedule (§4.8).
    pub fn risc_string(&self) -> String {
        if self.src2 == NO_SRC {
            format!("{} R{} R{}", self.op, self.dst, self.src1)
        } else {
            format!("{} R{} R{} R{}", self.op, self.dst, self.src1, self.src2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_opcodes() {
        assert_eq!(Opcode::parse("FADD.S").unwrap(), Opcode::FaddS);
        assert_eq!(Opcode::parse("FDIV.D").unwrap(), Opcode::FdivD);
    }

    #[test]
    fn rejects_opcode_without_suffix() {
        assert!(Opcode::parse("FADD").is_err());
    }

    #[test]
    fn risc_string_omits_absent_src2() {
        let i = Instruction::new(0, Opcode::FmovS, 7, 2, NO_SRC);
        assert_eq!(i.risc_string(), "FMOV.S R7 R2");
        let j = Instruction::new(0, Opcode::FaddS, 1, 2, 3);
        assert_eq!(j.risc_string(), "FADD.S R1 R2 R3");
    }
}
