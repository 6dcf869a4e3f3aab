//! Arithmetic evaluator: computes the double-precision result of an
//! instruction from the current register values (§4.3).

use crate::instruction::{Instruction, Opcode, NO_SRC};
use crate::register::RegisterFile;

/// True NaN check. Never compare to a NaN constant (§9): `x != x` is the
/// only portable way to detect NaN.
pub fn is_nan(value: f64) -> bool {
    value != value
}

/// Computes the result of `instr` from `regs`. Always double precision,
/// regardless of `instr.is_double` (§4.3, §9).
pub fn compute_result(instr: &Instruction, regs: &RegisterFile) -> f64 {
    let val1 = regs.get(instr.src1).value;
    let val2 = if instr.src2 != NO_SRC {
        regs.get(instr.src2 as u8).value
    } else {
        0.0
    };

    match &instr.op {
        Opcode::FaddS | Opcode::FaddD => val1 + val2,
        Opcode::FsubS | Opcode::FsubD => val1 - val2,
        Opcode::FmulS | Opcode::FmulD => val1 * val2,
        Opcode::FdivS | Opcode::FdivD => {
            if val2 == 0.0 {
                f64::NAN
            } else {
                val1 / val2
            }
        }
        Opcode::FmovS | Opcode::FmovD => val1,
        // Unrecognized opcode: produce NaN uniformly (§4.3, §7).
        Opcode::Unknown(_) => f64::NAN,
    }
}
