//! Trace-file parser: one instruction per non-blank line,
//! `<arrival_cycle> <opcode>.<S|D> R<dst> R<src1> R<src2>` (§6).

use std::path::Path;

use crate::error::SimError;
use crate::instruction::{Instruction, Opcode, NO_SRC};

const MAX_REGISTER: u8 = 31;

fn parse_register(token: &str, line: usize) -> Result<u8, SimError> {
    let digits = token.strip_prefix('R').ok_or_else(|| SimError::InvalidRegister {
        line,
        token: token.to_string(),
    })?;
    let index: u8 = digits.parse().map_err(|_| SimError::InvalidRegister {
        line,
        token: token.to_string(),
    })?;
    if index > MAX_REGISTER {
        return Err(SimError::InvalidRegister {
            line,
            token: token.to_string(),
        });
    }
    Ok(index)
}

/// Parses one non-blank trace line into an `Instruction`. `line` is the
/// 1-based source line number, used only for error messages.
fn parse_line(text: &str, line: usize) -> Result<Instruction, SimError> {
    let mut tokens = text.split_whitespace();

    let arrival_cycle: u64 = tokens
        .next()
        .ok_or_else(|| SimError::ParseLine {
            line,
            reason: "missing arrival cycle".to_string(),
        })?
        .parse()
        .map_err(|_| SimError::ParseLine {
            line,
            reason: "arrival cycle is not an integer".to_string(),
        })?;

    let op_token = tokens.next().ok_or_else(|| SimError::ParseLine {
        line,
        reason: "missing opcode".to_string(),
    })?;
    let op = Opcode::parse(op_token).map_err(|_| SimError::InvalidOpcode {
        line,
        token: op_token.to_string(),
    })?;

    let dst_token = tokens.next().ok_or_else(|| SimError::ParseLine {
        line,
        reason: "missing destination register".to_string(),
    })?;
    let dst = parse_register(dst_token, line)?;

    let src1_token = tokens.next().ok_or_else(|| SimError::ParseLine {
        line,
        reason: "missing first source register".to_string(),
    })?;
    let src1 = parse_register(src1_token, line)?;

    // §6: for FMOV the src2 token, if present, is parsed but ignored.
    let src2 = match tokens.next() {
        Some(token) if !op.is_fmov() => parse_register(token, line)? as i16,
        Some(token) => {
            parse_register(token, line)?;
            NO_SRC
        }
        None => NO_SRC,
    };

    Ok(Instruction::new(arrival_cycle, op, dst, src1, src2))
}

/// Parses an in-memory trace (used by tests and the `parse_trace_file`
/// wrapper). Blank lines are skipped; line numbers are 1-based and count
/// blank lines, matching a plain `lines().enumerate()` pass.
pub fn parse_trace(text: &str) -> Result<Vec<Instruction>, SimError> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(parse_line(trimmed, i + 1))
            }
        })
        .collect()
}

/// Reads and parses a trace file from disk.
pub fn parse_trace_file(path: &Path) -> Result<Vec<Instruction>, SimError> {
    let text = std::fs::read_to_string(path)?;
    parse_trace(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_trace() {
        let instrs = parse_trace("0 FADD.S R1 R2 R3\n5 FMOV.S R7 R2\n").unwrap();
        assert_eq!(instrs.len(), 2);
        assert_eq!(instrs[0].arrival_cycle, 0);
        assert_eq!(instrs[0].dst, 1);
        assert_eq!(instrs[1].src2, NO_SRC);
    }

    #[test]
    fn ignores_blank_lines() {
        let instrs = parse_trace("0 FADD.S R1 R2 R3\n\n\n5 FSUB.D R4 R5 R6\n").unwrap();
        assert_eq!(instrs.len(), 2);
    }

    #[test]
    fn fmov_src2_is_parsed_but_ignored() {
        let instrs = parse_trace("0 FMOV.D R1 R2 R9\n").unwrap();
        assert_eq!(instrs[0].src2, NO_SRC);
    }

    #[test]
    fn rejects_missing_opcode_suffix() {
        let err = parse_trace("0 FADD R1 R2 R3\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidOpcode { .. }));
    }

    #[test]
    fn rejects_out_of_range_register() {
        let err = parse_trace("0 FADD.S R40 R2 R3\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidRegister { .. }));
    }

    #[test]
    fn rejects_missing_register_prefix() {
        let err = parse_trace("0 FADD.S 1 R2 R3\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidRegister { .. }));
    }
}
