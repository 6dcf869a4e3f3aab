//! Domain error type for trace parsing, conversion, and output (§7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    ParseLine { line: usize, reason: String },

    #[error("line {line}: invalid opcode {token:?}")]
    InvalidOpcode { line: usize, token: String },

    #[error("line {line}: invalid register operand {token:?}")]
    InvalidRegister { line: usize, token: String },

    #[error("expected a {expected}-bit binary literal, got {got} characters")]
    ConvertLength { expected: usize, got: usize },

    #[error("failed to write output: {0}")]
    OutputWrite(String),
}
