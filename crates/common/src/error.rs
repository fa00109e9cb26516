//! Decode errors for GVM byte streams.

use thiserror::Error;

use crate::program::MAX_CODE_SIZE;

/// Errors that occur while decoding opcode bytes and operands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// More bytes were needed than the code contains.
    #[error("unexpected end of code at byte {at}")]
    OutOfCode { at: u64 },

    /// A wide operand declared more than 8 payload bytes.
    #[error("operand at byte {at} declares {len} payload bytes (max 8)")]
    PayloadTooLong { at: u64, len: u8 },

    /// Base opcode value not in the instruction table.
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    /// Bytecode longer than the 16-bit address space can reach.
    #[error("program is {0} bytes, exceeding the {MAX_CODE_SIZE}-byte limit")]
    ProgramTooLarge(usize),
}
