//! Runtime faults for the GVM execution engine.
//!
//! A fault halts the current run; the machine keeps it until the next
//! `run()`. Every variant carries the byte offset of the opcode that was
//! executing (`at`), and `code()` gives the stable numeric status used as
//! the process exit code by the CLI.

use thiserror::Error;

/// Faults that halt program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// Opcode byte not in the instruction table, or a stack-mode flag on an
    /// instruction with no stack-mode variant.
    #[error("invalid opcode {opcode:#04x} at byte {at}")]
    InvalidOpcode { opcode: u8, at: u64 },

    /// The decoder or the dispatch loop needed more bytes than are present.
    #[error("unexpected end of code at byte {at}")]
    OutOfCode { at: u64 },

    /// DIV or MOD with a zero divisor.
    #[error("division by zero at byte {at}")]
    DivisionByZero { at: u64 },

    /// The instruction counter exceeded the configured limit.
    #[error("instruction limit of {limit} reached")]
    OpLimitReached { limit: u64 },

    /// A stack-mode instruction or POP popped an empty value stack.
    #[error("value stack underflow at byte {at}")]
    StackUnderflow { at: u64 },

    /// RET with an empty call-context stack.
    #[error("RET without CALL at byte {at}")]
    ReturnWithoutCall { at: u64 },

    /// A memory operation referenced an index past the io array.
    #[error("memory index {index} out of bounds at byte {at}")]
    Segfault { index: u64, at: u64 },

    /// SUB with minuend < subtrahend. The wrapped result is still written
    /// before the fault is raised.
    #[error("arithmetic underflow at byte {at}")]
    ArithmeticUnderflow { at: u64 },
}

impl VmError {
    /// Stable numeric status for this fault (0 is reserved for OK).
    pub fn code(&self) -> u8 {
        match self {
            VmError::InvalidOpcode { .. } => 1,
            VmError::OutOfCode { .. } => 2,
            VmError::DivisionByZero { .. } => 3,
            VmError::OpLimitReached { .. } => 4,
            VmError::StackUnderflow { .. } => 5,
            VmError::ReturnWithoutCall { .. } => 6,
            VmError::Segfault { .. } => 7,
            VmError::ArithmeticUnderflow { .. } => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            VmError::DivisionByZero { at: 5 }.to_string(),
            "division by zero at byte 5"
        );
        assert_eq!(
            VmError::Segfault { index: 2000, at: 0 }.to_string(),
            "memory index 2000 out of bounds at byte 0"
        );
        assert_eq!(
            VmError::OpLimitReached { limit: 50_000 }.to_string(),
            "instruction limit of 50000 reached"
        );
    }

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(VmError::InvalidOpcode { opcode: 0x23, at: 0 }.code(), 1);
        assert_eq!(VmError::OutOfCode { at: 0 }.code(), 2);
        assert_eq!(VmError::DivisionByZero { at: 0 }.code(), 3);
        assert_eq!(VmError::OpLimitReached { limit: 1 }.code(), 4);
        assert_eq!(VmError::StackUnderflow { at: 0 }.code(), 5);
        assert_eq!(VmError::ReturnWithoutCall { at: 0 }.code(), 6);
        assert_eq!(VmError::Segfault { index: 0, at: 0 }.code(), 7);
        assert_eq!(VmError::ArithmeticUnderflow { at: 0 }.code(), 8);
    }
}
