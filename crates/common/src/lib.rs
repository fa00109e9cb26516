//! GVM common types: instruction set, operand codec, and bytecode containers.
//!
//! This crate provides the pieces shared by the execution engine, the
//! expression compiler, and the disassembler:
//!
//! - [`Opcode`] — the frozen 35-opcode table with the 0x80 stack-mode flag
//! - [`operand`] — the control-byte operand codec (decode direction)
//! - [`CodeBuilder`] — bytecode emission (encode direction)
//! - [`Program`] — a length-validated bytecode image
//! - [`DecodeError`] — errors from decoding byte streams
//!
//! The only runtime dependency is `thiserror`.

pub mod emit;
pub mod error;
pub mod opcode;
pub mod operand;
pub mod program;

// Re-export commonly used types at the crate root.
pub use emit::CodeBuilder;
pub use error::DecodeError;
pub use opcode::Opcode;
pub use program::Program;
