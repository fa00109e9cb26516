//! GVM execution engine — a register-and-stack hybrid virtual machine for
//! untyped 64-bit bytecode.
//!
//! The machine borrows a byte vector of code and a 1024-cell `io` memory
//! from its host. Cells 0..8 are registers; cell 0 is the program counter,
//! cell 1 the result register, cell 2 a general register. Execution keeps a
//! value stack of 64-bit values and a call-context stack of register
//! snapshots, and stops at the end of code, at TERM, on a fault, or when
//! the instruction limit is exceeded.
//!
//! # Usage
//!
//! ```
//! use gvm_common::{CodeBuilder, Opcode};
//! use gvm_vm::{Machine, DEFAULT_OP_LIMIT, IO_SIZE, REG_R};
//!
//! let mut b = CodeBuilder::new();
//! b.op(Opcode::Set).value(3).value(5); // io[3] := 5
//! b.op(Opcode::Add).cell(3).value(2);  // R := io[3] + 2
//! let mut code = b.finish();
//!
//! let mut io = [0u64; IO_SIZE];
//! {
//!     let mut vm = Machine::new(&mut code, &mut io);
//!     vm.run(DEFAULT_OP_LIMIT).unwrap();
//!     assert_eq!(vm.count(), 2);
//! }
//! assert_eq!(io[REG_R], 7);
//! ```

pub mod error;
pub mod execute;
pub mod machine;

pub use error::VmError;
pub use machine::{
    Frame, HostFn, Machine, Memory, DEFAULT_OP_LIMIT, IO_SIZE, REG_COUNT, REG_PC, REG_R, REG_S,
};

/// Execute `code` against `io` with the given instruction limit.
///
/// Convenience entry point for hosts that do not need to inspect the
/// machine afterwards. Execution starts at whatever `io[0]` holds.
///
/// # Errors
///
/// Returns the [`VmError`] that halted the run, if any.
pub fn run(code: &mut Vec<u8>, io: &mut Memory, limit: u64) -> Result<(), VmError> {
    Machine::new(code, io).run(limit)
}
