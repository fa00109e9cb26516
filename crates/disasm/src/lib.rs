//! GVM disassembler — bytecode to labeled symbolic text.
//!
//! Output is one instruction per line, prefixed with a zero-padded 5-digit
//! byte-offset label:
//!
//! ```text
//! L00000: PUSH 2
//! L00002: PUSH 3
//! L00004: ADD
//! ```
//!
//! Decoded operands render as `V` (plain) or `@V` (REG_PTR was set); jump
//! targets render as `LNNNNN` labels. Stack-mode opcodes print with an
//! adjusted operand count: their operands live on the value stack, so only
//! JF/JT keep an inline operand (the jump target). An unrecognized opcode
//! byte prints as `UNKNOWN_OPCODE_N` and disassembly continues; a truncated
//! operand aborts with the decode error.
//!
//! # Usage
//!
//! ```
//! let text = gvm_disasm::disassemble(&[0x11, 0x42, 0x11, 0x43, 0x84]).unwrap();
//! assert_eq!(text, "L00000: PUSH 2\nL00002: PUSH 3\nL00004: ADD\n");
//! ```

use gvm_common::error::DecodeError;
use gvm_common::opcode::Opcode;
use gvm_common::operand;

/// Disassemble bytecode into labeled symbolic text.
///
/// # Errors
///
/// Returns [`DecodeError`] when an operand runs past the end of the code or
/// declares an oversized payload.
pub fn disassemble(code: &[u8]) -> Result<String, DecodeError> {
    let mut lines = Vec::new();
    let mut pc: u64 = 0;

    while (pc as usize) < code.len() {
        let at = pc;
        let byte = code[pc as usize];
        pc += 1;

        let line = match Opcode::unpack(byte) {
            Ok((op, stack)) if !stack || op.has_stack_mode() => {
                render_instruction(code, &mut pc, op, stack)?
            }
            // Unassigned base, or a stack flag the instruction cannot carry.
            _ => format!("UNKNOWN_OPCODE_{byte}"),
        };

        lines.push(format!("L{at:05}: {line}"));
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

/// Inline operand count for an instruction, and whether the last inline
/// operand is a jump target.
fn shape(op: Opcode, stack: bool) -> (usize, bool) {
    match op {
        Opcode::Nop | Opcode::Term | Opcode::Host => (0, false),

        Opcode::Set | Opcode::Vpush | Opcode::Vpop => (2, false),

        Opcode::Jmp | Opcode::Call => (1, true),

        Opcode::Inc | Opcode::Dec | Opcode::Push | Opcode::Pop | Opcode::Ret => (1, false),

        // The tested value comes from the stack in stack mode; the target
        // stays inline either way.
        Opcode::Jf | Opcode::Jt => (if stack { 1 } else { 2 }, true),

        Opcode::Not | Opcode::Neg => (if stack { 0 } else { 1 }, false),

        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::Mod
        | Opcode::Or
        | Opcode::And
        | Opcode::Xor
        | Opcode::Shl
        | Opcode::Shr
        | Opcode::Andl
        | Opcode::Orl
        | Opcode::Eq
        | Opcode::Ne
        | Opcode::Gt
        | Opcode::Lt
        | Opcode::Ge
        | Opcode::Le => (if stack { 0 } else { 2 }, false),
    }
}

fn render_instruction(
    code: &[u8],
    pc: &mut u64,
    op: Opcode,
    stack: bool,
) -> Result<String, DecodeError> {
    let (count, jump) = shape(op, stack);
    let mut line = op.mnemonic().to_string();

    for i in 0..count {
        if jump && i == count - 1 {
            let target = operand::decode_jump(code, pc)?;
            line.push_str(&format!(" L{target:05}"));
        } else {
            let operand = operand::decode(code, pc)?;
            if operand.indirect {
                line.push_str(&format!(" @{}", operand.value));
            } else {
                line.push_str(&format!(" {}", operand.value));
            }
        }
    }

    Ok(line)
}
