//! Operand control-byte codec.
//!
//! Every operand is a control byte followed by 0–8 payload bytes:
//!
//! ```text
//! Bit 7:     REG_PTR:   the decoded value is a memory index to read through
//! Bit 6:     SHORT_VAL: bits 5..0 are the value itself; no payload
//! Bits 5..0: short value (0..=63), or payload byte count when SHORT_VAL
//!            is clear
//! ```
//!
//! Wide payloads are little-endian and fill the low bytes of a zeroed u64.
//! Jump targets are a special mode: no control byte appears in the stream;
//! a control byte of `2` is synthesized, yielding a fixed 2-byte absolute
//! address.
//!
//! Decoding stops at the REG_PTR flag: the engine applies the indirection
//! against its memory, the disassembler renders it as `@value`.

use crate::error::DecodeError;

/// Control-byte flag: the decoded value is an `io` index to read through.
pub const REG_PTR: u8 = 0x80;
/// Control-byte flag: the low 6 bits are the value; no payload follows.
pub const SHORT_VAL: u8 = 0x40;
/// Mask for the low 6 bits of the control byte.
pub const CONTROL_MASK: u8 = 0x3F;
/// Largest value expressible in short form.
pub const MAX_SHORT_VAL: u64 = 63;
/// Largest legal wide-payload length in bytes.
pub const MAX_PAYLOAD_LEN: u8 = 8;
/// Synthesized control byte for jump targets: wide, 2 bytes, no indirection.
pub const JUMP_CONTROL: u8 = 0x02;

/// A decoded operand before indirection is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOperand {
    /// The literal decoded value.
    pub value: u64,
    /// Whether REG_PTR was set on the control byte.
    pub indirect: bool,
}

/// Decode one operand at `*pc`, advancing `*pc` past it.
pub fn decode(code: &[u8], pc: &mut u64) -> Result<RawOperand, DecodeError> {
    let at = *pc;
    if at >= code.len() as u64 {
        return Err(DecodeError::OutOfCode { at });
    }
    let control = code[at as usize];
    *pc = at + 1;
    decode_with_control(code, pc, control)
}

/// Decode a jump target at `*pc`: a bare 2-byte little-endian address.
pub fn decode_jump(code: &[u8], pc: &mut u64) -> Result<u64, DecodeError> {
    let operand = decode_with_control(code, pc, JUMP_CONTROL)?;
    Ok(operand.value)
}

fn decode_with_control(
    code: &[u8],
    pc: &mut u64,
    control: u8,
) -> Result<RawOperand, DecodeError> {
    let low = control & CONTROL_MASK;
    let indirect = control & REG_PTR != 0;

    let value = if control & SHORT_VAL != 0 {
        low as u64
    } else {
        if low > MAX_PAYLOAD_LEN {
            return Err(DecodeError::PayloadTooLong { at: *pc, len: low });
        }
        let len = low as u64;
        if *pc + len > code.len() as u64 {
            return Err(DecodeError::OutOfCode { at: *pc });
        }
        let mut buf = [0u8; 8];
        let start = *pc as usize;
        buf[..low as usize].copy_from_slice(&code[start..start + low as usize]);
        *pc += len;
        u64::from_le_bytes(buf)
    };

    Ok(RawOperand { value, indirect })
}
