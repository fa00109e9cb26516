//! Dispatch loop and per-opcode execution for the GVM machine.

use crate::error::VmError;
use crate::machine::{Machine, REG_COUNT, REG_R};
use gvm_common::error::DecodeError;
use gvm_common::opcode::Opcode;
use gvm_common::operand;

impl<'a> Machine<'a> {
    /// Execute until termination: natural end of code, TERM, a fault, or
    /// the instruction limit.
    ///
    /// Resets the fault and the instruction count, but not PC: the program
    /// counter is `io[0]` and belongs to the shared memory, so the host
    /// decides where a run starts. Returns `Ok(())` iff the run ended with
    /// PC past the end of code; the same outcome stays readable through
    /// [`Machine::status`] until the next run.
    pub fn run(&mut self, limit: u64) -> Result<(), VmError> {
        self.fault = None;
        self.count = 0;

        let result = self.dispatch_loop(limit);
        if let Err(fault) = &result {
            self.fault = Some(fault.clone());
        }
        result
    }

    fn dispatch_loop(&mut self, limit: u64) -> Result<(), VmError> {
        while self.pc() < self.code.len() as u64 {
            self.count += 1;
            if self.count > limit {
                return Err(VmError::OpLimitReached { limit });
            }

            let at = self.pc();
            let byte = self.code[at as usize];
            self.opcode = byte;
            self.set_pc(at + 1);
            self.step(byte, at)?;
        }
        Ok(())
    }

    fn step(&mut self, byte: u8, at: u64) -> Result<(), VmError> {
        let (op, stack) =
            Opcode::unpack(byte).map_err(|_| VmError::InvalidOpcode { opcode: byte, at })?;
        if stack && !op.has_stack_mode() {
            return Err(VmError::InvalidOpcode { opcode: byte, at });
        }

        match op {
            Opcode::Nop => Ok(()),
            Opcode::Term => {
                // u64::MAX exceeds any code length, so the loop exits OK.
                self.set_pc(u64::MAX);
                Ok(())
            }

            Opcode::Set => {
                let dest = self.read_value(at)?;
                let value = self.read_value(at)?;
                self.store(at, dest, value)
            }
            Opcode::Jmp => {
                let target = self.read_target(at)?;
                self.set_pc(target);
                Ok(())
            }

            Opcode::Add => self.binary(at, stack, |a, b| a.wrapping_add(b)),
            Opcode::Sub => self.exec_sub(at, stack),
            Opcode::Mul => self.binary(at, stack, |a, b| a.wrapping_mul(b)),
            Opcode::Div => self.exec_div_mod(at, stack, |a, b| a / b),
            Opcode::Mod => self.exec_div_mod(at, stack, |a, b| a % b),

            Opcode::Or => self.binary(at, stack, |a, b| a | b),
            Opcode::Andl => self.binary(at, stack, |a, b| (a != 0 && b != 0) as u64),
            Opcode::Xor => self.binary(at, stack, |a, b| a ^ b),
            Opcode::Not => self.unary(at, stack, |a| (a == 0) as u64),
            Opcode::Shl => self.binary(at, stack, |a, b| a.wrapping_shl(b as u32)),
            Opcode::Shr => self.binary(at, stack, |a, b| a.wrapping_shr(b as u32)),

            Opcode::Inc => self.exec_adjust(at, |v| v.wrapping_add(1)),
            Opcode::Dec => self.exec_adjust(at, |v| v.wrapping_sub(1)),

            Opcode::Push => {
                let value = self.read_value(at)?;
                self.stack.push(value);
                Ok(())
            }
            Opcode::Pop => self.exec_pop(at),

            Opcode::And => self.binary(at, stack, |a, b| a & b),
            Opcode::Host => {
                self.exec_host();
                Ok(())
            }

            Opcode::Vpush => self.exec_vpush(at),
            Opcode::Vpop => self.exec_vpop(at),

            Opcode::Call => self.exec_call(at),
            Opcode::Ret => self.exec_ret(at),

            Opcode::Jf => self.exec_branch(at, stack, false),
            Opcode::Jt => self.exec_branch(at, stack, true),

            Opcode::Eq => self.binary(at, stack, |a, b| (a == b) as u64),
            Opcode::Ne => self.binary(at, stack, |a, b| (a != b) as u64),
            Opcode::Gt => self.binary(at, stack, |a, b| (a > b) as u64),
            Opcode::Lt => self.binary(at, stack, |a, b| (a < b) as u64),
            Opcode::Ge => self.binary(at, stack, |a, b| (a >= b) as u64),
            Opcode::Le => self.binary(at, stack, |a, b| (a <= b) as u64),

            Opcode::Neg => self.unary(at, stack, |a| !a),
            Opcode::Orl => self.binary(at, stack, |a, b| (a != 0 || b != 0) as u64),
        }
    }

    // ---- Operand access ----

    /// Decode the next operand and apply REG_PTR indirection.
    fn read_value(&mut self, at: u64) -> Result<u64, VmError> {
        let opcode = self.opcode;
        let mut pc = self.pc();
        let raw = operand::decode(self.code.as_slice(), &mut pc)
            .map_err(|e| Self::operand_fault(e, opcode, at))?;
        self.set_pc(pc);
        if raw.indirect {
            self.load(at, raw.value)
        } else {
            Ok(raw.value)
        }
    }

    /// Decode a 2-byte absolute jump target.
    fn read_target(&mut self, at: u64) -> Result<u64, VmError> {
        let opcode = self.opcode;
        let mut pc = self.pc();
        let target = operand::decode_jump(self.code.as_slice(), &mut pc)
            .map_err(|e| Self::operand_fault(e, opcode, at))?;
        self.set_pc(pc);
        Ok(target)
    }

    fn operand_fault(err: DecodeError, opcode: u8, at: u64) -> VmError {
        match err {
            DecodeError::OutOfCode { at } => VmError::OutOfCode { at },
            // An ill-formed operand encoding makes the instruction invalid.
            _ => VmError::InvalidOpcode { opcode, at },
        }
    }

    /// Fetch both operands of a binary instruction. Register mode decodes
    /// left then right; stack mode pops right (top of stack) then left.
    fn operands(&mut self, at: u64, stack: bool) -> Result<(u64, u64), VmError> {
        if stack {
            let b = self.pop(at)?;
            let a = self.pop(at)?;
            Ok((a, b))
        } else {
            let a = self.read_value(at)?;
            let b = self.read_value(at)?;
            Ok((a, b))
        }
    }

    /// Deliver a result: push in stack mode, write R in register mode.
    fn put_result(&mut self, stack: bool, value: u64) {
        if stack {
            self.stack.push(value);
        } else {
            self.io[REG_R] = value;
        }
    }

    // ---- Instruction bodies ----

    fn binary(&mut self, at: u64, stack: bool, f: fn(u64, u64) -> u64) -> Result<(), VmError> {
        let (a, b) = self.operands(at, stack)?;
        self.put_result(stack, f(a, b));
        Ok(())
    }

    fn unary(&mut self, at: u64, stack: bool, f: fn(u64) -> u64) -> Result<(), VmError> {
        let a = if stack {
            self.pop(at)?
        } else {
            self.read_value(at)?
        };
        self.put_result(stack, f(a));
        Ok(())
    }

    fn exec_sub(&mut self, at: u64, stack: bool) -> Result<(), VmError> {
        let (a, b) = self.operands(at, stack)?;
        // The wrapped result is written even when the fault is raised;
        // observers see both.
        self.put_result(stack, a.wrapping_sub(b));
        if a < b {
            return Err(VmError::ArithmeticUnderflow { at });
        }
        Ok(())
    }

    fn exec_div_mod(
        &mut self,
        at: u64,
        stack: bool,
        f: fn(u64, u64) -> u64,
    ) -> Result<(), VmError> {
        let (a, b) = self.operands(at, stack)?;
        if b == 0 {
            // No result is delivered: R keeps its value, nothing is pushed.
            return Err(VmError::DivisionByZero { at });
        }
        self.put_result(stack, f(a, b));
        Ok(())
    }

    fn exec_adjust(&mut self, at: u64, f: fn(u64) -> u64) -> Result<(), VmError> {
        let index = self.read_value(at)?;
        let value = f(self.load(at, index)?);
        self.store(at, index, value)
    }

    fn exec_pop(&mut self, at: u64) -> Result<(), VmError> {
        // Underflow is checked before the destination operand is decoded.
        if self.stack.is_empty() {
            return Err(VmError::StackUnderflow { at });
        }
        let dest = self.read_value(at)?;
        let value = self.pop(at)?;
        self.store(at, dest, value)
    }

    fn exec_vpush(&mut self, at: u64) -> Result<(), VmError> {
        let cursor = self.read_value(at)?;
        let value = self.read_value(at)?;
        let top = self.load(at, cursor)?.wrapping_add(1);
        self.store(at, cursor, top)?;
        self.store(at, top, value)
    }

    fn exec_vpop(&mut self, at: u64) -> Result<(), VmError> {
        let cursor = self.read_value(at)?;
        let dest = self.read_value(at)?;
        let top = self.load(at, cursor)?;
        let value = self.load(at, top)?;
        self.store(at, dest, value)?;
        self.store(at, cursor, top.wrapping_sub(1))
    }

    fn exec_call(&mut self, at: u64) -> Result<(), VmError> {
        let target = self.read_target(at)?;
        // PC is already past the operand, so the saved frame holds the
        // return address.
        let mut frame = [0u64; REG_COUNT];
        frame.copy_from_slice(&self.io[..REG_COUNT]);
        self.context.push(frame);
        self.set_pc(target);
        Ok(())
    }

    fn exec_ret(&mut self, at: u64) -> Result<(), VmError> {
        let value = self.read_value(at)?;
        match self.context.pop() {
            Some(frame) => {
                self.io[..REG_COUNT].copy_from_slice(&frame);
                // The return value overrides the restored R.
                self.io[REG_R] = value;
                Ok(())
            }
            None => Err(VmError::ReturnWithoutCall { at }),
        }
    }

    fn exec_branch(&mut self, at: u64, stack: bool, jump_if_true: bool) -> Result<(), VmError> {
        let test = if stack {
            self.pop(at)?
        } else {
            self.read_value(at)?
        };
        // The target is consumed whether or not the branch is taken.
        let target = self.read_target(at)?;
        if (test != 0) == jump_if_true {
            self.set_pc(target);
        }
        Ok(())
    }

    fn exec_host(&mut self) {
        if let Some(hook) = self.host.as_mut() {
            // PC is already past the HOST opcode byte; the hook sees it in
            // io[0] and may rewrite anything, including the code.
            hook(&mut *self.io, &mut *self.code);
        }
    }
}
