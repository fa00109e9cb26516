//! Emission: postfix queue → symbolic stack-mode program.
//!
//! The machine has dedicated stack-mode arithmetic, so no temporaries are
//! needed: operands become PUSH instructions and every operator becomes the
//! stack-mode form of the matching instruction, in queue order.

use std::fmt;

use gvm_common::{CodeBuilder, Opcode};

use crate::error::ExprError;
use crate::lexer::{tokenize, OpKind, Token};
use crate::shunting::shunting_yard;

/// One symbolic instruction of a compiled expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackInstr {
    /// `PUSH n`: push a literal.
    PushLiteral(u64),
    /// `PUSH @n`: push the contents of memory cell n.
    PushCell(u64),
    /// A stack-mode operator.
    Op(Opcode),
}

impl fmt::Display for StackInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackInstr::PushLiteral(n) => write!(f, "PUSH {n}"),
            StackInstr::PushCell(i) => write!(f, "PUSH @{i}"),
            StackInstr::Op(op) => f.write_str(op.mnemonic()),
        }
    }
}

/// Output separator between instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Space,
    Newline,
}

/// Compile an infix expression into a symbolic stack program.
pub fn compile(expr: &str) -> Result<Vec<StackInstr>, ExprError> {
    let tokens = tokenize(expr)?;
    let postfix = shunting_yard(tokens)?;
    emit(postfix)
}

/// Render a compiled program as text, one separator between instructions.
pub fn render(instrs: &[StackInstr], sep: Separator) -> String {
    let sep = match sep {
        Separator::Space => " ",
        Separator::Newline => "\n",
    };
    let mut out = instrs
        .iter()
        .map(StackInstr::to_string)
        .collect::<Vec<_>>()
        .join(sep);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Encode a compiled program as runnable bytecode.
pub fn encode(instrs: &[StackInstr]) -> Vec<u8> {
    let mut b = CodeBuilder::new();
    for instr in instrs {
        match *instr {
            StackInstr::PushLiteral(v) => {
                b.op(Opcode::Push).value(v);
            }
            StackInstr::PushCell(i) => {
                b.op(Opcode::Push).cell(i);
            }
            StackInstr::Op(op) => {
                b.stack_op(op);
            }
        }
    }
    b.finish()
}

fn emit(postfix: Vec<Token>) -> Result<Vec<StackInstr>, ExprError> {
    let mut out = Vec::with_capacity(postfix.len());
    // Virtual stack depth; an operator without operands under it is a
    // malformed expression (e.g. a doubled unary).
    let mut depth = 0usize;

    for token in postfix {
        match token {
            Token::Number(n) => {
                out.push(StackInstr::PushLiteral(n));
                depth += 1;
            }
            Token::Cell(i) => {
                out.push(StackInstr::PushCell(i));
                depth += 1;
            }
            Token::Operator(op) => {
                let needed = if op.unary { 1 } else { 2 };
                if depth < needed {
                    return Err(ExprError::MalformedExpression);
                }
                depth -= needed - 1;
                out.push(StackInstr::Op(opcode_for(op.kind)));
            }
            Token::LeftParen | Token::RightParen => {
                return Err(ExprError::MalformedExpression);
            }
        }
    }

    Ok(out)
}

fn opcode_for(kind: OpKind) -> Opcode {
    match kind {
        OpKind::Add => Opcode::Add,
        OpKind::Sub => Opcode::Sub,
        OpKind::Mul => Opcode::Mul,
        OpKind::Div => Opcode::Div,
        OpKind::Mod => Opcode::Mod,
        OpKind::BitAnd => Opcode::And,
        OpKind::BitOr => Opcode::Or,
        OpKind::BitXor => Opcode::Xor,
        OpKind::Shl => Opcode::Shl,
        OpKind::Shr => Opcode::Shr,
        OpKind::LogicAnd => Opcode::Andl,
        OpKind::LogicOr => Opcode::Orl,
        OpKind::Eq => Opcode::Eq,
        OpKind::Ne => Opcode::Ne,
        OpKind::Lt => Opcode::Lt,
        OpKind::Le => Opcode::Le,
        OpKind::Gt => Opcode::Gt,
        OpKind::Ge => Opcode::Ge,
        OpKind::BitNot => Opcode::Neg,
        OpKind::LogicNot => Opcode::Not,
    }
}
