//! GASM expression compiler — infix expressions to GVM stack programs.
//!
//! The compiler lexes an infix expression over decimal literals and `@N`
//! memory-cell references, reorders it with the shunting-yard algorithm,
//! and emits a linear sequence of stack-mode instructions. Because the
//! machine's stack-mode arithmetic pops the right operand first, the
//! postfix order needs no temporaries: the left operand always sits below
//! the right on the value stack.
//!
//! # Usage
//!
//! ```
//! use gvm_expr::{compile, render, Separator};
//!
//! let program = compile("1+2*3").unwrap();
//! assert_eq!(
//!     render(&program, Separator::Space),
//!     "PUSH 1 PUSH 2 PUSH 3 MUL ADD\n"
//! );
//! ```

pub mod error;

mod compiler;
mod lexer;
mod shunting;

pub use compiler::{compile, encode, render, Separator, StackInstr};
pub use error::ExprError;
