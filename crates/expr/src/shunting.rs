//! Shunting-yard: infix token stream → postfix queue.

use crate::error::ExprError;
use crate::lexer::Token;

/// Reorder infix tokens into postfix.
///
/// Operands go straight to the output queue. An operator first pops every
/// stacked operator of equal-or-higher precedence (strictly higher for a
/// right-associative operator, of which the grammar currently has none).
/// Parentheses never reach the output.
pub(crate) fn shunting_yard(tokens: Vec<Token>) -> Result<Vec<Token>, ExprError> {
    let mut queue = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::Cell(_) => queue.push(token),

            Token::Operator(o1) => {
                while let Some(&Token::Operator(o2)) = stack.last() {
                    let pops = if o1.right_associative {
                        o1.precedence < o2.precedence
                    } else {
                        o1.precedence <= o2.precedence
                    };
                    if !pops {
                        break;
                    }
                    stack.pop();
                    queue.push(Token::Operator(o2));
                }
                stack.push(token);
            }

            Token::LeftParen => stack.push(token),

            Token::RightParen => loop {
                match stack.pop() {
                    Some(Token::LeftParen) => break,
                    Some(op) => queue.push(op),
                    None => return Err(ExprError::MismatchedParens),
                }
            },
        }
    }

    while let Some(token) = stack.pop() {
        if matches!(token, Token::LeftParen) {
            return Err(ExprError::MismatchedParens);
        }
        queue.push(token);
    }

    Ok(queue)
}
