//! Shunting-yard conversion from tokens to a reverse Polish program.
//!
//! The produced program is checked for stack balance before it is
//! returned, so evaluation never runs out of operands.

use crate::error::MathError;
use crate::lexer::{BinaryOp, Function, Token, UNARY_PRECEDENCE, UnaryOp};

/// One step of a compiled equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    Push(f64),
    /// Push the value bound to the variable at this index.
    Load(usize),
    Unary(UnaryOp),
    Binary(BinaryOp),
    Call(Function),
}

impl Instruction {
    /// Operands consumed from the value stack.
    #[must_use]
    pub const fn consumes(self) -> usize {
        match self {
            Self::Push(_) | Self::Load(_) => 0,
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
            Self::Call(func) => func.arity(),
        }
    }
}

/// Operator stack entry.
#[derive(Debug, Clone, Copy)]
enum Pending {
    Unary(UnaryOp),
    Binary(BinaryOp),
    /// An open parenthesis; `call` is set when it opens an argument list.
    Group {
        call: Option<Function>,
        commas: usize,
        output_mark: usize,
    },
}

impl Pending {
    fn precedence(self) -> Option<u8> {
        match self {
            Self::Unary(_) => Some(UNARY_PRECEDENCE),
            Self::Binary(op) => Some(op.precedence()),
            Self::Group { .. } => None,
        }
    }

    fn into_instruction(self) -> Option<Instruction> {
        match self {
            Self::Unary(op) => Some(Instruction::Unary(op)),
            Self::Binary(op) => Some(Instruction::Binary(op)),
            Self::Group { .. } => None,
        }
    }
}

/// Convert a token stream into a validated RPN program.
pub fn to_rpn(tokens: &[Token]) -> Result<Vec<Instruction>, MathError> {
    if tokens.is_empty() {
        return Err(MathError::EmptyEquation);
    }

    let mut output: Vec<Instruction> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        match *token {
            Token::Number(value) => output.push(Instruction::Push(value)),
            Token::Variable(idx) => output.push(Instruction::Load(idx)),
            Token::Unary(op) => stack.push(Pending::Unary(op)),
            Token::Binary(op) => {
                while let Some(&top) = stack.last() {
                    let Some(top_prec) = top.precedence() else {
                        break;
                    };
                    let pops = top_prec > op.precedence()
                        || (top_prec == op.precedence() && !op.right_associative());
                    if !pops {
                        break;
                    }
                    stack.pop();
                    output.extend(top.into_instruction());
                }
                stack.push(Pending::Binary(op));
            }
            Token::Function(func) => {
                if iter.next_if(|t| **t == Token::LParen).is_none() {
                    return Err(MathError::MissingArguments {
                        function: func.name(),
                    });
                }
                stack.push(Pending::Group {
                    call: Some(func),
                    commas: 0,
                    output_mark: output.len(),
                });
            }
            Token::LParen => stack.push(Pending::Group {
                call: None,
                commas: 0,
                output_mark: output.len(),
            }),
            Token::Comma => match drain_to_group(&mut stack, &mut output) {
                Ok(Pending::Group {
                    call: Some(func),
                    commas,
                    output_mark,
                }) => stack.push(Pending::Group {
                    call: Some(func),
                    commas: commas + 1,
                    output_mark,
                }),
                _ => return Err(MathError::MisplacedComma),
            },
            Token::RParen => {
                let Pending::Group {
                    call,
                    commas,
                    output_mark,
                } = drain_to_group(&mut stack, &mut output)?
                else {
                    return Err(MathError::MismatchedParentheses);
                };
                let empty = output.len() == output_mark;
                match call {
                    Some(func) => {
                        let found = if empty { 0 } else { commas + 1 };
                        if found != func.arity() {
                            return Err(MathError::ArityMismatch {
                                function: func.name(),
                                expected: func.arity(),
                                found,
                            });
                        }
                        output.push(Instruction::Call(func));
                    }
                    None if empty => return Err(MathError::MalformedExpression),
                    None => {}
                }
            }
        }
    }

    while let Some(top) = stack.pop() {
        match top.into_instruction() {
            Some(instr) => output.push(instr),
            None => return Err(MathError::MismatchedParentheses),
        }
    }

    check_balance(&output)?;
    Ok(output)
}

/// Pop operators into `output` until an open group is reached, then pop
/// and return that group.
fn drain_to_group(
    stack: &mut Vec<Pending>,
    output: &mut Vec<Instruction>,
) -> Result<Pending, MathError> {
    while let Some(top) = stack.pop() {
        match top.into_instruction() {
            Some(instr) => output.push(instr),
            None => return Ok(top),
        }
    }
    Err(MathError::MismatchedParentheses)
}

/// Simulate the value stack: every instruction must find its operands and
/// the program must leave exactly one value.
fn check_balance(program: &[Instruction]) -> Result<(), MathError> {
    let mut depth = 0usize;
    for instr in program {
        let needed = instr.consumes();
        if depth < needed {
            return Err(MathError::MalformedExpression);
        }
        depth = depth - needed + 1;
    }
    if depth == 1 {
        Ok(())
    } else {
        Err(MathError::MalformedExpression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn rpn(eq: &str) -> Result<Vec<Instruction>, MathError> {
        let tokens = tokenize(eq, &["x".to_string()])?;
        to_rpn(&tokens)
    }

    #[test]
    fn precedence_and_associativity() {
        use Instruction::*;
        assert_eq!(
            rpn("1+2*3").unwrap(),
            vec![
                Push(1.0),
                Push(2.0),
                Push(3.0),
                Binary(BinaryOp::Mul),
                Binary(BinaryOp::Add)
            ]
        );
        assert_eq!(
            rpn("2^3^2").unwrap(),
            vec![
                Push(2.0),
                Push(3.0),
                Push(2.0),
                Binary(BinaryOp::Pow),
                Binary(BinaryOp::Pow)
            ]
        );
        assert_eq!(
            rpn("8-4-2").unwrap(),
            vec![
                Push(8.0),
                Push(4.0),
                Binary(BinaryOp::Sub),
                Push(2.0),
                Binary(BinaryOp::Sub)
            ]
        );
    }

    #[test]
    fn unary_binds_below_power() {
        use Instruction::*;
        assert_eq!(
            rpn("-x^2").unwrap(),
            vec![
                Load(0),
                Push(2.0),
                Binary(BinaryOp::Pow),
                Unary(UnaryOp::Minus)
            ]
        );
        assert_eq!(
            rpn("-x*2").unwrap(),
            vec![
                Load(0),
                Unary(UnaryOp::Minus),
                Push(2.0),
                Binary(BinaryOp::Mul)
            ]
        );
    }

    #[test]
    fn function_calls() {
        use Instruction::*;
        assert_eq!(
            rpn("atan2(x, 1+1)").unwrap(),
            vec![
                Load(0),
                Push(1.0),
                Push(1.0),
                Binary(BinaryOp::Add),
                Call(Function::Atan2)
            ]
        );
        assert_eq!(
            rpn("if(x > 1, 1, 0)").unwrap().last(),
            Some(&Call(Function::If))
        );
    }

    #[test]
    fn arity_errors() {
        assert_eq!(
            rpn("sin(1, 2)"),
            Err(MathError::ArityMismatch {
                function: "sin",
                expected: 1,
                found: 2
            })
        );
        assert_eq!(
            rpn("mod(4)"),
            Err(MathError::ArityMismatch {
                function: "mod",
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            rpn("abs()"),
            Err(MathError::ArityMismatch {
                function: "abs",
                expected: 1,
                found: 0
            })
        );
        assert_eq!(
            rpn("sin x"),
            Err(MathError::MissingArguments { function: "sin" })
        );
    }

    #[test]
    fn structural_errors() {
        assert_eq!(rpn("(1+2"), Err(MathError::MismatchedParentheses));
        assert_eq!(rpn("1+2)"), Err(MathError::MismatchedParentheses));
        assert_eq!(rpn("1, 2"), Err(MathError::MisplacedComma));
        assert_eq!(rpn("(1, 2)"), Err(MathError::MisplacedComma));
        assert_eq!(rpn("()"), Err(MathError::MalformedExpression));
        assert_eq!(rpn("*2"), Err(MathError::MalformedExpression));
        assert_eq!(rpn("2(3)"), Err(MathError::MalformedExpression));
        assert_eq!(rpn("1+"), Err(MathError::MalformedExpression));
    }
}
