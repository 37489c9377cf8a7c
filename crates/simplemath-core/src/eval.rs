//! Reverse Polish evaluation of compiled equations.

use crate::error::MathError;
use crate::lexer::{BinaryOp, Function, UnaryOp};
use crate::parser::Instruction;

const TRUE: f64 = 1.0;
const FALSE: f64 = 0.0;

#[inline]
fn truth(b: bool) -> f64 {
    if b { TRUE } else { FALSE }
}

impl UnaryOp {
    #[must_use]
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Plus => v,
            Self::Minus => -v,
        }
    }
}

impl BinaryOp {
    /// Comparison and logical operators yield `1.0` / `0.0`; any non-zero
    /// operand counts as true.
    #[must_use]
    pub fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            Self::Add => l + r,
            Self::Sub => l - r,
            Self::Mul => l * r,
            Self::Div => l / r,
            Self::Pow => l.powf(r),
            Self::And => truth(l != 0.0 && r != 0.0),
            Self::Or => truth(l != 0.0 || r != 0.0),
            Self::Eq => truth(l == r),
            Self::Ne => truth(l != r),
            Self::Lt => truth(l < r),
            Self::Gt => truth(l > r),
            Self::Le => truth(l <= r),
            Self::Ge => truth(l >= r),
        }
    }
}

impl Function {
    /// Apply to exactly [`Function::arity`] arguments, in call order.
    pub fn apply(self, args: &[f64]) -> Result<f64, MathError> {
        let arg = |i: usize| args.get(i).copied().ok_or(MathError::MalformedExpression);
        Ok(match self {
            Self::Sin => arg(0)?.sin(),
            Self::Cos => arg(0)?.cos(),
            Self::Tan => arg(0)?.tan(),
            Self::Asin => arg(0)?.asin(),
            Self::Acos => arg(0)?.acos(),
            Self::Atan => arg(0)?.atan(),
            Self::Atan2 => arg(0)?.atan2(arg(1)?),
            Self::Exp => arg(0)?.exp(),
            Self::Log => arg(0)?.ln(),
            Self::Abs => arg(0)?.abs(),
            Self::Mod => modulo(arg(0)?, arg(1)?)?,
            Self::If => {
                if arg(0)? != FALSE {
                    arg(1)?
                } else {
                    arg(2)?
                }
            }
        })
    }
}

/// Integer remainder with the sign of the dividend.
fn modulo(l: f64, r: f64) -> Result<f64, MathError> {
    if l.fract() != 0.0 || r.fract() != 0.0 {
        return Err(MathError::ModRequiresIntegers);
    }
    if r == 0.0 {
        return Err(MathError::ModByZero);
    }
    Ok(l % r)
}

/// Run `program` with variable values bound by index.
///
/// Programs from [`crate::parser::to_rpn`] are stack-balanced; a
/// malformed hand-built program is reported, not panicked on.
pub fn execute(program: &[Instruction], values: &[f64]) -> Result<f64, MathError> {
    let mut stack: Vec<f64> = Vec::with_capacity(program.len());
    for instr in program {
        match *instr {
            Instruction::Push(v) => stack.push(v),
            Instruction::Load(idx) => {
                let v = values
                    .get(idx)
                    .copied()
                    .ok_or(MathError::ValueCountMismatch {
                        expected: idx + 1,
                        found: values.len(),
                    })?;
                stack.push(v);
            }
            Instruction::Unary(op) => {
                let v = pop(&mut stack)?;
                stack.push(op.apply(v));
            }
            Instruction::Binary(op) => {
                let r = pop(&mut stack)?;
                let l = pop(&mut stack)?;
                stack.push(op.apply(l, r));
            }
            Instruction::Call(func) => {
                let base = stack
                    .len()
                    .checked_sub(func.arity())
                    .ok_or(MathError::MalformedExpression)?;
                let result = func.apply(&stack[base..])?;
                stack.truncate(base);
                stack.push(result);
            }
        }
    }
    match stack.as_slice() {
        [result] => Ok(*result),
        _ => Err(MathError::MalformedExpression),
    }
}

fn pop(stack: &mut Vec<f64>) -> Result<f64, MathError> {
    stack.pop().ok_or(MathError::MalformedExpression)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_results_are_unit_values() {
        assert_eq!(BinaryOp::And.apply(2.0, -1.0), 1.0);
        assert_eq!(BinaryOp::And.apply(2.0, 0.0), 0.0);
        assert_eq!(BinaryOp::Or.apply(0.0, 0.5), 1.0);
        assert_eq!(BinaryOp::Le.apply(1.0, 1.0), 1.0);
        assert_eq!(BinaryOp::Ne.apply(1.0, 1.0), 0.0);
    }

    #[test]
    fn modulo_rules() {
        assert_eq!(Function::Mod.apply(&[7.0, 3.0]), Ok(1.0));
        assert_eq!(Function::Mod.apply(&[-7.0, 3.0]), Ok(-1.0));
        assert_eq!(
            Function::Mod.apply(&[7.5, 3.0]),
            Err(MathError::ModRequiresIntegers)
        );
        assert_eq!(Function::Mod.apply(&[7.0, 0.0]), Err(MathError::ModByZero));
        assert_eq!(
            Function::Mod.apply(&[f64::INFINITY, 2.0]),
            Err(MathError::ModRequiresIntegers)
        );
    }

    #[test]
    fn if_selects_branch() {
        assert_eq!(Function::If.apply(&[1.0, 10.0, 20.0]), Ok(10.0));
        assert_eq!(Function::If.apply(&[0.0, 10.0, 20.0]), Ok(20.0));
        assert_eq!(Function::If.apply(&[f64::NAN, 10.0, 20.0]), Ok(10.0));
    }

    #[test]
    fn malformed_program_is_an_error() {
        let program = [Instruction::Push(1.0), Instruction::Binary(BinaryOp::Add)];
        assert_eq!(
            execute(&program, &[]),
            Err(MathError::MalformedExpression)
        );
        let program = [Instruction::Push(1.0), Instruction::Push(2.0)];
        assert_eq!(
            execute(&program, &[]),
            Err(MathError::MalformedExpression)
        );
    }

    #[test]
    fn division_by_zero_is_ieee() {
        let program = [
            Instruction::Push(1.0),
            Instruction::Push(0.0),
            Instruction::Binary(BinaryOp::Div),
        ];
        assert_eq!(execute(&program, &[]), Ok(f64::INFINITY));
    }
}
