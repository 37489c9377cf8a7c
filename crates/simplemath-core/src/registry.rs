//! Equation registry: the object a `smath_new` handle points at.

use crate::equation::Equation;
use crate::error::MathError;

/// Index of an equation inside a [`SimpleMath`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EquationId(usize);

impl EquationId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Owns a growing list of equations addressed by dense ids.
#[derive(Debug, Default, Clone)]
pub struct SimpleMath {
    equations: Vec<Equation>,
}

impl SimpleMath {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and store an equation. A failed parse does not consume an id.
    pub fn add_equation<S: AsRef<str>>(
        &mut self,
        equation: &str,
        variables: &[S],
    ) -> Result<EquationId, MathError> {
        let parsed = Equation::parse(equation, variables)?;
        self.equations.push(parsed);
        Ok(EquationId(self.equations.len() - 1))
    }

    pub fn eval_equation(&self, id: EquationId, values: &[f64]) -> Result<f64, MathError> {
        self.get(id)
            .ok_or(MathError::UnknownEquation { id: id.0 })?
            .eval(values)
    }

    #[must_use]
    pub fn get(&self, id: EquationId) -> Option<&Equation> {
        self.equations.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_failures_do_not_consume() {
        let mut smath = SimpleMath::new();
        assert!(smath.is_empty());
        let a = smath.add_equation("x + 1", &["x"]).unwrap();
        assert!(smath.add_equation("x +", &["x"]).is_err());
        let b = smath.add_equation("2 * y", &["y"]).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(smath.len(), 2);
        assert_eq!(smath.eval_equation(a, &[1.0]), Ok(2.0));
        assert_eq!(smath.eval_equation(b, &[4.0]), Ok(8.0));
    }

    #[test]
    fn unknown_id() {
        let smath = SimpleMath::new();
        assert_eq!(
            smath.eval_equation(EquationId::new(3), &[]),
            Err(MathError::UnknownEquation { id: 3 })
        );
    }
}
