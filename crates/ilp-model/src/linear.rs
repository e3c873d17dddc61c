use std::ops::Deref;

use indexmap::IndexMap;

use crate::entity::Variable;
use crate::error::IlpError;

/// A `coefficient * variable` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub coefficient: f64,
    pub variable: Variable,
}

impl Term {
    pub fn new(coefficient: f64, variable: Variable) -> Self {
        Self {
            coefficient,
            variable,
        }
    }
}

/// A sparse linear form, at most one term per variable.
///
/// Terms iterate in insertion order. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linear {
    terms: IndexMap<Variable, f64>,
}

impl Linear {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(coefficient: f64, variable: Variable) -> Self {
        let mut linear = Self::new();
        linear.add(Term::new(coefficient, variable));
        linear
    }

    /// Pair up coefficients and variables. Zero coefficients are skipped.
    pub fn from_slices(coefficients: &[f64], variables: &[Variable]) -> Result<Self, IlpError> {
        if coefficients.len() != variables.len() {
            return Err(IlpError::invalid(format!(
                "coefficients size ({}) != variables size ({})",
                coefficients.len(),
                variables.len()
            )));
        }
        Ok(coefficients
            .iter()
            .zip(variables)
            .map(|(&c, &v)| Term::new(c, v))
            .collect())
    }

    /// Add a term. A term over a variable already present is summed into it;
    /// the term disappears if the sum is zero.
    pub fn add(&mut self, term: Term) {
        if term.coefficient == 0.0 {
            return;
        }
        let coefficient = self.terms.entry(term.variable).or_insert(0.0);
        *coefficient += term.coefficient;
        if *coefficient == 0.0 {
            self.terms.shift_remove(&term.variable);
        }
    }

    /// Replace the coefficient of a variable, keeping its position.
    pub fn set(&mut self, coefficient: f64, variable: Variable) {
        if coefficient == 0.0 {
            self.terms.shift_remove(&variable);
        } else {
            self.terms.insert(variable, coefficient);
        }
    }

    pub fn remove(&mut self, variable: Variable) -> Option<Term> {
        self.terms
            .shift_remove(&variable)
            .map(|coefficient| Term::new(coefficient, variable))
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn coefficient(&self, variable: Variable) -> Option<f64> {
        self.terms.get(&variable).copied()
    }

    pub fn contains(&self, variable: Variable) -> bool {
        self.terms.contains_key(&variable)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Term> + '_ {
        self.terms.iter().map(|(&v, &c)| Term::new(c, v))
    }

    pub fn variables(&self) -> impl ExactSizeIterator<Item = Variable> + '_ {
        self.terms.keys().copied()
    }

    pub fn freeze(self) -> ImmutableLinear {
        ImmutableLinear(self)
    }
}

impl Extend<Term> for Linear {
    fn extend<I: IntoIterator<Item = Term>>(&mut self, iter: I) {
        for term in iter {
            self.add(term);
        }
    }
}

impl FromIterator<Term> for Linear {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut linear = Linear::new();
        linear.extend(iter);
        linear
    }
}

/// A frozen copy of a [`Linear`]; read access only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImmutableLinear(Linear);

impl ImmutableLinear {
    /// Copy the terms out into a mutable expression.
    pub fn to_linear(&self) -> Linear {
        self.0.clone()
    }
}

impl Deref for ImmutableLinear {
    type Target = Linear;

    fn deref(&self) -> &Linear {
        &self.0
    }
}

impl From<Linear> for ImmutableLinear {
    fn from(linear: Linear) -> Self {
        linear.freeze()
    }
}

impl From<&Linear> for ImmutableLinear {
    fn from(linear: &Linear) -> Self {
        linear.clone().freeze()
    }
}
