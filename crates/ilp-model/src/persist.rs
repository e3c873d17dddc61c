//! JSON save/load of a problem's model (not its solution).

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::bound::Bound;
use crate::entity::{VarType, Variable};
use crate::error::{EntityKind, IlpError};
use crate::linear::{Linear, Term};
use crate::problem::{Direction, LinearProblem, check_name_length};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRecord {
    pub name: String,
    pub var_type: VarType,
    pub bound: Bound,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub objective: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintRecord {
    pub name: String,
    pub bound: Bound,
    /// `(variable name, coefficient)` pairs.
    #[serde(default)]
    pub terms: Vec<(String, f64)>,
}

/// Name-based, self-contained description of a problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_name: Option<String>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub variables: Vec<VariableRecord>,
    #[serde(default)]
    pub constraints: Vec<ConstraintRecord>,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

impl ProblemDocument {
    pub fn from_json(json: &str) -> Result<Self, IlpError> {
        serde_json::from_str(json).map_err(|e| IlpError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, IlpError> {
        serde_json::to_string_pretty(self).map_err(|e| IlpError::Serialization(e.to_string()))
    }
}

impl<B: Backend> LinearProblem<B> {
    pub fn to_document(&self) -> Result<ProblemDocument, IlpError> {
        let objective = self.objective_linear().unwrap_or_default();
        let variables = self
            .variables()
            .map(|v| {
                Ok(VariableRecord {
                    name: self.name(v)?.to_string(),
                    var_type: self.variable_type(v)?,
                    bound: self.bound(v)?,
                    objective: objective.coefficient(v).unwrap_or(0.0),
                })
            })
            .collect::<Result<_, IlpError>>()?;
        let constraints = self
            .constraints()
            .map(|c| {
                let terms = match self.linear(c)? {
                    Some(linear) => linear
                        .iter()
                        .map(|t| Ok((self.name(t.variable)?.to_string(), t.coefficient)))
                        .collect::<Result<_, IlpError>>()?,
                    None => Vec::new(),
                };
                Ok(ConstraintRecord {
                    name: self.name(c)?.to_string(),
                    bound: self.bound(c)?,
                    terms,
                })
            })
            .collect::<Result<_, IlpError>>()?;

        Ok(ProblemDocument {
            name: self.name_of_problem().map(str::to_string),
            objective_name: self.objective_name().map(str::to_string),
            direction: self.objective_direction(),
            variables,
            constraints,
        })
    }

    /// Add the document's variables and constraints to this problem and
    /// merge its objective coefficients into the current objective.
    /// Returns the created variables in document order.
    ///
    /// The whole document is checked before anything is added, so a
    /// rejected document leaves the problem unchanged.
    pub fn append_document(&mut self, document: &ProblemDocument) -> Result<Vec<Variable>, IlpError> {
        self.check_document(document)?;

        let mut by_name = HashMap::with_capacity(document.variables.len());
        let mut created = Vec::with_capacity(document.variables.len());
        let mut objective = self.objective_linear().unwrap_or_default();

        for record in &document.variables {
            let variable = self.add_variable(&record.name, record.var_type)?;
            if record.var_type != VarType::Bool {
                self.set_bound(variable, record.bound)?;
            }
            objective.add(Term::new(record.objective, variable));
            by_name.insert(record.name.as_str(), variable);
            created.push(variable);
        }

        for record in &document.constraints {
            let linear: Linear = record
                .terms
                .iter()
                .filter_map(|(name, coef)| by_name.get(name.as_str()).map(|&v| Term::new(*coef, v)))
                .collect();
            self.add_constraint_with(&record.name, Some(&linear), record.bound.lower(), record.bound.upper())?;
        }

        self.set_objective_linear(Some(&objective))?;
        self.set_objective_direction(document.direction);
        if document.name.is_some() {
            self.set_problem_name(document.name.as_deref())?;
        }
        if document.objective_name.is_some() {
            self.set_objective_name(document.objective_name.as_deref())?;
        }
        tracing::info!(
            component = "persist",
            operation = "append_document",
            status = "success",
            variables = document.variables.len(),
            constraints = document.constraints.len(),
            "Loaded problem document"
        );
        Ok(created)
    }

    /// Every check `append_document` would otherwise hit halfway through.
    fn check_document(&self, document: &ProblemDocument) -> Result<(), IlpError> {
        let mut variables = HashSet::with_capacity(document.variables.len());
        for record in &document.variables {
            self.check_name(EntityKind::Variable, &record.name)?;
            if !variables.insert(record.name.as_str()) {
                return Err(IlpError::DuplicateName {
                    kind: EntityKind::Variable,
                    name: record.name.clone(),
                });
            }
            if record.var_type != VarType::Bool {
                record.bound.validate()?;
            }
            if record.objective.is_nan() {
                return Err(IlpError::invalid("coefficient is NaN"));
            }
        }

        let mut constraints = HashSet::with_capacity(document.constraints.len());
        for record in &document.constraints {
            self.check_name(EntityKind::Constraint, &record.name)?;
            if !constraints.insert(record.name.as_str()) {
                return Err(IlpError::DuplicateName {
                    kind: EntityKind::Constraint,
                    name: record.name.clone(),
                });
            }
            record.bound.validate()?;
            for (name, coef) in &record.terms {
                if !variables.contains(name.as_str()) {
                    return Err(IlpError::Serialization(format!(
                        "constraint {:?} references unknown variable {:?}",
                        record.name, name
                    )));
                }
                if coef.is_nan() {
                    return Err(IlpError::invalid("coefficient is NaN"));
                }
            }
        }

        for name in [&document.name, &document.objective_name].into_iter().flatten() {
            check_name_length(name)?;
        }
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), IlpError> {
        let json = self.to_document()?.to_json()?;
        fs::write(path.as_ref(), json)?;
        tracing::info!(
            component = "persist",
            operation = "save",
            status = "success",
            path = %path.as_ref().display(),
            "Saved problem"
        );
        Ok(())
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Vec<Variable>, IlpError> {
        let json = fs::read_to_string(path.as_ref())?;
        let document = ProblemDocument::from_json(&json)?;
        self.append_document(&document)
    }
}
