//! Named, bounded hyperparameters with defaults.
//!
//! Algorithm constants that are worth tuning (history depth, line-search
//! slope tolerance) are carried as value objects: a name, a declared domain,
//! a current value and a default. Lookup by name fails loudly instead of
//! falling back to an implicit default.

use crate::error::SolverError;

/// Domain of admissible values for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Closed integer range `lo..=hi`.
    IntRange { lo: i64, hi: i64 },
    /// Closed real interval `[lo, hi]`.
    RealInterval { lo: f64, hi: f64 },
}

impl Domain {
    /// Whether `value` has the right kind and lies inside the domain.
    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (Domain::IntRange { lo, hi }, Value::Int(v)) => lo <= v && v <= hi,
            (Domain::RealInterval { lo, hi }, Value::Real(v)) => {
                v.is_finite() && lo <= v && v <= hi
            }
            _ => false,
        }
    }
}

/// A parameter value, integer or real.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
}

/// A single named tunable.
#[derive(Debug, Clone)]
pub struct Param {
    name: &'static str,
    domain: Domain,
    value: Value,
    default: Value,
}

impl Param {
    /// An integer parameter over `lo..=hi`, starting at its default.
    pub fn int(name: &'static str, default: i64, lo: i64, hi: i64) -> Self {
        Self {
            name,
            domain: Domain::IntRange { lo, hi },
            value: Value::Int(default),
            default: Value::Int(default),
        }
    }

    /// A real parameter over `[lo, hi]`, starting at its default.
    pub fn real(name: &'static str, default: f64, lo: f64, hi: f64) -> Self {
        Self {
            name,
            domain: Domain::RealInterval { lo, hi },
            value: Value::Real(default),
            default: Value::Real(default),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn default_value(&self) -> Value {
        self.default
    }

    /// The current value as an integer (reals are truncated).
    pub fn int_value(&self) -> i64 {
        match self.value {
            Value::Int(v) => v,
            Value::Real(v) => v as i64,
        }
    }

    /// The current value as a real.
    pub fn real_value(&self) -> f64 {
        match self.value {
            Value::Int(v) => v as f64,
            Value::Real(v) => v,
        }
    }
}

/// An ordered collection of parameters, addressed by name.
#[derive(Debug, Clone)]
pub struct ParamSet {
    params: Vec<Param>,
}

impl ParamSet {
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    /// The tunables of the L-BFGS solver: history depth `mem` and the
    /// line-search slope tolerance `tau1`.
    pub fn lbfgs_defaults() -> Self {
        Self::new(vec![
            Param::int("mem", 5, 1, 20),
            Param::real("tau1", 0.9999, 1.0e-4, 0.9999),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    /// Look a parameter up by name; absence is an error, never a default.
    pub fn get(&self, name: &str) -> Result<&Param, SolverError> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SolverError::UnknownParameter {
                name: name.to_string(),
            })
    }

    /// Replace a parameter's value after validating it against the domain.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), SolverError> {
        let param = self
            .params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| SolverError::UnknownParameter {
                name: name.to_string(),
            })?;
        if !param.domain.contains(&value) {
            return Err(SolverError::OutOfDomain {
                name: param.name.to_string(),
                value,
                domain: param.domain,
            });
        }
        param.value = value;
        Ok(())
    }
}
