//! Variable storage
//!
//! Six name partitions: integer, text, and real scalars, and the three
//! array kinds. The resolver hands out [`Slot`] tokens that index by
//! `(kind, name, index)` instead of borrowing into the maps, so nested
//! evaluator calls can keep resolving while a write target is held.

use std::collections::HashMap;
use std::fmt;

/// Scalar kind of a resolved reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Integer,
    Text,
    Real,
}

/// A scalar value moving between the store and the evaluators.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Text(String),
    Real(f64),
}

impl Value {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Value::Integer(_) => ScalarKind::Integer,
            Value::Text(_) => ScalarKind::Text,
            Value::Real(_) => ScalarKind::Real,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value}"),
            Value::Real(value) => write!(f, "{value}"),
        }
    }
}

/// Resolved reference to one storage slot: a plain scalar, or an array
/// element whose index has already been evaluated and bounds-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub kind: ScalarKind,
    pub name: String,
    pub index: Option<usize>,
}

/// Outcome of resolving `name-index` against the array partitions.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayLookup {
    Found(Slot),
    OutOfBounds,
    Missing,
}

/// Process-wide variable state, partitioned by kind. A name lives in at
/// most one partition; declarations unbind before they insert.
#[derive(Debug, Default)]
pub struct VariableStore {
    integers: HashMap<String, i64>,
    texts: HashMap<String, String>,
    reals: HashMap<String, f64>,
    integer_arrays: HashMap<String, Vec<i64>>,
    text_arrays: HashMap<String, Vec<String>>,
    real_arrays: HashMap<String, Vec<f64>>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn unbind(&mut self, name: &str) {
        self.integers.remove(name);
        self.texts.remove(name);
        self.reals.remove(name);
        self.integer_arrays.remove(name);
        self.text_arrays.remove(name);
        self.real_arrays.remove(name);
    }

    pub fn declare_integer(&mut self, name: &str, value: i64) {
        self.unbind(name);
        self.integers.insert(name.to_string(), value);
    }

    pub fn declare_text(&mut self, name: &str, value: String) {
        self.unbind(name);
        self.texts.insert(name.to_string(), value);
    }

    pub fn declare_real(&mut self, name: &str, value: f64) {
        self.unbind(name);
        self.reals.insert(name.to_string(), value);
    }

    pub fn declare_integer_array(&mut self, name: &str, size: usize, fill: i64) {
        self.unbind(name);
        self.integer_arrays.insert(name.to_string(), vec![fill; size]);
    }

    pub fn declare_text_array(&mut self, name: &str, size: usize, fill: &str) {
        self.unbind(name);
        self.text_arrays
            .insert(name.to_string(), vec![fill.to_string(); size]);
    }

    pub fn declare_real_array(&mut self, name: &str, size: usize, fill: f64) {
        self.unbind(name);
        self.real_arrays.insert(name.to_string(), vec![fill; size]);
    }

    /// Scalar lookup, partition order integer, text, real.
    pub fn lookup_scalar(&self, name: &str) -> Option<Slot> {
        let kind = if self.integers.contains_key(name) {
            ScalarKind::Integer
        } else if self.texts.contains_key(name) {
            ScalarKind::Text
        } else if self.reals.contains_key(name) {
            ScalarKind::Real
        } else {
            return None;
        };
        Some(Slot {
            kind,
            name: name.to_string(),
            index: None,
        })
    }

    /// Array element lookup, partition order integer, real, text. The
    /// index is checked against the array found, and only then.
    pub fn lookup_element(&self, name: &str, index: i64) -> ArrayLookup {
        let (kind, len) = if let Some(values) = self.integer_arrays.get(name) {
            (ScalarKind::Integer, values.len())
        } else if let Some(values) = self.real_arrays.get(name) {
            (ScalarKind::Real, values.len())
        } else if let Some(values) = self.text_arrays.get(name) {
            (ScalarKind::Text, values.len())
        } else {
            return ArrayLookup::Missing;
        };
        if index < 0 || index as usize >= len {
            return ArrayLookup::OutOfBounds;
        }
        ArrayLookup::Found(Slot {
            kind,
            name: name.to_string(),
            index: Some(index as usize),
        })
    }

    /// Read the value behind a slot. `None` when the slot went stale.
    pub fn read(&self, slot: &Slot) -> Option<Value> {
        match (slot.kind, slot.index) {
            (ScalarKind::Integer, None) => self.integers.get(&slot.name).map(|&v| Value::Integer(v)),
            (ScalarKind::Text, None) => self.texts.get(&slot.name).map(|v| Value::Text(v.clone())),
            (ScalarKind::Real, None) => self.reals.get(&slot.name).map(|&v| Value::Real(v)),
            (ScalarKind::Integer, Some(i)) => self
                .integer_arrays
                .get(&slot.name)
                .and_then(|a| a.get(i))
                .map(|&v| Value::Integer(v)),
            (ScalarKind::Text, Some(i)) => self
                .text_arrays
                .get(&slot.name)
                .and_then(|a| a.get(i))
                .map(|v| Value::Text(v.clone())),
            (ScalarKind::Real, Some(i)) => self
                .real_arrays
                .get(&slot.name)
                .and_then(|a| a.get(i))
                .map(|&v| Value::Real(v)),
        }
    }

    /// Write through a slot. `None` when the slot went stale or the
    /// value kind does not match it.
    pub fn write(&mut self, slot: &Slot, value: Value) -> Option<()> {
        match (slot.kind, slot.index, value) {
            (ScalarKind::Integer, None, Value::Integer(v)) => {
                *self.integers.get_mut(&slot.name)? = v;
            }
            (ScalarKind::Text, None, Value::Text(v)) => {
                *self.texts.get_mut(&slot.name)? = v;
            }
            (ScalarKind::Real, None, Value::Real(v)) => {
                *self.reals.get_mut(&slot.name)? = v;
            }
            (ScalarKind::Integer, Some(i), Value::Integer(v)) => {
                *self.integer_arrays.get_mut(&slot.name)?.get_mut(i)? = v;
            }
            (ScalarKind::Text, Some(i), Value::Text(v)) => {
                *self.text_arrays.get_mut(&slot.name)?.get_mut(i)? = v;
            }
            (ScalarKind::Real, Some(i), Value::Real(v)) => {
                *self.real_arrays.get_mut(&slot.name)?.get_mut(i)? = v;
            }
            _ => return None,
        }
        Some(())
    }
}
