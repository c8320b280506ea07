//! Runtime variable storage

use std::fmt;

use indexmap::IndexMap;

use super::value::Value;

/// Flat name→value store
///
/// Names are not scope-qualified. Semantic analysis accepts a procedure-local
/// variable that shadows an outer one, but both would share one slot here.
/// Procedure bodies are never executed, so today only the main program's
/// statements write to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeStore {
    values: IndexMap<String, Value>,
}

impl RuntimeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite any previous value for `name`
    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_ascii_uppercase(), value);
    }

    /// Case-insensitive read
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name.to_ascii_uppercase().as_str()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Entries in first-assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for RuntimeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        Ok(())
    }
}
