use indexmap::IndexMap;

use crate::{serializer::SelectorResolver, value::Value};

/// Named bindings for reference values. Serves both directions: a path
/// expression resolves to its value, and a value resolves to the first path
/// bound to it.
#[derive(Default)]
pub struct SelectorRegistry {
    bindings: IndexMap<String, Value>,
}

impl SelectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `path` to `value`, replacing any earlier binding of that path.
    pub fn bind(&mut self, path: impl Into<String>, value: Value) {
        self.bindings.insert(path.into(), value);
    }

    pub fn unbind(&mut self, path: &str) -> Option<Value> {
        self.bindings.shift_remove(path)
    }

    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.bindings.get(path)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(path, value)| (path.as_str(), value))
    }
}

impl SelectorResolver for SelectorRegistry {
    fn selector_for(&self, value: &Value) -> Option<String> {
        if !matches!(value, Value::Object(_) | Value::Symbol(_)) {
            return None;
        }
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == value)
            .map(|(path, _)| path.clone())
    }
}
