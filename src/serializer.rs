//! Converts live values back into source text.
//!
//! Primitives become literals. Functions, regular expressions, dates, arrays
//! and errors become their definitions. Every other object and every symbol
//! becomes a selector expression obtained from a [`SelectorResolver`].

use crate::{
    date,
    diagnostics::{LiveSourceError, Result},
    kind::Kind,
    number::number_to_source,
    value::{ObjectClass, ObjectRef, Value},
};

/// Supplies a stable path expression for values that cannot be decomposed.
pub trait SelectorResolver {
    fn selector_for(&self, value: &Value) -> Option<String>;
}

impl<F> SelectorResolver for F
where
    F: Fn(&Value) -> Option<String>,
{
    fn selector_for(&self, value: &Value) -> Option<String> {
        self(value)
    }
}

/// Resolver that knows no selectors.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSelectors;

impl SelectorResolver for NoSelectors {
    fn selector_for(&self, _value: &Value) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct SerializerConfig {
    /// Arrays longer than this are referenced by selector instead of spelled out.
    pub max_array_len: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self { max_array_len: 100 }
    }
}

/// Every structured value visited during one top-level call, in visit order.
/// A value reached a second time counts as recursion, even without a cycle.
#[derive(Default)]
pub struct SeenSet {
    visited: Vec<ObjectRef>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, object: &ObjectRef) -> bool {
        self.visited.iter().any(|seen| seen.ptr_eq(object))
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    fn enter(&mut self, object: &ObjectRef) -> Result<()> {
        if self.contains(object) {
            return Err(LiveSourceError::Recursion);
        }
        self.visited.push(object.clone());
        Ok(())
    }
}

pub struct Serializer<'r> {
    resolver: &'r dyn SelectorResolver,
    config: SerializerConfig,
}

impl<'r> Serializer<'r> {
    pub fn new(resolver: &'r dyn SelectorResolver) -> Self {
        Self {
            resolver,
            config: SerializerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    /// Renders `value` with a fresh seen-set.
    pub fn to_source(&self, value: &Value) -> Result<String> {
        let mut seen = SeenSet::new();
        self.to_source_with(value, &mut seen)
    }

    /// Like [`Serializer::to_source`], but a missing selector yields the
    /// lookup failure's message as the result instead of an error.
    pub fn to_source_safe(&self, value: &Value) -> Result<String> {
        match self.to_source(value) {
            Err(err @ LiveSourceError::NoSelector { .. }) => Ok(err.to_string()),
            other => other,
        }
    }

    pub fn to_source_with(&self, value: &Value, seen: &mut SeenSet) -> Result<String> {
        let kind = Kind::of(value);
        match value {
            Value::Undefined => Ok("undefined".to_string()),
            Value::Null => Ok("null".to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(number_to_source(*n)),
            Value::String(s) => Ok(string_literal(s)),
            Value::Symbol(_) => self.selector_source(value, kind),
            Value::Object(object) => {
                if let ObjectClass::Function { source } = &object.borrow().class {
                    return Ok(source.to_string());
                }
                seen.enter(object)?;
                self.object_source(value, object, kind, seen)
            }
        }
    }

    fn object_source(
        &self,
        value: &Value,
        object: &ObjectRef,
        kind: Kind,
        seen: &mut SeenSet,
    ) -> Result<String> {
        match kind {
            Kind::RegExp => {
                if let ObjectClass::RegExp { pattern, flags } = &object.borrow().class {
                    let pattern = if pattern.is_empty() { "(?:)" } else { pattern.as_str() };
                    return Ok(format!("/{pattern}/{flags}"));
                }
            }
            Kind::Date => {
                if let ObjectClass::Date { time } = object.borrow().class {
                    let text = date::to_json_text(time).unwrap_or_else(|| "null".to_string());
                    return Ok(format!("Date('{text}')"));
                }
            }
            Kind::Array => {
                if let Some(text) = self.array_source(object, seen)? {
                    return Ok(text);
                }
            }
            Kind::Error(Some(error_kind)) => match self.error_message_source(object, seen) {
                Some(message) => {
                    return Ok(format!("{}({message})", error_kind.constructor_name()));
                }
                None => log::debug!("error message has no source form; using selector"),
            },
            Kind::Error(None) => log::debug!("unrecognised error constructor; using selector"),
            _ => {}
        }
        self.selector_source(value, kind)
    }

    /// `Ok(None)` sends the array down the selector path: it is too long, or
    /// one of its elements was already visited during this call.
    fn array_source(&self, object: &ObjectRef, seen: &mut SeenSet) -> Result<Option<String>> {
        let elements = match &object.borrow().class {
            ObjectClass::Array(elements) => elements.clone(),
            _ => return Ok(None),
        };
        if elements.len() > self.config.max_array_len {
            log::debug!(
                "array of length {} exceeds limit {}; using selector",
                elements.len(),
                self.config.max_array_len
            );
            return Ok(None);
        }
        let mut parts = Vec::with_capacity(elements.len());
        for element in &elements {
            match element {
                None => parts.push(String::new()),
                Some(item) => match self.to_source_with(item, seen) {
                    Ok(text) => parts.push(text),
                    Err(LiveSourceError::Recursion) => {
                        log::debug!("array element already visited; using selector");
                        return Ok(None);
                    }
                    Err(err) => return Err(err),
                },
            }
        }
        let mut text = parts.join(", ");
        // A trailing comma is elided by the grammar, so a final hole needs one more.
        if matches!(elements.last(), Some(None)) {
            text.push(',');
        }
        Ok(Some(format!("[{text}]")))
    }

    fn error_message_source(&self, object: &ObjectRef, seen: &mut SeenSet) -> Option<String> {
        // Known error prototypes supply an empty `message`.
        let message = object.get("message").unwrap_or_else(|| Value::string(""));
        if matches!(message, Value::Undefined) {
            return Some(String::new());
        }
        self.to_source_with(&message, seen).ok()
    }

    fn selector_source(&self, value: &Value, kind: Kind) -> Result<String> {
        if !matches!(
            kind,
            Kind::Symbol
                | Kind::RegExp
                | Kind::Date
                | Kind::Array
                | Kind::Error(_)
                | Kind::Object
        ) {
            return Err(LiveSourceError::UnsupportedType(value.type_of()));
        }
        self.resolver
            .selector_for(value)
            .filter(|selector| !selector.is_empty())
            .ok_or(LiveSourceError::NoSelector {
                kind: kind.reference_name(),
            })
    }
}

/// Double-quoted literal with JSON escaping, which is also valid source.
pub fn string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
