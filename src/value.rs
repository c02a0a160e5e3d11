use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::Rc,
};

use indexmap::IndexMap;

/// Error constructors the serializer knows how to re-create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
    PermissionError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::Error,
        ErrorKind::EvalError,
        ErrorKind::RangeError,
        ErrorKind::ReferenceError,
        ErrorKind::SyntaxError,
        ErrorKind::TypeError,
        ErrorKind::UriError,
        ErrorKind::PermissionError,
    ];

    pub fn constructor_name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::EvalError => "EvalError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::UriError => "URIError",
            ErrorKind::PermissionError => "PermissionError",
        }
    }

    pub fn from_constructor_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.constructor_name() == name)
    }
}

/// Built-in prototype objects, compared by identity rather than by shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    ObjectPrototype,
    ArrayPrototype,
    FunctionPrototype,
    RegExpPrototype,
    DatePrototype,
    ErrorPrototype(ErrorKind),
}

#[derive(Clone)]
pub enum Prototype {
    Null,
    Intrinsic(Intrinsic),
    Object(ObjectRef),
}

impl Prototype {
    pub fn is_intrinsic(&self, intrinsic: Intrinsic) -> bool {
        matches!(self, Prototype::Intrinsic(found) if *found == intrinsic)
    }
}

/// Internal slot data that distinguishes exotic objects from ordinary ones.
#[derive(Clone)]
pub enum ObjectClass {
    Ordinary,
    /// Dense storage where `None` marks a hole.
    Array(Vec<Option<Value>>),
    Function {
        source: Rc<str>,
    },
    RegExp {
        pattern: String,
        flags: String,
    },
    /// Milliseconds since the Unix epoch; NaN for an invalid date.
    Date {
        time: f64,
    },
    Error,
}

pub struct JsObject {
    pub prototype: Prototype,
    pub class: ObjectClass,
    pub properties: IndexMap<String, Value>,
}

/// Shared handle to a heap object. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<JsObject>>);

impl ObjectRef {
    pub fn new(prototype: Prototype, class: ObjectClass) -> Self {
        Self(Rc::new(RefCell::new(JsObject {
            prototype,
            class,
            properties: IndexMap::new(),
        })))
    }

    pub fn borrow(&self) -> Ref<'_, JsObject> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, JsObject> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.borrow().properties.get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.borrow_mut().properties.insert(key.into(), value);
    }

    /// Walks the prototype chain looking for `intrinsic`.
    pub fn inherits_from(&self, intrinsic: Intrinsic) -> bool {
        let mut proto = self.borrow().prototype.clone();
        loop {
            match proto {
                Prototype::Null => return false,
                Prototype::Intrinsic(found) => {
                    // Every error prototype chains to `Error.prototype`.
                    return found == intrinsic
                        || matches!(
                            (found, intrinsic),
                            (
                                Intrinsic::ErrorPrototype(_),
                                Intrinsic::ErrorPrototype(ErrorKind::Error)
                            )
                        );
                }
                Prototype::Object(next) => {
                    let parent = next.borrow().prototype.clone();
                    proto = parent;
                }
            }
        }
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

pub struct Symbol {
    pub description: Option<String>,
}

/// Unique symbol handle. Equality is identity.
#[derive(Clone)]
pub struct SymbolRef(Rc<Symbol>);

impl SymbolRef {
    pub fn new(description: Option<String>) -> Self {
        Self(Rc::new(Symbol { description }))
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    pub fn ptr_eq(&self, other: &SymbolRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for SymbolRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

#[derive(Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Symbol(SymbolRef),
    Object(ObjectRef),
}

impl Value {
    pub fn string(value: impl Into<Rc<str>>) -> Self {
        Value::String(value.into())
    }

    pub fn symbol(description: Option<&str>) -> Self {
        Value::Symbol(SymbolRef::new(description.map(str::to_string)))
    }

    pub fn object() -> Self {
        Value::Object(ObjectRef::new(
            Prototype::Intrinsic(Intrinsic::ObjectPrototype),
            ObjectClass::Ordinary,
        ))
    }

    pub fn object_from(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        let object = ObjectRef::new(
            Prototype::Intrinsic(Intrinsic::ObjectPrototype),
            ObjectClass::Ordinary,
        );
        object.borrow_mut().properties.extend(entries);
        Value::Object(object)
    }

    pub fn array(values: Vec<Value>) -> Self {
        Self::sparse_array(values.into_iter().map(Some).collect())
    }

    pub fn sparse_array(elements: Vec<Option<Value>>) -> Self {
        Value::Object(ObjectRef::new(
            Prototype::Intrinsic(Intrinsic::ArrayPrototype),
            ObjectClass::Array(elements),
        ))
    }

    /// A function value; `source` is its definition text, verbatim.
    pub fn function(source: impl Into<Rc<str>>) -> Self {
        Value::Object(ObjectRef::new(
            Prototype::Intrinsic(Intrinsic::FunctionPrototype),
            ObjectClass::Function {
                source: source.into(),
            },
        ))
    }

    pub fn native_function(name: &str) -> Self {
        Self::function(format!("function {name}() {{ [native code] }}"))
    }

    pub fn regexp(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Value::Object(ObjectRef::new(
            Prototype::Intrinsic(Intrinsic::RegExpPrototype),
            ObjectClass::RegExp {
                pattern: pattern.into(),
                flags: flags.into(),
            },
        ))
    }

    pub fn date(time: f64) -> Self {
        Value::Object(ObjectRef::new(
            Prototype::Intrinsic(Intrinsic::DatePrototype),
            ObjectClass::Date { time },
        ))
    }

    pub fn error(kind: ErrorKind, message: Option<Value>) -> Self {
        let object = ObjectRef::new(
            Prototype::Intrinsic(Intrinsic::ErrorPrototype(kind)),
            ObjectClass::Error,
        );
        if let Some(message) = message {
            object.set("message", message);
        }
        Value::Object(object)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Result of the `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(object) => match object.borrow().class {
                ObjectClass::Function { .. } => "function",
                _ => "object",
            },
        }
    }

    /// Identity for reference values, SameValue for primitives.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                (a.is_nan() && b.is_nan()) || (a == b && a.is_sign_negative() == b.is_sign_negative())
            }
            _ => self == other,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(symbol) => {
                write!(f, "Symbol({})", symbol.description().unwrap_or_default())
            }
            Value::Object(object) => match &object.borrow().class {
                ObjectClass::Ordinary => write!(f, "<object>"),
                ObjectClass::Array(elements) => write!(f, "<array len={}>", elements.len()),
                ObjectClass::Function { .. } => write!(f, "<function>"),
                ObjectClass::RegExp { pattern, flags } => write!(f, "/{pattern}/{flags}"),
                ObjectClass::Date { time } => write!(f, "<date {time}>"),
                ObjectClass::Error => write!(f, "<error>"),
            },
        }
    }
}
