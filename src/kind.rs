//! Structural classification of values.
//!
//! Each kind has exactly one recognition rule and the rules run in a fixed
//! order; supporting a new kind means adding a variant and a rule here.

use crate::value::{ErrorKind, Intrinsic, ObjectClass, ObjectRef, Prototype, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `undefined` or `null`.
    Absent,
    Number,
    Boolean,
    Text,
    Symbol,
    Function,
    RegExp,
    Date,
    Array,
    /// `None` when the error's constructor is not one of the known kinds.
    Error(Option<ErrorKind>),
    Object,
}

impl Kind {
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Undefined | Value::Null => Kind::Absent,
            Value::Number(_) => Kind::Number,
            Value::Bool(_) => Kind::Boolean,
            Value::String(_) => Kind::Text,
            Value::Symbol(_) => Kind::Symbol,
            Value::Object(object) => Self::of_object(object),
        }
    }

    fn of_object(object: &ObjectRef) -> Kind {
        let (exotic, error_class) = {
            let data = object.borrow();
            let proto = &data.prototype;
            let exotic = match &data.class {
                ObjectClass::Function { .. } => Some(Kind::Function),
                ObjectClass::RegExp { .. } if proto.is_intrinsic(Intrinsic::RegExpPrototype) => {
                    Some(Kind::RegExp)
                }
                ObjectClass::Date { .. } if proto.is_intrinsic(Intrinsic::DatePrototype) => {
                    Some(Kind::Date)
                }
                ObjectClass::Array(_) if proto.is_intrinsic(Intrinsic::ArrayPrototype) => {
                    Some(Kind::Array)
                }
                _ => None,
            };
            let error_class = matches!(data.class, ObjectClass::Error);
            (exotic, error_class)
        };
        if let Some(kind) = exotic {
            return kind;
        }
        if error_class || object.inherits_from(Intrinsic::ErrorPrototype(ErrorKind::Error)) {
            Kind::Error(Self::direct_error_kind(object))
        } else {
            Kind::Object
        }
    }

    fn direct_error_kind(object: &ObjectRef) -> Option<ErrorKind> {
        match object.borrow().prototype {
            Prototype::Intrinsic(Intrinsic::ErrorPrototype(kind)) => Some(kind),
            _ => None,
        }
    }

    /// Name used in lookup failures, matching `typeof` for reference values.
    pub fn reference_name(self) -> &'static str {
        match self {
            Kind::Symbol => "symbol",
            Kind::Function => "function",
            _ => "object",
        }
    }
}
