//! Builds values from literal expressions, the inverse of the serializer.

use crate::{
    ast::{Expr, ExprKind, Literal, PropertyKey, UnaryOp},
    date,
    diagnostics::{Diagnostic, DiagnosticKind},
    number::number_to_string,
    selector::SelectorRegistry,
    value::{ErrorKind, Value},
};

/// Evaluates `expr`, parsed from `source`, without running any code.
/// Names resolve through `registry`.
pub fn reify(source: &str, expr: &Expr, registry: &SelectorRegistry) -> Result<Value, Diagnostic> {
    Reifier { source, registry }.value(expr)
}

struct Reifier<'a> {
    source: &'a str,
    registry: &'a SelectorRegistry,
}

impl Reifier<'_> {
    fn value(&self, expr: &Expr) -> Result<Value, Diagnostic> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(match literal {
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::string(s.as_str()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Null => Value::Null,
            }),
            ExprKind::Identifier(name) => match name.as_str() {
                "undefined" => Ok(Value::Undefined),
                "NaN" => Ok(Value::Number(f64::NAN)),
                "Infinity" => Ok(Value::Number(f64::INFINITY)),
                _ => self.bound(expr),
            },
            ExprKind::Field { .. } => self.bound(expr),
            ExprKind::Group(inner) => self.value(inner),
            ExprKind::Unary { op, expr: operand } => {
                let operand_value = self.value(operand)?;
                match (op, operand_value) {
                    (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Plus, Value::Number(n)) => Ok(Value::Number(n)),
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnaryOp::Void, _) => Ok(Value::Undefined),
                    _ => Err(self.unsupported(expr)),
                }
            }
            ExprKind::Array(elements) => {
                let items = elements
                    .iter()
                    .map(|element| element.as_ref().map(|item| self.value(item)).transpose())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::sparse_array(items))
            }
            ExprKind::Object(properties) => {
                let mut entries = Vec::with_capacity(properties.len());
                for property in properties {
                    let key = match &property.key {
                        PropertyKey::Identifier(name) => name.clone(),
                        PropertyKey::Literal(Literal::String(s)) => s.clone(),
                        PropertyKey::Literal(Literal::Number(n)) => number_to_string(*n),
                        _ => return Err(self.unsupported(&property.value)),
                    };
                    entries.push((key, self.value(&property.value)?));
                }
                Ok(Value::object_from(entries))
            }
            ExprKind::Regex { pattern, flags } => Ok(Value::regexp(pattern.as_str(), flags.as_str())),
            ExprKind::Function(_) => Ok(Value::function(self.text(expr))),
            ExprKind::Call { callee, args } | ExprKind::New { callee, args } => {
                self.construct(expr, callee, args)
            }
            _ => Err(self.unsupported(expr)),
        }
    }

    /// `Date(...)`, `Symbol(...)` and the error constructors.
    fn construct(&self, expr: &Expr, callee: &Expr, args: &[Expr]) -> Result<Value, Diagnostic> {
        let ExprKind::Identifier(name) = &callee.kind else {
            return Err(self.unsupported(expr));
        };
        let first = args.first().map(|arg| self.value(arg)).transpose()?;
        match (name.as_str(), first) {
            ("Date", Some(Value::String(text))) => Ok(Value::date(
                date::parse_json_text(&text).unwrap_or(f64::NAN),
            )),
            ("Date", Some(Value::Number(time))) => Ok(Value::date(time)),
            ("Symbol", None | Some(Value::Undefined)) => Ok(Value::symbol(None)),
            ("Symbol", Some(Value::String(text))) => Ok(Value::symbol(Some(&*text))),
            (name, message) => {
                let kind = ErrorKind::from_constructor_name(name)
                    .ok_or_else(|| self.unsupported(expr))?;
                let message = match message {
                    None | Some(Value::Undefined) => None,
                    Some(Value::String(text)) => Some(Value::String(text)),
                    Some(Value::Number(n)) => Some(Value::string(number_to_string(n))),
                    Some(_) => return Err(self.unsupported(expr)),
                };
                Ok(Value::error(kind, message))
            }
        }
    }

    fn bound(&self, expr: &Expr) -> Result<Value, Diagnostic> {
        let path = path_of(expr).ok_or_else(|| self.unsupported(expr))?;
        self.registry.lookup(&path).cloned().ok_or_else(|| {
            Diagnostic::new(DiagnosticKind::Evaluate, format!("`{path}` is not bound"))
                .with_span(expr.span)
        })
    }

    fn text(&self, expr: &Expr) -> &str {
        self.source.get(expr.span.start..expr.span.end).unwrap_or_default()
    }

    fn unsupported(&self, expr: &Expr) -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::Evaluate,
            format!("`{}` is not a literal value", self.text(expr)),
        )
        .with_span(expr.span)
    }
}

/// Dotted path for `a.b.c`, or `None` for any other shape.
fn path_of(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Identifier(name) => Some(name.clone()),
        ExprKind::Field { target, field } => Some(format!("{}.{field}", path_of(target)?)),
        ExprKind::Group(inner) => path_of(inner),
        _ => None,
    }
}
