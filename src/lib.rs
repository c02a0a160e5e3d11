//! Source-text tooling for a live programming console: renders runtime values
//! back to source that re-creates them (or names them), and rewrites console
//! input so that object literals and single expressions evaluate as intended.

pub mod ast;
pub mod date;
pub mod diagnostics;
pub mod kind;
pub mod lexer;
pub mod normalizer;
pub mod number;
pub mod parser;
pub mod reify;
pub mod repl;
pub mod selector;
pub mod serializer;
pub mod session;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticKind, LiveSourceError, SourceSpan};
pub use normalizer::{rewrite_for_eval, Normalizer};
pub use parser::{EcmaGrammar, Grammar};
pub use repl::Repl;
pub use selector::SelectorRegistry;
pub use serializer::{SeenSet, SelectorResolver, Serializer, SerializerConfig};
pub use session::{Session, SessionConfig};
pub use value::Value;
