//! Rewrites console input so that evaluating it yields what the user meant.
//!
//! Evaluated as a program, `{}` is an empty block, `{"a": 1}` is a syntax
//! error and `{a: 1}` is a block holding a labeled statement. Those cases are
//! parenthesised; anything else that parses as a program is left alone.

use crate::{
    ast::{Program, SourceType, StmtKind},
    diagnostics::{Diagnostic, DiagnosticKind, SourceSpan},
    parser::{EcmaGrammar, Grammar},
};

pub struct Normalizer<G = EcmaGrammar> {
    grammar: G,
}

impl Normalizer<EcmaGrammar> {
    pub fn new() -> Self {
        Self::with_grammar(EcmaGrammar)
    }
}

impl Default for Normalizer<EcmaGrammar> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Grammar> Normalizer<G> {
    pub fn with_grammar(grammar: G) -> Self {
        Self { grammar }
    }

    /// Rewrites `source` for evaluation. With `require_expression`, input
    /// holding anything beyond a single expression is rejected.
    pub fn normalize(&self, source: &str, require_expression: bool) -> Result<String, Diagnostic> {
        if !require_expression {
            if let Ok(program) = self.grammar.parse_program(source) {
                return Ok(rewrite_program(source, &program));
            }
        }

        let expr = self.grammar.parse_expression_at(source, 0)?;
        let end = expr.span.end.min(source.len());
        let tail = &source[end..];
        let remainder = tail.trim();
        if !remainder.is_empty() {
            let start = end + (tail.len() - tail.trim_start().len());
            self.check_remainder(remainder, start)?;
        }

        let text = &source[..end];
        if expr.kind.needs_parens_as_statement() {
            log::debug!("wrapping literal expression in parentheses");
            Ok(format!("({text})"))
        } else {
            Ok(text.to_string())
        }
    }

    /// Trailing text after an expression may only be semicolons and comments.
    fn check_remainder(&self, remainder: &str, offset: usize) -> Result<(), Diagnostic> {
        let span = SourceSpan::new(offset, offset + remainder.len());
        let program = self.grammar.parse_program(remainder).map_err(|err| {
            Diagnostic::new(DiagnosticKind::Normalize, "Syntax error beyond expression")
                .with_span(span)
                .with_note(err.message)
        })?;
        if program.source_type != SourceType::Script {
            return Err(
                Diagnostic::new(DiagnosticKind::Normalize, "Unexpected code beyond expression")
                    .with_span(span),
            );
        }
        let statements = program
            .body
            .iter()
            .skip_while(|stmt| matches!(stmt.kind, StmtKind::Empty))
            .count();
        if statements != 0 {
            return Err(
                Diagnostic::new(DiagnosticKind::Normalize, "Only one expression expected")
                    .with_span(span),
            );
        }
        log::debug!("discarding inert trailing text {remainder:?}");
        Ok(())
    }
}

fn rewrite_program(source: &str, program: &Program) -> String {
    if let [stmt] = program.body.as_slice() {
        if let StmtKind::Block(body) = &stmt.kind {
            match body.as_slice() {
                [] => {
                    log::debug!("empty block read as an empty object literal");
                    return "({})".to_string();
                }
                [inner] if is_labeled_expression(&inner.kind) => {
                    // The line break keeps a trailing line comment off the paren.
                    log::debug!("labeled block read as an unquoted object literal");
                    return format!("({source}\n)");
                }
                _ => {}
            }
        }
    }
    source.to_string()
}

fn is_labeled_expression(kind: &StmtKind) -> bool {
    matches!(kind, StmtKind::Labeled { body, .. } if matches!(body.kind, StmtKind::Expr(_)))
}

/// Normalizes with the built-in grammar.
pub fn rewrite_for_eval(source: &str, require_expression: bool) -> Result<String, Diagnostic> {
    Normalizer::new().normalize(source, require_expression)
}
