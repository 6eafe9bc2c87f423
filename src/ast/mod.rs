//! AST module for mupl
//!
//! This module provides the typed Abstract Syntax Tree produced by lowering a
//! [`ParseTree`](crate::syntax::ParseTree), the form table that drives early
//! arity validation, and the builder that performs the lowering.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::Serialize;
use std::fmt;

use crate::encoding::IdentifierEncoder;

pub mod builder;
pub mod forms;

pub use builder::{build_ast, AstBuilder, BuildOptions};
pub use forms::{SpecialForm, FORM_TABLE};

/// Name bound to the empty list; list literals end in a reference to it.
pub const NULL_NAME: &str = "null";

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// The variadic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorKind {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "<")]
    Less,
}

impl OperatorKind {
    pub const fn symbol(&self) -> &'static str {
        match self {
            OperatorKind::Add => "+",
            OperatorKind::Sub => "-",
            OperatorKind::Mul => "*",
            OperatorKind::Less => "<",
        }
    }
}

/// A single `(name expression)` entry of a `let` binding list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub name: String,
    pub expression: Ast,
}

/// The lowered AST. Each node owns its children.
///
/// List literals have no variant of their own; they become nested [`Ast::Pair`]
/// nodes ending in `Var("null")`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Ast {
    Number {
        value: i64,
    },
    Var {
        name: String,
    },
    Call {
        callee: Box<Ast>,
        args: Vec<Ast>,
    },
    Lambda {
        parameters: Vec<String>,
        body: Box<Ast>,
    },
    Fun {
        name: String,
        parameters: Vec<String>,
        body: Box<Ast>,
    },
    Let {
        bindings: Vec<Binding>,
        body: Box<Ast>,
    },
    If {
        test: Box<Ast>,
        consequent: Box<Ast>,
        alternate: Box<Ast>,
    },
    Operator {
        kind: OperatorKind,
        terms: Vec<Ast>,
    },
    Pair {
        first: Box<Ast>,
        second: Box<Ast>,
    },
    First {
        expression: Box<Ast>,
    },
    Second {
        expression: Box<Ast>,
    },
    NullCheck {
        expression: Box<Ast>,
    },
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl Ast {
    pub fn number(value: i64) -> Self {
        Ast::Number { value }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Ast::Var { name: name.into() }
    }

    pub fn null() -> Self {
        Ast::var(NULL_NAME)
    }

    pub fn pair(first: Ast, second: Ast) -> Self {
        Ast::Pair {
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    pub fn operator(kind: OperatorKind, terms: Vec<Ast>) -> Self {
        Ast::Operator { kind, terms }
    }
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Ast {
    /// Variant name, as used in the JSON `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Ast::Number { .. } => "number",
            Ast::Var { .. } => "var",
            Ast::Call { .. } => "call",
            Ast::Lambda { .. } => "lambda",
            Ast::Fun { .. } => "fun",
            Ast::Let { .. } => "let",
            Ast::If { .. } => "if",
            Ast::Operator { .. } => "operator",
            Ast::Pair { .. } => "pair",
            Ast::First { .. } => "first",
            Ast::Second { .. } => "second",
            Ast::NullCheck { .. } => "null_check",
        }
    }

    /// Returns a copy of this tree with every binding and reference name
    /// passed through `encoder`.
    pub fn encode_names(&self, encoder: &mut IdentifierEncoder) -> Ast {
        match self {
            Ast::Number { value } => Ast::number(*value),
            Ast::Var { name } => Ast::var(encoder.encode(name)),
            Ast::Call { callee, args } => Ast::Call {
                callee: Box::new(callee.encode_names(encoder)),
                args: args.iter().map(|a| a.encode_names(encoder)).collect(),
            },
            Ast::Lambda { parameters, body } => Ast::Lambda {
                parameters: encode_all(parameters, encoder),
                body: Box::new(body.encode_names(encoder)),
            },
            Ast::Fun {
                name,
                parameters,
                body,
            } => Ast::Fun {
                name: encoder.encode(name).to_string(),
                parameters: encode_all(parameters, encoder),
                body: Box::new(body.encode_names(encoder)),
            },
            Ast::Let { bindings, body } => Ast::Let {
                bindings: bindings
                    .iter()
                    .map(|b| Binding {
                        name: encoder.encode(&b.name).to_string(),
                        expression: b.expression.encode_names(encoder),
                    })
                    .collect(),
                body: Box::new(body.encode_names(encoder)),
            },
            Ast::If {
                test,
                consequent,
                alternate,
            } => Ast::If {
                test: Box::new(test.encode_names(encoder)),
                consequent: Box::new(consequent.encode_names(encoder)),
                alternate: Box::new(alternate.encode_names(encoder)),
            },
            Ast::Operator { kind, terms } => Ast::Operator {
                kind: *kind,
                terms: terms.iter().map(|t| t.encode_names(encoder)).collect(),
            },
            Ast::Pair { first, second } => {
                Ast::pair(first.encode_names(encoder), second.encode_names(encoder))
            }
            Ast::First { expression } => Ast::First {
                expression: Box::new(expression.encode_names(encoder)),
            },
            Ast::Second { expression } => Ast::Second {
                expression: Box::new(expression.encode_names(encoder)),
            },
            Ast::NullCheck { expression } => Ast::NullCheck {
                expression: Box::new(expression.encode_names(encoder)),
            },
        }
    }

    /// Pretty-prints the tree as an s-expression in lowered form.
    pub fn pretty(&self) -> String {
        self.to_string()
    }
}

fn encode_all(names: &[String], encoder: &mut IdentifierEncoder) -> Vec<String> {
    names.iter().map(|n| encoder.encode(n).to_string()).collect()
}

// ------------------------------------------------------------------------
// Pretty-printing helpers
// ------------------------------------------------------------------------

fn write_spaced<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Number { value } => write!(f, "{}", value),
            Ast::Var { name } => write!(f, "{}", name),
            Ast::Call { callee, args } => {
                write!(f, "(call {}", callee)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Ast::Lambda { parameters, body } => {
                write!(f, "(lambda (")?;
                write_spaced(f, parameters)?;
                write!(f, ") {})", body)
            }
            Ast::Fun {
                name,
                parameters,
                body,
            } => {
                write!(f, "(fun {} (", name)?;
                write_spaced(f, parameters)?;
                write!(f, ") {})", body)
            }
            Ast::Let { bindings, body } => {
                write!(f, "(let (")?;
                for (i, binding) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({} {})", binding.name, binding.expression)?;
                }
                write!(f, ") {})", body)
            }
            Ast::If {
                test,
                consequent,
                alternate,
            } => write!(f, "(if {} {} {})", test, consequent, alternate),
            Ast::Operator { kind, terms } => {
                write!(f, "({} ", kind.symbol())?;
                write_spaced(f, terms)?;
                write!(f, ")")
            }
            Ast::Pair { first, second } => write!(f, "(pair {} {})", first, second),
            Ast::First { expression } => write!(f, "(first {})", expression),
            Ast::Second { expression } => write!(f, "(second {})", expression),
            Ast::NullCheck { expression } => write!(f, "(null? {})", expression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_prints_lowered_forms() {
        let ast = Ast::Fun {
            name: "add".into(),
            parameters: vec!["x".into(), "y".into()],
            body: Box::new(Ast::operator(
                OperatorKind::Add,
                vec![Ast::var("x"), Ast::var("y")],
            )),
        };
        assert_eq!(ast.pretty(), "(fun add (x y) (+ x y))");
    }

    #[test]
    fn serializes_with_type_tag() {
        let ast = Ast::pair(Ast::number(1), Ast::null());
        let json = serde_json::to_value(&ast).unwrap();
        assert_eq!(json["type"], "pair");
        assert_eq!(json["first"]["value"], 1);
        assert_eq!(json["second"]["name"], "null");
    }

    #[test]
    fn operator_kind_serializes_as_symbol() {
        let json = serde_json::to_value(Ast::operator(
            OperatorKind::Less,
            vec![Ast::number(1), Ast::number(2)],
        ))
        .unwrap();
        assert_eq!(json["kind"], "<");
    }
}
