//! Syntax module for mupl
//!
//! The parse tree is the reader's output and the lowering stage's input. It is
//! a plain parenthesized tree: leaves carry a literal, `Open` nodes carry the
//! forms written between a pair of parentheses.

use std::fmt;

pub mod parser;

/// A token as produced by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number(i64),
    Identifier(String),
    /// String literal. The reader accepts these; lowering rejects them.
    Str(String),
    /// An opening parenthesis; the node's children are the enclosed forms.
    Open,
}

impl Token {
    /// Name of the token kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Number(_) => "number",
            Token::Identifier(_) => "identifier",
            Token::Str(_) => "string",
            Token::Open => "open",
        }
    }
}

/// One node of the parse tree. Only `Open` nodes have children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub token: Token,
    pub children: Vec<ParseTree>,
}

impl ParseTree {
    pub fn number(value: i64) -> Self {
        Self::leaf(Token::Number(value))
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::leaf(Token::Identifier(name.into()))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::leaf(Token::Str(text.into()))
    }

    pub fn open(children: Vec<ParseTree>) -> Self {
        ParseTree {
            token: Token::Open,
            children,
        }
    }

    fn leaf(token: Token) -> Self {
        ParseTree {
            token,
            children: Vec::new(),
        }
    }

    /// The identifier text, if this node is a plain identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.token {
            Token::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.token, Token::Open)
    }
}

/// Renders the tree back as source text; used in error messages.
impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Token::Number(n) => write!(f, "{}", n),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Str(text) => write!(f, "\"{}\"", text),
            Token::Open => {
                write!(f, "(")?;
                for (i, child) in self.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}
