//! Identifier encoding for generated code.
//!
//! Source identifiers may contain symbols (`null?`, `a-b`, `$+`) or collide with
//! reserved words of the target language. [`IdentifierEncoder`] maps each one to
//! a safe identifier:
//!
//! - an exact keyword match gets a `_` prefix (`if` -> `_if`);
//! - otherwise every symbol is replaced by `_` and its word (`a-b` -> `a_dashb`).
//!
//! `_` itself is in the symbol table, so an escaped symbol can never be
//! confused with an underscore that was already in the source. Distinct inputs
//! are still not guaranteed distinct outputs in every pathological case.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

const ESCAPE: char = '_';

static SYMBOL_WORDS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('!', "bang"),
        ('$', "dollar"),
        ('%', "mod"),
        ('^', "xor"),
        ('&', "and"),
        ('*', "star"),
        ('-', "dash"),
        ('_', "under"),
        ('=', "equal"),
        ('+', "plus"),
        ('<', "lesser"),
        ('>', "greater"),
        ('?', "question"),
    ])
});

static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "break", "case", "class", "catch", "const", "continue", "debugger", "default", "delete",
        "do", "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
        "instanceof", "let", "new", "return", "super", "switch", "this", "throw", "try", "typeof",
        "var", "void", "while", "with", "yield",
    ])
});

/// Returns true if `word` is reserved in the target language.
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(word)
}

/// Encodes a single identifier without caching.
pub fn encode_identifier(identifier: &str) -> String {
    if is_reserved(identifier) {
        return format!("{ESCAPE}{identifier}");
    }

    let mut safe = String::with_capacity(identifier.len());
    for c in identifier.chars() {
        match SYMBOL_WORDS.get(&c) {
            Some(word) => {
                safe.push(ESCAPE);
                safe.push_str(word);
            }
            None => safe.push(c),
        }
    }
    safe
}

/// Memoizing encoder. The cache only grows; an identifier is encoded once and
/// every later request returns the stored result.
#[derive(Debug, Default, Clone)]
pub struct IdentifierEncoder {
    cache: HashMap<String, String>,
}

impl IdentifierEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, identifier: &str) -> &str {
        self.cache
            .entry(identifier.to_string())
            .or_insert_with(|| {
                let encoded = encode_identifier(identifier);
                tracing::trace!(identifier, encoded = %encoded, "encoded identifier");
                encoded
            })
            .as_str()
    }

    /// Number of distinct identifiers encoded so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
