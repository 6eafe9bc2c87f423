//! Special-form registry.
//!
//! Two tables live here and are kept separate: [`FORM_TABLE`] records
//! the declared argument count of each fixed-arity form, and [`SpecialForm`]
//! enumerates the forms the builder knows how to lower. Arity checking consults
//! only the former.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ast::OperatorKind;

/// Special-form name -> number of forms required after the name.
pub static FORM_TABLE: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    HashMap::from([
        ("if", 3),
        ("let", 2),
        ("lambda", 2),
        ("fun", 3),
        ("pair", 2),
        ("first", 1),
        ("second", 1),
        ("null?", 1),
    ])
});

/// Required argument count for `name`, if it is a registered fixed-arity form.
pub fn required_arity(name: &str) -> Option<usize> {
    FORM_TABLE.get(name).copied()
}

/// Every special form the builder lowers. Anything else in head position is a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    If,
    Let,
    Lambda,
    Fun,
    Operator(OperatorKind),
    Pair,
    First,
    Second,
    List,
    NullCheck,
}

impl SpecialForm {
    pub fn from_name(name: &str) -> Option<Self> {
        let form = match name {
            "if" => SpecialForm::If,
            "let" => SpecialForm::Let,
            "lambda" => SpecialForm::Lambda,
            "fun" => SpecialForm::Fun,
            "$+" => SpecialForm::Operator(OperatorKind::Add),
            "$-" => SpecialForm::Operator(OperatorKind::Sub),
            "$*" => SpecialForm::Operator(OperatorKind::Mul),
            "$<" => SpecialForm::Operator(OperatorKind::Less),
            "pair" => SpecialForm::Pair,
            "first" => SpecialForm::First,
            "second" => SpecialForm::Second,
            "$list" => SpecialForm::List,
            "null?" => SpecialForm::NullCheck,
            _ => return None,
        };
        Some(form)
    }

    /// The keyword this form is written with.
    pub const fn name(&self) -> &'static str {
        match self {
            SpecialForm::If => "if",
            SpecialForm::Let => "let",
            SpecialForm::Lambda => "lambda",
            SpecialForm::Fun => "fun",
            SpecialForm::Operator(OperatorKind::Add) => "$+",
            SpecialForm::Operator(OperatorKind::Sub) => "$-",
            SpecialForm::Operator(OperatorKind::Mul) => "$*",
            SpecialForm::Operator(OperatorKind::Less) => "$<",
            SpecialForm::Pair => "pair",
            SpecialForm::First => "first",
            SpecialForm::Second => "second",
            SpecialForm::List => "$list",
            SpecialForm::NullCheck => "null?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for name in [
            "if", "let", "lambda", "fun", "$+", "$-", "$*", "$<", "pair", "first", "second",
            "$list", "null?",
        ] {
            let form = SpecialForm::from_name(name).expect("known form");
            assert_eq!(form.name(), name);
        }
        assert_eq!(SpecialForm::from_name("+"), None);
    }

    #[test]
    fn variadic_forms_are_not_in_the_table() {
        assert_eq!(required_arity("$+"), None);
        assert_eq!(required_arity("$list"), None);
        assert_eq!(required_arity("if"), Some(3));
    }
}
