//! mupl Reader
//!
//! Converts source text into [`ParseTree`] nodes. This stage is purely
//! syntactic: it matches parentheses and classifies leaves, and leaves
//! special-form validation to the lowering stage.

use crate::errors::{ErrorKind, ErrorReporting, MuplError, SourceContext};
use crate::syntax::ParseTree;
use pest::{error::InputLocation, iterators::Pair, Parser};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct MuplParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse mupl source code into one parse tree per top-level form.
pub fn parse(source_text: &str, source: &SourceContext) -> Result<Vec<ParseTree>, MuplError> {
    if source_text.trim().is_empty() {
        return Ok(vec![]);
    }

    let pairs = MuplParser::parse(Rule::program, source_text)
        .map_err(|e| convert_parse_error(e, source))?;

    pairs
        .flat_map(|program| program.into_inner())
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(|p| build_tree(p, source))
        .collect()
}

// ============================================================================
// TREE BUILDERS
// ============================================================================

fn build_tree(pair: Pair<Rule>, source: &SourceContext) -> Result<ParseTree, MuplError> {
    match pair.as_rule() {
        Rule::number => {
            let value = pair
                .as_str()
                .parse::<i64>()
                .map_err(|_| invalid_number(&pair, source))?;
            Ok(ParseTree::number(value))
        }

        Rule::decimal => Err(invalid_number(&pair, source)),

        Rule::string => {
            let text = pair
                .into_inner()
                .next()
                .map(|inner| inner.as_str())
                .unwrap_or_default();
            Ok(ParseTree::string(text))
        }

        Rule::identifier => Ok(ParseTree::identifier(pair.as_str())),

        Rule::list => {
            let children = pair
                .into_inner()
                .map(|p| build_tree(p, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ParseTree::open(children))
        }

        rule => {
            let span = pair.as_span();
            Err(source.report(
                ErrorKind::Syntax {
                    message: format!("unexpected {:?}", rule),
                },
                (span.start()..span.end()).into(),
            ))
        }
    }
}

fn invalid_number(pair: &Pair<Rule>, source: &SourceContext) -> MuplError {
    let span = pair.as_span();
    source.report(
        ErrorKind::InvalidLiteral {
            literal_type: "number".into(),
            value: pair.as_str().into(),
        },
        (span.start()..span.end()).into(),
    )
}

fn convert_parse_error(error: pest::error::Error<Rule>, source: &SourceContext) -> MuplError {
    let span = match error.location {
        InputLocation::Pos(pos) => (pos..pos).into(),
        InputLocation::Span((start, end)) => (start..end).into(),
    };
    source.report(
        ErrorKind::Syntax {
            message: error.variant.message().into_owned(),
        },
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Token;

    fn read(text: &str) -> Vec<ParseTree> {
        parse(text, &SourceContext::inline(text)).expect("source should parse")
    }

    #[test]
    fn negative_numbers_and_dash_identifiers() {
        let trees = read("-12 - -x");
        assert_eq!(trees[0], ParseTree::number(-12));
        assert_eq!(trees[1], ParseTree::identifier("-"));
        assert_eq!(trees[2], ParseTree::identifier("-x"));
    }

    #[test]
    fn digits_followed_by_letters_read_as_identifier() {
        let trees = read("12abc");
        assert_eq!(trees[0].token, Token::Identifier("12abc".into()));
    }

    #[test]
    fn overflowing_number_is_an_invalid_literal() {
        let text = "99999999999999999999";
        let err = parse(text, &SourceContext::inline(text)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidLiteral { .. }));
    }

    #[test]
    fn fractional_numbers_are_invalid_literals() {
        for text in ["1.5", "(f -2.75)", "3."] {
            let err = parse(text, &SourceContext::inline(text)).unwrap_err();
            assert!(
                matches!(&err.kind, ErrorKind::InvalidLiteral { literal_type, .. } if literal_type == "number"),
                "{text}: {:?}",
                err.kind
            );
        }
        let text = "(f 1.5)";
        let err = parse(text, &SourceContext::inline(text)).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::InvalidLiteral {
                literal_type: "number".into(),
                value: "1.5".into()
            }
        );
        assert_eq!(read("a.b")[0], ParseTree::identifier("a.b"));
    }
}
