// tests/parser_tests.rs

use mupl::errors::{ErrorCategory, ErrorKind, SourceContext};
use mupl::syntax::{parser::parse, ParseTree, Token};

fn read(source: &str) -> Vec<ParseTree> {
    parse(source, &SourceContext::inline(source)).unwrap()
}

#[test]
fn test_parse_simple_form() {
    let trees = read("($+ 1 x)");
    assert_eq!(trees.len(), 1);
    assert_eq!(
        trees[0],
        ParseTree::open(vec![
            ParseTree::identifier("$+"),
            ParseTree::number(1),
            ParseTree::identifier("x"),
        ])
    );
}

#[test]
fn test_parse_nested_form_round_trips_through_display() {
    let trees = read("(let ((x 1) (y (f x))) (pair x y))");
    assert_eq!(trees[0].to_string(), "(let ((x 1) (y (f x))) (pair x y))");
}

#[test]
fn test_parse_with_comments_and_whitespace() {
    let source = "; leading comment\n  (f 1) ; trailing\n\t2";
    let trees = read(source);
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[1], ParseTree::number(2));
}

#[test]
fn test_symbolic_identifiers() {
    let trees = read("(null? set! a-b <= $list)");
    let names: Vec<&str> = trees[0]
        .children
        .iter()
        .filter_map(ParseTree::as_identifier)
        .collect();
    assert_eq!(names, vec!["null?", "set!", "a-b", "<=", "$list"]);
}

#[test]
fn test_string_literal_token() {
    let trees = read("\"hello world\"");
    assert_eq!(trees[0].token, Token::Str("hello world".into()));
}

#[test]
fn test_empty_source_has_no_forms() {
    assert!(read("").is_empty());
    assert!(read("   \n").is_empty());
}

#[test]
fn test_unclosed_list_fails() {
    let source = "(f 1";
    let err = parse(source, &SourceContext::inline(source)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Syntax { .. }));
    assert_eq!(err.category(), ErrorCategory::Syntax);
    assert!(err.source_info.is_some());
}

#[test]
fn test_stray_close_paren_fails() {
    let source = "(f 1))";
    assert!(parse(source, &SourceContext::inline(source)).is_err());
}
