// tests/encoder_tests.rs

use mupl::ast::Ast;
use mupl::encoding::{encode_identifier, is_reserved, IdentifierEncoder};
use mupl::pipeline::LoweringPipeline;

#[test]
fn repeated_encoding_returns_the_cached_result() {
    let mut encoder = IdentifierEncoder::new();
    let first = encoder.encode("null?").to_string();
    let second = encoder.encode("null?").to_string();
    assert_eq!(first, second);
    assert_eq!(encoder.len(), 1);
}

#[test]
fn reserved_words_never_come_back_bare() {
    let mut encoder = IdentifierEncoder::new();
    for word in ["if", "let", "function", "var", "return", "this"] {
        assert!(is_reserved(word));
        let encoded = encoder.encode(word).to_string();
        assert_eq!(encoded, format!("_{word}"));
        assert!(!is_reserved(&encoded));
    }
}

#[test]
fn encoded_identifiers_contain_no_symbols() {
    for identifier in ["a!b", "$x", "%", "^&*", "-", "x_y", "==", "+<>?"] {
        let encoded = encode_identifier(identifier);
        assert!(
            encoded.chars().all(|c| c.is_alphanumeric() || c == '_'),
            "{identifier} encoded to {encoded}"
        );
    }
}

#[test]
fn plain_identifiers_pass_through() {
    assert_eq!(encode_identifier("fooBar9"), "fooBar9");
}

#[test]
fn encode_names_rewrites_every_name_in_the_tree() {
    let forms = LoweringPipeline::default()
        .lower_str("(fun if? (new) (let ((a-b ($list new))) (null? a-b)))")
        .unwrap();
    let mut encoder = IdentifierEncoder::new();
    let encoded = forms[0].encode_names(&mut encoder);
    assert_eq!(
        encoded.pretty(),
        "(fun if_question (_new) (let ((a_dashb (pair _new null))) (null? a_dashb)))"
    );
    // new, a-b, if?, null
    assert_eq!(encoder.len(), 4);
}

#[test]
fn encode_names_leaves_numbers_alone() {
    let mut encoder = IdentifierEncoder::new();
    assert_eq!(Ast::number(3).encode_names(&mut encoder), Ast::number(3));
    assert!(encoder.is_empty());
}
