//! End-to-end tests through the public entry points.

use kaleidoscope_syntax::{
    lex, parse_program, parse_top_level_expression, parse_value_expression, ErrorKind, Expr,
    Function, Prototype, Token,
};
use rstest::rstest;

fn var(s: &str) -> Expr {
    Expr::Variable(s.to_owned())
}

fn proto(name: &str, params: &[&str]) -> Prototype {
    Prototype(
        name.to_owned(),
        params.iter().map(|p| (*p).to_owned()).collect(),
    )
}

#[rstest]
#[case("0;", 0.0)]
#[case("00.00;", 0.0)]
#[case("10.0;", 10.0)]
#[case("10.01;", 10.01)]
#[case("  7 # seven\n", 7.0)]
fn test_numbers(#[case] source: &str, #[case] expected: f64) {
    assert_eq!(
        parse_top_level_expression(source).ok(),
        Some(Expr::Number(expected))
    );
}

#[rstest]
#[case("a+b", vec![
    Token::Identifier("a".to_owned()),
    Token::Symbol('+'),
    Token::Identifier("b".to_owned()),
])]
#[case("a + b; # this is addition\n", vec![
    Token::Identifier("a".to_owned()),
    Token::Symbol('+'),
    Token::Identifier("b".to_owned()),
    Token::EndOfStatement,
])]
#[case("# this is only a comment\n", vec![])]
#[case("extern atan2(a b)", vec![
    Token::Extern,
    Token::Identifier("atan2".to_owned()),
    Token::Symbol('('),
    Token::Identifier("a".to_owned()),
    Token::Identifier("b".to_owned()),
    Token::Symbol(')'),
])]
fn test_tokenizer(#[case] source: &str, #[case] expected: Vec<Token>) {
    assert_eq!(lex(source), Ok(expected));
}

#[test]
fn test_combination() {
    assert_eq!(
        parse_top_level_expression("extern sin(angle);").ok(),
        Some(Expr::Prototype(proto("sin", &["angle"])))
    );

    assert_eq!(
        parse_top_level_expression("a + b;").ok(),
        Some(Expr::binary('+', var("a"), var("b")))
    );

    assert_eq!(
        parse_top_level_expression("a + sin(b) - c;").ok(),
        Some(Expr::binary(
            '+',
            var("a"),
            Expr::binary(
                '-',
                Expr::Call("sin".to_owned(), vec![var("b")]),
                var("c")
            )
        ))
    );

    assert_eq!(
        parse_top_level_expression("def add(a b) a + b;").ok(),
        Some(Expr::Function(Function(
            proto("add", &["a", "b"]),
            Box::new(Expr::binary('+', var("a"), var("b")))
        )))
    );
}

#[test]
fn test_same_precedence_nests_right() {
    assert_eq!(
        parse_value_expression("a - b - c").ok(),
        Some(Expr::binary(
            '-',
            var("a"),
            Expr::binary('-', var("b"), var("c"))
        ))
    );
    assert_eq!(
        parse_value_expression("a * b + c").ok(),
        Some(Expr::binary(
            '*',
            var("a"),
            Expr::binary('+', var("b"), var("c"))
        ))
    );
}

#[test]
fn test_duplicate_parameters_are_accepted() {
    assert_eq!(
        parse_top_level_expression("extern f(x x)").ok(),
        Some(Expr::Prototype(proto("f", &["x", "x"])))
    );
}

#[test]
fn test_program_layout_variants() {
    let compact = parse_program("def f(x) x * 2; f(3);").unwrap();
    let spread = parse_program(
        "# doubling\n\ndef f(x)\n\tx * 2   # body\n\n;\nf(3)\n\n",
    )
    .unwrap();
    assert_eq!(compact, spread);
    assert_eq!(compact.len(), 2);
}

#[test]
fn test_parses_are_reproducible() {
    let source = "extern cos(x); def g(a b) cos(a) / (b - 1); g(1 2)";
    assert_eq!(parse_program(source).ok(), parse_program(source).ok());
}

fn nest(depth: usize, open: &str, inner: &str) -> String {
    let closing = ")".repeat(depth * open.matches('(').count());
    format!("{}{}{}", open.repeat(depth), inner, closing)
}

#[test]
fn test_deep_nesting_parses_in_linear_time() {
    let depth = 40;

    let mut expected = var("x");
    assert_eq!(
        parse_value_expression(&nest(depth, "(", "x")).ok(),
        Some(expected.clone())
    );

    for _ in 0..depth {
        expected = Expr::Call("f".to_owned(), vec![expected]);
    }
    assert_eq!(
        parse_value_expression(&nest(depth, "f(", "x")).ok(),
        Some(expected)
    );

    assert!(parse_value_expression(&nest(depth, "f((", "x + 1")).is_ok());
}

#[test]
fn test_deep_unclosed_nesting_fails_in_linear_time() {
    let depth = 40;
    for open in &["(", "f(", "f(("] {
        let source = format!("{}x", open.repeat(depth));
        match parse_value_expression(&source).unwrap_err().kind() {
            ErrorKind::Parse(e) => assert_eq!(e.found(), None),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}

#[test]
fn test_failures() {
    match parse_top_level_expression("a ^ b").unwrap_err().kind() {
        ErrorKind::Tokenize(e) => assert_eq!(e.position, 2),
        other => panic!("expected a tokenize error, got {:?}", other),
    }

    match parse_top_level_expression("def (x) x").unwrap_err().kind() {
        ErrorKind::Parse(e) => {
            assert_eq!(e.position, 1);
            assert_eq!(e.found(), Some(&Token::Symbol('(')));
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn operand_strategy() -> impl Strategy<Value = String> {
        prop_oneof!["[a-c_][a-z0-9_]{0,5}", "[0-9]{1,3}(\\.[0-9]{1,2})?"]
    }

    fn operator_strategy() -> impl Strategy<Value = char> {
        prop_oneof![Just('+'), Just('-'), Just('*'), Just('/')]
    }

    fn blank_strategy() -> impl Strategy<Value = String> {
        "[ \t]{0,3}"
    }

    /// Operands separated by operators.
    fn chain_strategy() -> impl Strategy<Value = (String, Vec<(char, String)>)> {
        (
            operand_strategy(),
            prop::collection::vec((operator_strategy(), operand_strategy()), 0..6),
        )
    }

    proptest! {
        #[test]
        fn test_layout_does_not_change_the_tree(
            (head, tail) in chain_strategy(),
            blanks in prop::collection::vec(blank_strategy(), 14),
            comment in prop::option::of("[a-z ]{0,10}"),
            terminated in any::<bool>(),
        ) {
            let mut compact = head.clone();
            for (op, operand) in &tail {
                compact.push(*op);
                compact.push_str(operand);
            }

            let mut spread = format!("\n{}{}", blanks[0], head);
            for (i, (op, operand)) in tail.iter().enumerate() {
                spread.push_str(&blanks[2 * i + 1]);
                spread.push(*op);
                spread.push_str(&blanks[2 * i + 2]);
                spread.push_str(operand);
            }
            if terminated {
                spread.push(';');
            }
            if let Some(text) = &comment {
                spread.push_str(" #");
                spread.push_str(text);
            }
            spread.push('\n');

            let expected = parse_top_level_expression(&compact);
            prop_assert!(expected.is_ok(), "failed to parse {:?}", compact);
            prop_assert_eq!(parse_top_level_expression(&spread).ok(), expected.ok());
        }

        #[test]
        fn test_lex_never_panics(source in "[ -~\t\n]{0,40}") {
            let _ = lex(&source);
        }
    }
}
