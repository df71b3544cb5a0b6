//! Lexer and parser for the Kaleidoscope teaching language.
//!
//! Source text is tokenized by [`lex`] and the tokens are parsed into an
//! [`Expr`] tree. Both stages are built from the same small set of
//! backtracking combinators on top of `combine`.
//!
//! ```
//! use kaleidoscope_syntax::{parse_top_level_expression, Expr, Prototype};
//!
//! let e = parse_top_level_expression("extern sin(angle);").unwrap();
//! assert_eq!(e, Expr::Prototype(Prototype("sin".to_owned(), vec!["angle".to_owned()])));
//! ```
//!
//! Infix operators share a single precedence level and nest to the right:
//! `a - b - c` parses as `a - (b - c)`.

mod ast;
mod combinators;
mod error;
mod lexer;
mod parser;
mod token;
mod toplevel;

pub use ast::{Expr, Function, Prototype};
pub use error::{Error, ErrorKind, ParseError, TokenizeError};
pub use token::Token;
pub use toplevel::{
    lex, parse_program, parse_program_tokens, parse_top_level_expression,
    parse_top_level_expression_tokens, parse_value_expression, parse_value_expression_tokens,
};
