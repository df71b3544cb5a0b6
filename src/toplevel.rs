use std::cell::Cell;
use std::rc::Rc;

use super::ast::Expr;
use super::combinators::{end, Furthest};
use super::error::{describe, Error, ParseError, TokenizeError};
use super::lexer;
use super::parser;
use super::token::Token;
use combine::easy;
use combine::parser::EasyParser;
use combine::stream::position::{self, IndexPositioner};
use combine::Parser;
use log::{debug, trace};

type TokenStream<'a> = Furthest<position::Stream<&'a [Token], IndexPositioner>>;

/// Splits `source` into tokens. Fails with the index of the first character
/// that neither starts a token nor belongs to whitespace or a comment.
pub fn lex(source: &str) -> Result<Vec<Token>, TokenizeError> {
    let input = position::Stream::with_positioner(source, IndexPositioner::default());
    match lexer::tokens().skip(end()).easy_parse(input) {
        Ok((tokens, _)) => {
            debug!("lexed {} tokens", tokens.len());
            Ok(tokens)
        }
        Err(err) => {
            let e = TokenizeError {
                position: err.position,
                message: describe(&err.errors),
            };
            debug!("{}", e);
            Err(e)
        }
    }
}

/// Runs `parser` over the whole of `tokens`. A failure is reported at the
/// furthest token any alternative reached.
fn run<'a, P>(mut parser: P, tokens: &'a [Token]) -> Result<P::Output, ParseError>
where
    P: Parser<easy::Stream<TokenStream<'a>>>,
{
    trace!("parsing {:?}", tokens);
    let furthest = Rc::new(Cell::new(0));
    let input = Furthest::new(
        position::Stream::with_positioner(tokens, IndexPositioner::default()),
        Rc::clone(&furthest),
    );
    match parser.easy_parse(input) {
        Ok((output, _)) => Ok(output),
        Err(err) => {
            let position = furthest.get().max(err.position);
            let message = if position == err.position {
                describe(&err.errors)
            } else {
                match tokens.get(position) {
                    Some(t) => format!("unexpected `{}`", t),
                    None => "unexpected end of input".to_owned(),
                }
            };
            let e = ParseError {
                position,
                message,
                tokens: tokens.to_vec(),
            };
            debug!("{}", e);
            Err(e)
        }
    }
}

/// Parses a single value expression: a number, variable, call,
/// parenthesised expression or infix chain. A trailing `;` is rejected.
pub fn parse_value_expression_tokens(tokens: &[Token]) -> Result<Expr, ParseError> {
    run(parser::value_expr().skip(end()), tokens)
}

pub fn parse_value_expression(source: &str) -> Result<Expr, Error> {
    let tokens = lex(source)?;
    Ok(parse_value_expression_tokens(&tokens)?)
}

/// Parses one statement: a `def`, an `extern` or a value expression,
/// optionally terminated by `;`.
pub fn parse_top_level_expression_tokens(tokens: &[Token]) -> Result<Expr, ParseError> {
    run(parser::statement().skip(end()), tokens)
}

pub fn parse_top_level_expression(source: &str) -> Result<Expr, Error> {
    let tokens = lex(source)?;
    Ok(parse_top_level_expression_tokens(&tokens)?)
}

/// Parses a sequence of statements, one `Expr` per statement.
pub fn parse_program_tokens(tokens: &[Token]) -> Result<Vec<Expr>, ParseError> {
    let program = run(parser::program().skip(end()), tokens)?;
    debug!("parsed {} statements", program.len());
    Ok(program)
}

pub fn parse_program(source: &str) -> Result<Vec<Expr>, Error> {
    let tokens = lex(source)?;
    Ok(parse_program_tokens(&tokens)?)
}
