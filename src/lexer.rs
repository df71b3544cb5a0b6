use super::combinators::{
    alternative, element, many, map, optional, satisfy, satisfy_map, sequence, skip_many, some,
};
use super::token::Token;
use combine::error::{ParseError, StreamError};
use combine::parser::char::string;
use combine::stream::{Stream, StreamErrorFor};
use combine::Parser;

fn is_identifier_start(c: &char) -> bool {
    c.is_ascii_alphabetic() || *c == '_'
}

fn is_identifier_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '_'
}

fn whitespace<Input>() -> impl Parser<Input, Output = char>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    satisfy(|c: &char| matches!(*c, ' ' | '\t')).expected("whitespace")
}

fn newline<Input>() -> impl Parser<Input, Output = char>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    element('\n')
}

fn digits<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    some(satisfy(|c: &char| c.is_ascii_digit()).expected("digit"))
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn identifier_name<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    map(
        sequence(
            satisfy(is_identifier_start),
            many::<String, _, _>(satisfy(is_identifier_char)),
        ),
        |(first, rest)| {
            let mut name = String::with_capacity(rest.len() + 1);
            name.push(first);
            name.push_str(&rest);
            name
        },
    )
    .expected("identifier")
}

/// Matches `text` literally. There is no word-boundary check, so `define`
/// lexes as `def` followed by the identifier `ine`.
fn keyword<Input>(text: &'static str, token: Token) -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    map(string(text), move |_| token.clone())
}

/// Digits, optionally followed by `.` and more digits.
fn number<Input>() -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    sequence(digits(), optional(sequence(element('.'), digits())))
        .and_then(|(int, frac)| {
            let text = match frac {
                Some((_, frac)) => format!("{}.{}", int, frac),
                None => int,
            };
            text.parse::<f64>().map_err(StreamErrorFor::<Input>::other)
        })
        .map(Token::Number)
}

fn symbol<Input>() -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    satisfy_map(|c| match c {
        '+' | '-' | '*' | '/' | '(' | ')' => Some(Token::Symbol(c)),
        _ => None,
    })
    .expected("symbol")
}

fn end_of_statement<Input>() -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    map(element(';'), |_| Token::EndOfStatement)
}

/// `#` up to, not including, the next newline.
fn comment<Input>() -> impl Parser<Input, Output = ()>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    map(
        sequence(element('#'), skip_many(satisfy(|c: &char| *c != '\n'))),
        |_| (),
    )
}

pub(crate) fn token<Input>() -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let rest = alternative(number(), alternative(symbol(), end_of_statement()));
    alternative(
        keyword("def", Token::Def),
        alternative(
            keyword("extern", Token::Extern),
            alternative(map(identifier_name(), Token::Identifier), rest),
        ),
    )
}

/// The tokens of one line: leading blanks, tokens separated by blanks, and an
/// optional trailing comment. Does not consume the newline.
fn line<Input>() -> impl Parser<Input, Output = Vec<Token>>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let run = many::<Vec<_>, _, _>(map(sequence(token(), skip_many(whitespace())), |(t, _)| t));
    map(
        sequence(skip_many(whitespace()), sequence(run, optional(comment()))),
        |(_, (tokens, _))| tokens,
    )
}

/// Newline-terminated lines followed by a final line that may lack one.
pub(crate) fn tokens<Input>() -> impl Parser<Input, Output = Vec<Token>>
where
    Input: Stream<Token = char>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let lines = many::<Vec<_>, _, _>(map(sequence(line(), newline()), |(l, _)| l));
    map(sequence(lines, optional(line())), |(lines, last)| {
        lines.into_iter().chain(last).flatten().collect()
    })
}
