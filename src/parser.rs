use super::ast::{Expr, Function, Prototype};
use super::combinators::{
    alternative, between, element, lazy, many, map, optional, satisfy_map, sequence, skip_many,
};
use super::token::Token;
use combine::error::ParseError;
use combine::parser;
use combine::stream::Stream;
pub(crate) use combine::Parser;

fn identifier<Input>() -> impl Parser<Input, Output = String>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    satisfy_map(|t: Token| t.as_identifier().map(str::to_owned)).expected("identifier")
}

fn symbol<Input>(c: char) -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    element(Token::Symbol(c))
}

fn end_of_statement<Input>() -> impl Parser<Input, Output = Token>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    element(Token::EndOfStatement)
}

fn number<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    satisfy_map(|t: Token| t.as_number().map(Expr::Number)).expected("number")
}

/// `Identifier ("(" valueExpr* ")")?`. Once `(` follows the name the argument
/// list must parse; a failure there is not retried as a bare variable.
fn call_or_variable<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let args = combine::between(
        symbol('('),
        symbol(')'),
        many::<Vec<_>, _, _>(lazy(value_expr)),
    );
    map(
        sequence(identifier(), combine::optional(args)),
        |(name, args)| match args {
            Some(args) => Expr::Call(name, args),
            None => Expr::Variable(name),
        },
    )
}

fn paren<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    between(symbol('('), symbol(')'), lazy(value_expr))
}

fn primary<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    alternative(call_or_variable(), alternative(number(), paren()))
}

fn operator<Input>() -> impl Parser<Input, Output = char>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    satisfy_map(|t: Token| {
        t.as_symbol()
            .filter(|c| matches!(*c, '+' | '-' | '*' | '/'))
    })
    .expected("operator")
}

/// Nests `head op1 e1 op2 e2 ...` from the right: `head op1 (e1 op2 (...))`.
/// All operators share one precedence level.
fn fold_infix(head: Expr, mut tail: Vec<(char, Expr)>) -> Expr {
    let (mut op, mut rhs) = match tail.pop() {
        Some(last) => last,
        None => return head,
    };
    while let Some((prev, operand)) = tail.pop() {
        rhs = Expr::binary(op, operand, rhs);
        op = prev;
    }
    Expr::binary(op, head, rhs)
}

/// `primary (operator primary)*`. The leading primary is parsed once whether
/// or not an operator follows.
fn value_expr_<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let tail = many::<Vec<_>, _, _>(sequence(operator(), primary()));
    map(sequence(primary(), tail), |(head, tail)| fold_infix(head, tail))
}

parser! {
    pub(crate) fn value_expr[Input]()(Input) -> Expr
        where [Input: Stream<Token = Token>]
    {
        value_expr_()
    }
}

/// `Identifier "(" Identifier* ")"`
fn prototype<Input>() -> impl Parser<Input, Output = Prototype>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let params = many::<Vec<_>, _, _>(identifier());
    map(
        sequence(identifier(), between(symbol('('), symbol(')'), params)),
        |(name, params)| Prototype(name, params),
    )
}

pub(crate) fn definition<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    map(
        sequence(element(Token::Def), sequence(prototype(), value_expr())),
        |(_, (p, body))| Expr::Function(Function(p, Box::new(body))),
    )
}

pub(crate) fn extern_parser<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    map(sequence(element(Token::Extern), prototype()), |(_, p)| {
        Expr::Prototype(p)
    })
}

/// `(definition | external | valueExpr) ";"?`
pub(crate) fn statement<Input>() -> impl Parser<Input, Output = Expr>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let top = alternative(
        definition(),
        alternative(extern_parser(), value_expr()),
    );
    map(sequence(top, optional(end_of_statement())), |(e, _)| e)
}

/// Statements, with stray `;` tolerated between and after them.
pub(crate) fn program<Input>() -> impl Parser<Input, Output = Vec<Expr>>
where
    Input: Stream<Token = Token>,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    let statements = many::<Vec<_>, _, _>(map(
        sequence(skip_many(end_of_statement()), statement()),
        |(_, e)| e,
    ));
    map(
        sequence(statements, skip_many(end_of_statement())),
        |(statements, _)| statements,
    )
}
