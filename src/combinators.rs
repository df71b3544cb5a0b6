//! Backtracking parser primitives shared by the lexer (over `char`) and the
//! parser (over `Token`).
//!
//! Each primitive is a thin layer over `combine`. Anything that can fail after
//! consuming input is wrapped in `attempt`, so a failed parser never leaves the
//! stream advanced: `alternative` retries from the original position and the
//! repetition combinators stop cleanly at the first failing element.
//! Positions are whatever the stream reports; the entry points use an index
//! positioner so every failure carries a plain element index.

use std::cell::Cell;
use std::rc::Rc;

use combine::error::ParseError;
use combine::stream::{Positioned, ResetStream, Stream, StreamErrorFor, StreamOnce};
use combine::{attempt, Parser};

/// Stream adapter that remembers the furthest position any parser inspected,
/// including positions later abandoned by backtracking.
#[derive(Clone, Debug)]
pub(crate) struct Furthest<S> {
    inner: S,
    furthest: Rc<Cell<usize>>,
}

impl<S> Furthest<S> {
    pub(crate) fn new(inner: S, furthest: Rc<Cell<usize>>) -> Self {
        Furthest { inner, furthest }
    }
}

impl<S> StreamOnce for Furthest<S>
where
    S: StreamOnce<Position = usize> + Positioned,
{
    type Token = S::Token;
    type Range = S::Range;
    type Position = S::Position;
    type Error = S::Error;

    fn uncons(&mut self) -> Result<Self::Token, StreamErrorFor<Self>> {
        let position = self.inner.position();
        if position > self.furthest.get() {
            self.furthest.set(position);
        }
        self.inner.uncons()
    }

    fn is_partial(&self) -> bool {
        self.inner.is_partial()
    }
}

impl<S> Positioned for Furthest<S>
where
    S: StreamOnce<Position = usize> + Positioned,
{
    fn position(&self) -> Self::Position {
        self.inner.position()
    }
}

impl<S> ResetStream for Furthest<S>
where
    S: StreamOnce<Position = usize> + Positioned + ResetStream,
{
    type Checkpoint = S::Checkpoint;

    fn checkpoint(&self) -> Self::Checkpoint {
        self.inner.checkpoint()
    }

    fn reset(&mut self, checkpoint: Self::Checkpoint) -> Result<(), Self::Error> {
        self.inner.reset(checkpoint)
    }
}

/// Consumes one element if `predicate` holds for it.
pub(crate) fn satisfy<Input, P>(mut predicate: P) -> impl Parser<Input, Output = Input::Token>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    P: FnMut(&Input::Token) -> bool,
{
    combine::satisfy_map(move |t| if predicate(&t) { Some(t) } else { None })
        .message("no matching element")
}

/// Consumes one element if `f` maps it to `Some`.
pub(crate) fn satisfy_map<Input, F, R>(f: F) -> impl Parser<Input, Output = R>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    F: FnMut(Input::Token) -> Option<R>,
{
    combine::satisfy_map(f).message("no matching element")
}

/// Consumes one element equal to `expected`.
pub(crate) fn element<Input>(expected: Input::Token) -> impl Parser<Input, Output = Input::Token>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    Input::Token: PartialEq,
{
    combine::token(expected)
}

pub(crate) fn map<Input, P, F, B>(parser: P, f: F) -> impl Parser<Input, Output = B>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    P: Parser<Input>,
    F: FnMut(P::Output) -> B,
{
    parser.map(f)
}

/// Runs `first` then `second`; on failure of either the stream is left where
/// `first` started.
pub(crate) fn sequence<Input, A, B>(
    first: A,
    second: B,
) -> impl Parser<Input, Output = (A::Output, B::Output)>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    A: Parser<Input>,
    B: Parser<Input>,
{
    attempt((first, second))
}

/// Tries `first`, then `second` from the same position. When both fail the
/// error of the one that got further wins.
pub(crate) fn alternative<Input, A, B>(first: A, second: B) -> impl Parser<Input, Output = A::Output>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    A: Parser<Input>,
    B: Parser<Input, Output = A::Output>,
{
    attempt(first).or(attempt(second))
}

/// Zero or more repetitions, collected into `F`. `parser` must consume input
/// whenever it succeeds.
pub(crate) fn many<F, Input, P>(parser: P) -> impl Parser<Input, Output = F>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    P: Parser<Input>,
    F: Extend<P::Output> + Default,
{
    combine::many(attempt(parser))
}

/// One or more repetitions, collected into `F`.
pub(crate) fn some<F, Input, P>(parser: P) -> impl Parser<Input, Output = F>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    P: Parser<Input>,
    F: Extend<P::Output> + Default,
{
    combine::many1(attempt(parser))
}

/// Like `many`, discarding the results.
pub(crate) fn skip_many<Input, P>(parser: P) -> impl Parser<Input, Output = ()>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    P: Parser<Input>,
{
    combine::skip_many(attempt(parser))
}

pub(crate) fn optional<Input, P>(parser: P) -> impl Parser<Input, Output = Option<P::Output>>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    P: Parser<Input>,
{
    combine::optional(attempt(parser))
}

/// `open parser close`, keeping the middle value.
pub(crate) fn between<Input, L, R, P>(
    open: L,
    close: R,
    parser: P,
) -> impl Parser<Input, Output = P::Output>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    L: Parser<Input>,
    R: Parser<Input>,
    P: Parser<Input>,
{
    attempt(combine::between(open, close, parser))
}

/// Builds the parser returned by `constructor` only when it is first run.
/// Used to refer to a rule from inside its own definition.
pub(crate) fn lazy<Input, F, P>(constructor: F) -> impl Parser<Input, Output = P::Output>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
    F: FnMut() -> P,
    P: Parser<Input>,
{
    combine::parser::combinator::lazy(constructor)
}

/// Succeeds only at the end of input.
pub(crate) fn end<Input>() -> impl Parser<Input, Output = ()>
where
    Input: Stream,
    Input::Error: ParseError<Input::Token, Input::Range, Input::Position>,
{
    combine::eof()
}
