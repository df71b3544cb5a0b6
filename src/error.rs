use std::fmt;

use combine::easy;
use failure::{Backtrace, Context, Fail};

use super::token::Token;

/// The character at `position` (a character index into the source) starts
/// no token.
#[derive(Clone, Debug, PartialEq, Fail)]
#[fail(display = "tokenize error at character {}: {}", position, message)]
pub struct TokenizeError {
    pub position: usize,
    pub message: String,
}

/// No grammar alternative matched at `position`, a token index into
/// `tokens`.
#[derive(Clone, Debug, PartialEq, Fail)]
#[fail(display = "parse error at token {}: {}", position, message)]
pub struct ParseError {
    pub position: usize,
    pub message: String,
    pub tokens: Vec<Token>,
}

impl ParseError {
    /// The token the parser stopped at, or `None` at end of input.
    pub fn found(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }
}

#[derive(Clone, Debug, PartialEq, Fail)]
pub enum ErrorKind {
    #[fail(display = "{}", _0)]
    Tokenize(TokenizeError),
    #[fail(display = "{}", _0)]
    Parse(ParseError),
}

#[derive(Debug)]
pub struct Error {
    inner: Context<ErrorKind>,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.inner.get_context()
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&dyn Fail> {
        self.inner.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.inner.backtrace()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Context::new(kind),
        }
    }
}

impl From<Context<ErrorKind>> for Error {
    fn from(inner: Context<ErrorKind>) -> Error {
        Error { inner }
    }
}

impl From<TokenizeError> for Error {
    fn from(e: TokenizeError) -> Error {
        Error::from(ErrorKind::Tokenize(e))
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Error {
        Error::from(ErrorKind::Parse(e))
    }
}

/// Renders the unexpected/expected/message sets collected by `combine` into
/// one line, e.g. `unexpected `)`, expected identifier or `(``.
pub(crate) fn describe<T, R>(errors: &[easy::Error<T, R>]) -> String
where
    T: fmt::Display,
    R: fmt::Debug,
{
    fn info<T: fmt::Display, R: fmt::Debug>(info: &easy::Info<T, R>) -> String {
        match info {
            easy::Info::Token(t) => format!("`{}`", t),
            easy::Info::Range(r) => format!("`{:?}`", r),
            easy::Info::Owned(s) => s.clone(),
            easy::Info::Static(s) => (*s).to_owned(),
        }
    }

    let mut unexpected = Vec::new();
    let mut expected = Vec::new();
    let mut messages = Vec::new();
    for error in errors {
        match error {
            easy::Error::Unexpected(i) => unexpected.push(info(i)),
            easy::Error::Expected(i) => expected.push(info(i)),
            easy::Error::Message(i) => messages.push(info(i)),
            easy::Error::Other(e) => messages.push(e.to_string()),
        }
    }

    let mut parts = Vec::new();
    if !unexpected.is_empty() {
        parts.push(format!("unexpected {}", unexpected.join(", ")));
    }
    if let Some((last, init)) = expected.split_last() {
        if init.is_empty() {
            parts.push(format!("expected {}", last));
        } else {
            parts.push(format!("expected {} or {}", init.join(", "), last));
        }
    }
    parts.extend(messages);

    if parts.is_empty() {
        "no matching element".to_owned()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_describe() {
        let errors: Vec<easy::Error<char, &str>> = vec![
            easy::Error::Unexpected(easy::Info::Token('$')),
            easy::Error::Expected(easy::Info::Static("digit")),
            easy::Error::Expected(easy::Info::Token(';')),
            easy::Error::Expected(easy::Info::Static("identifier")),
        ];
        assert_eq!(
            describe(&errors),
            "unexpected `$`, expected digit, `;` or identifier"
        );
        assert_eq!(describe::<char, &str>(&[]), "no matching element");
    }

    #[test]
    fn test_found() {
        let e = ParseError {
            position: 1,
            message: String::new(),
            tokens: vec![Token::Def, Token::Symbol(')')],
        };
        assert_eq!(e.found(), Some(&Token::Symbol(')')));

        let at_end = ParseError {
            position: 2,
            ..e
        };
        assert_eq!(at_end.found(), None);
    }

    #[test]
    fn test_error_kind() {
        let e = Error::from(TokenizeError {
            position: 3,
            message: "unexpected `$`".to_owned(),
        });
        match e.kind() {
            ErrorKind::Tokenize(t) => assert_eq!(t.position, 3),
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(e.to_string(), "tokenize error at character 3: unexpected `$`");
    }
}
