use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Def,
    Extern,
    Identifier(String),
    Number(f64),
    Symbol(char),
    EndOfStatement,
}

impl Token {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Token::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Token::Identifier(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<char> {
        match self {
            Token::Symbol(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Def => f.write_str("def"),
            Token::Extern => f.write_str("extern"),
            Token::Identifier(id) => f.write_str(id),
            Token::Number(n) => write!(f, "{}", n),
            Token::Symbol(c) => write!(f, "{}", c),
            Token::EndOfStatement => f.write_str(";"),
        }
    }
}
