/// A node of the syntax tree. Value expressions (`Number`, `Variable`,
/// `Binary`, `Call`) may nest inside each other; `Prototype` and `Function`
/// only ever appear at the top level of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Binary(char, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
    Prototype(Prototype),
    Function(Function),
}

impl Expr {
    pub fn binary(op: char, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }
}

/// Function signature: name and parameter names. Duplicate parameter names
/// are accepted here.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype(pub String, pub Vec<String>);

impl Prototype {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn params(&self) -> &[String] {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function(pub Prototype, pub Box<Expr>);

impl Function {
    pub fn prototype(&self) -> &Prototype {
        &self.0
    }

    pub fn body(&self) -> &Expr {
        &self.1
    }
}
