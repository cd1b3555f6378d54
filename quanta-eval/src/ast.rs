//! Abstract Syntax Tree

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Decimal literal as written, e.g. `3.14` or `1e3`
    Number(String),
    /// Named constant: `e`, `pi`, `inf`, `infinity`
    Constant(String),
    BinaryOp(Box<Expr>, BinOp, Box<Expr>),
    UnaryOp(UnaryOp, Box<Expr>),
    FunctionCall(String, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `//`, truncated toward zero
    FloorDiv,
    /// `%`, sign follows the dividend
    Rem,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}
