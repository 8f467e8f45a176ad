/// Token classes for infix expressions
///
/// Every token borrows its text from the (whitespace-free) source. The
/// shunting-yard pass only needs to know whether a token is structural, a
/// binary operator, an identifier (input name or function name) or some
/// other operand such as a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    LParen,             // (
    RParen,             // )
    Comma,              // ,
    Operator(BinOp),    // + - * / ^
    Ident(&'a str),     // input or function name
    Operand(&'a str),   // literal, or anything unrecognized
}

/// Infix binary operators, all left-associative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
}

/// Characters the infix tokenizer splits on
pub const SEPARATORS: [char; 8] = ['(', ')', ',', '*', '/', '+', '-', '^'];

impl BinOp {
    pub fn from_symbol(s: &str) -> Option<BinOp> {
        match s {
            "+" => Some(BinOp::Plus),
            "-" => Some(BinOp::Minus),
            "*" => Some(BinOp::Star),
            "/" => Some(BinOp::Slash),
            "^" => Some(BinOp::Caret),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Plus | BinOp::Minus => 10,
            BinOp::Star | BinOp::Slash => 20,
            BinOp::Caret => 30,
        }
    }

    /// Postfix spelling, as understood by the postfix compiler
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Star => "*",
            BinOp::Slash => "/",
            BinOp::Caret => "^",
        }
    }
}

impl<'a> Token<'a> {
    pub fn classify(text: &'a str) -> Token<'a> {
        match text {
            "(" => Token::LParen,
            ")" => Token::RParen,
            "," => Token::Comma,
            _ => {
                if let Some(op) = BinOp::from_symbol(text) {
                    Token::Operator(op)
                } else if text.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
                    Token::Ident(text)
                } else {
                    Token::Operand(text)
                }
            }
        }
    }

    pub fn text(&self) -> &'a str {
        match *self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Operator(op) => op.symbol(),
            Token::Ident(s) | Token::Operand(s) => s,
        }
    }
}
