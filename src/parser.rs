//! Infix to postfix translation (shunting-yard).

use tracing::trace;

use crate::error::{CompileError, Result};
use crate::lexer::{compact, Lexer};
use crate::token::Token;

/// Shunting-yard translator over a tokenized infix expression
///
/// Function names are held on the operator stack until their closing `)`,
/// so `sin(x)` becomes `x sin` and `max(a,b)` becomes `a b max`.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    expr: &'a str,
    operators: Vec<Token<'a>>,
    output: Vec<&'a str>,
}

impl<'a> Parser<'a> {
    /// `source` is the compacted expression the tokens borrow from; `expr`
    /// is the source text quoted in errors.
    pub fn new(source: &'a str, expr: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        Parser {
            tokens: lexer.tokenize().into_iter().map(Token::classify).collect(),
            pos: 0,
            expr,
            operators: Vec::new(),
            output: Vec::new(),
        }
    }

    fn current(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos + 1).copied()
    }

    fn pop_checked(&mut self) -> Result<Token<'a>> {
        self.operators.pop().ok_or_else(|| CompileError::InfixUnderflow {
            expr: self.expr.to_string(),
        })
    }

    /// Emit operators until the innermost `(` has been popped.
    fn unwind_to_paren(&mut self) -> Result<()> {
        loop {
            match self.pop_checked()? {
                Token::LParen => return Ok(()),
                tok => self.output.push(tok.text()),
            }
        }
    }

    pub fn parse(mut self) -> Result<Vec<&'a str>> {
        while let Some(tok) = self.current() {
            match tok {
                Token::LParen => self.operators.push(tok),
                Token::RParen => {
                    self.unwind_to_paren()?;
                    if let Some(Token::Ident(name)) = self.operators.last().copied() {
                        self.operators.pop();
                        self.output.push(name);
                    }
                }
                Token::Comma => {
                    self.unwind_to_paren()?;
                    self.operators.push(Token::LParen);
                }
                Token::Operator(op) => {
                    while let Some(Token::Operator(top)) = self.operators.last().copied() {
                        if top.precedence() < op.precedence() {
                            break;
                        }
                        self.operators.pop();
                        self.output.push(top.symbol());
                    }
                    self.operators.push(tok);
                }
                Token::Ident(name) => {
                    if self.peek_next() == Some(Token::LParen) {
                        self.operators.push(tok);
                    } else {
                        self.output.push(name);
                    }
                }
                Token::Operand(text) => self.output.push(text),
            }
            self.pos += 1;
        }

        while let Some(tok) = self.operators.pop() {
            self.output.push(tok.text());
        }

        Ok(self.output)
    }
}

/// Translate an infix expression to space-separated postfix text.
pub fn to_postfix(expr: &str) -> Result<String> {
    let source = compact(expr);
    let postfix = Parser::new(&source, expr).parse()?;
    let text = postfix.join(" ");
    trace!(infix = expr, postfix = %text, "translated to postfix");
    Ok(text)
}
