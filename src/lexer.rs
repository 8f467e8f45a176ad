use crate::token::{BinOp, SEPARATORS};

/// Splits a whitespace-free infix expression into token slices.
///
/// Splitting on the operator set breaks signed literals and exponents apart
/// (`1.5e-3` becomes `1.5e`, `-`, `3`), so [`Lexer::tokenize`] glues those
/// pieces back together afterwards. The reassembly is a positional
/// heuristic, not a full number grammar.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

/// Remove every whitespace character from an expression
pub fn compact(expr: &str) -> String {
    expr.chars().filter(|c| !c.is_whitespace()).collect()
}

impl<'a> Lexer<'a> {
    /// `input` is expected to be free of whitespace, see [`compact`].
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if let Some(c) = ch {
            self.pos += c.len_utf8();
        }
        ch
    }

    fn next_span(&mut self) -> Option<Span> {
        let start = self.pos;
        let ch = self.advance()?;

        if !SEPARATORS.contains(&ch) {
            while let Some(c) = self.peek() {
                if SEPARATORS.contains(&c) {
                    break;
                }
                self.advance();
            }
        }

        Some(Span { start, end: self.pos })
    }

    fn split(&mut self) -> Vec<Span> {
        let mut spans = Vec::new();
        while let Some(span) = self.next_span() {
            spans.push(span);
        }
        spans
    }

    pub fn tokenize(&mut self) -> Vec<&'a str> {
        let input = self.input;
        let spans = self.split();
        let text = |i: usize| &input[spans[i].start..spans[i].end];

        let mut tokens: Vec<&'a str> = Vec::with_capacity(spans.len());
        let mut i = 0;
        while i < spans.len() {
            let piece = text(i);
            let mut next = i + 1;

            if piece == "-"
                && in_prefix_position(tokens.last().copied())
                && i + 1 < spans.len()
                && is_digit_initial(text(i + 1))
            {
                // -1.5e-3 arrives as "-", "1.5e", "-", "3"
                next = i + 2;
                if ends_with_exponent(text(i + 1))
                    && i + 3 < spans.len()
                    && is_sign(text(i + 2))
                    && is_digit_initial(text(i + 3))
                {
                    next = i + 4;
                }
            } else if is_digit_initial(piece)
                && ends_with_exponent(piece)
                && i + 2 < spans.len()
                && is_sign(text(i + 1))
                && is_digit_initial(text(i + 2))
            {
                next = i + 3;
            }

            tokens.push(&input[spans[i].start..spans[next - 1].end]);
            i = next;
        }

        tokens
    }
}

/// A `-` is a sign rather than a binary minus at the start of the
/// expression, after `(` or `,`, and after another operator.
fn in_prefix_position(prev: Option<&str>) -> bool {
    match prev {
        None => true,
        Some("(") | Some(",") => true,
        Some(p) => BinOp::from_symbol(p).is_some(),
    }
}

fn is_digit_initial(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

fn ends_with_exponent(s: &str) -> bool {
    s.ends_with(['e', 'E'])
}

fn is_sign(s: &str) -> bool {
    s == "-" || s == "+"
}
