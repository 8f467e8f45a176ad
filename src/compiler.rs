use tracing::debug;

use crate::bytecode::{Op, Program};
use crate::error::{CompileError, Result};
use crate::lexer::compact;
use crate::numeric::Numeric;
use crate::parser::Parser;
use crate::vm::STACK_CAPACITY;

/// Prefix selecting the postfix grammar
pub const RPN_PREFIX: &str = "rpn:";

/// Input grammar of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Infix,
    Postfix,
}

impl Syntax {
    /// Detect the grammar and strip the prefix, if any.
    pub fn detect(expr: &str) -> (Syntax, &str) {
        match expr.strip_prefix(RPN_PREFIX) {
            Some(rest) => (Syntax::Postfix, rest),
            None => (Syntax::Infix, expr),
        }
    }
}

/// Postfix compiler
///
/// Walks the tokens once, tracking how deep the runtime stack will be so
/// that every program it returns leaves exactly one value and never reads
/// below the bottom of the stack.
pub struct Compiler<'a, S> {
    inputs: &'a [S],
    expr: &'a str,
    depth: isize,
    max_depth: usize,
}

impl<'a, S: AsRef<str>> Compiler<'a, S> {
    /// `expr` is the full source text quoted in errors.
    pub fn new(inputs: &'a [S], expr: &'a str) -> Self {
        Compiler {
            inputs,
            expr,
            depth: 0,
            max_depth: 0,
        }
    }

    fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|input| input.as_ref() == name)
    }

    fn compile_token<T: Numeric>(&mut self, token: &str, ops: &mut Vec<Op<T>>) -> Result<()> {
        let op = if let Some(op) = Op::from_keyword(token) {
            op
        } else if let Some(idx) = self.input_index(token) {
            Op::Input(idx)
        } else {
            match parse_literal::<T>(token) {
                Some(value) => Op::Constant(value),
                None => {
                    return Err(CompileError::UnknownToken {
                        token: token.to_string(),
                        expr: self.expr.to_string(),
                    })
                }
            }
        };

        self.depth += op.stack_effect();
        if self.depth < 1 {
            return Err(CompileError::StackUnderflow {
                token: token.to_string(),
                expr: self.expr.to_string(),
            });
        }
        self.max_depth = self.max_depth.max(self.depth as usize);
        ops.push(op);
        Ok(())
    }

    pub fn compile<'t, T, I>(mut self, tokens: I) -> Result<Program<T>>
    where
        T: Numeric,
        I: IntoIterator<Item = &'t str>,
    {
        let mut ops = Vec::new();
        for token in tokens {
            self.compile_token(token, &mut ops)?;
        }

        if self.depth != 1 {
            return Err(CompileError::Imbalanced {
                expr: self.expr.to_string(),
                depth: self.depth.max(0) as usize,
            });
        }
        if self.max_depth > STACK_CAPACITY {
            return Err(CompileError::StackOverflow {
                expr: self.expr.to_string(),
                depth: self.max_depth,
                capacity: STACK_CAPACITY,
            });
        }

        Ok(Program::new(ops, self.max_depth))
    }
}

/// Parse a numeric literal: optional sign, digits, fraction and exponent.
///
/// Words such as `inf` or `NaN` are rejected even though the float parser
/// would take them.
pub fn parse_literal<T: Numeric>(token: &str) -> Option<T> {
    let first = token.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '.' | '-' | '+')) {
        return None;
    }
    if !token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
    {
        return None;
    }
    // overflow parses to infinity; such a constant could not be written back
    token.parse::<T>().ok().filter(|value| value.is_finite())
}

/// Compile a space-separated postfix expression (without the prefix).
pub fn compile_postfix<T: Numeric, S: AsRef<str>>(expr: &str, inputs: &[S]) -> Result<Program<T>> {
    Compiler::new(inputs, expr).compile(expr.split_whitespace())
}

/// Compile a conventional infix expression.
pub fn compile_infix<T: Numeric, S: AsRef<str>>(expr: &str, inputs: &[S]) -> Result<Program<T>> {
    let source = compact(expr);
    let postfix = Parser::new(&source, expr).parse()?;
    Compiler::new(inputs, expr).compile(postfix)
}

/// Compile an expression, choosing the grammar from the `rpn:` prefix.
pub fn compile<T: Numeric, S: AsRef<str>>(expr: &str, inputs: &[S]) -> Result<Program<T>> {
    let (syntax, body) = Syntax::detect(expr);
    let result = match syntax {
        Syntax::Postfix => compile_postfix(body, inputs),
        Syntax::Infix => compile_infix(body, inputs),
    };

    match &result {
        Ok(program) => debug!(
            expr,
            ?syntax,
            ops = program.len(),
            max_depth = program.max_depth(),
            "expression compiled"
        ),
        Err(e) => debug!(expr, ?syntax, error = %e, "expression rejected"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_INPUTS: &[&str] = &[];

    fn ops(expr: &str) -> Vec<Op<f64>> {
        compile::<f64, _>(expr, NO_INPUTS).unwrap().ops().to_vec()
    }

    #[test]
    fn test_postfix_add() {
        assert_eq!(ops("rpn:3 4 +"), vec![Op::Constant(3.0), Op::Constant(4.0), Op::Add]);
    }

    #[test]
    fn test_postfix_tolerates_repeated_spaces() {
        assert_eq!(ops("rpn: 3   4 + "), ops("rpn:3 4 +"));
    }

    #[test]
    fn test_infix_precedence() {
        assert_eq!(
            ops("2 + 3 * 4"),
            vec![
                Op::Constant(2.0),
                Op::Constant(3.0),
                Op::Constant(4.0),
                Op::Mul,
                Op::Add
            ]
        );
    }

    #[test]
    fn test_caret_and_pow_agree() {
        assert_eq!(ops("2 ^ 3"), ops("pow(2, 3)"));
        assert_eq!(ops("rpn:2 3 ^"), ops("rpn:2 3 pow"));
    }

    #[test]
    fn test_inputs_resolve_by_position() {
        let program = compile::<f64, _>("b - a", &["a", "b"]).unwrap();
        assert_eq!(program.ops(), &[Op::Input(1), Op::Input(0), Op::Sub]);
    }

    #[test]
    fn test_duplicate_input_first_wins() {
        let program = compile::<f64, _>("x", &["x", "x"]).unwrap();
        assert_eq!(program.ops(), &[Op::Input(0)]);
    }

    #[test]
    fn test_builtin_shadows_input() {
        let program = compile::<f64, _>("rpn:1 sin", &["sin"]).unwrap();
        assert_eq!(program.ops(), &[Op::Constant(1.0), Op::Sin]);
    }

    #[test]
    fn test_signed_scientific_literals() {
        assert_eq!(ops("-1.5e-3"), vec![Op::Constant(-1.5e-3)]);
        assert_eq!(ops("2.5E+2"), vec![Op::Constant(250.0)]);
        assert_eq!(ops("rpn:-1.5e-3"), vec![Op::Constant(-1.5e-3)]);
    }

    #[test]
    fn test_parse_literal_rejects_words() {
        assert_eq!(parse_literal::<f64>("inf"), None);
        assert_eq!(parse_literal::<f64>("NaN"), None);
        assert_eq!(parse_literal::<f64>("1e"), None);
        assert_eq!(parse_literal::<f64>("1.2.3"), None);
        assert_eq!(parse_literal::<f64>(""), None);
        assert_eq!(parse_literal::<f64>(".5"), Some(0.5));
    }

    #[test]
    fn test_unknown_token() {
        let err = compile::<f64, _>("a + b", NO_INPUTS).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownToken {
                token: "a".to_string(),
                expr: "a + b".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_token_with_mismatched_inputs() {
        let err = compile::<f64, _>("a + b", &["c"]).unwrap_err();
        assert_eq!(err.token(), Some("a"));
    }

    #[test]
    fn test_stack_underflow() {
        let err = compile::<f64, _>("rpn:+", NO_INPUTS).unwrap_err();
        assert_eq!(
            err,
            CompileError::StackUnderflow {
                token: "+".to_string(),
                expr: "+".to_string()
            }
        );
    }

    #[test]
    fn test_unary_on_empty_stack() {
        let err = compile::<f64, _>("rpn:sin", NO_INPUTS).unwrap_err();
        assert_eq!(err.token(), Some("sin"));
    }

    #[test]
    fn test_imbalanced() {
        let err = compile::<f64, _>("rpn:3 4", NO_INPUTS).unwrap_err();
        assert_eq!(
            err,
            CompileError::Imbalanced {
                expr: "3 4".to_string(),
                depth: 2
            }
        );
    }

    #[test]
    fn test_empty_expression_is_imbalanced() {
        let err = compile::<f64, _>("", NO_INPUTS).unwrap_err();
        assert!(matches!(err, CompileError::Imbalanced { depth: 0, .. }));
    }

    #[test]
    fn test_unclosed_paren_is_unknown_token() {
        let err = compile::<f64, _>("(1 + 2", NO_INPUTS).unwrap_err();
        assert_eq!(err.token(), Some("("));
    }

    #[test]
    fn test_unary_minus_on_identifier_underflows() {
        let err = compile::<f64, _>("-x", &["x"]).unwrap_err();
        assert!(matches!(err, CompileError::StackUnderflow { .. }));
    }

    #[test]
    fn test_stack_overflow() {
        let expr = format!("rpn:{}{}", "1 ".repeat(21), "+ ".repeat(20));
        let err = compile::<f64, _>(&expr, NO_INPUTS).unwrap_err();
        assert!(matches!(
            err,
            CompileError::StackOverflow {
                depth: 21,
                capacity: STACK_CAPACITY,
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range_literal_is_unknown_token() {
        let err = compile::<f64, _>("1e400", NO_INPUTS).unwrap_err();
        assert_eq!(err.token(), Some("1e400"));
        assert!(matches!(err, CompileError::UnknownToken { .. }));

        let err = compile::<f32, _>("rpn:1e39", NO_INPUTS).unwrap_err();
        assert_eq!(err.token(), Some("1e39"));
        assert!(compile::<f64, _>("rpn:1e39", NO_INPUTS).is_ok());
    }

    #[test]
    fn test_parse_literal_range() {
        assert_eq!(parse_literal::<f64>("-1.5e-3"), Some(-1.5e-3));
        assert_eq!(parse_literal::<f64>("-1e400"), None);
        assert_eq!(parse_literal::<f32>("3.5e38"), None);
        assert_eq!(parse_literal::<f32>("3.4e38"), Some(3.4e38));
    }

    #[test]
    fn test_max_depth_recorded() {
        let program = compile::<f64, _>("rpn:1 2 3 + +", NO_INPUTS).unwrap();
        assert_eq!(program.max_depth(), 3);
    }

    #[test]
    fn test_detect_syntax() {
        assert_eq!(Syntax::detect("rpn:1 2 +"), (Syntax::Postfix, "1 2 +"));
        assert_eq!(Syntax::detect("1 + 2"), (Syntax::Infix, "1 + 2"));
    }
}
