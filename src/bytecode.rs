use std::fmt;

/// Stack machine instructions
///
/// Binary operations pop `b`, pop `a` and push `a op b`. Unary operations
/// rewrite the top of the stack in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op<T> {
    // Binary arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Pow,

    // Unary math
    Sin,
    Cos,
    Trunc,

    // Selection
    Max,
    Min,

    // Pushes
    Rand,               // next LFSR value
    Input(usize),       // values[index]
    Constant(T),        // literal
}

impl<T> Op<T> {
    /// Builtin operator or function for a postfix token.
    ///
    /// `^` is accepted alongside `pow` since infix power translates to it.
    pub fn from_keyword(word: &str) -> Option<Op<T>> {
        match word {
            "+" => Some(Op::Add),
            "-" => Some(Op::Sub),
            "*" => Some(Op::Mul),
            "/" => Some(Op::Div),
            "pow" | "^" => Some(Op::Pow),
            "sin" => Some(Op::Sin),
            "cos" => Some(Op::Cos),
            "trunc" => Some(Op::Trunc),
            "max" => Some(Op::Max),
            "min" => Some(Op::Min),
            "rand" => Some(Op::Rand),
            _ => None,
        }
    }

    /// Net change of the stack depth after executing this instruction
    pub fn stack_effect(&self) -> isize {
        match self {
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Pow | Op::Max | Op::Min => -1,
            Op::Sin | Op::Cos | Op::Trunc => 0,
            Op::Rand | Op::Input(_) | Op::Constant(_) => 1,
        }
    }

    /// Postfix spelling of builtins; `None` for pushes of inputs and constants
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Op::Add => Some("+"),
            Op::Sub => Some("-"),
            Op::Mul => Some("*"),
            Op::Div => Some("/"),
            Op::Pow => Some("pow"),
            Op::Sin => Some("sin"),
            Op::Cos => Some("cos"),
            Op::Trunc => Some("trunc"),
            Op::Max => Some("max"),
            Op::Min => Some("min"),
            Op::Rand => Some("rand"),
            Op::Input(_) | Op::Constant(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Op<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Input(idx) => write!(f, "input #{}", idx),
            Op::Constant(v) => write!(f, "const {}", v),
            op => match op.keyword() {
                Some(kw) => f.write_str(kw),
                None => Ok(()),
            },
        }
    }
}

/// A compiled expression
///
/// Immutable once built. Evaluation lives in [`crate::vm`]; the program
/// itself holds no generator state, so one program may be shared between
/// threads as long as each caller brings its own [`crate::lfsr::Lfsr`].
#[derive(Debug, Clone, PartialEq)]
pub struct Program<T> {
    ops: Vec<Op<T>>,
    max_depth: usize,
}

impl<T> Default for Program<T> {
    fn default() -> Self {
        Program {
            ops: Vec::new(),
            max_depth: 0,
        }
    }
}

impl<T> Program<T> {
    pub(crate) fn new(ops: Vec<Op<T>>, max_depth: usize) -> Self {
        Program { ops, max_depth }
    }

    pub fn ops(&self) -> &[Op<T>] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Deepest stack the program reaches while executing
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<T: fmt::Display> Program<T> {
    /// Render the program back to postfix text.
    ///
    /// Input pushes are written using `inputs`, which must be the list the
    /// program was compiled against; out-of-range indices fall back to
    /// `#index`.
    pub fn to_postfix<S: AsRef<str>>(&self, inputs: &[S]) -> String {
        let mut words = Vec::with_capacity(self.ops.len());
        for op in &self.ops {
            let word = match op {
                Op::Input(idx) => match inputs.get(*idx) {
                    Some(name) => name.as_ref().to_string(),
                    None => format!("#{}", idx),
                },
                Op::Constant(v) => v.to_string(),
                op => op.keyword().unwrap_or_default().to_string(),
            };
            words.push(word);
        }
        words.join(" ")
    }

    /// One instruction per line, prefixed with its offset
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for (offset, op) in self.ops.iter().enumerate() {
            out.push_str(&format!("{:04}: {}\n", offset, op));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(Op::<f64>::from_keyword("pow"), Some(Op::Pow));
        assert_eq!(Op::<f64>::from_keyword("^"), Some(Op::Pow));
        assert_eq!(Op::<f64>::from_keyword("rand"), Some(Op::Rand));
        assert_eq!(Op::<f64>::from_keyword("sine"), None);
        assert_eq!(Op::<f64>::from_keyword("x"), None);
    }

    #[test]
    fn test_stack_effects() {
        assert_eq!(Op::<f64>::Add.stack_effect(), -1);
        assert_eq!(Op::<f64>::Min.stack_effect(), -1);
        assert_eq!(Op::<f64>::Trunc.stack_effect(), 0);
        assert_eq!(Op::<f64>::Rand.stack_effect(), 1);
        assert_eq!(Op::Constant(1.0).stack_effect(), 1);
        assert_eq!(Op::<f64>::Input(3).stack_effect(), 1);
    }

    #[test]
    fn test_to_postfix() {
        let program = Program::new(
            vec![Op::Input(0), Op::Constant(2.5), Op::Mul, Op::Sin, Op::Input(7)],
            2,
        );
        assert_eq!(program.to_postfix(&["x"]), "x 2.5 * sin #7");
    }

    #[test]
    fn test_disassemble() {
        let program = Program::new(vec![Op::Constant(3.0), Op::Rand, Op::Add], 2);
        assert_eq!(program.disassemble(), "0000: const 3\n0001: rand\n0002: +\n");
    }

    #[test]
    fn test_default_is_empty() {
        let program = Program::<f32>::default();
        assert!(program.is_empty());
        assert_eq!(program.max_depth(), 0);
    }
}
