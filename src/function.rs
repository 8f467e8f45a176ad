//! Compiled expression bound to its own random generator.

use crate::bytecode::Program;
use crate::compiler;
use crate::error::Result;
use crate::lfsr::{Lfsr, DEFAULT_SEED};
use crate::numeric::Numeric;

/// An expression compiled once and evaluated many times.
///
/// Owns the program and the LFSR state behind `rand`. Two functions built
/// from the same source produce the same `rand` sequence and never affect
/// each other; a single function needs `&mut self` to evaluate, so sharing
/// one across threads requires external locking.
///
/// ```
/// use sigexpr::Function;
///
/// let mut f = Function::<f64>::compile("gain * sin(phase)", &["gain", "phase"]).unwrap();
/// assert_eq!(f.evaluate(&[2.0, 0.0]), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Function<T: Numeric = f64> {
    program: Option<Program<T>>,
    rng: Lfsr,
}

impl<T: Numeric> Default for Function<T> {
    fn default() -> Self {
        Function::new()
    }
}

impl<T: Numeric> Function<T> {
    /// An uncompiled function seeded with [`DEFAULT_SEED`].
    pub fn new() -> Self {
        Function::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u16) -> Self {
        Function {
            program: None,
            rng: Lfsr::new(seed),
        }
    }

    /// Compile `expr` against `inputs`.
    ///
    /// A leading `rpn:` selects the postfix grammar, anything else is
    /// parsed as infix.
    pub fn compile<S: AsRef<str>>(expr: &str, inputs: &[S]) -> Result<Self> {
        let mut function = Function::new();
        function.recompile(expr, inputs)?;
        Ok(function)
    }

    /// Replace the current program. On failure the previous program, if
    /// any, stays in place.
    pub fn recompile<S: AsRef<str>>(&mut self, expr: &str, inputs: &[S]) -> Result<()> {
        let program = compiler::compile(expr, inputs)?;
        self.program = Some(program);
        Ok(())
    }

    pub fn is_compiled(&self) -> bool {
        self.program.is_some()
    }

    pub fn program(&self) -> Option<&Program<T>> {
        self.program.as_ref()
    }

    /// Evaluate with `values` ordered like the input list given at compile
    /// time. An uncompiled function evaluates to zero.
    #[inline]
    pub fn evaluate(&mut self, values: &[T]) -> T {
        match &self.program {
            Some(program) => program.evaluate(values, &mut self.rng),
            None => T::zero(),
        }
    }

    /// Current generator state, for saving alongside host state.
    pub fn rng_state(&self) -> u16 {
        self.rng.state()
    }

    /// Restart the generator from `seed`.
    pub fn reseed(&mut self, seed: u16) {
        self.rng = Lfsr::new(seed);
    }
}
