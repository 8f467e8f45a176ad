//! Stack machine executing compiled programs.
//!
//! The stack is a fixed array on the native stack; executing a program
//! never allocates. Programs only reach this point after compilation
//! has proven their stack use, so the hot loop does no depth checks.

use crate::bytecode::{Op, Program};
use crate::lfsr::Lfsr;
use crate::numeric::Numeric;

/// Evaluation stack slots; deeper programs are rejected by the compiler.
pub const STACK_CAPACITY: usize = 20;

#[inline(always)]
fn binary<T: Copy>(stack: &mut [T; STACK_CAPACITY], ptr: &mut usize, f: impl FnOnce(T, T) -> T) {
    *ptr -= 1;
    stack[*ptr - 1] = f(stack[*ptr - 1], stack[*ptr]);
}

#[inline(always)]
fn unary<T: Copy>(stack: &mut [T; STACK_CAPACITY], ptr: usize, f: impl FnOnce(T) -> T) {
    stack[ptr - 1] = f(stack[ptr - 1]);
}

/// Execute `program` against `values`, drawing `rand` from `rng`.
///
/// `values` must cover every input index the program references; a
/// shorter slice panics on the out-of-range index. An empty program
/// evaluates to zero.
pub fn execute<T: Numeric>(program: &Program<T>, values: &[T], rng: &mut Lfsr) -> T {
    let mut stack = [T::zero(); STACK_CAPACITY];
    let mut ptr = 0usize;

    for op in program.ops() {
        match *op {
            Op::Add => binary(&mut stack, &mut ptr, |a, b| a + b),
            Op::Sub => binary(&mut stack, &mut ptr, |a, b| a - b),
            Op::Mul => binary(&mut stack, &mut ptr, |a, b| a * b),
            Op::Div => binary(&mut stack, &mut ptr, |a, b| a / b),
            Op::Pow => binary(&mut stack, &mut ptr, |a, b| a.powf(b)),
            Op::Max => binary(&mut stack, &mut ptr, |a, b| a.max(b)),
            Op::Min => binary(&mut stack, &mut ptr, |a, b| a.min(b)),
            Op::Sin => unary(&mut stack, ptr, |a| a.sin()),
            Op::Cos => unary(&mut stack, ptr, |a| a.cos()),
            Op::Trunc => unary(&mut stack, ptr, |a| a.trunc()),
            Op::Rand => {
                stack[ptr] = rng.next_value();
                ptr += 1;
            }
            Op::Input(idx) => {
                stack[ptr] = values[idx];
                ptr += 1;
            }
            Op::Constant(v) => {
                stack[ptr] = v;
                ptr += 1;
            }
        }
    }

    if ptr == 0 {
        T::zero()
    } else {
        stack[ptr - 1]
    }
}

impl<T: Numeric> Program<T> {
    /// See [`execute`].
    #[inline]
    pub fn evaluate(&self, values: &[T], rng: &mut Lfsr) -> T {
        execute(self, values, rng)
    }
}
