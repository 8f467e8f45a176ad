//! Compile-once arithmetic expressions for simulated analog signals.
//!
//! A formula over named inputs (`"gain * sin(phase) + 0.1 * rand()"`) is
//! compiled a single time into a flat stack-machine program and then
//! evaluated at simulation-step rate without allocating.
//!
//! Two grammars are accepted: conventional infix, translated with a
//! shunting-yard pass, and postfix selected by an `rpn:` prefix
//! (`"rpn:gain phase sin *"`). Both go through the same postfix compiler,
//! which proves the program's stack use before it is ever run.

pub mod bytecode;
pub mod compiler;
pub mod config;
pub mod error;
pub mod function;
pub mod lexer;
pub mod lfsr;
pub mod numeric;
pub mod parser;
pub mod token;
pub mod vm;

pub use bytecode::{Op, Program};
pub use compiler::{compile, Syntax, RPN_PREFIX};
pub use config::{FunctionSpec, SpecFile};
pub use error::{CompileError, ConfigError};
pub use function::Function;
pub use lfsr::{Lfsr, DEFAULT_SEED};
pub use numeric::Numeric;
pub use vm::{execute, STACK_CAPACITY};
