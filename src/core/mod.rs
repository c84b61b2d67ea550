// This module is the architecture-independent half of bfc. It holds the error type shared by
// all backends, the instruction stream parser, the Driver trait the parser dispatches to, and
// the append-only CodeBuffer the native backend patches relocations into. Nothing here knows
// about x86-64 encodings or assembler syntax; those live under crate::x64.

//! Core bfc infrastructure.
//!
//! # Key Components
//!
//! - `parser`: classifies source bytes and drives a [`Driver`] in one pass
//! - `driver`: the per-instruction hook trait both backends implement
//! - `code_buffer`: append-only machine code buffer with checked patching
//! - `error`: [`CompileError`] and [`CompileResult`]

pub mod code_buffer;
pub mod driver;
pub mod error;
pub mod parser;

pub use code_buffer::CodeBuffer;
pub use driver::Driver;
pub use error::{CompileError, CompileResult};
pub use parser::{parse, Instruction};

/// Size of the zeroed scratch tape the generated program allocates.
pub const TAPE_SIZE: usize = 0x10000;
