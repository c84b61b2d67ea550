//! bfc - single-pass compiler for the eight-instruction tape language.
//!
//! Source bytes are parsed in one left-to-right pass and fed to a
//! [`Driver`]. Two x86-64 drivers exist: [`AsmEmitter`] writes assembly
//! text for an external assembler, and [`JitCompiler`] writes machine code
//! into a buffer, backpatches its own loop branches and returns an
//! [`Executable`] that can be run in-process.
//!
//! # Primary Usage
//!
//! ```no_run
//! let program = bfc::compile_native("++++++++[>++++++++<-]>+.")?;
//! program.run();
//! # Ok::<(), bfc::CompileError>(())
//! ```
//!
//! # Architecture
//!
//! - [`core`] - parser, driver trait, code buffer, errors
//! - [`x64`] - assembly and native backends, executable memory, listings

pub mod core;
pub mod x64;

use std::io::Write;

pub use crate::core::{
    parse, CodeBuffer, CompileError, CompileResult, Driver, Instruction, TAPE_SIZE,
};
pub use crate::x64::{AsmEmitter, Executable, JitCompiler, Runtime, SymbolStyle};

/// Compile `src` to native code calling the host C library.
pub fn compile_native(src: impl AsRef<[u8]>) -> CompileResult<Executable> {
    compile_native_with(src, Runtime::host())
}

/// Compile `src` to native code calling the primitives in `runtime`.
pub fn compile_native_with(src: impl AsRef<[u8]>, runtime: Runtime) -> CompileResult<Executable> {
    parse(src, &mut JitCompiler::with_runtime(runtime))
}

/// Write assembly for `src` to `out`.
pub fn compile_assembly<W: Write>(
    src: impl AsRef<[u8]>,
    out: W,
    style: SymbolStyle,
) -> CompileResult<()> {
    parse(src, &mut AsmEmitter::with_style(out, style))
}
