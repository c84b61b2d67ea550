// This module defines the Driver trait, the capability set every code generation backend
// implements. A driver sees exactly one call per source byte, in source order, bracketed by
// start() and finish(). The parser owns the dispatch switch and the drivers own everything
// else: output representation, loop-frame bookkeeping and bracket validation. Both x86-64
// backends (textual assembly and native machine code) implement this trait, which keeps
// parsing a single zero-lookahead pass without duplicating the dispatch in each backend.

//! Code generation driver interface.
//!
//! The parser calls the hooks in this order:
//! ```text
//! driver.start();
//! for each byte in source {
//!     driver.emit_<instruction>();   // or emit_comment(byte)
//! }
//! driver.finish()
//! ```

use super::error::CompileResult;

/// Hooks implemented by a code generation backend.
pub trait Driver {
    /// What a successful compilation produces.
    type Output;

    /// Reset per-compilation state and emit the prologue.
    fn start(&mut self) -> CompileResult<()>;

    /// Emit the epilogue and hand back the result.
    ///
    /// Fails with `UnterminatedLoop` while any loop frame is still open.
    fn finish(&mut self) -> CompileResult<Self::Output>;

    /// `<`
    fn emit_backward(&mut self) -> CompileResult<()>;
    /// `>`
    fn emit_forward(&mut self) -> CompileResult<()>;
    /// `+`
    fn emit_inc(&mut self) -> CompileResult<()>;
    /// `-`
    fn emit_dec(&mut self) -> CompileResult<()>;
    /// `[`
    fn emit_loop_begin(&mut self) -> CompileResult<()>;
    /// `]`, fails with `UnresolvedLoopEnd` when no loop is open.
    fn emit_loop_end(&mut self) -> CompileResult<()>;
    /// `.`
    fn emit_write(&mut self) -> CompileResult<()>;
    /// `,`
    fn emit_read(&mut self) -> CompileResult<()>;

    /// Any other byte. No semantic effect.
    fn emit_comment(&mut self, byte: u8) -> CompileResult<()> {
        log::trace!("comment byte {byte:#04x}");
        Ok(())
    }

    /// Number of loop frames currently pending.
    fn open_loops(&self) -> usize;
}
