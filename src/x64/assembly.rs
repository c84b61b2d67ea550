// This module implements the textual x86-64 backend. AsmEmitter writes Intel-syntax GNU
// assembly for a `main` function that allocates a zeroed 64 KiB tape with calloc, keeps the
// tape base in r12 and the moving tape pointer in rbx, and talks to the outside world only
// through putchar and getchar. Each loop gets a fresh pair of local labels (.L<top>, .L<end>)
// from a counter that is reset at start(); the pair is pushed on a stack at `[` and popped at
// `]`, so nesting is resolved purely by stack discipline. The symbol spelling of the external
// primitives depends on the object format (SymbolStyle), since Mach-O prefixes C symbols with
// an underscore and ELF does not.

//! Textual assembly backend.

use std::fmt;
use std::io::Write;

use crate::core::{CompileError, CompileResult, Driver, TAPE_SIZE};

/// Object format naming convention for global symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolStyle {
    /// Bare C names, plus a non-executable stack note.
    Elf,
    /// C names prefixed with `_`.
    MachO,
}

impl SymbolStyle {
    /// The convention of the machine we are running on.
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            SymbolStyle::MachO
        } else {
            SymbolStyle::Elf
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            SymbolStyle::Elf => "",
            SymbolStyle::MachO => "_",
        }
    }
}

impl Default for SymbolStyle {
    fn default() -> Self {
        Self::host()
    }
}

/// A symbol name spelled for a given style.
struct Sym(SymbolStyle, &'static str);

impl fmt::Display for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0.prefix(), self.1)
    }
}

/// Writes assembly source for one program to `W`.
pub struct AsmEmitter<W: Write> {
    out: W,
    style: SymbolStyle,
    /// Pending (top, end) label pairs.
    loops: Vec<(usize, usize)>,
    /// Next free label number.
    label: usize,
}

impl<W: Write> AsmEmitter<W> {
    pub fn new(out: W) -> Self {
        Self::with_style(out, SymbolStyle::host())
    }

    pub fn with_style(out: W, style: SymbolStyle) -> Self {
        Self {
            out,
            style,
            loops: Vec::new(),
            label: 0,
        }
    }

    pub fn style(&self) -> SymbolStyle {
        self.style
    }

    /// Give back the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn sym(&self, name: &'static str) -> Sym {
        Sym(self.style, name)
    }

    fn next_label(&mut self) -> usize {
        let label = self.label;
        self.label += 1;
        label
    }
}

impl<W: Write> Driver for AsmEmitter<W> {
    type Output = ();

    fn start(&mut self) -> CompileResult<()> {
        self.loops.clear();
        self.label = 0;

        let main = self.sym("main");
        let calloc = self.sym("calloc");

        write!(
            self.out,
            "    .intel_syntax noprefix\n\
             \x20   .text\n\
             \x20   .global {main}\n\
             {main}:\n\
             \x20   push rbp\n\
             \x20   mov rbp, rsp\n\
             \x20   push rbx\n\
             \x20   push r12\n\
             \x20   push r13\n\
             \x20   push r14\n\
             \x20   mov esi, 1\n\
             \x20   mov edi, {TAPE_SIZE:#x}\n\
             \x20   call {calloc}\n\
             \x20   mov rbx, rax\n\
             \x20   mov r12, rax\n"
        )?;
        Ok(())
    }

    fn finish(&mut self) -> CompileResult<()> {
        if !self.loops.is_empty() {
            return Err(CompileError::UnterminatedLoop {
                open: self.loops.len(),
            });
        }

        let free = self.sym("free");

        write!(
            self.out,
            "    mov rdi, r12\n\
             \x20   call {free}\n\
             \x20   mov eax, 0\n\
             \x20   pop r14\n\
             \x20   pop r13\n\
             \x20   pop r12\n\
             \x20   pop rbx\n\
             \x20   pop rbp\n\
             \x20   ret\n"
        )?;

        if self.style == SymbolStyle::Elf {
            writeln!(self.out, "    .section .note.GNU-stack,\"\",@progbits")?;
        }

        self.out.flush()?;
        log::debug!("assembly finished, {} labels", self.label);
        Ok(())
    }

    fn emit_backward(&mut self) -> CompileResult<()> {
        writeln!(self.out, "    dec rbx")?;
        Ok(())
    }

    fn emit_forward(&mut self) -> CompileResult<()> {
        writeln!(self.out, "    inc rbx")?;
        Ok(())
    }

    fn emit_inc(&mut self) -> CompileResult<()> {
        writeln!(self.out, "    inc byte ptr [rbx]")?;
        Ok(())
    }

    fn emit_dec(&mut self) -> CompileResult<()> {
        writeln!(self.out, "    dec byte ptr [rbx]")?;
        Ok(())
    }

    fn emit_loop_begin(&mut self) -> CompileResult<()> {
        let top = self.next_label();
        let end = self.next_label();
        self.loops.push((top, end));
        log::trace!("loop open .L{top}/.L{end}, depth {}", self.loops.len());

        write!(
            self.out,
            ".L{top}:\n\
             \x20   cmp byte ptr [rbx], 0\n\
             \x20   jz .L{end}\n"
        )?;
        Ok(())
    }

    fn emit_loop_end(&mut self) -> CompileResult<()> {
        let (top, end) = self.loops.pop().ok_or(CompileError::UnresolvedLoopEnd)?;
        log::trace!("loop close .L{top}/.L{end}, depth {}", self.loops.len());

        write!(
            self.out,
            "    jmp .L{top}\n\
             .L{end}:\n"
        )?;
        Ok(())
    }

    fn emit_write(&mut self) -> CompileResult<()> {
        let putchar = self.sym("putchar");
        write!(
            self.out,
            "    mov al, [rbx]\n\
             \x20   movsx edi, al\n\
             \x20   call {putchar}\n"
        )?;
        Ok(())
    }

    fn emit_read(&mut self) -> CompileResult<()> {
        let getchar = self.sym("getchar");
        write!(
            self.out,
            "    call {getchar}\n\
             \x20   mov [rbx], al\n"
        )?;
        Ok(())
    }

    fn open_loops(&self) -> usize {
        self.loops.len()
    }
}
