// This module implements the native x86-64 backend. JitCompiler appends fixed machine code
// sequences to a CodeBuffer and performs every relocation itself, since no linker is involved.
// Absolute addresses of the runtime primitives are written into mov-imm64 operands right after
// the instruction is appended. Loops use a backpatch: `[` records the offset of its `cmp`,
// then emits `jz rel32` with a zero placeholder; `]` emits `jmp rel32` with a zero placeholder,
// pops the frame and fills in both fields. Both displacements are measured from the end of the
// branch instruction that owns them, which is also the end of the 4-byte field. The tape pointer
// lives in rbx, the tape base in r12, and r13/r14 hold putchar/getchar so each `.` and `,` is a
// short indirect call. All four registers are callee-saved and are restored before returning.

//! Native machine code backend.

use crate::core::{CodeBuffer, CompileError, CompileResult, Driver};

use super::executable::Executable;
use super::runtime::Runtime;

/// Instruction sequences and the offsets of their relocated fields.
#[rustfmt::skip]
pub(crate) mod seq {
    use crate::core::TAPE_SIZE;

    // push rbp; mov rbp, rsp; push rbx; push r12; push r13; push r14
    pub const SAVE: &[u8] = &[
        0x55,
        0x48, 0x89, 0xe5,
        0x53,
        0x41, 0x54,
        0x41, 0x55,
        0x41, 0x56,
    ];
    // mov esi, 1; mov edi, imm32
    const fn alloc_args(count: u32) -> [u8; 10] {
        let n = count.to_le_bytes();
        [
            0xbe, 0x01, 0x00, 0x00, 0x00,
            0xbf, n[0], n[1], n[2], n[3],
        ]
    }
    /// calloc(TAPE_SIZE, 1) arguments.
    pub const ALLOC_ARGS: &[u8] = &alloc_args(TAPE_SIZE as u32);
    // mov rax, imm64
    pub const MOV_RAX_IMM64: &[u8] = &[0x48, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0];
    // mov r13, imm64
    pub const MOV_R13_IMM64: &[u8] = &[0x49, 0xbd, 0, 0, 0, 0, 0, 0, 0, 0];
    // mov r14, imm64
    pub const MOV_R14_IMM64: &[u8] = &[0x49, 0xbe, 0, 0, 0, 0, 0, 0, 0, 0];
    /// Offset of the imm64 field inside the three sequences above.
    pub const IMM64_AT: usize = 2;
    // call rax
    pub const CALL_RAX: &[u8] = &[0xff, 0xd0];
    // mov rbx, rax; mov r12, rax
    pub const INIT_TAPE: &[u8] = &[0x48, 0x89, 0xc3, 0x49, 0x89, 0xc4];
    // mov rdi, r12
    pub const TAPE_ARG: &[u8] = &[0x4c, 0x89, 0xe7];
    // pop r14; pop r13; pop r12; pop rbx; pop rbp; ret
    pub const RESTORE: &[u8] = &[
        0x41, 0x5e,
        0x41, 0x5d,
        0x41, 0x5c,
        0x5b,
        0x5d,
        0xc3,
    ];

    // dec rbx
    pub const BACKWARD: &[u8] = &[0x48, 0xff, 0xcb];
    // inc rbx
    pub const FORWARD: &[u8] = &[0x48, 0xff, 0xc3];
    // inc byte ptr [rbx]
    pub const INC: &[u8] = &[0xfe, 0x03];
    // dec byte ptr [rbx]
    pub const DEC: &[u8] = &[0xfe, 0x0b];
    // cmp byte ptr [rbx], 0; jz rel32
    pub const LOOP_BEGIN: &[u8] = &[0x80, 0x3b, 0x00, 0x0f, 0x84, 0, 0, 0, 0];
    /// Offset of the jz rel32 field inside LOOP_BEGIN.
    pub const LOOP_BEGIN_REL: usize = 5;
    // jmp rel32
    pub const LOOP_END: &[u8] = &[0xe9, 0, 0, 0, 0];
    /// Offset of the jmp rel32 field inside LOOP_END.
    pub const LOOP_END_REL: usize = 1;
    // mov al, [rbx]; movsx edi, al; call r13
    pub const WRITE: &[u8] = &[0x8a, 0x03, 0x0f, 0xbe, 0xf8, 0x41, 0xff, 0xd5];
    // call r14; mov [rbx], al
    pub const READ: &[u8] = &[0x41, 0xff, 0xd6, 0x88, 0x03];
}

/// Compiles straight to machine code and maps it as an [`Executable`].
#[derive(Debug, Default)]
pub struct JitCompiler {
    code: CodeBuffer,
    /// Offsets of the `cmp` opening each pending loop.
    loops: Vec<usize>,
    runtime: Runtime,
}

impl JitCompiler {
    /// A compiler whose code calls the host C library.
    pub fn new() -> Self {
        Self::with_runtime(Runtime::host())
    }

    pub fn with_runtime(runtime: Runtime) -> Self {
        Self {
            code: CodeBuffer::new(),
            loops: Vec::new(),
            runtime,
        }
    }

    /// The code emitted so far; after `finish` this is the whole program.
    pub fn code(&self) -> &[u8] {
        self.code.as_slice()
    }

    /// Append a `mov reg, imm64` and write `addr` into it.
    fn emit_mov_imm64(&mut self, seq: &[u8], addr: u64) -> CompileResult<()> {
        let at = self.code.append(seq);
        self.code.patch_u64(at + seq::IMM64_AT, addr)
    }
}

impl Driver for JitCompiler {
    type Output = Executable;

    fn start(&mut self) -> CompileResult<()> {
        self.code.clear();
        self.loops.clear();

        self.code.append(seq::SAVE);
        self.code.append(seq::ALLOC_ARGS);
        self.emit_mov_imm64(seq::MOV_RAX_IMM64, self.runtime.alloc_zeroed_addr())?;
        self.code.append(seq::CALL_RAX);
        self.code.append(seq::INIT_TAPE);
        self.emit_mov_imm64(seq::MOV_R13_IMM64, self.runtime.put_char_addr())?;
        self.emit_mov_imm64(seq::MOV_R14_IMM64, self.runtime.get_char_addr())?;
        Ok(())
    }

    fn finish(&mut self) -> CompileResult<Executable> {
        if !self.loops.is_empty() {
            return Err(CompileError::UnterminatedLoop {
                open: self.loops.len(),
            });
        }

        self.code.append(seq::TAPE_ARG);
        self.emit_mov_imm64(seq::MOV_RAX_IMM64, self.runtime.free_addr())?;
        self.code.append(seq::CALL_RAX);
        self.code.append(seq::RESTORE);

        log::debug!("native code finished, {} bytes", self.code.len());

        // SAFETY: the buffer is a complete prologue/body/epilogue produced by this
        // driver with every branch and address patched.
        unsafe { Executable::from_code(self.code.as_slice()) }
    }

    fn emit_backward(&mut self) -> CompileResult<()> {
        self.code.append(seq::BACKWARD);
        Ok(())
    }

    fn emit_forward(&mut self) -> CompileResult<()> {
        self.code.append(seq::FORWARD);
        Ok(())
    }

    fn emit_inc(&mut self) -> CompileResult<()> {
        self.code.append(seq::INC);
        Ok(())
    }

    fn emit_dec(&mut self) -> CompileResult<()> {
        self.code.append(seq::DEC);
        Ok(())
    }

    fn emit_loop_begin(&mut self) -> CompileResult<()> {
        let top = self.code.append(seq::LOOP_BEGIN);
        self.loops.push(top);
        log::trace!("loop open at {top:#x}, depth {}", self.loops.len());
        Ok(())
    }

    fn emit_loop_end(&mut self) -> CompileResult<()> {
        let top = self.loops.pop().ok_or(CompileError::UnresolvedLoopEnd)?;
        let jmp = self.code.append(seq::LOOP_END);
        let end = self.code.len();

        let forward = self.code.patch_rel32(top + seq::LOOP_BEGIN_REL, end)?;
        let backward = self.code.patch_rel32(jmp + seq::LOOP_END_REL, top)?;

        log::trace!(
            "loop close {top:#x}..{end:#x}, jz {forward:+}, jmp {backward:+}, depth {}",
            self.loops.len()
        );
        Ok(())
    }

    fn emit_write(&mut self) -> CompileResult<()> {
        self.code.append(seq::WRITE);
        Ok(())
    }

    fn emit_read(&mut self) -> CompileResult<()> {
        self.code.append(seq::READ);
        Ok(())
    }

    fn open_loops(&self) -> usize {
        self.loops.len()
    }
}
