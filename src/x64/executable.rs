// This module provides Executable, the owned executable memory region produced by the native
// backend. Construction maps an anonymous writable region with memmap2, copies the machine
// code in, then flips the mapping to read+execute so the region is never writable and
// executable at the same time. The mapping is the only handle to the code; there is no raw
// pointer or function pointer in the public API, so calling into the region after it has been
// dropped cannot be expressed. Dropping the Executable unmaps the region exactly once, no
// matter how many times it was run.

//! Executable artifact: owned, mapped machine code callable as `extern "C" fn()`.

use memmap2::{Mmap, MmapMut};

use crate::core::{CompileError, CompileResult};

/// A block of executable memory holding one compiled program.
pub struct Executable {
    map: Mmap,
    len: usize,
}

impl Executable {
    /// Map `code` into fresh executable memory.
    ///
    /// # Safety
    ///
    /// `code` must be a complete x86-64 function following the System V ABI that
    /// takes no arguments and returns normally. [`Executable::run`] jumps to its
    /// first byte.
    pub unsafe fn from_code(code: &[u8]) -> CompileResult<Self> {
        // zero-length mappings are rejected by mmap
        let mut map = MmapMut::map_anon(code.len().max(1))
            .map_err(CompileError::ExecutableMemory)?;
        map[..code.len()].copy_from_slice(code);
        let map = map.make_exec().map_err(CompileError::ExecutableMemory)?;

        log::debug!("mapped {} bytes of code at {:p}", code.len(), map.as_ptr());
        Ok(Self {
            map,
            len: code.len(),
        })
    }

    /// Number of code bytes in the region.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The code as mapped.
    pub fn code(&self) -> &[u8] {
        &self.map[..self.len]
    }

    /// Transfer control to the start of the region and return when the code returns.
    pub fn run(&self) {
        // SAFETY: from_code's contract guarantees the region holds a valid
        // zero-argument function; the borrow of self keeps the mapping alive
        // for the duration of the call.
        unsafe {
            let entry: extern "C" fn() = std::mem::transmute(self.map.as_ptr());
            entry();
        }
    }
}

impl std::fmt::Debug for Executable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executable")
            .field("addr", &self.map.as_ptr())
            .field("len", &self.len)
            .finish()
    }
}
