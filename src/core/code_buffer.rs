// This module provides CodeBuffer, the growable byte buffer the native backend emits machine
// code into. The buffer only ever grows by appending; previously written bytes change only
// through patch operations that overwrite a fixed-width range at a known offset. Every patch
// is bounds-checked against the current length and reports PatchOutOfRange instead of writing
// through a raw pointer. Helpers cover the two relocation kinds the backend needs: absolute
// 64-bit addresses (little-endian imm64 operands) and signed 32-bit relative displacements
// measured from the end of the 4-byte field, which is the end of the branch instruction.

//! Append-only code buffer with bounds-checked backpatching.

use super::error::{CompileError, CompileResult};

/// Machine code under construction.
#[derive(Debug, Default, Clone)]
pub struct CodeBuffer {
    bytes: Vec<u8>,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length, which is also the offset of the next appended byte.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Append `code` and return the offset it starts at.
    pub fn append(&mut self, code: &[u8]) -> usize {
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(code);
        offset
    }

    /// Overwrite `data.len()` bytes starting at `offset`.
    pub fn patch(&mut self, offset: usize, data: &[u8]) -> CompileResult<()> {
        let len = self.bytes.len();
        let range = offset
            .checked_add(data.len())
            .filter(|&end| end <= len)
            .map(|end| offset..end)
            .ok_or(CompileError::PatchOutOfRange {
                offset,
                width: data.len(),
                len,
            })?;

        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Write a 64-bit absolute address at `offset`, little-endian.
    pub fn patch_u64(&mut self, offset: usize, value: u64) -> CompileResult<()> {
        self.patch(offset, &value.to_le_bytes())
    }

    /// Write the rel32 field at `field` so that the branch ending right after it lands on `target`.
    ///
    /// Returns the displacement written.
    pub fn patch_rel32(&mut self, field: usize, target: usize) -> CompileResult<i32> {
        let next_ip = field as i64 + 4;
        let displacement = target as i64 - next_ip;
        let rel = i32::try_from(displacement)
            .map_err(|_| CompileError::DisplacementOverflow { displacement })?;

        self.patch(field, &rel.to_le_bytes())?;
        Ok(rel)
    }

    /// Read back a little-endian i32 at `offset`.
    #[cfg(test)]
    pub(crate) fn read_i32(&self, offset: usize) -> Option<i32> {
        let bytes = self.bytes.get(offset..offset.checked_add(4)?)?;
        Some(i32::from_le_bytes(bytes.try_into().ok()?))
    }
}

impl AsRef<[u8]> for CodeBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
