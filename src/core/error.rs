// This module defines error types for the bfc compiler using the thiserror crate for
// idiomatic Rust error handling. CompileError is the single error enum shared by every
// driver: the two structural bracket errors (an unterminated loop at finish, a loop end
// with no open loop), bounds failures of the code buffer's relocation writes, branch
// displacements that do not fit the 32-bit field, I/O failures of the assembly stream,
// and failure to acquire executable memory. CompileResult<T> is the convenience alias
// used throughout the crate.

//! Error types for the bfc compiler.

use thiserror::Error;

/// Main error type for compilation.
#[derive(Error, Debug)]
pub enum CompileError {
    /// One or more loops were still open when code generation finished.
    #[error("unterminated loop ({open} open)")]
    UnterminatedLoop { open: usize },

    /// A loop end was seen with no open loop.
    #[error("unresolved loop")]
    UnresolvedLoopEnd,

    #[error("patch of {width} bytes at offset {offset} outside code buffer of {len} bytes")]
    PatchOutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("branch displacement {displacement} does not fit in 32 bits")]
    DisplacementOverflow { displacement: i64 },

    #[error("failed to write assembly: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to map executable memory: {0}")]
    ExecutableMemory(#[source] std::io::Error),
}

impl CompileError {
    /// True for the two bracket-balance errors.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            CompileError::UnterminatedLoop { .. } | CompileError::UnresolvedLoopEnd
        )
    }
}

/// Result type alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_classification() {
        assert!(CompileError::UnterminatedLoop { open: 2 }.is_syntax());
        assert!(CompileError::UnresolvedLoopEnd.is_syntax());
        let overflow = CompileError::DisplacementOverflow {
            displacement: 1 << 40,
        };
        assert!(!overflow.is_syntax());
    }

    #[test]
    fn test_messages() {
        assert_eq!(CompileError::UnresolvedLoopEnd.to_string(), "unresolved loop");
        assert_eq!(
            CompileError::UnterminatedLoop { open: 1 }.to_string(),
            "unterminated loop (1 open)"
        );
    }
}
