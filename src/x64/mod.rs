//! x86-64 System V target.
//!
//! This module contains all x86-64 specific code:
//! - Intel-syntax assembly output for an external assembler
//! - Native code generation with in-place relocation
//! - The executable mapping the native code runs from
//! - Decoding generated code into listings

pub mod assembly;
pub mod disasm;
pub mod executable;
pub mod jit;
pub mod runtime;

pub use assembly::{AsmEmitter, SymbolStyle};
pub use executable::Executable;
pub use jit::JitCompiler;
pub use runtime::Runtime;
