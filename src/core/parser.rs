//! Instruction stream parser.
//!
//! A single left-to-right pass over the source bytes. Every byte causes exactly
//! one [`Driver`] call; bracket balance is left to the driver.

use super::driver::Driver;
use super::error::CompileResult;

/// One source byte, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    MoveLeft,
    MoveRight,
    Increment,
    Decrement,
    LoopBegin,
    LoopEnd,
    Write,
    Read,
    Comment(u8),
}

impl Instruction {
    /// Classify a source byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'<' => Instruction::MoveLeft,
            b'>' => Instruction::MoveRight,
            b'+' => Instruction::Increment,
            b'-' => Instruction::Decrement,
            b'[' => Instruction::LoopBegin,
            b']' => Instruction::LoopEnd,
            b'.' => Instruction::Write,
            b',' => Instruction::Read,
            other => Instruction::Comment(other),
        }
    }

    /// Forward this instruction to the matching driver hook.
    pub fn dispatch<D: Driver + ?Sized>(self, driver: &mut D) -> CompileResult<()> {
        match self {
            Instruction::MoveLeft => driver.emit_backward(),
            Instruction::MoveRight => driver.emit_forward(),
            Instruction::Increment => driver.emit_inc(),
            Instruction::Decrement => driver.emit_dec(),
            Instruction::LoopBegin => driver.emit_loop_begin(),
            Instruction::LoopEnd => driver.emit_loop_end(),
            Instruction::Write => driver.emit_write(),
            Instruction::Read => driver.emit_read(),
            Instruction::Comment(byte) => driver.emit_comment(byte),
        }
    }
}

/// Run `driver` over `src` and return what its `finish` produces.
///
/// Stops at the first driver error; no partial output is usable after that.
pub fn parse<D, S>(src: S, driver: &mut D) -> CompileResult<D::Output>
where
    D: Driver + ?Sized,
    S: AsRef<[u8]>,
{
    driver.start()?;

    for &byte in src.as_ref() {
        Instruction::from_byte(byte).dispatch(driver)?;
    }

    driver.finish()
}
