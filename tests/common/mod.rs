//! Shared helpers: run compiled programs with captured I/O.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use bfc::{compile_native_with, CompileResult, Runtime};
use libc::c_int;

pub const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

/// 2 * 3 * 4 by nested repeated addition, printed as one byte.
pub const NESTED_MULTIPLY: &str = "++[>+++[>++++<-]<-]>>.";

thread_local! {
    static OUTPUT: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
    static INPUT: RefCell<VecDeque<u8>> = const { RefCell::new(VecDeque::new()) };
}

unsafe extern "C" fn capture_put(c: c_int) -> c_int {
    OUTPUT.with(|out| out.borrow_mut().push(c as u8));
    c
}

unsafe extern "C" fn feed_get() -> c_int {
    INPUT.with(|input| input.borrow_mut().pop_front().map_or(-1, c_int::from))
}

/// Runtime whose putchar/getchar use this thread's buffers.
pub fn capture_runtime() -> Runtime {
    Runtime::with_io(capture_put, feed_get)
}

/// Compile `src`, run it once with `input` on stdin, return what it wrote.
pub fn run_with_input(src: impl AsRef<[u8]>, input: &[u8]) -> CompileResult<Vec<u8>> {
    let program = compile_native_with(src, capture_runtime())?;

    OUTPUT.with(|out| out.borrow_mut().clear());
    INPUT.with(|i| *i.borrow_mut() = input.iter().copied().collect());

    program.run();

    Ok(OUTPUT.with(|out| std::mem::take(&mut *out.borrow_mut())))
}

pub fn run(src: impl AsRef<[u8]>) -> CompileResult<Vec<u8>> {
    run_with_input(src, &[])
}
