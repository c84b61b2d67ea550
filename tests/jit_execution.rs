//! End-to-end tests: compile natively and execute in-process.

#![cfg(all(target_arch = "x86_64", unix))]

mod common;

use common::{run, run_with_input, HELLO_WORLD, NESTED_MULTIPLY};

#[test]
fn test_increment_twice_and_write() {
    assert_eq!(run("++.").unwrap(), [2]);
}

#[test]
fn test_loop_clears_cell_without_output() {
    assert_eq!(run("+[-]").unwrap(), Vec::<u8>::new());
}

#[test]
fn test_empty_program() {
    assert!(run("").unwrap().is_empty());
}

#[test]
fn test_nested_multiply() {
    assert_eq!(run(NESTED_MULTIPLY).unwrap(), [24]);
}

#[test]
fn test_hello_world() {
    assert_eq!(run(HELLO_WORLD).unwrap(), b"Hello World!\n");
}

#[test]
fn test_cell_wraps_downward() {
    // 0 - 1 = 255, written as the full byte despite the sign extension
    assert_eq!(run("-.").unwrap(), [255]);
}

#[test]
fn test_cell_wraps_upward() {
    let src = format!("{}.+.", "+".repeat(255));
    assert_eq!(run(src).unwrap(), [255, 0]);
}

#[test]
fn test_pointer_moves_right_then_left() {
    // cell0 = 1, cell1 = 2, print cell0 after coming back
    assert_eq!(run("+>++<.>.").unwrap(), [1, 2]);
}

#[test]
fn test_tape_starts_zeroed() {
    assert_eq!(run(">>>>.<<.").unwrap(), [0, 0]);
}

#[test]
fn test_echo_until_nul() {
    assert_eq!(run_with_input(",[.,]", b"abc\0").unwrap(), b"abc");
}

#[test]
fn test_read_eof_truncates_to_byte() {
    // getchar's -1 is stored as 0xff, so one increment wraps to zero
    assert_eq!(run_with_input(",+.", b"").unwrap(), [0]);
}

#[test]
fn test_read_overwrites_cell() {
    assert_eq!(run_with_input("+++,.", b"z").unwrap(), b"z");
}

#[test]
fn test_comments_do_not_change_output() {
    let commented = "Print two: + + (twice)\nthen . write it";
    assert_eq!(run(commented).unwrap(), run("++.").unwrap());
}

#[test]
fn test_long_loop_body_uses_wide_displacements() {
    // 200 increments and decrements inside the loop push the body past 127 bytes
    let body = "+-".repeat(200);
    let src = format!("+++[{body}-]>+.");
    assert_eq!(run(src).unwrap(), [1]);
}

#[test]
fn test_program_runs_repeatedly() {
    let program = bfc::compile_native_with("+[-]", common::capture_runtime()).unwrap();
    for _ in 0..3 {
        program.run();
    }
}
