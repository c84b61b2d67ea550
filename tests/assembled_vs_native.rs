//! Compare the assembled textual output against direct native execution.
//!
//! Needs a C toolchain (`cc`) on PATH, so these are ignored by default:
//! `cargo test -- --ignored`.

#![cfg(all(target_arch = "x86_64", unix))]

mod common;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::Command;

use bfc::{compile_assembly, SymbolStyle};
use common::{run, HELLO_WORLD, NESTED_MULTIPLY};

/// Assemble and link `src` with cc, run it and return its stdout.
fn run_assembled(name: &str, src: &str) -> Vec<u8> {
    let dir = std::env::temp_dir().join(format!("bfc-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let asm: PathBuf = dir.join(format!("{name}.s"));
    let exe: PathBuf = dir.join(name);

    compile_assembly(
        src,
        BufWriter::new(File::create(&asm).unwrap()),
        SymbolStyle::host(),
    )
    .unwrap();

    let status = Command::new("cc")
        .arg("-o")
        .arg(&exe)
        .arg(&asm)
        .status()
        .expect("failed to spawn cc");
    assert!(status.success(), "cc failed on {}", asm.display());

    let output = Command::new(&exe).output().unwrap();
    assert!(output.status.success());
    output.stdout
}

#[test]
#[ignore]
fn test_nested_multiply_matches() {
    let native = run(NESTED_MULTIPLY).unwrap();
    assert_eq!(native, [24]);
    assert_eq!(run_assembled("multiply", NESTED_MULTIPLY), native);
}

#[test]
#[ignore]
fn test_hello_world_matches() {
    let native = run(HELLO_WORLD).unwrap();
    assert_eq!(run_assembled("hello", HELLO_WORLD), native);
}

#[test]
#[ignore]
fn test_increment_twice_matches() {
    assert_eq!(run_assembled("two", "++."), run("++.").unwrap());
}
