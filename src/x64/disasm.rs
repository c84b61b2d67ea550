//! Intel-syntax listing of native code, decoded with iced-x86.

use iced_x86::{Decoder, DecoderOptions, Formatter, Instruction, IntelFormatter};
use std::fmt::Write;

/// Decode `code` as if loaded at `base` and return one line per instruction:
/// offset, raw bytes, then the instruction.
pub fn listing(code: &[u8], base: u64) -> String {
    let mut decoder = Decoder::with_ip(64, code, base, DecoderOptions::NONE);
    let mut formatter = IntelFormatter::new();
    formatter.options_mut().set_branch_leading_zeros(false);
    formatter.options_mut().set_hex_prefix("0x");
    formatter.options_mut().set_hex_suffix("");

    let mut out = String::new();
    let mut text = String::new();
    let mut instruction = Instruction::default();

    while decoder.can_decode() {
        decoder.decode_out(&mut instruction);
        text.clear();
        formatter.format(&instruction, &mut text);

        let start = (instruction.ip() - base) as usize;
        let bytes = &code[start..start + instruction.len()];
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();

        // writing to a String cannot fail
        let _ = writeln!(out, "{:08x}  {:<24} {}", instruction.ip(), hex, text);
    }

    out
}

/// Decoded instructions, for callers that want to inspect operands.
pub fn decode(code: &[u8], base: u64) -> Vec<Instruction> {
    Decoder::with_ip(64, code, base, DecoderOptions::NONE)
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced_x86::Mnemonic;

    #[test]
    fn test_listing_lines() {
        // inc byte ptr [rbx]; ret
        let text = listing(&[0xfe, 0x03, 0xc3], 0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00000000  fe03"));
        assert!(lines[0].ends_with("inc byte ptr [rbx]"));
        assert!(lines[1].starts_with("00000002  c3"));
        assert!(lines[1].ends_with("ret"));
    }

    #[test]
    fn test_decode_branch_target() {
        // jmp -5 (to itself)
        let insns = decode(&[0xe9, 0xfb, 0xff, 0xff, 0xff], 0x1000);
        assert_eq!(insns.len(), 1);
        assert_eq!(insns[0].mnemonic(), Mnemonic::Jmp);
        assert_eq!(insns[0].near_branch_target(), 0x1000);
    }
}
