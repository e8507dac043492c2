//! Byte-Level Primitives - entropy and printable-string scanning
//!
//! Shared by the binary extractor and the vector builder. Both functions
//! are single linear passes over the raw bytes.

use crate::constants::MIN_STRING_LEN;

/// Section names and packer markers dropped by the string scanner.
/// These appear in virtually every executable and carry no signal.
const BOILERPLATE_TOKENS: &[&str] = &[
    // PE sections
    ".text", ".data", ".rdata", ".bss", ".idata", ".edata", ".pdata", ".rsrc",
    ".reloc", ".tls", ".CRT", ".debug",
    // ELF sections
    ".shstrtab", ".symtab", ".strtab", ".dynsym", ".dynstr", ".dynamic",
    ".got", ".got.plt", ".plt", ".init", ".fini", ".init_array", ".fini_array",
    ".comment", ".note", ".note.ABI-tag", ".note.gnu.build-id", ".gnu.hash",
    ".gnu.version", ".gnu.version_r", ".rela.dyn", ".rela.plt", ".rodata",
    ".eh_frame", ".eh_frame_hdr", ".interp",
    // common packer stubs
    "UPX0", "UPX1", "UPX!", ".upx", ".aspack", ".adata", ".MPRESS1",
    ".MPRESS2", ".petite", ".themida", ".vmp0", ".vmp1",
];

/// Shannon entropy in bits per byte. Empty input is 0.0; a uniform
/// byte distribution approaches 8.0.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let total = data.len() as f64;
    let mut entropy = 0.0;
    for &count in counts.iter() {
        if count > 0 {
            let p = count as f64 / total;
            entropy -= p * p.log2();
        }
    }
    entropy
}

/// Scan raw bytes for printable ASCII runs of at least MIN_STRING_LEN,
/// dropping lowercase-hex runs (spurious offsets and hashes) and
/// executable boilerplate. Order follows byte position.
pub fn printable_strings(data: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut run: Vec<u8> = Vec::new();

    for &byte in data {
        if (0x20..=0x7e).contains(&byte) {
            run.push(byte);
        } else {
            flush_run(&mut run, &mut out);
        }
    }
    flush_run(&mut run, &mut out);

    out
}

fn flush_run(run: &mut Vec<u8>, out: &mut Vec<String>) {
    if run.len() >= MIN_STRING_LEN {
        // run is all printable ASCII, so this never fails
        if let Ok(s) = String::from_utf8(run.clone()) {
            if !is_hex_run(&s) && !is_boilerplate(&s) {
                out.push(s);
            }
        }
    }
    run.clear();
}

/// Lowercase hex only. Mixed-case runs are kept; an uppercase letter is
/// enough to stop looking like a dumped offset.
fn is_hex_run(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn is_boilerplate(s: &str) -> bool {
    BOILERPLATE_TOKENS.contains(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_of_empty_input_is_zero() {
        assert_eq!(shannon_entropy(&[]), 0.0);
    }

    #[test]
    fn test_entropy_of_constant_input_is_zero() {
        assert_eq!(shannon_entropy(&[0x41; 1024]), 0.0);
    }

    #[test]
    fn test_entropy_of_uniform_bytes_is_eight() {
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let entropy = shannon_entropy(&data);
        assert!((entropy - 8.0).abs() < 1e-9, "got {}", entropy);
    }

    #[test]
    fn test_strings_extracts_printable_runs() {
        let data = b"\x00\x01GetProcAddress\x00\xffcmd.exe /c\x00";
        let strings = printable_strings(data);
        assert_eq!(strings, vec!["GetProcAddress", "cmd.exe /c"]);
    }

    #[test]
    fn test_strings_drops_short_runs() {
        let data = b"ab\x00abc\x00abcd\x00";
        assert_eq!(printable_strings(data), vec!["abcd"]);
    }

    #[test]
    fn test_strings_drops_lowercase_hex_keeps_mixed_case() {
        let data = b"\x00deadbeef\x001234\x00AB12\x00";
        let strings = printable_strings(data);
        assert!(!strings.contains(&"deadbeef".to_string()));
        assert!(!strings.contains(&"1234".to_string()));
        assert!(strings.contains(&"AB12".to_string()));
    }

    #[test]
    fn test_strings_drops_section_boilerplate() {
        let data = b"\x00.text\x00.rdata\x00UPX0\x00RealIndicator\x00";
        assert_eq!(printable_strings(data), vec!["RealIndicator"]);
    }

    #[test]
    fn test_trailing_run_is_flushed() {
        assert_eq!(printable_strings(b"\x00hello"), vec!["hello"]);
    }
}
