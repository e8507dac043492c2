//! Binary Extractor - strings, import tables, disassembly, protocols
//!
//! Also the generic fallback for unknown formats: every stage here
//! tolerates arbitrary bytes. Import tables come from real PE/ELF
//! parsing; files that are neither simply contribute no imports.

use capstone::arch::x86::ArchMode;
use capstone::prelude::*;
use goblin::Object;
use std::path::Path;

use crate::constants::{DISASM_BASE_ADDR, MAX_DISASM_INSTRUCTIONS};
use super::bag::FeatureBag;
use super::bytes;

/// Protocol keywords searched in the decoded textual view of the file.
const PROTOCOL_KEYWORDS: &[&str] = &["http", "ftp", "smtp", "dns"];

pub fn extract(path: &Path) -> FeatureBag {
    match std::fs::read(path) {
        Ok(data) => extract_from_bytes(&data),
        Err(e) => {
            log::warn!("failed to read binary {}: {}", path.display(), e);
            FeatureBag::new()
        }
    }
}

pub fn extract_from_bytes(data: &[u8]) -> FeatureBag {
    let mut bag = FeatureBag::new();

    bag.strings = bytes::printable_strings(data);
    bag.imports = linked_libraries(data);
    bag.assembly = disassemble(data);

    let text = String::from_utf8_lossy(data).to_lowercase();
    for keyword in PROTOCOL_KEYWORDS {
        if text.contains(keyword) {
            bag.tag_protocol(keyword);
        }
    }

    bag
}

/// Imported library names from the PE or ELF dynamic tables. Anything
/// else (raw data, scripts routed here by fallback) yields none.
fn linked_libraries(data: &[u8]) -> Vec<String> {
    match Object::parse(data) {
        Ok(Object::PE(pe)) => pe.libraries.iter().map(|lib| lib.to_string()).collect(),
        Ok(Object::Elf(elf)) => elf.libraries.iter().map(|lib| lib.to_string()).collect(),
        Ok(_) => Vec::new(),
        Err(e) => {
            log::debug!("no import table ({})", e);
            Vec::new()
        }
    }
}

/// Linear x86 decode from the start of the image, capped at
/// MAX_DISASM_INSTRUCTIONS. 64-bit first; if nothing decodes, one
/// retry as 32-bit. Undecodable input leaves the category empty.
fn disassemble(data: &[u8]) -> Vec<String> {
    match disassemble_mode(data, ArchMode::Mode64) {
        Some(instructions) if !instructions.is_empty() => instructions,
        _ => disassemble_mode(data, ArchMode::Mode32).unwrap_or_default(),
    }
}

fn disassemble_mode(data: &[u8], mode: ArchMode) -> Option<Vec<String>> {
    let cs = Capstone::new().x86().mode(mode).build().ok()?;
    let instructions = cs
        .disasm_count(data, DISASM_BASE_ADDR, MAX_DISASM_INSTRUCTIONS)
        .ok()?;
    Some(
        instructions
            .iter()
            .map(|insn| {
                let mnemonic = insn.mnemonic().unwrap_or("");
                match insn.op_str() {
                    Some(ops) if !ops.is_empty() => format!("{} {}", mnemonic, ops),
                    _ => mnemonic.to_string(),
                }
            })
            .collect(),
    )
}
