//! Source Explanation - one plain-English line per sample
//!
//! Keyword heuristics over raw script text, checked in priority order
//! with the first hit winning. Binaries get a fixed line; nothing here
//! pretends to decompile.

/// Reports carry this line for non-script inputs.
pub const BINARY_EXPLANATION: &str =
    "Binary executable - static code explanation not available.";

pub fn describe_code(code: &str) -> String {
    if code.contains("os.system") || code.contains("subprocess") {
        "This code executes system commands.".to_string()
    } else if code.contains("socket") {
        "This code uses networking (e.g., sending/receiving data).".to_string()
    } else if code.contains("open(") && code.contains("write") {
        "This code writes data to a file.".to_string()
    } else if code.contains("eval(") || code.contains("exec(") {
        "This code dynamically executes code - possible obfuscation or injection.".to_string()
    } else {
        "No obvious malicious behavior found. Static analysis only.".to_string()
    }
}
