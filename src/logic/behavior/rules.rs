//! Built-in Rule Tables for the behavior summarizer
//!
//! Every statement is a fixed string so summaries stay comparable
//! across runs and across samples. Matching semantics live in
//! summary.rs; this file is only the vocabulary.

/// Exact protocol tags and what their presence implies.
pub(super) const PROTOCOL_RULES: &[(&str, &str)] = &[
    ("HTTP", "Communicates over HTTP (possible C2 traffic)"),
    ("DNS", "Uses DNS resolution (possible domain generation or beaconing)"),
    ("FTP", "Uses FTP (possible data exfiltration)"),
    ("SMTP", "Sends mail over SMTP (possible spam or exfiltration relay)"),
];

/// Substring-matched import capabilities. Script modules first, then
/// Windows DLL families seen in PE import tables.
pub(super) const IMPORT_RULES: &[(&str, &str)] = &[
    ("socket", "Network communication capabilities"),
    ("subprocess", "Can execute system commands"),
    ("os.system", "Executes OS commands"),
    ("ctypes", "May access low-level system APIs"),
    ("shutil", "Can modify or delete files"),
    ("requests", "Performs HTTP requests"),
    ("ws2_32", "Networking operations via Winsock"),
    ("winhttp", "HTTP/HTTPS communication"),
    ("wininet", "HTTP/HTTPS communication"),
    ("advapi", "Registry or privilege operations"),
    ("kernel32", "File/process/memory manipulation"),
    ("crypt", "Encryption or decryption functionality"),
];

/// Exact mobile-manifest permission tags.
pub(super) const PERMISSION_RULES: &[(&str, &str)] = &[
    ("READ_SMS", "Reads SMS messages"),
    ("READ_CONTACTS", "Reads contact list"),
    ("WRITE_EXTERNAL_STORAGE", "Modifies external storage"),
];

// string-keyword statements (matching logic in summary.rs)
pub(super) const STMT_CREDENTIALS: &str = "Attempts to steal or handle passwords";
pub(super) const STMT_SHELL: &str = "Executes system shell commands";
pub(super) const STMT_KEYLOG: &str = "Possible keylogging activity";
pub(super) const STMT_REMOTE_URL: &str = "Connects to a remote URL";

/// Emitted alone when nothing else matched.
pub(super) const NO_FINDINGS: &str =
    "No obvious malicious behavior detected from static analysis.";
