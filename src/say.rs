//! Messages for the person at the keyboard.
//!
//! Diagnostics go through `tracing`; this is only what the user is meant
//! to read.

pub fn say(message: &str) {
    if !message.is_empty() {
        println!("{message}");
    }
}

pub fn info(message: &str) {
    println!("> {message}");
}

pub fn warning(message: &str) {
    println!("⚠ {message}");
}

pub fn error(message: &str) {
    eprintln!("ERROR {message}");
}

/// A remediation hint followed by the command that fixes it.
pub fn fix(instruction: &str, command: &str) {
    println!("👉 {instruction}");
    println!("    {command}");
}

/// Multi-line output (git's own, mostly), indented under the last message.
pub fn indented(text: &str) {
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        println!("  {line}");
    }
}

pub fn with_prefix(text: &str, prefix: &str) {
    for line in text.lines() {
        println!("{prefix}{line}");
    }
}
