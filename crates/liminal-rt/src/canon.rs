//! Prompt canonicalization and content-addressed fingerprints.
//!
//! Before hashing, a prompt is normalized: carriage returns dropped, any
//! run of whitespace collapsed to a single space, leading and trailing
//! whitespace trimmed. The fingerprint is the SHA-256 of the canonical
//! UTF-8 bytes, hex-encoded. This keeps replay stable across whitespace
//! noise in otherwise-identical prompts.

use sha2::{Digest, Sha256};

/// Normalize a prompt to its canonical form. Idempotent:
/// `canonicalize(canonicalize(p)) == canonicalize(p)`.
pub fn canonicalize_prompt(prompt: &str) -> String {
    let mut out = String::with_capacity(prompt.len());
    let mut prev_space = false;
    for c in prompt.chars() {
        if c == '\r' {
            continue;
        }
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// SHA-256 of the canonical form, lowercase hex (64 characters).
pub fn fingerprint(canonical: &str) -> String {
    let digest = Sha256::digest(canonical.as_bytes());
    let mut hex = String::with_capacity(64);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}
