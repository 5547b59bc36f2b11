//! Token masking for the settings file.
//!
//! This is obfuscation only: an XOR with a key derived from the machine's
//! hostname, then base64. It keeps the token out of casual `cat` output and
//! nothing more. Anyone with the file and the hostname can reverse it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::warn;

const FALLBACK_KEY_SOURCE: &str = "team-pulse";

fn machine_key_source() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_KEY_SOURCE.to_string())
}

/// Hex string of the byte sum of `source`
fn derive_key(source: &str) -> Vec<u8> {
    let sum: u64 = source.bytes().map(u64::from).sum();
    format!("{sum:x}").into_bytes()
}

fn xor(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect()
}

pub fn obfuscate(text: &str) -> String {
    obfuscate_with(&machine_key_source(), text)
}

pub fn reveal(encoded: &str) -> String {
    reveal_with(&machine_key_source(), encoded)
}

pub fn obfuscate_with(key_source: &str, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    STANDARD.encode(xor(text.as_bytes(), &derive_key(key_source)))
}

/// Reverse [`obfuscate_with`]; undecodable input gives an empty string
pub fn reveal_with(key_source: &str, encoded: &str) -> String {
    if encoded.is_empty() {
        return String::new();
    }

    let decoded = match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %err, "Stored token is not valid base64, treating as unset");
            return String::new();
        }
    };

    match String::from_utf8(xor(&decoded, &derive_key(key_source))) {
        Ok(token) => token,
        Err(_) => {
            warn!("Stored token could not be decoded, treating as unset");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_token_differs_and_reverses() {
        let masked = obfuscate_with("build-box-01", "ghp_exampletoken123");

        assert_ne!(masked, "ghp_exampletoken123");
        assert_eq!(reveal_with("build-box-01", &masked), "ghp_exampletoken123");
    }

    #[test]
    fn test_empty_and_invalid_inputs() {
        assert_eq!(obfuscate_with("host", ""), "");
        assert_eq!(reveal_with("host", ""), "");
        assert_eq!(reveal_with("host", "***not base64***"), "");
    }
}
