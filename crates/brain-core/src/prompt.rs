//! Prompt fingerprinting.

use sha2::{Digest, Sha256};

/// Length of the fingerprint prefix used in logs.
const FINGERPRINT_LEN: usize = 12;

/// Compute a short, stable SHA-256 fingerprint for a prompt string.
///
/// Lets operators tell which system prompt a running engine uses without
/// writing the prompt itself to the logs.
pub fn hash_prompt(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    digest
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>()
        .chars()
        .take(FINGERPRINT_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::hash_prompt;

    #[test]
    fn test_hash_prompt_stable() {
        let first = hash_prompt("You are watari.");
        let second = hash_prompt("You are watari.");
        let different = hash_prompt("You are someone else.");

        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 12);
    }
}
