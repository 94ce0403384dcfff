//! Bulk key-pair generation for drops.

use crate::blockchain::keys::KeyPair;

/// Freshly generated key pairs and their public keys in NEAR string form.
#[derive(Debug, Clone)]
pub struct GeneratedKeys {
    pub keys: Vec<KeyPair>,
    /// `public_keys[i]` is `keys[i].public_key().to_string()`.
    pub public_keys: Vec<String>,
}

/// Generate `count` random ed25519 key pairs.
pub fn generate_key_pairs(count: usize) -> GeneratedKeys {
    let keys: Vec<KeyPair> = (0..count).map(|_| KeyPair::from_random()).collect();
    let public_keys = keys.iter().map(|kp| kp.public_key().to_string()).collect();

    tracing::debug!(count, "Generated key pairs");
    GeneratedKeys { keys, public_keys }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generates_exact_count() {
        let generated = generate_key_pairs(25);
        assert_eq!(generated.keys.len(), 25);
        assert_eq!(generated.public_keys.len(), 25);
    }

    #[test]
    fn test_public_keys_match_and_are_distinct() {
        let generated = generate_key_pairs(50);
        for (kp, pk) in generated.keys.iter().zip(&generated.public_keys) {
            assert_eq!(&kp.public_key().to_string(), pk);
            assert!(pk.starts_with("ed25519:"));
        }
        let unique: HashSet<_> = generated.public_keys.iter().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_zero_keys() {
        let generated = generate_key_pairs(0);
        assert!(generated.keys.is_empty());
        assert!(generated.public_keys.is_empty());
    }
}
