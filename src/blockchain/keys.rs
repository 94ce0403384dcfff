//! Ed25519 key material in NEAR's encodings.
//!
//! String form is `ed25519:<base58>`; borsh form is a one-byte key type tag
//! followed by the raw bytes.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Key type prefix used in NEAR key strings.
pub const ED25519_PREFIX: &str = "ed25519:";

/// Borsh tag for the ed25519 key type.
const ED25519_TAG: u8 = 0;

pub const PUBLIC_KEY_LENGTH: usize = 32;
pub const SECRET_KEY_LENGTH: usize = 32;
pub const SIGNATURE_LENGTH: usize = 64;

fn decode_prefixed(s: &str) -> BlockchainResult<Vec<u8>> {
    let body = s.strip_prefix(ED25519_PREFIX).unwrap_or(s);
    if body.contains(':') {
        return Err(BlockchainError::Key(format!(
            "Unsupported key type in '{}'",
            s
        )));
    }
    bs58::decode(body)
        .into_vec()
        .map_err(|e| BlockchainError::Key(format!("Invalid base58: {}", e)))
}

/// Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Verify a detached signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        key.verify(message, &sig).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ED25519_PREFIX, bs58::encode(&self.0).into_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl FromStr for PublicKey {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_prefixed(s)?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            BlockchainError::Key(format!(
                "Invalid public key length: expected {}, got {}",
                PUBLIC_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl BorshSerialize for PublicKey {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        BorshSerialize::serialize(&ED25519_TAG, writer)?;
        writer.write_all(&self.0)
    }
}

impl BorshDeserialize for PublicKey {
    fn deserialize_reader<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let tag = <u8 as BorshDeserialize>::deserialize_reader(reader)?;
        if tag != ED25519_TAG {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported key type tag {}", tag),
            ));
        }
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        reader.read_exact(&mut bytes)?;
        Ok(Self(bytes))
    }
}

/// Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature({}{})",
            ED25519_PREFIX,
            bs58::encode(&self.0).into_string()
        )
    }
}

impl BorshSerialize for Signature {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        BorshSerialize::serialize(&ED25519_TAG, writer)?;
        writer.write_all(&self.0)
    }
}

impl BorshDeserialize for Signature {
    fn deserialize_reader<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let tag = <u8 as BorshDeserialize>::deserialize_reader(reader)?;
        if tag != ED25519_TAG {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported signature type tag {}", tag),
            ));
        }
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        reader.read_exact(&mut bytes)?;
        Ok(Self(bytes))
    }
}

/// Ed25519 key pair.
///
/// The secret half is never printed by `Debug`.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh key pair from the OS RNG.
    pub fn from_random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a key pair from a 32-byte seed.
    pub fn from_seed(seed: [u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Parse a NEAR secret key string.
    ///
    /// Accepts the 64-byte keypair form (seed followed by public key) or a bare 32-byte seed.
    pub fn from_secret_key(secret_key: &str) -> BlockchainResult<Self> {
        let bytes = decode_prefixed(secret_key.trim())?;
        match bytes.len() {
            64 => {
                let mut keypair = [0u8; 64];
                keypair.copy_from_slice(&bytes);
                let signing_key = SigningKey::from_keypair_bytes(&keypair).map_err(|_| {
                    BlockchainError::Key("Secret key does not match its public half".to_string())
                })?;
                Ok(Self { signing_key })
            }
            SECRET_KEY_LENGTH => {
                let mut seed = [0u8; SECRET_KEY_LENGTH];
                seed.copy_from_slice(&bytes);
                Ok(Self::from_seed(seed))
            }
            n => Err(BlockchainError::Key(format!(
                "Invalid secret key length: expected 64 or 32, got {}",
                n
            ))),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Secret key in NEAR string form (`ed25519:<base58 of seed || public key>`).
    pub fn secret_key(&self) -> String {
        format!(
            "{}{}",
            ED25519_PREFIX,
            bs58::encode(self.signing_key.to_keypair_bytes()).into_string()
        )
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
