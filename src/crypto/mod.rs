//! Cryptographic primitives for pwvault.
//!
//! This module provides:
//! - AES-256-GCM token encryption and decryption (`encryption`)
//! - Argon2id password-based key derivation and salts (`kdf`)
//! - The zeroizing in-memory vault key (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, decrypt_string, encrypt, CipherToken};
pub use kdf::{derive_key, derive_key_with_fresh_salt, Argon2Params, Salt, SALT_LEN};
pub use keys::{DerivedKey, KEY_LEN};
