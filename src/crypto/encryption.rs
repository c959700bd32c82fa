//! AES-256-GCM authenticated encryption of credential fields.
//!
//! Every ciphertext is stored as a self-describing text token:
//!
//! ```text
//! A256GCM.<nonce>.<ciphertext>.<tag>
//! ```
//!
//! Each segment after the algorithm identifier is unpadded URL-safe
//! base64.  The token parses without a key, so a structurally broken
//! token (`MalformedToken`) is told apart from a wrong key or tampered
//! payload (`AuthenticationFailure`).

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce, Tag};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use zeroize::Zeroizing;

use super::keys::DerivedKey;
use crate::errors::{PwVaultError, Result};

/// Algorithm identifier written as the first token segment.
pub const ALGORITHM: &str = "A256GCM";

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// A parsed ciphertext token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherToken {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
    tag: [u8; TAG_LEN],
}

impl CipherToken {
    /// Parse a token without touching any key material.
    pub fn parse(token: &str) -> Result<Self> {
        let mut parts = token.split('.');
        let (Some(alg), Some(nonce), Some(ciphertext), Some(tag), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(PwVaultError::MalformedToken(
                "expected 4 dot-separated segments".into(),
            ));
        };

        if alg != ALGORITHM {
            return Err(PwVaultError::MalformedToken(format!(
                "unsupported algorithm '{alg}'"
            )));
        }

        let nonce: [u8; NONCE_LEN] = decode_segment("nonce", nonce)?
            .try_into()
            .map_err(|_| PwVaultError::MalformedToken(format!("nonce must be {NONCE_LEN} bytes")))?;
        let tag: [u8; TAG_LEN] = decode_segment("tag", tag)?
            .try_into()
            .map_err(|_| PwVaultError::MalformedToken(format!("tag must be {TAG_LEN} bytes")))?;
        let ciphertext = decode_segment("ciphertext", ciphertext)?;

        Ok(Self {
            nonce,
            ciphertext,
            tag,
        })
    }

    /// Encode the token back to its text form.
    pub fn encode(&self) -> String {
        format!(
            "{ALGORITHM}.{}.{}.{}",
            URL_SAFE_NO_PAD.encode(self.nonce),
            URL_SAFE_NO_PAD.encode(&self.ciphertext),
            URL_SAFE_NO_PAD.encode(self.tag)
        )
    }
}

impl FromStr for CipherToken {
    type Err = PwVaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CipherToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn decode_segment(what: &str, segment: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| PwVaultError::MalformedToken(format!("{what} is not valid base64: {e}")))
}

/// Encrypt `plaintext` under `key` and return the encoded token.
///
/// A fresh random nonce is generated on every call.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| PwVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut buffer)
        .map_err(|e| PwVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&nonce);
    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(CipherToken {
        nonce: nonce_bytes,
        ciphertext: buffer,
        tag: tag_bytes,
    }
    .encode())
}

/// Decrypt a token produced by `encrypt`.
///
/// Fails with `MalformedToken` if the token cannot be parsed and with
/// `AuthenticationFailure` if the tag does not verify under `key`.
pub fn decrypt(key: &DerivedKey, token: &str) -> Result<Zeroizing<Vec<u8>>> {
    let parsed = CipherToken::parse(token)?;

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| PwVaultError::AuthenticationFailure)?;

    let mut buffer = Zeroizing::new(parsed.ciphertext);
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&parsed.nonce),
            b"",
            buffer.as_mut_slice(),
            Tag::from_slice(&parsed.tag),
        )
        .map_err(|_| PwVaultError::AuthenticationFailure)?;

    Ok(buffer)
}

/// Decrypt a token whose plaintext is expected to be UTF-8 text.
pub fn decrypt_string(key: &DerivedKey, token: &str) -> Result<Zeroizing<String>> {
    let bytes = decrypt(key, token)?;
    std::str::from_utf8(&bytes)
        .map(|text| Zeroizing::new(text.to_owned()))
        .map_err(|_| PwVaultError::SerializationError("decrypted value is not valid UTF-8".into()))
}
