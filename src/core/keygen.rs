//! Random API key generation.
//!
//! Keys are drawn from the 62-symbol alphabet `A-Za-z0-9`. The default
//! mapping takes one entropy byte per character and reduces it modulo 62,
//! which slightly favours the first eight symbols (256 is not a multiple
//! of 62). `Mapping::Rejection` is uniform but may read more than one byte
//! per character.

use crate::constants::{ALPHABET, REJECTION_LIMIT};
use crate::error::{KeygenError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

/// Supplier of random bytes.
pub trait EntropySource {
    /// Fill `buf` completely or fail with `EntropySourceUnavailable`.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// Operating-system CSPRNG (getrandom(2), falling back to `/dev/urandom`).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| KeygenError::EntropySourceUnavailable(e.to_string()))
    }
}

/// How entropy bytes are turned into alphabet symbols.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    /// `ALPHABET[byte % 62]`, one byte per character.
    #[default]
    Modulo,
    /// Discard bytes >= 248 and draw again; uniform over the alphabet.
    Rejection,
}

impl Mapping {
    pub fn from_unbiased(unbiased: bool) -> Self {
        if unbiased {
            Mapping::Rejection
        } else {
            Mapping::Modulo
        }
    }
}

/// A generated API key. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(Zeroizing<String>);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<{} chars redacted>)", self.0.len())
    }
}

fn symbol(byte: u8) -> char {
    char::from(ALPHABET[usize::from(byte) % ALPHABET.len()])
}

/// Generate a key of exactly `length` characters.
pub fn generate_token<E>(source: &mut E, length: usize, mapping: Mapping) -> Result<Token>
where
    E: EntropySource + ?Sized,
{
    if length == 0 {
        return Err(KeygenError::InvalidLength(length));
    }

    let mut key = Zeroizing::new(String::with_capacity(length));
    match mapping {
        Mapping::Modulo => {
            let mut bytes = Zeroizing::new(vec![0u8; length]);
            source.fill(&mut bytes)?;
            key.extend(bytes.iter().map(|&b| symbol(b)));
        }
        Mapping::Rejection => {
            while key.len() < length {
                let mut bytes = Zeroizing::new(vec![0u8; length - key.len()]);
                source.fill(&mut bytes)?;
                let missing = length - key.len();
                key.extend(
                    bytes
                        .iter()
                        .filter(|&&b| b < REJECTION_LIMIT)
                        .take(missing)
                        .map(|&b| symbol(b)),
                );
            }
        }
    }

    tracing::debug!(length, ?mapping, "generated key");
    Ok(Token(key))
}

/// Generate a key from the operating system's entropy source.
pub fn generate(length: usize, mapping: Mapping) -> Result<Token> {
    generate_token(&mut OsEntropy, length, mapping)
}

/// Whether every character of `key` belongs to the key alphabet.
pub fn is_alphabet_key(key: &str) -> bool {
    key.bytes().all(|b| ALPHABET.contains(&b))
}
