//! Password utilities: random generation and strength estimation.
//!
//! These are stateless helpers that the CLI uses to suggest and grade
//! passwords before they are stored in a vault.

pub mod dictionary;
pub mod generator;
pub mod strength;

pub use dictionary::Dictionary;
pub use generator::{generate, GeneratorOptions, MIN_LENGTH};
pub use strength::{entropy_bits, evaluate, Strength, StrengthReport};

/// ASCII character classes shared by the generator and the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digit,
    Punctuation,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Lowercase,
        CharClass::Uppercase,
        CharClass::Digit,
        CharClass::Punctuation,
    ];

    /// Every character in the class.
    pub fn charset(&self) -> &'static [u8] {
        match self {
            Self::Lowercase => b"abcdefghijklmnopqrstuvwxyz",
            Self::Uppercase => b"ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Self::Digit => b"0123456789",
            Self::Punctuation => b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
        }
    }

    pub fn contains(&self, c: char) -> bool {
        match self {
            Self::Lowercase => c.is_ascii_lowercase(),
            Self::Uppercase => c.is_ascii_uppercase(),
            Self::Digit => c.is_ascii_digit(),
            Self::Punctuation => c.is_ascii_punctuation(),
        }
    }

    pub fn size(&self) -> usize {
        self.charset().len()
    }
}
