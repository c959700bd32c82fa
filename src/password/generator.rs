//! Random password generation.
//!
//! Characters are drawn from the OS-seeded thread RNG.  Every enabled
//! character class contributes at least one character and the result is
//! shuffled so those guaranteed characters do not sit at fixed positions.

use rand::seq::SliceRandom;
use rand::Rng;
use zeroize::Zeroizing;

use crate::errors::{PwVaultError, Result};

use super::strength::entropy_bits;
use super::CharClass;

/// Shortest password the generator will produce.
pub const MIN_LENGTH: usize = 16;

/// Generator settings.  Letters (both cases) are excluded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub exclude_special: bool,
    pub exclude_digits: bool,
    pub exclude_letters: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: MIN_LENGTH,
            exclude_special: false,
            exclude_digits: false,
            exclude_letters: false,
        }
    }
}

impl GeneratorOptions {
    pub fn with_length(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// Character classes left after exclusions.
    pub fn classes(&self) -> Vec<CharClass> {
        CharClass::ALL
            .into_iter()
            .filter(|class| match class {
                CharClass::Lowercase | CharClass::Uppercase => !self.exclude_letters,
                CharClass::Digit => !self.exclude_digits,
                CharClass::Punctuation => !self.exclude_special,
            })
            .collect()
    }

    pub fn pool_size(&self) -> usize {
        self.classes().iter().map(CharClass::size).sum()
    }

    /// Theoretical entropy of a password produced with these options.
    pub fn entropy(&self) -> f64 {
        entropy_bits(self.length, self.pool_size())
    }

    fn validate(&self) -> Result<Vec<CharClass>> {
        if self.length < MIN_LENGTH {
            return Err(PwVaultError::InvalidGeneratorOptions(format!(
                "length must be at least {MIN_LENGTH}, got {}",
                self.length
            )));
        }
        let classes = self.classes();
        if classes.is_empty() {
            return Err(PwVaultError::InvalidGeneratorOptions(
                "every character class is excluded".into(),
            ));
        }
        Ok(classes)
    }
}

/// Generate a random password.
pub fn generate(options: &GeneratorOptions) -> Result<Zeroizing<String>> {
    let classes = options.validate()?;
    let pool: Vec<u8> = classes
        .iter()
        .flat_map(|class| class.charset().iter().copied())
        .collect();

    let mut rng = rand::rng();
    let mut chars = Zeroizing::new(Vec::with_capacity(options.length));

    for class in &classes {
        let set = class.charset();
        chars.push(set[rng.random_range(0..set.len())]);
    }
    while chars.len() < options.length {
        chars.push(pool[rng.random_range(0..pool.len())]);
    }
    chars.shuffle(&mut rng);

    let password: String = chars.iter().map(|&b| b as char).collect();
    Ok(Zeroizing::new(password))
}
