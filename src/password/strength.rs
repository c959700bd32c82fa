//! Entropy-based password strength estimation.
//!
//! Base entropy is `length × log2(pool)`, where the pool is the sum of
//! the character classes present.  Dictionary words and repeated
//! substrings subtract bits from that estimate.

use std::collections::BTreeSet;
use std::fmt;

use super::dictionary::Dictionary;
use super::CharClass;

/// Shortest repeated substring that is penalised.
const MIN_PATTERN_LEN: usize = 4;

/// Longest repeated substring that is considered.
const MAX_PATTERN_LEN: usize = 12;

/// Strength rating derived from adjusted entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl Strength {
    pub fn from_entropy(bits: f64) -> Self {
        if bits < 72.0 {
            Self::VeryWeak
        } else if bits < 100.0 {
            Self::Weak
        } else if bits < 128.0 {
            Self::Medium
        } else if bits < 175.0 {
            Self::Strong
        } else {
            Self::VeryStrong
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The whole password is the word.
    Full,
    /// The word appears inside the password.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryMatch {
    pub word: String,
    pub kind: MatchKind,
}

impl DictionaryMatch {
    /// Bits subtracted for this match.
    pub fn penalty(&self) -> f64 {
        let len = self.word.chars().count() as f64;
        match self.kind {
            MatchKind::Full => len * 2.0,
            MatchKind::Partial => len,
        }
    }
}

/// A substring of at least `MIN_PATTERN_LEN` characters that occurs
/// more than once (non-overlapping) in the lowercased password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatedPattern {
    pub pattern: String,
    pub occurrences: usize,
}

impl RepeatedPattern {
    /// Bits subtracted for this pattern: every occurrence after the first
    /// is treated as fully predictable, so it costs one bit per character.
    ///
    /// The cost is linear in the number of repeats, in the same units as
    /// the dictionary penalties, so all penalties simply add up.
    pub fn penalty(&self) -> f64 {
        (self.occurrences.saturating_sub(1) * self.pattern.chars().count()) as f64
    }
}

/// Full strength report for one password.
#[derive(Debug, Clone)]
pub struct StrengthReport {
    pub length: usize,
    pub pool_size: usize,
    pub base_entropy: f64,
    pub penalty: f64,
    pub adjusted_entropy: f64,
    pub dictionary_matches: Vec<DictionaryMatch>,
    pub repeated_patterns: Vec<RepeatedPattern>,
    pub strength: Strength,
}

/// Entropy in bits of `length` symbols drawn uniformly from `pool`.
pub fn entropy_bits(length: usize, pool: usize) -> f64 {
    if length == 0 || pool == 0 {
        return 0.0;
    }
    length as f64 * (pool as f64).log2()
}

/// Size of the character pool implied by the classes present.
///
/// Space counts as its own one-character class.
pub fn pool_size(password: &str) -> usize {
    let mut pool: usize = CharClass::ALL
        .iter()
        .filter(|class| password.chars().any(|c| class.contains(c)))
        .map(CharClass::size)
        .sum();
    if password.contains(' ') {
        pool += 1;
    }
    pool
}

/// Grade `password` against `dictionary`.
pub fn evaluate(password: &str, dictionary: &Dictionary) -> StrengthReport {
    let length = password.chars().count();
    let pool = pool_size(password);
    let base_entropy = entropy_bits(length, pool);

    let lower = password.to_lowercase();
    let dictionary_matches = dictionary_matches(&lower, dictionary);
    let repeated_patterns = repeated_patterns(&lower);

    let penalty = dictionary_matches
        .iter()
        .map(DictionaryMatch::penalty)
        .chain(repeated_patterns.iter().map(RepeatedPattern::penalty))
        .sum::<f64>();
    let adjusted_entropy = (base_entropy - penalty).max(0.0);

    StrengthReport {
        length,
        pool_size: pool,
        base_entropy,
        penalty,
        adjusted_entropy,
        dictionary_matches,
        repeated_patterns,
        strength: Strength::from_entropy(adjusted_entropy),
    }
}

fn dictionary_matches(lower: &str, dictionary: &Dictionary) -> Vec<DictionaryMatch> {
    dictionary
        .iter()
        .filter(|word| lower.contains(word))
        .map(|word| DictionaryMatch {
            word: word.to_string(),
            kind: if lower == word {
                MatchKind::Full
            } else {
                MatchKind::Partial
            },
        })
        .collect()
}

fn repeated_patterns(lower: &str) -> Vec<RepeatedPattern> {
    let chars: Vec<char> = lower.chars().collect();
    let longest = (chars.len() / 2).min(MAX_PATTERN_LEN);

    let mut seen = BTreeSet::new();
    let mut patterns = Vec::new();

    for len in MIN_PATTERN_LEN..=longest {
        for window in chars.windows(len) {
            let candidate: String = window.iter().collect();
            if seen.contains(&candidate) {
                continue;
            }
            let occurrences = lower.matches(candidate.as_str()).count();
            if occurrences > 1 {
                seen.insert(candidate.clone());
                patterns.push(RepeatedPattern {
                    pattern: candidate,
                    occurrences,
                });
            }
        }
    }

    patterns
}
