//! Passphrase-to-password generator for the educational guide. Pure and
//! deterministic; the only part of the product that runs without the
//! model.

use thiserror::Error;

pub const MIN_PHRASE_CHARS: usize = 10;

/// Suffix appended when the phrase carries no digits of its own.
pub const FALLBACK_SUFFIX: &str = "_25!";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Use uma frase mais longa para uma senha mais forte.")]
pub struct PhraseTooShort;

/// Derives a password from a memorable phrase: first letter of each word
/// with case alternating by word position, fixed leetspeak substitutions,
/// then the phrase's digits (or a fallback suffix) appended.
///
/// Word position is counted over the raw single-space split, so doubled
/// spaces still advance the case alternation.
pub fn generate_password(phrase: &str) -> Result<String, PhraseTooShort> {
    if phrase.chars().count() < MIN_PHRASE_CHARS {
        return Err(PhraseTooShort);
    }

    let mut password = String::new();
    for (i, word) in phrase.split(' ').enumerate() {
        let Some(first) = word.chars().next() else {
            continue;
        };
        if i % 2 == 0 {
            password.extend(first.to_uppercase());
        } else {
            password.extend(first.to_lowercase());
        }
    }

    let mut password: String = password
        .chars()
        .map(|c| match c {
            'a' => '@',
            'e' => '3',
            'i' => '!',
            'o' => '0',
            other => other,
        })
        .collect();

    let digits: String = phrase.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        password.push_str(FALLBACK_SUFFIX);
    } else {
        password.push('_');
        password.push_str(&digits);
    }

    Ok(password)
}
