//! Customer phone numbers with French display formatting.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is neither a digit nor a separator.
    #[error("invalid character in phone number: {0:?}")]
    InvalidCharacter(char),
    /// A `+` appears somewhere other than the first position.
    #[error("'+' is only allowed as the first character")]
    MisplacedPlus,
}

/// A phone number reduced to its digits (and an optional leading `+`).
///
/// Spaces, dots, dashes and parentheses are accepted as separators on input
/// and dropped.
///
/// ```
/// use trottperf_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("06.12.34.56.78").unwrap();
/// assert_eq!(phone.display_fr(), "06 12 34 56 78");
///
/// let phone = PhoneNumber::parse("+33 6 12 34 56 78").unwrap();
/// assert_eq!(phone.as_str(), "+33612345678");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a phone number, dropping separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, contains a character
    /// other than digits and separators, or has a `+` after the first
    /// character.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        let mut cleaned = String::with_capacity(s.len());

        for (i, c) in s.char_indices() {
            match c {
                '0'..='9' => cleaned.push(c),
                '+' if i == 0 => cleaned.push(c),
                '+' => return Err(PhoneError::MisplacedPlus),
                ' ' | '.' | '-' | '(' | ')' | '\u{A0}' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if !cleaned.chars().any(|c| c.is_ascii_digit()) {
            return Err(PhoneError::Empty);
        }

        Ok(Self(cleaned))
    }

    /// Returns the cleaned number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format for display.
    ///
    /// National numbers (`0` followed by nine digits) are shown in pairs,
    /// `+33` numbers as `+33 X XX XX XX XX`. Anything else is returned as
    /// cleaned.
    #[must_use]
    pub fn display_fr(&self) -> String {
        let number = self.0.as_str();

        if number.len() == 10 && number.starts_with('0') {
            return pairs(number);
        }

        if let Some(rest) = number.strip_prefix("+33")
            && rest.len() == 9
            && let Some((head, tail)) = rest.split_at_checked(1)
        {
            return format!("+33 {head} {}", pairs(tail));
        }

        number.to_owned()
    }
}

/// Split an ASCII digit string into space-separated pairs.
fn pairs(digits: &str) -> String {
    digits
        .as_bytes()
        .chunks(2)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_fr())
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_separators() {
        let phone = PhoneNumber::parse(" (06) 12-34.56 78 ").unwrap();
        assert_eq!(phone.as_str(), "0612345678");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
        assert_eq!(PhoneNumber::parse("+"), Err(PhoneError::Empty));
        assert_eq!(
            PhoneNumber::parse("06x2"),
            Err(PhoneError::InvalidCharacter('x'))
        );
        assert_eq!(PhoneNumber::parse("06+12"), Err(PhoneError::MisplacedPlus));
    }

    #[test]
    fn test_display_national() {
        let phone = PhoneNumber::parse("0612345678").unwrap();
        assert_eq!(phone.display_fr(), "06 12 34 56 78");
    }

    #[test]
    fn test_display_international_french() {
        let phone = PhoneNumber::parse("+33612345678").unwrap();
        assert_eq!(phone.display_fr(), "+33 6 12 34 56 78");
    }

    #[test]
    fn test_display_other_numbers_unchanged() {
        let phone = PhoneNumber::parse("+41 21 123 45 67").unwrap();
        assert_eq!(phone.display_fr(), "+41211234567");

        let phone = PhoneNumber::parse("3615").unwrap();
        assert_eq!(phone.to_string(), "3615");
    }
}
