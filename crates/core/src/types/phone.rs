//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not start with a `+`.
    #[error("phone number must start with +")]
    MissingPlus,
    /// The input contains a character that is not a digit.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// The country code starts with zero.
    #[error("phone number country code cannot start with 0")]
    LeadingZero,
    /// The input has too few digits.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum number of digits.
        min: usize,
    },
    /// The input has too many digits.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum number of digits.
        max: usize,
    },
}

/// A phone number in E.164 format.
///
/// E.164 is the international numbering plan used by the identity provider
/// for SMS sign-in: a leading `+`, then the country code and subscriber
/// number as digits with no separators.
///
/// ## Constraints
///
/// - Must start with `+`
/// - Digits only after the `+` (no spaces, dashes, or parentheses)
/// - Country code must not start with 0
/// - 7-15 digits total
///
/// ## Examples
///
/// ```
/// use guava_market_core::PhoneNumber;
///
/// // Valid phone numbers
/// assert!(PhoneNumber::parse("+15551234567").is_ok());
/// assert!(PhoneNumber::parse("+442071838750").is_ok());
///
/// // Invalid phone numbers
/// assert!(PhoneNumber::parse("").is_err());             // empty
/// assert!(PhoneNumber::parse("15551234567").is_err());  // missing +
/// assert!(PhoneNumber::parse("+1 555 123").is_err());   // separators
/// assert!(PhoneNumber::parse("+0123456789").is_err());  // leading zero
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits in an E.164 number.
    pub const MIN_DIGITS: usize = 7;

    /// Maximum number of digits in an E.164 number (ITU-T E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Does not start with `+`
    /// - Contains anything other than digits after the `+`
    /// - Has a country code starting with 0
    /// - Has fewer than 7 or more than 15 digits
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = s.strip_prefix('+').ok_or(PhoneError::MissingPlus)?;

        if let Some(c) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacter(c));
        }

        if digits.starts_with('0') {
            return Err(PhoneError::LeadingZero);
        }

        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }

        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice, including the `+`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
