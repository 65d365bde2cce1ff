use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Exact decimal number held as scaled-integer parts, value = number / 10^shift.
/// Trailing fractional zeros are stripped on construction so equal values
/// compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal {
    pub number: i64,
    pub shift: u8,
}

impl Decimal {
    pub fn from_parts(number: i64, shift: u8) -> Decimal {
        let mut number = number;
        let mut shift = shift;
        while shift > 0 && number % 10 == 0 {
            number /= 10;
            shift -= 1;
        }
        Decimal { number, shift }
    }

    pub fn as_f64(&self) -> f64 {
        self.number as f64 / 10f64.powi(self.shift as i32)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseDecimalError {
    #[error("empty decimal literal")]
    Empty,
    #[error("invalid decimal literal `{0}`")]
    Invalid(String),
    #[error("decimal literal `{0}` does not fit")]
    Overflow(String),
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseDecimalError::Empty);
        }

        let (unsigned, negative) = match trimmed.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (trimmed.strip_prefix('+').unwrap_or(trimmed), false),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDecimalError::Invalid(s.to_string()));
        }
        if frac_part.len() > u8::MAX as usize {
            return Err(ParseDecimalError::Overflow(s.to_string()));
        }

        let mut number: i64 = 0;
        for char in int_part.chars().chain(frac_part.chars()) {
            let digit = char
                .to_digit(10)
                .ok_or_else(|| ParseDecimalError::Invalid(s.to_string()))?;
            number = number
                .checked_mul(10)
                .and_then(|n| n.checked_add(digit as i64))
                .ok_or_else(|| ParseDecimalError::Overflow(s.to_string()))?;
        }
        if negative {
            number = -number;
        }

        Ok(Decimal::from_parts(number, frac_part.len() as u8))
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.shift == 0 {
            return write!(f, "{}", self.number);
        }
        let sign = if self.number < 0 { "-" } else { "" };
        let digits = self.number.unsigned_abs().to_string();
        let shift = self.shift as usize;
        if digits.len() <= shift {
            write!(f, "{}0.{:0>width$}", sign, digits, width = shift)
        } else {
            let (int, frac) = digits.split_at(digits.len() - shift);
            write!(f, "{}{}.{}", sign, int, frac)
        }
    }
}

impl From<i64> for Decimal {
    fn from(number: i64) -> Self {
        Decimal::from_parts(number, 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::decimal::{Decimal, ParseDecimalError};

    #[test]
    fn parses_plain_and_fractional() {
        assert_eq!("42".parse(), Ok(Decimal::from_parts(42, 0)));
        assert_eq!("12.34".parse(), Ok(Decimal::from_parts(1234, 2)));
        assert_eq!("0.005".parse(), Ok(Decimal::from_parts(5, 3)));
        assert_eq!(".5".parse(), Ok(Decimal::from_parts(5, 1)));
        assert_eq!("7.".parse(), Ok(Decimal::from_parts(7, 0)));
        assert_eq!("+1.5".parse(), Ok(Decimal::from_parts(15, 1)));
        assert_eq!("-0.5".parse(), Ok(Decimal::from_parts(-5, 1)));
    }

    #[test]
    fn normalizes_trailing_zeros() {
        assert_eq!("1.50".parse::<Decimal>(), "1.5".parse());
        assert_eq!("0.00".parse::<Decimal>(), "0".parse());
        assert_eq!(Decimal::from_parts(1500, 3), Decimal::from_parts(15, 1));
    }

    #[test]
    fn rejects_malformed_literals() {
        assert_eq!("".parse::<Decimal>(), Err(ParseDecimalError::Empty));
        assert_eq!("   ".parse::<Decimal>(), Err(ParseDecimalError::Empty));
        assert!(matches!(
            "not-a-number".parse::<Decimal>(),
            Err(ParseDecimalError::Invalid(_))
        ));
        assert!(matches!("1.2.3".parse::<Decimal>(), Err(ParseDecimalError::Invalid(_))));
        assert!(matches!(".".parse::<Decimal>(), Err(ParseDecimalError::Invalid(_))));
        assert!(matches!("1,5".parse::<Decimal>(), Err(ParseDecimalError::Invalid(_))));
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            "99999999999999999999".parse::<Decimal>(),
            Err(ParseDecimalError::Overflow(_))
        ));
    }

    #[test]
    fn displays_with_decimal_point() {
        assert_eq!(Decimal::from_parts(1234, 2).to_string(), "12.34");
        assert_eq!(Decimal::from_parts(-5, 1).to_string(), "-0.5");
        assert_eq!(Decimal::from_parts(5, 3).to_string(), "0.005");
        assert_eq!(Decimal::from_parts(42, 0).to_string(), "42");
    }

    #[test]
    fn display_parse_round_trip() {
        for literal in ["12.34", "-0.5", "0.005", "42", "-42"] {
            let decimal: Decimal = literal.parse().unwrap();
            assert_eq!(decimal.to_string(), literal);
        }
    }

    #[test]
    fn as_f64_scales() {
        let decimal: Decimal = "12.5".parse().unwrap();
        assert!((decimal.as_f64() - 12.5).abs() < f64::EPSILON);
    }
}
