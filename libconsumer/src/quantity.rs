//! Kubernetes-style resource quantities.
//!
//! A [`Quantity`] keeps the text it was parsed from (that is what goes on the
//! wire and into the status) together with its numeric value in milli-units,
//! which is what equality compares.  `"1Gi"` and `"1024Mi"` are equal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConsumerError;

#[derive(Debug, Clone)]
pub struct Quantity {
    text: String,
    millis: i128,
}

impl Quantity {
    /// Parse `text`, e.g. `"10Gi"`, `"500M"`, `"1.5Ti"`, `"100m"`, `"1e3"`.
    pub fn parse(text: &str) -> Result<Self, ConsumerError> {
        let invalid = |reason| ConsumerError::InvalidQuantity {
            value: text.to_owned(),
            reason,
        };

        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            Some(_) => (false, trimmed),
            None => return Err(invalid("empty quantity")),
        };

        let split = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(split);

        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("missing number"));
        }
        if frac.contains('.') {
            return Err(invalid("more than one decimal point"));
        }

        let (num, den) = scale(suffix).ok_or_else(|| invalid("unknown suffix"))?;

        // Fraction digits past `keep` can only round the value up.
        let frac = frac.trim_end_matches('0');
        let keep = num.ilog10() as usize + 5;
        let truncated = frac.len() > keep;
        let frac = &frac[..frac.len().min(keep)];

        let mut mantissa: i128 = 0;
        for d in whole.bytes().chain(frac.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(d - b'0')))
                .ok_or_else(|| invalid("value out of range"))?;
        }
        let frac_digits = u32::try_from(frac.len()).map_err(|_| invalid("value out of range"))?;

        // value = mantissa * num / (den * 10^frac_digits), kept in millis.
        let numerator = mantissa
            .checked_mul(num)
            .and_then(|n| n.checked_mul(1000))
            .ok_or_else(|| invalid("value out of range"))?;
        let denominator = 10i128
            .checked_pow(frac_digits)
            .and_then(|p| p.checked_mul(den))
            .ok_or_else(|| invalid("value out of range"))?;

        // Sub-milli precision rounds up.
        let mut millis = numerator / denominator;
        if truncated || numerator % denominator != 0 {
            millis += 1;
        }
        if negative {
            millis = -millis;
        }

        Ok(Self {
            text: trimmed.to_owned(),
            millis,
        })
    }

    /// The quantity as originally written.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Multiplier for `suffix` as a `(numerator, denominator)` pair.
fn scale(suffix: &str) -> Option<(i128, i128)> {
    const KI: i128 = 1 << 10;
    let s = match suffix {
        "" => (1, 1),
        "m" => (1, 1000),
        "k" => (1_000, 1),
        "M" => (1_000_000, 1),
        "G" => (1_000_000_000, 1),
        "T" => (1_000_000_000_000, 1),
        "P" => (1_000_000_000_000_000, 1),
        "E" => (1_000_000_000_000_000_000, 1),
        "Ki" => (KI, 1),
        "Mi" => (KI.pow(2), 1),
        "Gi" => (KI.pow(3), 1),
        "Ti" => (KI.pow(4), 1),
        "Pi" => (KI.pow(5), 1),
        "Ei" => (KI.pow(6), 1),
        exp if exp.starts_with(['e', 'E']) => {
            let power: i32 = exp[1..].parse().ok()?;
            if power >= 0 {
                (10i128.checked_pow(power.unsigned_abs())?, 1)
            } else {
                (1, 10i128.checked_pow(power.unsigned_abs())?)
            }
        }
        _ => return None,
    };
    Some(s)
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for Quantity {}

impl FromStr for Quantity {
    type Err = ConsumerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
