//! bn254 scalar field helpers: decimal encoding and ordered witness reading
//!
//! the circuit field is the bn254 scalar field, which is also the base field
//! of babyjubjub. witness values travel as base-10 strings and must be
//! canonical (strictly below the modulus); values are never reduced.

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::error::{Error, Result};

/// circuit field (bn254 scalar field = babyjubjub base field)
pub type Fr = ark_bn254::Fr;

/// parse a canonical base-10 element of the circuit field
pub fn parse_decimal(s: &str) -> Result<Fr> {
    parse_field(s)
}

/// parse a canonical base-10 element of any prime field
pub fn parse_field<F: PrimeField>(s: &str) -> Result<F> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedInput(format!(
            "'{}' is not a base-10 integer",
            s
        )));
    }

    let value = BigUint::parse_bytes(trimmed.as_bytes(), 10)
        .ok_or_else(|| Error::MalformedInput(format!("'{}' is not a base-10 integer", s)))?;

    let modulus: BigUint = F::MODULUS.into();
    if value >= modulus {
        return Err(Error::MalformedInput(format!(
            "{} exceeds the field modulus",
            trimmed
        )));
    }

    Ok(F::from(value))
}

/// parse a list of decimal strings, reporting the offending index
pub fn parse_decimals(values: &[String]) -> Result<Vec<Fr>> {
    values
        .iter()
        .enumerate()
        .map(|(i, s)| {
            parse_decimal(s).map_err(|e| match e {
                Error::MalformedInput(msg) => {
                    Error::MalformedInput(format!("input {}: {}", i, msg))
                }
                other => other,
            })
        })
        .collect()
}

/// base-10 representation of any prime field element
pub fn to_decimal<F: PrimeField>(value: &F) -> String {
    BigUint::from_bytes_le(&value.into_bigint().to_bytes_le()).to_str_radix(10)
}

/// sequential reader over an ordered list of field elements
///
/// circuits declare their inputs in a fixed order; the reader hands them out
/// in that order and the caller checks `finish` so no trailing value is
/// silently ignored.
pub struct FieldReader<'a> {
    values: &'a [Fr],
    cursor: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(values: &'a [Fr]) -> Self {
        Self { values, cursor: 0 }
    }

    /// next value, or a malformed-input error when exhausted
    pub fn next(&mut self) -> Result<Fr> {
        let value = self.values.get(self.cursor).copied().ok_or_else(|| {
            Error::MalformedInput(format!(
                "expected more than {} field elements",
                self.values.len()
            ))
        })?;
        self.cursor += 1;
        Ok(value)
    }

    pub fn next_array<const N: usize>(&mut self) -> Result<[Fr; N]> {
        let mut out = [Fr::from(0u64); N];
        for slot in out.iter_mut() {
            *slot = self.next()?;
        }
        Ok(out)
    }

    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }

    /// error if any value was left unread
    pub fn finish(self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(Error::MalformedInput(format!(
                "{} unexpected trailing field elements",
                self.remaining()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let v = parse_decimal("123456789").unwrap();
        assert_eq!(v, Fr::from(123456789u64));
        assert_eq!(to_decimal(&v), "123456789");
        assert_eq!(to_decimal(&Fr::from(0u64)), "0");
    }

    #[test]
    fn test_rejects_modulus_and_above() {
        let modulus: BigUint = Fr::MODULUS.into();
        assert!(parse_decimal(&modulus.to_str_radix(10)).is_err());

        let below = modulus - 1u32;
        let parsed = parse_decimal(&below.to_str_radix(10)).unwrap();
        assert_eq!(parsed, -Fr::from(1u64));
    }

    #[test]
    fn test_rejects_non_decimal() {
        for bad in ["", "0x10", "-1", "12a", "1.5"] {
            assert!(
                matches!(parse_decimal(bad), Err(Error::MalformedInput(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_reader_arity() {
        let values = [Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];

        let mut reader = FieldReader::new(&values);
        let [a, b] = reader.next_array::<2>().unwrap();
        assert_eq!((a, b), (Fr::from(1u64), Fr::from(2u64)));
        assert!(reader.finish().is_err());

        let mut reader = FieldReader::new(&values[..1]);
        reader.next().unwrap();
        assert!(reader.next().is_err());
    }
}
