//! Field element representation and range-checked encoding of raw values.
//!
//! Circuit inputs live in the BN254 scalar field. Raw readings are embedded
//! unchanged; a reading outside the configured domain is rejected instead of
//! being reduced modulo the field.

use std::fmt;

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, PrimeField};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WitnessError};

/// An element of the BN254 scalar field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldElement(Fr);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement(<Fr as Field>::ZERO);

    /// Every u64 is below the BN254 modulus, so this embedding is exact.
    pub fn from_u64(value: u64) -> Self {
        FieldElement(Fr::from(value))
    }

    pub fn from_fr(value: Fr) -> Self {
        FieldElement(value)
    }

    pub fn as_fr(&self) -> &Fr {
        &self.0
    }

    /// Canonical 32-byte big-endian form.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut output = [0u8; 32];
        output.copy_from_slice(&bytes);
        output
    }

    /// Reduce 32 big-endian bytes into the field. Only used for digests.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        FieldElement(Fr::from_be_bytes_mod_order(bytes))
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from(self.0.into_bigint())
    }

    /// Decimal form of the field order r.
    pub fn modulus() -> String {
        BigUint::from(Fr::MODULUS).to_string()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

/// Inclusive upper bound on the raw values a circuit attests to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueBound(u64);

impl ValueBound {
    /// 32-bit book-keeping words.
    pub const U32: ValueBound = ValueBound(u32::MAX as u64);
    /// The whole u64 range; all of it lies below the field modulus.
    pub const FIELD: ValueBound = ValueBound(u64::MAX);

    pub const fn new(max: u64) -> Self {
        ValueBound(max)
    }

    pub const fn max(&self) -> u64 {
        self.0
    }

    pub fn contains(&self, value: u64) -> bool {
        value <= self.0
    }
}

impl Default for ValueBound {
    fn default() -> Self {
        ValueBound::U32
    }
}

/// Validates raw values against a [`ValueBound`] and embeds them into the field.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldEncoder {
    bound: ValueBound,
}

impl FieldEncoder {
    pub fn new(bound: ValueBound) -> Self {
        Self { bound }
    }

    pub fn bound(&self) -> ValueBound {
        self.bound
    }

    /// Encode a single value. A failure reports index 0.
    pub fn encode(&self, raw: u64) -> Result<FieldElement> {
        self.encode_at(0, raw)
    }

    /// Encode values in order, stopping at the first one out of range.
    pub fn encode_sequence(&self, raws: &[u64]) -> Result<Vec<FieldElement>> {
        raws.iter()
            .enumerate()
            .map(|(index, &raw)| self.encode_at(index, raw))
            .collect()
    }

    fn encode_at(&self, index: usize, raw: u64) -> Result<FieldElement> {
        if !self.bound.contains(raw) {
            return Err(WitnessError::OutOfRange {
                index,
                value: raw,
                bound: self.bound.max(),
            });
        }
        Ok(FieldElement::from_u64(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_plain_decimal() {
        assert_eq!(FieldElement::ZERO.to_string(), "0");
        assert_eq!(FieldElement::from_u64(7).to_string(), "7");
        assert_eq!(
            FieldElement::from_u64(u64::MAX).to_string(),
            "18446744073709551615"
        );
    }

    #[test]
    fn test_modulus_is_bn254_scalar_order() {
        assert_eq!(
            FieldElement::modulus(),
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
        );
    }

    #[test]
    fn test_encode_upper_edge_passes_unchanged() {
        let encoder = FieldEncoder::new(ValueBound::U32);
        let element = encoder.encode(4294967295).unwrap();
        assert_eq!(element, FieldElement::from_u64(4294967295));
        assert_eq!(element.to_string(), "4294967295");
    }

    #[test]
    fn test_encode_one_past_bound_fails() {
        let encoder = FieldEncoder::new(ValueBound::U32);
        assert_eq!(
            encoder.encode(4294967296),
            Err(WitnessError::OutOfRange {
                index: 0,
                value: 4294967296,
                bound: 4294967295,
            })
        );
    }

    #[test]
    fn test_encode_sequence_reports_first_bad_index() {
        let encoder = FieldEncoder::new(ValueBound::new(10));
        let err = encoder.encode_sequence(&[1, 2, 11, 12]).unwrap_err();
        assert_eq!(
            err,
            WitnessError::OutOfRange {
                index: 2,
                value: 11,
                bound: 10,
            }
        );
    }

    #[test]
    fn test_field_bound_accepts_all_u64() {
        let encoder = FieldEncoder::new(ValueBound::FIELD);
        assert_eq!(
            encoder.encode(u64::MAX).unwrap(),
            FieldElement::from_u64(u64::MAX)
        );
    }

    #[test]
    fn test_be_bytes_round_trip_small_value() {
        let element = FieldElement::from_u64(0x0102);
        let bytes = element.to_be_bytes();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert_eq!(FieldElement::from_be_bytes_mod_order(&bytes), element);
    }
}
