//! Assembly of the circuit input token stream.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::field::{FieldEncoder, ValueBound};
use crate::hash::{HashCombine, HashKind};
use crate::merkle::MerkleTreeBuilder;

/// One attestation request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessConfig {
    pub raw_values: Vec<u64>,
    #[serde(default)]
    pub include_root: bool,
}

/// Constants that must agree with the consuming circuit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitProfile {
    /// Largest raw value the circuit attests to
    pub bound: ValueBound,
    /// Two-to-one hash used for Merkle nodes
    pub hash: HashKind,
}

/// Ordered decimal tokens handed to the prover. Built once, never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WitnessTokenStream {
    tokens: Vec<String>,
    has_root: bool,
}

impl WitnessTokenStream {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The trailing Merkle root token, when one was requested.
    pub fn root(&self) -> Option<&str> {
        if self.has_root {
            self.tokens.last().map(String::as_str)
        } else {
            None
        }
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

impl fmt::Display for WitnessTokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Encodes raw values and, on request, appends their Merkle root.
pub struct WitnessSerializer {
    encoder: FieldEncoder,
    builder: MerkleTreeBuilder<Box<dyn HashCombine>>,
}

impl WitnessSerializer {
    pub fn new(profile: CircuitProfile) -> Self {
        Self::with_combiner(profile.bound, profile.hash.combiner())
    }

    pub fn with_combiner(bound: ValueBound, combiner: Box<dyn HashCombine>) -> Self {
        Self {
            encoder: FieldEncoder::new(bound),
            builder: MerkleTreeBuilder::new(combiner),
        }
    }

    pub fn encoder(&self) -> &FieldEncoder {
        &self.encoder
    }

    /// Produce the token stream for `raws`.
    ///
    /// The root is computed over the exact elements echoed in the raw
    /// portion. Nothing is emitted unless every step succeeds.
    #[instrument(skip(self, raws), fields(count = raws.len()))]
    pub fn serialize(&self, raws: &[u64], include_root: bool) -> Result<WitnessTokenStream> {
        let elements = self.encoder.encode_sequence(raws)?;

        let root = if include_root {
            Some(self.builder.build(&elements)?)
        } else {
            None
        };

        let mut tokens: Vec<String> = elements.iter().map(ToString::to_string).collect();
        if let Some(root) = root {
            debug!(%root, "merkle root computed");
            tokens.push(root.to_string());
        }

        Ok(WitnessTokenStream {
            tokens,
            has_root: include_root,
        })
    }

    pub fn serialize_config(&self, config: &WitnessConfig) -> Result<WitnessTokenStream> {
        self.serialize(&config.raw_values, config.include_root)
    }

    /// Serialize independent requests in parallel. Results keep request order.
    pub fn serialize_batch(&self, configs: &[WitnessConfig]) -> Vec<Result<WitnessTokenStream>> {
        configs
            .par_iter()
            .map(|config| self.serialize_config(config))
            .collect()
    }
}

impl Default for WitnessSerializer {
    fn default() -> Self {
        Self::new(CircuitProfile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WitnessError;
    use crate::field::FieldElement;
    use crate::hash::PoseidonCombine;

    #[test]
    fn test_raw_echo_without_root() {
        let serializer = WitnessSerializer::default();
        let stream = serializer.serialize(&[0, 1, 2, 3], false).unwrap();
        assert_eq!(stream.to_string(), "0 1 2 3");
        assert_eq!(stream.root(), None);
    }

    #[test]
    fn test_domain_edge_values_pass_unchanged() {
        let serializer = WitnessSerializer::default();
        let stream = serializer.serialize(&[0, 4294967295, 0], false).unwrap();
        assert_eq!(stream.to_string(), "0 4294967295 0");
    }

    #[test]
    fn test_root_is_last_token() {
        let serializer = WitnessSerializer::default();
        let stream = serializer.serialize(&[1, 2], true).unwrap();
        let expected = PoseidonCombine
            .combine(&FieldElement::from_u64(1), &FieldElement::from_u64(2))
            .unwrap()
            .to_string();
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.root(), Some(expected.as_str()));
        assert_eq!(stream.to_string(), format!("1 2 {}", expected));
    }

    #[test]
    fn test_empty_input() {
        let serializer = WitnessSerializer::default();
        let stream = serializer.serialize(&[], false).unwrap();
        assert!(stream.is_empty());
        assert_eq!(stream.to_string(), "");
        assert_eq!(serializer.serialize(&[], true), Err(WitnessError::EmptyInput));
    }

    #[test]
    fn test_range_error_emits_nothing() {
        let serializer = WitnessSerializer::default();
        assert_eq!(
            serializer.serialize(&[1, 4294967296, 2], true),
            Err(WitnessError::OutOfRange {
                index: 1,
                value: 4294967296,
                bound: 4294967295,
            })
        );
    }

    #[test]
    fn test_batch_keeps_request_order() {
        let serializer = WitnessSerializer::default();
        let configs = vec![
            WitnessConfig {
                raw_values: vec![3, 4],
                include_root: false,
            },
            WitnessConfig {
                raw_values: vec![],
                include_root: true,
            },
            WitnessConfig {
                raw_values: vec![9],
                include_root: true,
            },
        ];
        let results = serializer.serialize_batch(&configs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().to_string(), "3 4");
        assert_eq!(results[1], Err(WitnessError::EmptyInput));
        assert_eq!(results[2].as_ref().unwrap().to_string(), "9 9");
    }

    #[test]
    fn test_profile_deserializes_with_defaults() {
        let profile: CircuitProfile = serde_json::from_str(r#"{"hash":"sha256"}"#).unwrap();
        assert_eq!(profile.bound, ValueBound::U32);
        assert_eq!(profile.hash, HashKind::Sha256);
    }
}
