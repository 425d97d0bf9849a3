//! Two-to-one hash primitives used to fold Merkle nodes.
//!
//! The primitive must match the one the consuming circuit implements, so it
//! is selected by configuration rather than fixed here.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, WitnessError};
use crate::field::FieldElement;

/// Combine a left and right child into their parent.
pub trait HashCombine: Send + Sync {
    fn combine(&self, left: &FieldElement, right: &FieldElement) -> Result<FieldElement>;
}

impl<H: HashCombine + ?Sized> HashCombine for Box<H> {
    fn combine(&self, left: &FieldElement, right: &FieldElement) -> Result<FieldElement> {
        (**self).combine(left, right)
    }
}

impl<H: HashCombine + ?Sized> HashCombine for &H {
    fn combine(&self, left: &FieldElement, right: &FieldElement) -> Result<FieldElement> {
        (**self).combine(left, right)
    }
}

/// Circom-compatible Poseidon over BN254 with two inputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PoseidonCombine;

impl HashCombine for PoseidonCombine {
    fn combine(&self, left: &FieldElement, right: &FieldElement) -> Result<FieldElement> {
        let mut hasher =
            Poseidon::<Fr>::new_circom(2).map_err(|e| WitnessError::Hash(e.to_string()))?;
        let digest = hasher
            .hash(&[*left.as_fr(), *right.as_fr()])
            .map_err(|e| WitnessError::Hash(e.to_string()))?;
        Ok(FieldElement::from_fr(digest))
    }
}

/// `SHA256(left || right)` over 32-byte big-endian encodings, reduced into the field.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Combine;

impl HashCombine for Sha256Combine {
    fn combine(&self, left: &FieldElement, right: &FieldElement) -> Result<FieldElement> {
        let mut hasher = Sha256::new();
        hasher.update(left.to_be_bytes());
        hasher.update(right.to_be_bytes());
        let digest = hasher.finalize();
        Ok(FieldElement::from_be_bytes_mod_order(&digest))
    }
}

/// Named selection of a [`HashCombine`] primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    #[default]
    Poseidon,
    Sha256,
}

impl HashKind {
    pub fn combiner(&self) -> Box<dyn HashCombine> {
        match self {
            HashKind::Poseidon => Box::new(PoseidonCombine),
            HashKind::Sha256 => Box::new(Sha256Combine),
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKind::Poseidon => write!(f, "poseidon"),
            HashKind::Sha256 => write!(f, "sha256"),
        }
    }
}

impl FromStr for HashKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "poseidon" => Ok(HashKind::Poseidon),
            "sha256" => Ok(HashKind::Sha256),
            other => Err(format!(
                "unknown hash '{}', expected 'poseidon' or 'sha256'",
                other
            )),
        }
    }
}
