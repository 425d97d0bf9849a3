//! Deterministic witness input for BN254 proving circuits.
//!
//! Raw readings are range-checked and embedded as field elements, optionally
//! committed to with a binary Merkle tree, and rendered as the space-separated
//! decimal token line a circuit toolchain reads.

pub mod error;
pub mod field;
pub mod hash;
pub mod merkle;
pub mod witness;

pub use error::{Result, WitnessError};
pub use field::{FieldElement, FieldEncoder, ValueBound};
pub use hash::{HashCombine, HashKind, PoseidonCombine, Sha256Combine};
pub use merkle::{MerkleTree, MerkleTreeBuilder, PADDING};
pub use witness::{CircuitProfile, WitnessConfig, WitnessSerializer, WitnessTokenStream};
