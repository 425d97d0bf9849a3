//! Error types for witness encoding and commitment

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WitnessError {
    #[error("value {value} at index {index} is out of range (maximum allowed is {bound})")]
    OutOfRange { index: usize, value: u64, bound: u64 },

    #[error("cannot build a Merkle root: the input was empty")]
    EmptyInput,

    #[error("hash combine failed: {0}")]
    Hash(String),
}

impl WitnessError {
    /// Process exit status used by the CLI boundary for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            WitnessError::OutOfRange { .. } => 2,
            WitnessError::EmptyInput => 3,
            WitnessError::Hash(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, WitnessError>;
