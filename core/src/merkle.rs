use tracing::debug;

use crate::error::{Result, WitnessError};
use crate::field::FieldElement;
use crate::hash::HashCombine;

/// Sibling used for the last node of an odd-length level. Public and fixed.
pub const PADDING: FieldElement = FieldElement::ZERO;

/// A binary Merkle tree over field elements, with every level retained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    /// `levels[0]` holds the leaves, the last level holds only the root.
    /// A level that was padded stores its padding node.
    levels: Vec<Vec<FieldElement>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Get the root
    pub fn root(&self) -> FieldElement {
        // build_tree never produces an empty level
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaves(&self) -> &[FieldElement] {
        &self.levels[0][..self.leaf_count]
    }

    pub fn levels(&self) -> &[Vec<FieldElement>] {
        &self.levels
    }

    /// Number of combine steps from a leaf to the root, `ceil(log2(n))`.
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }
}

/// Folds ordered leaves into a root with a fixed [`HashCombine`] primitive.
#[derive(Clone, Debug)]
pub struct MerkleTreeBuilder<H> {
    hasher: H,
}

impl<H: HashCombine> MerkleTreeBuilder<H> {
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Compute the Merkle root of `leaves`.
    pub fn build(&self, leaves: &[FieldElement]) -> Result<FieldElement> {
        Ok(self.build_tree(leaves)?.root())
    }

    /// Build the whole tree level by level.
    ///
    /// An odd-length level is padded with [`PADDING`] before pairing, and the
    /// padded pair goes through the same primitive as every other pair. A
    /// single leaf is its own root and the primitive is never called.
    pub fn build_tree(&self, leaves: &[FieldElement]) -> Result<MerkleTree> {
        if leaves.is_empty() {
            return Err(WitnessError::EmptyInput);
        }

        let mut levels = vec![leaves.to_vec()];

        loop {
            let current_level = match levels.last_mut() {
                Some(level) if level.len() > 1 => level,
                _ => break,
            };

            if current_level.len() % 2 == 1 {
                current_level.push(PADDING);
            }

            let next_level = current_level
                .chunks_exact(2)
                .map(|pair| self.hasher.combine(&pair[0], &pair[1]))
                .collect::<Result<Vec<_>>>()?;

            debug!(
                level = levels.len(),
                nodes = next_level.len(),
                "merkle level folded"
            );
            levels.push(next_level);
        }

        Ok(MerkleTree {
            levels,
            leaf_count: leaves.len(),
        })
    }
}
