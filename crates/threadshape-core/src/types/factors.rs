//! CP factor matrices.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::tensor::Tensor3;

/// One factor matrix: (dimension size, rank). Column `r` is latent component `r`.
pub type FactorMatrix = DMatrix<f64>;

/// Rank -> factors for every rank that decomposed successfully.
pub type RankToFactors = BTreeMap<usize, CpFactors>;

/// The three tensor modes, in factor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorMode {
    Horizon,
    Conversation,
    Feature,
}

impl TensorMode {
    pub const ALL: [TensorMode; 3] = [Self::Horizon, Self::Conversation, Self::Feature];

    pub fn index(&self) -> usize {
        match self {
            Self::Horizon => 0,
            Self::Conversation => 1,
            Self::Feature => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Horizon => "horizon",
            Self::Conversation => "conversation",
            Self::Feature => "feature",
        }
    }
}

impl fmt::Display for TensorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rank-R CP decomposition: three factor matrices whose outer-product sum
/// approximates the tensor. Columns carry no ordering and no sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpFactors {
    pub horizon: FactorMatrix,
    pub conversation: FactorMatrix,
    pub feature: FactorMatrix,
}

impl CpFactors {
    pub fn new(horizon: FactorMatrix, conversation: FactorMatrix, feature: FactorMatrix) -> Self {
        Self {
            horizon,
            conversation,
            feature,
        }
    }

    pub fn rank(&self) -> usize {
        self.horizon.ncols()
    }

    pub fn factor(&self, mode: TensorMode) -> &FactorMatrix {
        match mode {
            TensorMode::Horizon => &self.horizon,
            TensorMode::Conversation => &self.conversation,
            TensorMode::Feature => &self.feature,
        }
    }

    /// Check every factor is (dimension size, rank) for the given tensor shape.
    /// Returns a description of the first mismatch.
    pub fn check_shape(&self, shape: [usize; 3], rank: usize) -> Result<(), String> {
        for mode in TensorMode::ALL {
            let m = self.factor(mode);
            let expected = (shape[mode.index()], rank);
            if m.shape() != expected {
                return Err(format!(
                    "{mode} factor is {}x{}, expected {}x{}",
                    m.nrows(),
                    m.ncols(),
                    expected.0,
                    expected.1
                ));
            }
        }
        Ok(())
    }

    /// Sum of the rank-1 outer products.
    pub fn reconstruct(&self) -> Tensor3 {
        let shape = [
            self.horizon.nrows(),
            self.conversation.nrows(),
            self.feature.nrows(),
        ];
        let rank = self.rank();
        Tensor3::from_fn(shape, |h, c, f| {
            (0..rank)
                .map(|r| self.horizon[(h, r)] * self.conversation[(c, r)] * self.feature[(f, r)])
                .sum()
        })
    }
}
