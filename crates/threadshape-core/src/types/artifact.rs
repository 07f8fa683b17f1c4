//! The explicit key space of persisted pipeline artifacts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Keys under which pipeline stages persist their outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKey {
    /// Group label per conversation, in enumeration order.
    GroupLabels,
    /// Conversation identifiers, in enumeration order.
    EntityIds,
    /// The assembled, imputed tensor.
    Tensor,
    /// Ordered feature names.
    FeatureNames,
    /// Horizon value per horizon index.
    Horizons,
    /// Mapping rank -> CP factors.
    RankToFactors,
}

impl ArtifactKey {
    pub const ALL: [ArtifactKey; 6] = [
        Self::GroupLabels,
        Self::EntityIds,
        Self::Tensor,
        Self::FeatureNames,
        Self::Horizons,
        Self::RankToFactors,
    ];

    /// Artifacts written by the tensor build stage. `Tensor` is last so a
    /// non-transactional backend that stops midway never looks complete.
    pub const TENSOR_STAGE: [ArtifactKey; 5] = [
        Self::GroupLabels,
        Self::EntityIds,
        Self::FeatureNames,
        Self::Horizons,
        Self::Tensor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroupLabels => "group-labels",
            Self::EntityIds => "entity-ids",
            Self::Tensor => "tensor",
            Self::FeatureNames => "feature-names",
            Self::Horizons => "horizons",
            Self::RankToFactors => "rank-to-factors",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_back() {
        for key in ArtifactKey::ALL {
            assert_eq!(ArtifactKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(ArtifactKey::parse("nope"), None);
    }
}
