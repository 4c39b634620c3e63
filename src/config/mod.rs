use serde::{Deserialize, Serialize};

use crate::consensus::ConsensusParams;
use crate::error::{CoreError, CoreResult};

/// The on-disk/TOML shape of consensus configuration. Kept separate from
/// [`ConsensusParams`] so the core stays free of `serde`/IO concerns: this struct is
/// the only thing that touches a config file, and [`CommitteeConfig::into_params`]
/// is the one place that validates it before the core ever sees it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CommitteeConfig {
    pub max_participants: u32,
    pub consensus_threshold: u32,
}

impl Default for CommitteeConfig {
    fn default() -> Self {
        Self {
            max_participants: 4,
            consensus_threshold: 3,
        }
    }
}

impl CommitteeConfig {
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validate and convert into the [`ConsensusParams`] the core consumes.
    pub fn into_params(self) -> CoreResult<ConsensusParams> {
        if self.consensus_threshold < 1 {
            return Err(CoreError::InvalidConfig(
                "consensus_threshold must be at least 1".to_string(),
            ));
        }
        if self.consensus_threshold > self.max_participants {
            return Err(CoreError::InvalidConfig(format!(
                "consensus_threshold ({}) cannot exceed max_participants ({})",
                self.consensus_threshold, self.max_participants
            )));
        }
        Ok(ConsensusParams::new(self.max_participants, self.consensus_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_worked_example() {
        let params = CommitteeConfig::default().into_params().unwrap();
        assert_eq!(params.max_participants, 4);
        assert_eq!(params.consensus_threshold, 3);
    }

    #[test]
    fn rejects_threshold_above_committee_size() {
        let config = CommitteeConfig {
            max_participants: 4,
            consensus_threshold: 5,
        };
        assert!(config.into_params().is_err());
    }

    #[test]
    fn rejects_zero_threshold() {
        let config = CommitteeConfig {
            max_participants: 4,
            consensus_threshold: 0,
        };
        assert!(config.into_params().is_err());
    }

    #[test]
    fn loads_from_toml() {
        let config = CommitteeConfig::from_toml_str(
            "max_participants = 7\nconsensus_threshold = 5\n",
        )
        .unwrap();
        assert_eq!(config.max_participants, 7);
        assert_eq!(config.consensus_threshold, 5);
    }
}
