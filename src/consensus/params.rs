/// Parameters that every round consults but none of them own.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ConsensusParams {
    pub max_participants: u32,
    pub consensus_threshold: u32,
}

impl ConsensusParams {
    pub fn new(max_participants: u32, consensus_threshold: u32) -> Self {
        Self {
            max_participants,
            consensus_threshold,
        }
    }
}
