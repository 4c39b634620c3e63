use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::{admits, RoundId};
use crate::consensus::rounds::Round;
use crate::types::{Address, Payload, PayloadContent};

fn vote_of(payload: &Payload) -> bool {
    match &payload.content {
        PayloadContent::Validate { vote } => *vote,
        _ => unreachable!("only inserted after a content-type check"),
    }
}

/// A yes/no committee vote with two outcomes, each leading to a different next round.
/// Instantiated as `ValidateSafe` (Safe deployment; positive -> `CollectObservation`,
/// negative -> `SelectKeeperA`) and `ValidateTransaction` (final tx; positive ->
/// `ConsensusReached`, negative -> `SelectKeeperB`). A failed validation does *not*
/// persist `participant_to_votes` — the attempt is simply abandoned.
#[derive(Debug)]
pub struct ValidateRound {
    this_round: RoundId,
    positive_next: RoundId,
    negative_next: RoundId,
    participant_to_votes: IndexMap<Address, Payload>,
}

impl ValidateRound {
    pub fn new(this_round: RoundId, positive_next: RoundId, negative_next: RoundId) -> Self {
        Self {
            this_round,
            positive_next,
            negative_next,
            participant_to_votes: IndexMap::new(),
        }
    }

    pub fn round_id(&self) -> RoundId {
        self.this_round
    }

    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        if !matches!(payload.content, PayloadContent::Validate { .. }) {
            return;
        }
        let participants = match state.participants() {
            Ok(p) => p,
            Err(_) => return,
        };
        if !admits(&participants, &self.participant_to_votes, &payload.sender) {
            debug!("{}: dropping payload from {}", self.this_round, payload.sender);
            return;
        }
        self.participant_to_votes.insert(payload.sender.clone(), payload);
    }

    fn true_votes(&self) -> u32 {
        self.participant_to_votes.values().filter(|p| vote_of(p)).count() as u32
    }

    pub fn positive_threshold_reached(&self, params: &ConsensusParams) -> bool {
        self.true_votes() >= params.consensus_threshold
    }

    pub fn negative_threshold_reached(&self, params: &ConsensusParams) -> bool {
        let false_votes = self.participant_to_votes.len() as u32 - self.true_votes();
        false_votes >= params.consensus_threshold
    }

    pub fn admitted_count(&self) -> usize {
        self.participant_to_votes.len()
    }

    pub fn end_block(&self, state: &PeriodState, params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        if self.positive_threshold_reached(params) {
            let new_state = state.update(
                PeriodStateUpdate::default().participant_to_votes(Arc::new(self.participant_to_votes.clone())),
            );
            return Some((new_state, Round::from_id(self.positive_next)));
        }
        if self.negative_threshold_reached(params) {
            let new_state = state.update(PeriodStateUpdate::default());
            return Some((new_state, Round::from_id(self.negative_next)));
        }
        None
    }
}
