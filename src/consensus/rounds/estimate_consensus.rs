use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::{admits, plurality_winner, RoundId};
use crate::consensus::rounds::Round;
use crate::types::{Address, Payload, PayloadContent};

fn estimate_bits(payload: &Payload) -> u64 {
    match &payload.content {
        PayloadContent::Estimate { estimate } => estimate.to_bits(),
        _ => unreachable!("only inserted after a content-type check"),
    }
}

/// Agrees, by plurality vote, on a single `estimate` among the ones each participant
/// independently reports (they should all report the same aggregate computed in
/// `CollectObservation`, but the vote tolerates the odd straggler or Byzantine value).
#[derive(Default, Debug)]
pub struct EstimateConsensusRound {
    participant_to_estimate: IndexMap<Address, Payload>,
}

impl EstimateConsensusRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_id(&self) -> RoundId {
        RoundId::EstimateConsensus
    }

    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        if !matches!(payload.content, PayloadContent::Estimate { .. }) {
            return;
        }
        let participants = match state.participants() {
            Ok(p) => p,
            Err(_) => return,
        };
        if !admits(&participants, &self.participant_to_estimate, &payload.sender) {
            debug!("estimate_consensus: dropping payload from {}", payload.sender);
            return;
        }
        self.participant_to_estimate.insert(payload.sender.clone(), payload);
    }

    fn winner(&self, params: &ConsensusParams) -> Option<f64> {
        plurality_winner(&self.participant_to_estimate, params.consensus_threshold, estimate_bits)
            .map(f64::from_bits)
    }

    pub fn threshold_reached(&self, params: &ConsensusParams) -> bool {
        self.winner(params).is_some()
    }

    pub fn admitted_count(&self) -> usize {
        self.participant_to_estimate.len()
    }

    pub fn end_block(&self, state: &PeriodState, params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        let winner = self.winner(params)?;
        let new_state = state.update(
            PeriodStateUpdate::default()
                .participant_to_estimate(Arc::new(self.participant_to_estimate.clone()))
                .most_voted_estimate(winner),
        );
        Some((new_state, Round::tx_hash()))
    }
}
