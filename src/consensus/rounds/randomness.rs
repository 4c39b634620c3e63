use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::{admits, plurality_winner, RoundId};
use crate::consensus::rounds::Round;
use crate::types::{Address, Payload, PayloadContent};

fn randomness_value(payload: &Payload) -> String {
    match &payload.content {
        PayloadContent::Randomness { value } => value.clone(),
        _ => unreachable!("only inserted after a content-type check"),
    }
}

/// Collects a verifiable-random-function style hex value from each participant and
/// agrees on the plurality-voted one.
#[derive(Default, Debug)]
pub struct RandomnessRound {
    participant_to_randomness: IndexMap<Address, Payload>,
}

impl RandomnessRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_id(&self) -> RoundId {
        RoundId::Randomness
    }

    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        if !matches!(payload.content, PayloadContent::Randomness { .. }) {
            return;
        }
        let participants = match state.participants() {
            Ok(p) => p,
            Err(_) => return,
        };
        if !admits(&participants, &self.participant_to_randomness, &payload.sender) {
            debug!("randomness: dropping payload from {}", payload.sender);
            return;
        }
        self.participant_to_randomness.insert(payload.sender.clone(), payload);
    }

    fn winner(&self, params: &ConsensusParams) -> Option<String> {
        plurality_winner(&self.participant_to_randomness, params.consensus_threshold, randomness_value)
    }

    pub fn threshold_reached(&self, params: &ConsensusParams) -> bool {
        self.winner(params).is_some()
    }

    pub fn admitted_count(&self) -> usize {
        self.participant_to_randomness.len()
    }

    pub fn end_block(&self, state: &PeriodState, params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        let winner = self.winner(params)?;
        let new_state = state.update(
            PeriodStateUpdate::default()
                .participant_to_randomness(Arc::new(self.participant_to_randomness.clone()))
                .most_voted_randomness(Arc::from(winner)),
        );
        Some((new_state, Round::select_keeper_a()))
    }
}
