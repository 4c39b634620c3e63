use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::{admits, plurality_winner, RoundId};
use crate::consensus::rounds::Round;
use crate::types::{Address, Payload, PayloadContent};

fn tx_hash_of(payload: &Payload) -> String {
    match &payload.content {
        PayloadContent::TransactionHash { tx_hash } => tx_hash.clone(),
        _ => unreachable!("only inserted after a content-type check"),
    }
}

/// Agrees, by plurality vote, on the hash of the safe transaction every participant
/// will be asked to sign.
#[derive(Default, Debug)]
pub struct TxHashRound {
    participant_to_tx_hash: IndexMap<Address, Payload>,
}

impl TxHashRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_id(&self) -> RoundId {
        RoundId::TxHash
    }

    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        if !matches!(payload.content, PayloadContent::TransactionHash { .. }) {
            return;
        }
        let participants = match state.participants() {
            Ok(p) => p,
            Err(_) => return,
        };
        if !admits(&participants, &self.participant_to_tx_hash, &payload.sender) {
            debug!("tx_hash: dropping payload from {}", payload.sender);
            return;
        }
        self.participant_to_tx_hash.insert(payload.sender.clone(), payload);
    }

    fn winner(&self, params: &ConsensusParams) -> Option<String> {
        plurality_winner(&self.participant_to_tx_hash, params.consensus_threshold, tx_hash_of)
    }

    pub fn threshold_reached(&self, params: &ConsensusParams) -> bool {
        self.winner(params).is_some()
    }

    pub fn admitted_count(&self) -> usize {
        self.participant_to_tx_hash.len()
    }

    pub fn end_block(&self, state: &PeriodState, params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        let winner = self.winner(params)?;
        let new_state = state.update(
            PeriodStateUpdate::default()
                .participant_to_tx_hash(Arc::new(self.participant_to_tx_hash.clone()))
                .most_voted_tx_hash(Arc::from(winner)),
        );
        Some((new_state, Round::collect_signature()))
    }
}
