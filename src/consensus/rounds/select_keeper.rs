use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::{admits, plurality_winner, RoundId};
use crate::consensus::rounds::Round;
use crate::types::{Address, Payload, PayloadContent};

fn keeper_of(payload: &Payload) -> Address {
    match &payload.content {
        PayloadContent::SelectKeeper { keeper } => keeper.clone(),
        _ => unreachable!("only inserted after a content-type check"),
    }
}

/// Elects a keeper by plurality vote. Instantiated twice in the round graph —
/// `SelectKeeperA` (first election, feeding `DeploySafe`) and `SelectKeeperB`
/// (re-election after a failed transaction validation, feeding `Finalization`) — the
/// only difference between them being which round follows, carried here as data
/// rather than as two separate types.
#[derive(Debug)]
pub struct SelectKeeperRound {
    this_round: RoundId,
    next_round: RoundId,
    participant_to_selection: IndexMap<Address, Payload>,
}

impl SelectKeeperRound {
    pub fn new(this_round: RoundId, next_round: RoundId) -> Self {
        Self {
            this_round,
            next_round,
            participant_to_selection: IndexMap::new(),
        }
    }

    pub fn round_id(&self) -> RoundId {
        self.this_round
    }

    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        if !matches!(payload.content, PayloadContent::SelectKeeper { .. }) {
            return;
        }
        let participants = match state.participants() {
            Ok(p) => p,
            Err(_) => return,
        };
        if !admits(&participants, &self.participant_to_selection, &payload.sender) {
            debug!("{}: dropping payload from {}", self.this_round, payload.sender);
            return;
        }
        self.participant_to_selection.insert(payload.sender.clone(), payload);
    }

    fn winner(&self, params: &ConsensusParams) -> Option<Address> {
        plurality_winner(&self.participant_to_selection, params.consensus_threshold, keeper_of)
    }

    pub fn threshold_reached(&self, params: &ConsensusParams) -> bool {
        self.winner(params).is_some()
    }

    pub fn admitted_count(&self) -> usize {
        self.participant_to_selection.len()
    }

    pub fn end_block(&self, state: &PeriodState, params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        let winner = self.winner(params)?;
        let new_state = state.update(
            PeriodStateUpdate::default()
                .participant_to_selection(Arc::new(self.participant_to_selection.clone()))
                .most_voted_keeper_address(winner),
        );
        Some((new_state, Round::from_id(self.next_round)))
    }
}
