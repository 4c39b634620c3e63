use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::{admits, count_threshold_reached, RoundId};
use crate::consensus::rounds::Round;
use crate::types::{Address, Payload, PayloadContent};

/// Collects signatures over the agreed transaction hash. Unlike the other
/// collection-only rounds, what's written to period state is the raw signature
/// bytes keyed by sender, not the payload itself.
#[derive(Default, Debug)]
pub struct CollectSignatureRound {
    signatures_by_participant: IndexMap<Address, Vec<u8>>,
}

impl CollectSignatureRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_id(&self) -> RoundId {
        RoundId::CollectSignature
    }

    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        let signature = match &payload.content {
            PayloadContent::Signature { signature } => signature.clone(),
            _ => return,
        };
        let participants = match state.participants() {
            Ok(p) => p,
            Err(_) => return,
        };
        if !admits(&participants, &self.signatures_by_participant, &payload.sender) {
            debug!("collect_signature: dropping payload from {}", payload.sender);
            return;
        }
        self.signatures_by_participant.insert(payload.sender, signature);
    }

    pub fn threshold_reached(&self, params: &ConsensusParams) -> bool {
        count_threshold_reached(&self.signatures_by_participant, params.consensus_threshold)
    }

    pub fn admitted_count(&self) -> usize {
        self.signatures_by_participant.len()
    }

    pub fn end_block(&self, state: &PeriodState, params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        if !self.threshold_reached(params) {
            return None;
        }
        let new_state = state.update(
            PeriodStateUpdate::default().participant_to_signature(Arc::new(self.signatures_by_participant.clone())),
        );
        Some((new_state, Round::finalization()))
    }
}
