use indexmap::IndexSet;
use log::debug;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::RoundId;
use crate::consensus::rounds::Round;
use crate::types::{Payload, PayloadContent};

/// Collects participant addresses until the committee is full. Admission here is
/// unconditional: any address may register, and registering twice is a harmless
/// no-op (it's a set, not a counter).
#[derive(Default, Debug)]
pub struct RegistrationRound {
    participants: IndexSet<crate::types::Address>,
}

impl RegistrationRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_id(&self) -> RoundId {
        RoundId::Registration
    }

    pub fn apply(&mut self, payload: Payload) {
        if !matches!(payload.content, PayloadContent::Registration) {
            return;
        }
        debug!("registration: admitting {}", payload.sender);
        self.participants.insert(payload.sender);
    }

    pub fn threshold_reached(&self, params: &ConsensusParams) -> bool {
        self.participants.len() as u32 == params.max_participants
    }

    pub fn admitted_count(&self) -> usize {
        self.participants.len()
    }

    pub fn end_block(&self, params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        if !self.threshold_reached(params) {
            return None;
        }
        let state = PeriodState::default().update(
            PeriodStateUpdate::default().participants(std::sync::Arc::new(self.participants.clone())),
        );
        Some((state, Round::randomness()))
    }
}
