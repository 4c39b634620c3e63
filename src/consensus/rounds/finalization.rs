use log::debug;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::RoundId;
use crate::consensus::rounds::Round;
use crate::types::Payload;

/// Accepts the one payload from the elected keeper carrying the hash of the
/// submitted, signed transaction. Same keeper-only, accept-exactly-one rule as
/// `DeploySafe`.
#[derive(Default, Debug)]
pub struct FinalizationRound {
    final_tx_hash: Option<String>,
}

impl FinalizationRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_id(&self) -> RoundId {
        RoundId::Finalization
    }

    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        let tx_hash = match &payload.content {
            crate::types::PayloadContent::FinalizationTx { tx_hash } => tx_hash.clone(),
            _ => return,
        };
        if self.final_tx_hash.is_some() {
            debug!("finalization: dropping payload from {}, already set", payload.sender);
            return;
        }
        let keeper = match state.most_voted_keeper_address() {
            Ok(keeper) => keeper,
            Err(_) => return,
        };
        if payload.sender != keeper {
            debug!("finalization: dropping payload from non-keeper {}", payload.sender);
            return;
        }
        self.final_tx_hash = Some(tx_hash);
    }

    pub fn threshold_reached(&self) -> bool {
        self.final_tx_hash.is_some()
    }

    pub fn admitted_count(&self) -> usize {
        self.final_tx_hash.is_some() as usize
    }

    pub fn end_block(&self, state: &PeriodState, _params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        let tx_hash = self.final_tx_hash.clone()?;
        let new_state = state.update(PeriodStateUpdate::default().final_tx_hash(std::sync::Arc::from(tx_hash)));
        Some((new_state, Round::validate_transaction()))
    }
}
