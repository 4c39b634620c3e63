use log::debug;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::RoundId;
use crate::consensus::rounds::Round;
use crate::types::{Address, Payload, PayloadContent};

/// Accepts the one payload from the elected keeper carrying the freshly deployed
/// Safe's address. Every other sender, and every payload after the first accepted
/// one, is dropped.
#[derive(Default, Debug)]
pub struct DeploySafeRound {
    safe_contract_address: Option<Address>,
}

impl DeploySafeRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_id(&self) -> RoundId {
        RoundId::DeploySafe
    }

    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        let safe_address = match &payload.content {
            PayloadContent::DeploySafe { safe_address } => safe_address.clone(),
            _ => return,
        };
        if self.safe_contract_address.is_some() {
            debug!("deploy_safe: dropping payload from {}, already set", payload.sender);
            return;
        }
        let keeper = match state.most_voted_keeper_address() {
            Ok(keeper) => keeper,
            Err(_) => return,
        };
        if payload.sender != keeper {
            debug!("deploy_safe: dropping payload from non-keeper {}", payload.sender);
            return;
        }
        self.safe_contract_address = Some(safe_address);
    }

    pub fn threshold_reached(&self) -> bool {
        self.safe_contract_address.is_some()
    }

    pub fn admitted_count(&self) -> usize {
        self.safe_contract_address.is_some() as usize
    }

    pub fn end_block(&self, state: &PeriodState, _params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        let safe_address = self.safe_contract_address.clone()?;
        let new_state = state.update(PeriodStateUpdate::default().safe_contract_address(safe_address));
        Some((new_state, Round::validate_safe()))
    }
}
