use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::consensus::aggregate::aggregate;
use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::{PeriodState, PeriodStateUpdate};
use crate::consensus::round::{admits, count_threshold_reached, RoundId};
use crate::consensus::rounds::Round;
use crate::types::{Address, Payload, PayloadContent};

fn observation_of(payload: &Payload) -> f64 {
    match &payload.content {
        PayloadContent::Observation { observation } => *observation,
        _ => unreachable!("only inserted after a content-type check"),
    }
}

/// Collects raw price observations, one per participant, and — once enough have
/// arrived — aggregates them into a single `estimate` via the median.
#[derive(Default, Debug)]
pub struct CollectObservationRound {
    participant_to_observations: IndexMap<Address, Payload>,
}

impl CollectObservationRound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_id(&self) -> RoundId {
        RoundId::CollectObservation
    }

    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        let observation = match &payload.content {
            PayloadContent::Observation { observation } => *observation,
            _ => return,
        };
        if observation.is_nan() {
            debug!("collect_observation: dropping NaN observation from {}", payload.sender);
            return;
        }
        let participants = match state.participants() {
            Ok(p) => p,
            Err(_) => return,
        };
        if !admits(&participants, &self.participant_to_observations, &payload.sender) {
            debug!("collect_observation: dropping payload from {}", payload.sender);
            return;
        }
        self.participant_to_observations.insert(payload.sender.clone(), payload);
    }

    pub fn threshold_reached(&self, params: &ConsensusParams) -> bool {
        count_threshold_reached(&self.participant_to_observations, params.consensus_threshold)
    }

    pub fn admitted_count(&self) -> usize {
        self.participant_to_observations.len()
    }

    pub fn end_block(&self, state: &PeriodState, params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        if !self.threshold_reached(params) {
            return None;
        }
        let observations: Vec<f64> = self.participant_to_observations.values().map(observation_of).collect();
        let estimate = aggregate(&observations);
        let new_state = state.update(
            PeriodStateUpdate::default()
                .participant_to_observations(Arc::new(self.participant_to_observations.clone()))
                .estimate(estimate),
        );
        Some((new_state, Round::estimate_consensus()))
    }
}
