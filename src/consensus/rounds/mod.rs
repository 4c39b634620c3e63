pub mod collect_observation;
pub mod collect_signature;
pub mod deploy_safe;
pub mod estimate_consensus;
pub mod finalization;
pub mod randomness;
pub mod registration;
pub mod select_keeper;
pub mod tx_hash;
pub mod validate;

pub use collect_observation::CollectObservationRound;
pub use collect_signature::CollectSignatureRound;
pub use deploy_safe::DeploySafeRound;
pub use estimate_consensus::EstimateConsensusRound;
pub use finalization::FinalizationRound;
pub use randomness::RandomnessRound;
pub use registration::RegistrationRound;
pub use select_keeper::SelectKeeperRound;
pub use tx_hash::TxHashRound;
pub use validate::ValidateRound;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::PeriodState;
use crate::consensus::round::RoundId;
use crate::types::Payload;

/// A tagged variant with one branch per round id. `SelectKeeper` and `Validate`
/// carry their successor round(s) as data (see those modules), rather than being
/// modelled as distinct types per successor.
#[derive(Debug)]
pub enum Round {
    Registration(RegistrationRound),
    Randomness(RandomnessRound),
    SelectKeeper(SelectKeeperRound),
    DeploySafe(DeploySafeRound),
    Validate(ValidateRound),
    CollectObservation(CollectObservationRound),
    EstimateConsensus(EstimateConsensusRound),
    TxHash(TxHashRound),
    CollectSignature(CollectSignatureRound),
    Finalization(FinalizationRound),
    ConsensusReached,
}

impl Round {
    pub fn registration() -> Self {
        Round::Registration(RegistrationRound::new())
    }

    pub fn randomness() -> Self {
        Round::Randomness(RandomnessRound::new())
    }

    pub fn select_keeper_a() -> Self {
        Round::SelectKeeper(SelectKeeperRound::new(RoundId::SelectKeeperA, RoundId::DeploySafe))
    }

    pub fn select_keeper_b() -> Self {
        Round::SelectKeeper(SelectKeeperRound::new(RoundId::SelectKeeperB, RoundId::Finalization))
    }

    pub fn deploy_safe() -> Self {
        Round::DeploySafe(DeploySafeRound::new())
    }

    pub fn validate_safe() -> Self {
        Round::Validate(ValidateRound::new(
            RoundId::ValidateSafe,
            RoundId::CollectObservation,
            RoundId::SelectKeeperA,
        ))
    }

    pub fn validate_transaction() -> Self {
        Round::Validate(ValidateRound::new(
            RoundId::ValidateTransaction,
            RoundId::ConsensusReached,
            RoundId::SelectKeeperB,
        ))
    }

    pub fn collect_observation() -> Self {
        Round::CollectObservation(CollectObservationRound::new())
    }

    pub fn estimate_consensus() -> Self {
        Round::EstimateConsensus(EstimateConsensusRound::new())
    }

    pub fn tx_hash() -> Self {
        Round::TxHash(TxHashRound::new())
    }

    pub fn collect_signature() -> Self {
        Round::CollectSignature(CollectSignatureRound::new())
    }

    pub fn finalization() -> Self {
        Round::Finalization(FinalizationRound::new())
    }

    pub fn consensus_reached() -> Self {
        Round::ConsensusReached
    }

    /// Construct the round a given [`RoundId`] names. Used by `SelectKeeper`'s and
    /// `Validate`'s `next_round`/`positive_next`/`negative_next` to turn a stored id
    /// back into a fresh round instance.
    pub fn from_id(id: RoundId) -> Self {
        match id {
            RoundId::Registration => Self::registration(),
            RoundId::Randomness => Self::randomness(),
            RoundId::SelectKeeperA => Self::select_keeper_a(),
            RoundId::SelectKeeperB => Self::select_keeper_b(),
            RoundId::DeploySafe => Self::deploy_safe(),
            RoundId::ValidateSafe => Self::validate_safe(),
            RoundId::CollectObservation => Self::collect_observation(),
            RoundId::EstimateConsensus => Self::estimate_consensus(),
            RoundId::TxHash => Self::tx_hash(),
            RoundId::CollectSignature => Self::collect_signature(),
            RoundId::Finalization => Self::finalization(),
            RoundId::ValidateTransaction => Self::validate_transaction(),
            RoundId::ConsensusReached => Self::consensus_reached(),
        }
    }

    pub fn round_id(&self) -> RoundId {
        match self {
            Round::Registration(r) => r.round_id(),
            Round::Randomness(r) => r.round_id(),
            Round::SelectKeeper(r) => r.round_id(),
            Round::DeploySafe(r) => r.round_id(),
            Round::Validate(r) => r.round_id(),
            Round::CollectObservation(r) => r.round_id(),
            Round::EstimateConsensus(r) => r.round_id(),
            Round::TxHash(r) => r.round_id(),
            Round::CollectSignature(r) => r.round_id(),
            Round::Finalization(r) => r.round_id(),
            Round::ConsensusReached => RoundId::ConsensusReached,
        }
    }

    /// Admit-or-drop `payload` into this round. `ConsensusReached` admits nothing —
    /// it is terminal.
    pub fn apply(&mut self, payload: Payload, state: &PeriodState) {
        match self {
            Round::Registration(r) => r.apply(payload),
            Round::Randomness(r) => r.apply(payload, state),
            Round::SelectKeeper(r) => r.apply(payload, state),
            Round::DeploySafe(r) => r.apply(payload, state),
            Round::Validate(r) => r.apply(payload, state),
            Round::CollectObservation(r) => r.apply(payload, state),
            Round::EstimateConsensus(r) => r.apply(payload, state),
            Round::TxHash(r) => r.apply(payload, state),
            Round::CollectSignature(r) => r.apply(payload, state),
            Round::Finalization(r) => r.apply(payload, state),
            Round::ConsensusReached => {}
        }
    }

    /// Number of distinct senders admitted into this round so far — a lightweight
    /// progress signal alongside [`Round::round_id`] for observability.
    pub fn admitted_count(&self) -> usize {
        match self {
            Round::Registration(r) => r.admitted_count(),
            Round::Randomness(r) => r.admitted_count(),
            Round::SelectKeeper(r) => r.admitted_count(),
            Round::DeploySafe(r) => r.admitted_count(),
            Round::Validate(r) => r.admitted_count(),
            Round::CollectObservation(r) => r.admitted_count(),
            Round::EstimateConsensus(r) => r.admitted_count(),
            Round::TxHash(r) => r.admitted_count(),
            Round::CollectSignature(r) => r.admitted_count(),
            Round::Finalization(r) => r.admitted_count(),
            Round::ConsensusReached => 0,
        }
    }

    /// `Some((new_state, next_round))` once this round's threshold is reached,
    /// `None` otherwise. `ConsensusReached` never returns `Some` — it is the fixed
    /// point of the round graph.
    pub fn end_block(&self, state: &PeriodState, params: &ConsensusParams) -> Option<(PeriodState, Round)> {
        match self {
            Round::Registration(r) => r.end_block(params),
            Round::Randomness(r) => r.end_block(state, params),
            Round::SelectKeeper(r) => r.end_block(state, params),
            Round::DeploySafe(r) => r.end_block(state, params),
            Round::Validate(r) => r.end_block(state, params),
            Round::CollectObservation(r) => r.end_block(state, params),
            Round::EstimateConsensus(r) => r.end_block(state, params),
            Round::TxHash(r) => r.end_block(state, params),
            Round::CollectSignature(r) => r.end_block(state, params),
            Round::Finalization(r) => r.end_block(state, params),
            Round::ConsensusReached => None,
        }
    }
}
