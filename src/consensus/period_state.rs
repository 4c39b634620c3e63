use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::error::{CoreError, CoreResult};
use crate::types::{Address, Payload};

/// Per-sender accumulator, keyed in the order senders were admitted. Plurality
/// tie-breaks over these maps rely on that insertion order being preserved.
pub type SenderMap<V> = Arc<IndexMap<Address, V>>;

/// The immutable, accumulating record of everything the committee has agreed on so
/// far in the current period. Every field starts unpopulated; each is written exactly
/// once, by the round responsible for it, via [`PeriodState::update`].
///
/// Cloning a `PeriodState` is cheap: unset and carried-over fields share their
/// underlying `Arc`/`Option<Address>` rather than being deep-copied.
#[derive(Clone, Debug, Default)]
pub struct PeriodState {
    participants: Option<Arc<IndexSet<Address>>>,
    participant_to_randomness: Option<SenderMap<Payload>>,
    most_voted_randomness: Option<Arc<str>>,
    participant_to_selection: Option<SenderMap<Payload>>,
    most_voted_keeper_address: Option<Address>,
    safe_contract_address: Option<Address>,
    participant_to_observations: Option<SenderMap<Payload>>,
    estimate: Option<f64>,
    participant_to_estimate: Option<SenderMap<Payload>>,
    most_voted_estimate: Option<f64>,
    participant_to_tx_hash: Option<SenderMap<Payload>>,
    most_voted_tx_hash: Option<Arc<str>>,
    participant_to_signature: Option<SenderMap<Vec<u8>>>,
    participant_to_votes: Option<SenderMap<Payload>>,
    final_tx_hash: Option<Arc<str>>,
}

/// A patch applied on top of an existing [`PeriodState`] by [`PeriodState::update`].
/// Any field left `None` passes the prior state's value through unchanged.
#[derive(Default)]
pub struct PeriodStateUpdate {
    participants: Option<Arc<IndexSet<Address>>>,
    participant_to_randomness: Option<SenderMap<Payload>>,
    most_voted_randomness: Option<Arc<str>>,
    participant_to_selection: Option<SenderMap<Payload>>,
    most_voted_keeper_address: Option<Address>,
    safe_contract_address: Option<Address>,
    participant_to_observations: Option<SenderMap<Payload>>,
    estimate: Option<f64>,
    participant_to_estimate: Option<SenderMap<Payload>>,
    most_voted_estimate: Option<f64>,
    participant_to_tx_hash: Option<SenderMap<Payload>>,
    most_voted_tx_hash: Option<Arc<str>>,
    participant_to_signature: Option<SenderMap<Vec<u8>>>,
    participant_to_votes: Option<SenderMap<Payload>>,
    final_tx_hash: Option<Arc<str>>,
}

macro_rules! update_setter {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.$name = Some(value);
            self
        }
    };
}

impl PeriodStateUpdate {
    update_setter!(participants, Arc<IndexSet<Address>>);
    update_setter!(participant_to_randomness, SenderMap<Payload>);
    update_setter!(most_voted_randomness, Arc<str>);
    update_setter!(participant_to_selection, SenderMap<Payload>);
    update_setter!(most_voted_keeper_address, Address);
    update_setter!(safe_contract_address, Address);
    update_setter!(participant_to_observations, SenderMap<Payload>);
    update_setter!(estimate, f64);
    update_setter!(participant_to_estimate, SenderMap<Payload>);
    update_setter!(most_voted_estimate, f64);
    update_setter!(participant_to_tx_hash, SenderMap<Payload>);
    update_setter!(most_voted_tx_hash, Arc<str>);
    update_setter!(participant_to_signature, SenderMap<Vec<u8>>);
    update_setter!(participant_to_votes, SenderMap<Payload>);
    update_setter!(final_tx_hash, Arc<str>);
}

macro_rules! accessor {
    ($name:ident, $ty:ty, $field:literal) => {
        pub fn $name(&self) -> CoreResult<$ty> {
            self.$name
                .clone()
                .ok_or(CoreError::UnpopulatedField($field))
        }
    };
}

impl PeriodState {
    /// Apply a patch, producing a new state. Fields absent from `patch` carry over
    /// from `self` unchanged (this is also how negative-validation paths "discard"
    /// votes: they call `update` with an empty patch).
    pub fn update(&self, patch: PeriodStateUpdate) -> PeriodState {
        PeriodState {
            participants: patch.participants.or_else(|| self.participants.clone()),
            participant_to_randomness: patch
                .participant_to_randomness
                .or_else(|| self.participant_to_randomness.clone()),
            most_voted_randomness: patch
                .most_voted_randomness
                .or_else(|| self.most_voted_randomness.clone()),
            participant_to_selection: patch
                .participant_to_selection
                .or_else(|| self.participant_to_selection.clone()),
            most_voted_keeper_address: patch
                .most_voted_keeper_address
                .or_else(|| self.most_voted_keeper_address.clone()),
            safe_contract_address: patch
                .safe_contract_address
                .or_else(|| self.safe_contract_address.clone()),
            participant_to_observations: patch
                .participant_to_observations
                .or_else(|| self.participant_to_observations.clone()),
            estimate: patch.estimate.or(self.estimate),
            participant_to_estimate: patch
                .participant_to_estimate
                .or_else(|| self.participant_to_estimate.clone()),
            most_voted_estimate: patch.most_voted_estimate.or(self.most_voted_estimate),
            participant_to_tx_hash: patch
                .participant_to_tx_hash
                .or_else(|| self.participant_to_tx_hash.clone()),
            most_voted_tx_hash: patch
                .most_voted_tx_hash
                .or_else(|| self.most_voted_tx_hash.clone()),
            participant_to_signature: patch
                .participant_to_signature
                .or_else(|| self.participant_to_signature.clone()),
            participant_to_votes: patch
                .participant_to_votes
                .or_else(|| self.participant_to_votes.clone()),
            final_tx_hash: patch.final_tx_hash.or_else(|| self.final_tx_hash.clone()),
        }
    }

    accessor!(participants, Arc<IndexSet<Address>>, "participants");
    accessor!(
        participant_to_randomness,
        SenderMap<Payload>,
        "participant_to_randomness"
    );
    accessor!(most_voted_randomness, Arc<str>, "most_voted_randomness");
    accessor!(
        participant_to_selection,
        SenderMap<Payload>,
        "participant_to_selection"
    );
    accessor!(
        most_voted_keeper_address,
        Address,
        "most_voted_keeper_address"
    );
    accessor!(safe_contract_address, Address, "safe_contract_address");
    accessor!(
        participant_to_observations,
        SenderMap<Payload>,
        "participant_to_observations"
    );
    accessor!(estimate, f64, "estimate");
    accessor!(
        participant_to_estimate,
        SenderMap<Payload>,
        "participant_to_estimate"
    );
    accessor!(most_voted_estimate, f64, "most_voted_estimate");
    accessor!(
        participant_to_tx_hash,
        SenderMap<Payload>,
        "participant_to_tx_hash"
    );
    accessor!(most_voted_tx_hash, Arc<str>, "most_voted_tx_hash");
    accessor!(
        participant_to_signature,
        SenderMap<Vec<u8>>,
        "participant_to_signature"
    );
    accessor!(
        participant_to_votes,
        SenderMap<Payload>,
        "participant_to_votes"
    );
    accessor!(final_tx_hash, Arc<str>, "final_tx_hash");

    /// `participants.is_some()`, used by rounds that accept any sender before
    /// `Registration` has closed (the round itself governs that, not this check).
    pub fn has_participants(&self) -> bool {
        self.participants.is_some()
    }

    /// Is `address` one of the registered participants?
    pub fn is_participant(&self, address: &Address) -> bool {
        self.participants
            .as_ref()
            .is_some_and(|p| p.contains(address))
    }

    /// The last hex digit of `most_voted_randomness`, interpreted as a base-16
    /// integer, divided by 10 — yielding a value in `{0.0, 0.1, ..., 0.9}`. This is
    /// not a uniform sample over `[0, 1)`; it only has one hex digit of entropy. The
    /// arithmetic is preserved exactly as specified, weak as it is.
    pub fn keeper_randomness(&self) -> CoreResult<f64> {
        let randomness = self.most_voted_randomness()?;
        let trimmed = randomness.trim_start_matches("0x").trim_start_matches("0X");
        let value = u64::from_str_radix(trimmed, 16)
            .map_err(|_| CoreError::UnpopulatedField("most_voted_randomness"))?;
        Ok((value % 10) as f64 / 10.0)
    }

    /// `most_voted_estimate`, serialized as an 8-byte little-endian IEEE-754 double —
    /// the bit-exact contract downstream smart-contract call data expects.
    pub fn encoded_most_voted_estimate(&self) -> CoreResult<[u8; 8]> {
        Ok(crate::types::encode_float(self.most_voted_estimate()?))
    }
}
