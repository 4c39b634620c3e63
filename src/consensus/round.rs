use std::hash::Hash as StdHash;

use indexmap::IndexMap;

use crate::types::Address;

/// Stable round identifiers, used for logs and for the driver's transition log line.
/// Mirrors the `round_id` class attribute convention: one string per round type, with
/// `SelectKeeperA`/`SelectKeeperB` and `ValidateSafe`/`ValidateTransaction` sharing an
/// implementation parameterised by which `RoundId` they were constructed with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoundId {
    Registration,
    Randomness,
    SelectKeeperA,
    SelectKeeperB,
    DeploySafe,
    ValidateSafe,
    CollectObservation,
    EstimateConsensus,
    TxHash,
    CollectSignature,
    Finalization,
    ValidateTransaction,
    ConsensusReached,
}

impl RoundId {
    pub fn as_str(self) -> &'static str {
        match self {
            RoundId::Registration => "registration",
            RoundId::Randomness => "randomness",
            RoundId::SelectKeeperA => "select_keeper_a",
            RoundId::SelectKeeperB => "select_keeper_b",
            RoundId::DeploySafe => "deploy_safe",
            RoundId::ValidateSafe => "validate_safe",
            RoundId::CollectObservation => "collect_observation",
            RoundId::EstimateConsensus => "estimate_consensus",
            RoundId::TxHash => "tx_hash",
            RoundId::CollectSignature => "collect_signature",
            RoundId::Finalization => "finalization",
            RoundId::ValidateTransaction => "validate_transaction",
            RoundId::ConsensusReached => "consensus_reached",
        }
    }
}

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admission rule shared by every non-registration round: `sender` must be a
/// registered participant and must not already have a payload in `map`. Admission is
/// idempotent — calling this twice with the same sender and map state yields the same
/// answer, and a second payload from an already-admitted sender is simply dropped.
pub fn admits<T>(participants: &indexmap::IndexSet<Address>, map: &IndexMap<Address, T>, sender: &Address) -> bool {
    participants.contains(sender) && !map.contains_key(sender)
}

/// `count(map) >= threshold` — the predicate behind `Registration` (against
/// `max_participants`), `CollectObservation` and `CollectSignature` (against
/// `consensus_threshold`).
pub fn count_threshold_reached<T>(map: &IndexMap<Address, T>, threshold: u32) -> bool {
    map.len() as u32 >= threshold
}

/// The plurality winner over `map`, projected through `key_of`: the candidate value
/// with the highest vote count, ties broken by first-seen order (the order `map` was
/// populated in, since `map` is an [`indexmap::IndexMap`]). Returns `None` if no
/// candidate has reached `threshold` votes.
pub fn plurality_winner<T, K, F>(map: &IndexMap<Address, T>, threshold: u32, key_of: F) -> Option<K>
where
    K: StdHash + Eq + Clone,
    F: Fn(&T) -> K,
{
    let mut counts: IndexMap<K, u32> = IndexMap::new();
    for value in map.values() {
        let key = key_of(value);
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut best: Option<(K, u32)> = None;
    for (key, count) in counts {
        match &best {
            Some((_, best_count)) if count <= *best_count => {}
            _ => best = Some((key, count)),
        }
    }
    best.filter(|(_, count)| *count >= threshold).map(|(key, _)| key)
}

/// `true` iff some candidate in `map` has already reached `threshold` votes, without
/// revealing which one (used by `threshold_reached` predicates that don't need the
/// winner, only the yes/no).
pub fn plurality_threshold_reached<T, K, F>(map: &IndexMap<Address, T>, threshold: u32, key_of: F) -> bool
where
    K: StdHash + Eq + Clone,
    F: Fn(&T) -> K,
{
    plurality_winner(map, threshold, key_of).is_some()
}
