use log::info;

use crate::consensus::params::ConsensusParams;
use crate::consensus::period_state::PeriodState;
use crate::consensus::round::RoundId;
use crate::consensus::rounds::Round;
use crate::types::Payload;

/// Feeds payloads into the current round and, at block-commit boundaries, advances to
/// whichever round the current one names next. This is the only mutable, stateful
/// object in the crate; everything it owns (`Round`, `PeriodState`) is otherwise
/// immutable/replace-by-value.
pub struct PeriodDriver {
    round: Round,
    state: PeriodState,
    params: ConsensusParams,
}

impl PeriodDriver {
    pub fn new(params: ConsensusParams) -> Self {
        Self {
            round: Round::registration(),
            state: PeriodState::default(),
            params,
        }
    }

    pub fn current_round_id(&self) -> RoundId {
        self.round.round_id()
    }

    pub fn admitted_count(&self) -> usize {
        self.round.admitted_count()
    }

    pub fn period_state(&self) -> &PeriodState {
        &self.state
    }

    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    /// Admit-or-drop a single payload into the current round. No-op once the period
    /// has reached `ConsensusReached`.
    pub fn apply(&mut self, payload: Payload) {
        self.round.apply(payload, &self.state);
    }

    /// Invoked once per committed block boundary. If the current round's threshold
    /// has been reached, installs the new period state and round it returns and
    /// logs the transition; otherwise leaves the driver untouched.
    pub fn end_block(&mut self) -> bool {
        match self.round.end_block(&self.state, &self.params) {
            Some((new_state, new_round)) => {
                info!("{} -> {}", self.round.round_id(), new_round.round_id());
                self.state = new_state;
                self.round = new_round;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PayloadContent;

    fn params() -> ConsensusParams {
        ConsensusParams::new(4, 3)
    }

    fn payload(sender: &str, content: PayloadContent) -> Payload {
        Payload::new(sender, content)
    }

    fn register_all(driver: &mut PeriodDriver, senders: &[&str]) {
        for sender in senders {
            driver.apply(payload(sender, PayloadContent::Registration));
        }
        assert!(driver.end_block());
        assert_eq!(driver.current_round_id(), RoundId::Randomness);
    }

    #[test]
    fn happy_path_reaches_deploy_safe() {
        let mut driver = PeriodDriver::new(params());
        register_all(&mut driver, &["a", "b", "c", "d"]);

        for sender in ["a", "b", "c", "d"] {
            driver.apply(payload(
                sender,
                PayloadContent::Randomness { value: "0xabcd".to_string() },
            ));
        }
        assert!(driver.end_block());
        assert_eq!(driver.current_round_id(), RoundId::SelectKeeperA);
        assert_eq!(driver.period_state().most_voted_randomness().unwrap().as_ref(), "0xabcd");

        for sender in ["a", "b", "c", "d"] {
            driver.apply(payload(
                sender,
                PayloadContent::SelectKeeper { keeper: "a".into() },
            ));
        }
        assert!(driver.end_block());
        assert_eq!(driver.current_round_id(), RoundId::DeploySafe);
        assert_eq!(driver.period_state().most_voted_keeper_address().unwrap(), "a".into());

        driver.apply(payload(
            "a",
            PayloadContent::DeploySafe { safe_address: "0xSAFE".into() },
        ));
        assert!(driver.end_block());
        assert_eq!(driver.current_round_id(), RoundId::ValidateSafe);
        assert_eq!(driver.period_state().safe_contract_address().unwrap(), "0xSAFE".into());
    }

    #[test]
    fn negative_validate_does_not_persist_votes_and_reelects_keeper() {
        let mut driver = PeriodDriver::new(params());
        register_all(&mut driver, &["a", "b", "c", "d"]);
        for sender in ["a", "b", "c", "d"] {
            driver.apply(payload(sender, PayloadContent::Randomness { value: "0x01".to_string() }));
        }
        driver.end_block();
        for sender in ["a", "b", "c", "d"] {
            driver.apply(payload(sender, PayloadContent::SelectKeeper { keeper: "a".into() }));
        }
        driver.end_block();
        driver.apply(payload("a", PayloadContent::DeploySafe { safe_address: "0xSAFE".into() }));
        driver.end_block();
        assert_eq!(driver.current_round_id(), RoundId::ValidateSafe);

        for sender in ["a", "b", "c"] {
            driver.apply(payload(sender, PayloadContent::Validate { vote: false }));
        }
        assert!(driver.end_block());
        assert_eq!(driver.current_round_id(), RoundId::SelectKeeperA);
        assert!(driver.period_state().participant_to_votes().is_err());
    }

    #[test]
    fn keeper_only_round_drops_non_keeper_and_duplicate_payloads() {
        let mut driver = PeriodDriver::new(params());
        register_all(&mut driver, &["a", "b", "c", "d"]);
        for sender in ["a", "b", "c", "d"] {
            driver.apply(payload(sender, PayloadContent::Randomness { value: "0x01".to_string() }));
        }
        driver.end_block();
        for sender in ["a", "b", "c", "d"] {
            driver.apply(payload(sender, PayloadContent::SelectKeeper { keeper: "a".into() }));
        }
        driver.end_block();
        assert_eq!(driver.current_round_id(), RoundId::DeploySafe);

        driver.apply(payload("b", PayloadContent::DeploySafe { safe_address: "0xBAD".into() }));
        assert!(!driver.end_block());

        driver.apply(payload("a", PayloadContent::DeploySafe { safe_address: "0xSAFE".into() }));
        driver.apply(payload("a", PayloadContent::DeploySafe { safe_address: "0xOTHER".into() }));
        assert!(driver.end_block());
        assert_eq!(driver.period_state().safe_contract_address().unwrap(), "0xSAFE".into());
    }

    #[test]
    fn terminal_round_never_advances() {
        let mut round = Round::consensus_reached();
        let state = PeriodState::default();
        assert!(round.end_block(&state, &params()).is_none());
        round.apply(payload("a", PayloadContent::Registration), &state);
        assert!(round.end_block(&state, &params()).is_none());
    }
}
