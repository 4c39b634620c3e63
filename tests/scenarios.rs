use price_estimation_round_machine::config::CommitteeConfig;
use price_estimation_round_machine::{Payload, PayloadContent, PeriodDriver, RoundId};

fn driver() -> PeriodDriver {
    let params = CommitteeConfig::default().into_params().unwrap();
    PeriodDriver::new(params)
}

fn payload(sender: &str, content: PayloadContent) -> Payload {
    Payload::new(sender, content)
}

fn run_to_deploy_safe(driver: &mut PeriodDriver) {
    for sender in ["A", "B", "C", "D"] {
        driver.apply(payload(sender, PayloadContent::Registration));
    }
    assert!(driver.end_block());

    for sender in ["A", "B", "C", "D"] {
        driver.apply(payload(sender, PayloadContent::Randomness { value: "0xabcd".to_string() }));
    }
    assert!(driver.end_block());

    for sender in ["A", "B", "C", "D"] {
        driver.apply(payload(sender, PayloadContent::SelectKeeper { keeper: "A".into() }));
    }
    assert!(driver.end_block());
    assert_eq!(driver.current_round_id(), RoundId::DeploySafe);
}

/// Scenario 1: happy path to `DeploySafe`.
#[test]
fn happy_path_to_deploy_safe() {
    let mut driver = driver();
    run_to_deploy_safe(&mut driver);

    driver.apply(payload("A", PayloadContent::DeploySafe { safe_address: "0xSAFE".into() }));
    assert!(driver.end_block());
    assert_eq!(driver.current_round_id(), RoundId::ValidateSafe);
    assert_eq!(driver.period_state().safe_contract_address().unwrap(), "0xSAFE".into());
    assert_eq!(driver.period_state().most_voted_randomness().unwrap().as_ref(), "0xabcd");
    assert_eq!(driver.period_state().most_voted_keeper_address().unwrap(), "A".into());
}

/// Scenario 2: plurality with tie-break, extended to 5 participants.
#[test]
fn plurality_with_tie_break_needs_a_fifth_vote() {
    // max_participants is 4 by default; extend the committee to 5 for this scenario.
    let params = price_estimation_round_machine::ConsensusParams::new(5, 3);
    let mut driver = PeriodDriver::new(params);
    for sender in ["A", "B", "C", "D", "E"] {
        driver.apply(payload(sender, PayloadContent::Registration));
    }
    assert!(driver.end_block());

    for (sender, value) in [("A", "0x01"), ("B", "0x02"), ("C", "0x01"), ("D", "0x02")] {
        driver.apply(payload(sender, PayloadContent::Randomness { value: value.to_string() }));
    }
    // no winner yet: both "0x01" and "0x02" sit at 2 votes, below threshold 3.
    assert!(!driver.end_block());
    assert_eq!(driver.current_round_id(), RoundId::Randomness);

    // a duplicate retry from A is dropped, quorum still not reached.
    driver.apply(payload("A", PayloadContent::Randomness { value: "0x01".to_string() }));
    assert!(!driver.end_block());

    driver.apply(payload("E", PayloadContent::Randomness { value: "0x01".to_string() }));
    assert!(driver.end_block());
    assert_eq!(driver.period_state().most_voted_randomness().unwrap().as_ref(), "0x01");
}

/// Scenario 3: negative validate path does not persist votes.
#[test]
fn negative_validate_path_discards_votes_and_goes_back_to_select_keeper_a() {
    let mut driver = driver();
    run_to_deploy_safe(&mut driver);
    driver.apply(payload("A", PayloadContent::DeploySafe { safe_address: "0xSAFE".into() }));
    driver.end_block();
    assert_eq!(driver.current_round_id(), RoundId::ValidateSafe);

    for sender in ["A", "B", "C"] {
        driver.apply(payload(sender, PayloadContent::Validate { vote: false }));
    }
    assert!(driver.end_block());
    assert_eq!(driver.current_round_id(), RoundId::SelectKeeperA);
    assert!(driver.period_state().participant_to_votes().is_err());
    // the Safe address survives: it was written before the failed validation attempt.
    assert_eq!(driver.period_state().safe_contract_address().unwrap(), "0xSAFE".into());
}

/// Scenario 4: keeper-only enforcement in `DeploySafe`.
#[test]
fn deploy_safe_is_keeper_only() {
    let mut driver = driver();
    run_to_deploy_safe(&mut driver);

    driver.apply(payload("B", PayloadContent::DeploySafe { safe_address: "0xBAD".into() }));
    assert!(!driver.end_block());
    assert_eq!(driver.admitted_count(), 0);

    driver.apply(payload("A", PayloadContent::DeploySafe { safe_address: "0xSAFE".into() }));
    driver.apply(payload("A", PayloadContent::DeploySafe { safe_address: "0xOTHER".into() }));
    assert!(driver.end_block());
    assert_eq!(driver.period_state().safe_contract_address().unwrap(), "0xSAFE".into());
}

/// Scenario 5: observation aggregation via median, plus the bit-exact encoding.
#[test]
fn observation_round_aggregates_via_median_and_encodes_exactly() {
    let mut driver = driver();
    run_to_deploy_safe(&mut driver);
    driver.apply(payload("A", PayloadContent::DeploySafe { safe_address: "0xSAFE".into() }));
    driver.end_block();
    for sender in ["A", "B", "C"] {
        driver.apply(payload(sender, PayloadContent::Validate { vote: true }));
    }
    driver.end_block();
    assert_eq!(driver.current_round_id(), RoundId::CollectObservation);

    for (sender, observation) in [("A", 100.0), ("B", 101.0), ("C", 99.0), ("D", 100.5)] {
        driver.apply(payload(sender, PayloadContent::Observation { observation }));
    }
    assert!(driver.end_block());
    let estimate = driver.period_state().estimate().unwrap();
    assert_eq!(estimate, 100.25);
    assert_eq!(
        price_estimation_round_machine::types::encode_float(estimate),
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x12, 0x59, 0x40]
    );
}

/// Scenario 6: `ConsensusReached` is terminal and drops everything.
#[test]
fn consensus_reached_is_a_terminal_fixed_point() {
    let mut round = price_estimation_round_machine::Round::consensus_reached();
    let state = price_estimation_round_machine::PeriodState::default();
    let params = price_estimation_round_machine::ConsensusParams::new(4, 3);

    assert!(round.end_block(&state, &params).is_none());
    round.apply(payload("A", PayloadContent::Registration), &state);
    assert!(round.end_block(&state, &params).is_none());
    assert_eq!(round.round_id(), RoundId::ConsensusReached);
}

/// Full period: registration through to `ConsensusReached`, exercising every round.
#[test]
fn full_period_reaches_consensus() {
    let mut driver = driver();
    run_to_deploy_safe(&mut driver);

    driver.apply(payload("A", PayloadContent::DeploySafe { safe_address: "0xSAFE".into() }));
    driver.end_block();

    for sender in ["A", "B", "C"] {
        driver.apply(payload(sender, PayloadContent::Validate { vote: true }));
    }
    driver.end_block();
    assert_eq!(driver.current_round_id(), RoundId::CollectObservation);

    for (sender, observation) in [("A", 100.0), ("B", 101.0), ("C", 99.0), ("D", 100.5)] {
        driver.apply(payload(sender, PayloadContent::Observation { observation }));
    }
    driver.end_block();
    assert_eq!(driver.current_round_id(), RoundId::EstimateConsensus);

    for sender in ["A", "B", "C", "D"] {
        driver.apply(payload(sender, PayloadContent::Estimate { estimate: 100.25 }));
    }
    driver.end_block();
    assert_eq!(driver.current_round_id(), RoundId::TxHash);

    for sender in ["A", "B", "C", "D"] {
        driver.apply(payload(sender, PayloadContent::TransactionHash { tx_hash: "0xTX".to_string() }));
    }
    driver.end_block();
    assert_eq!(driver.current_round_id(), RoundId::CollectSignature);

    for sender in ["A", "B", "C", "D"] {
        driver.apply(payload(sender, PayloadContent::Signature { signature: vec![sender.as_bytes()[0]] }));
    }
    driver.end_block();
    assert_eq!(driver.current_round_id(), RoundId::Finalization);

    driver.apply(payload("A", PayloadContent::FinalizationTx { tx_hash: "0xFINAL".to_string() }));
    driver.end_block();
    assert_eq!(driver.current_round_id(), RoundId::ValidateTransaction);

    for sender in ["A", "B", "C"] {
        driver.apply(payload(sender, PayloadContent::Validate { vote: true }));
    }
    assert!(driver.end_block());
    assert_eq!(driver.current_round_id(), RoundId::ConsensusReached);
    assert_eq!(driver.period_state().final_tx_hash().unwrap().as_ref(), "0xFINAL");

    // terminal: further payloads and end_block calls do nothing.
    driver.apply(payload("A", PayloadContent::Registration));
    assert!(!driver.end_block());
}

/// The negative path through `ValidateTransaction` re-elects a keeper via
/// `SelectKeeperB` rather than `SelectKeeperA`.
#[test]
fn negative_validate_transaction_goes_to_select_keeper_b() {
    let mut driver = driver();
    run_to_deploy_safe(&mut driver);
    driver.apply(payload("A", PayloadContent::DeploySafe { safe_address: "0xSAFE".into() }));
    driver.end_block();
    for sender in ["A", "B", "C"] {
        driver.apply(payload(sender, PayloadContent::Validate { vote: true }));
    }
    driver.end_block();
    for (sender, observation) in [("A", 100.0), ("B", 101.0), ("C", 99.0), ("D", 100.5)] {
        driver.apply(payload(sender, PayloadContent::Observation { observation }));
    }
    driver.end_block();
    for sender in ["A", "B", "C", "D"] {
        driver.apply(payload(sender, PayloadContent::Estimate { estimate: 100.25 }));
    }
    driver.end_block();
    for sender in ["A", "B", "C", "D"] {
        driver.apply(payload(sender, PayloadContent::TransactionHash { tx_hash: "0xTX".to_string() }));
    }
    driver.end_block();
    for sender in ["A", "B", "C", "D"] {
        driver.apply(payload(sender, PayloadContent::Signature { signature: vec![1] }));
    }
    driver.end_block();
    driver.apply(payload("A", PayloadContent::FinalizationTx { tx_hash: "0xFINAL".to_string() }));
    driver.end_block();
    assert_eq!(driver.current_round_id(), RoundId::ValidateTransaction);

    for sender in ["A", "B", "C"] {
        driver.apply(payload(sender, PayloadContent::Validate { vote: false }));
    }
    assert!(driver.end_block());
    assert_eq!(driver.current_round_id(), RoundId::SelectKeeperB);
}
