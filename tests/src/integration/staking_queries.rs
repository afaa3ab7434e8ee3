//! # Staking Query Integration
//!
//! Seeds a snapshot store with qc-18 genesis, then reads it back through a
//! qc-19 staking dispatcher registered with the published query codes.
//!
//! ## Flow Tested
//!
//! 1. **Genesis (18) → Snapshot store**: candidates, power keys and validator
//!    queues written in one batch
//! 2. **Snapshot store → Dispatch (19)**: RLP call envelopes routed to query
//!    handlers that decode the seeded records
//! 3. **Gating**: a non-PPoS genesis leaves nothing to query

#[cfg(test)]
mod tests {
    use k256::elliptic_curve::sec1::ToEncodedPoint;
    use k256::SecretKey;
    use qc_18_ppos_genesis::domain::keys;
    use qc_18_ppos_genesis::{
        decode_list, encode_list, AccountState, AddressDeriver, Candidate, EconomicModel,
        Genesis, GenesisOutcome, GenesisParams, GenesisStateBuilder, GenesisSummary,
        InMemoryAccountState, InMemoryRestrictingLedger, InMemorySnapshotStore, InitialNode,
        Secp256k1AddressDeriver, SnapshotStore, StoreError, ValArrIndex, ValidatorMode,
        ValidatorQueue,
    };
    use qc_19_ppos_dispatch::codes::staking;
    use qc_19_ppos_dispatch::{CallInput, ContractDispatcher, DispatchError};
    use shared_types::{Address, BlsPublicKey, NodeId, STAKING_CONTRACT, U256};
    use thiserror::Error;

    // =============================================================================
    // STAKING QUERY CONTRACT
    // =============================================================================

    #[derive(Debug, Error)]
    enum QueryError {
        #[error("{0} not found")]
        NotFound(&'static str),
        #[error("corrupt {what}: {reason}")]
        Corrupt { what: &'static str, reason: String },
        #[error(transparent)]
        Store(#[from] StoreError),
    }

    /// Read-only view over a seeded snapshot store.
    struct StakingView {
        snapshot: InMemorySnapshotStore,
    }

    impl StakingView {
        fn read(&self, key: &[u8], what: &'static str) -> Result<Vec<u8>, QueryError> {
            self.snapshot
                .get_base(key)?
                .ok_or(QueryError::NotFound(what))
        }

        /// Latest non-placeholder range recorded under `index_key`.
        fn current_range(
            &self,
            index_key: &[u8],
            what: &'static str,
        ) -> Result<ValArrIndex, QueryError> {
            let bytes = self.read(index_key, what)?;
            let indexes: Vec<ValArrIndex> =
                decode_list(&bytes).map_err(|e| QueryError::Corrupt {
                    what,
                    reason: e.to_string(),
                })?;
            indexes
                .into_iter()
                .rev()
                .find(|index| !index.is_placeholder())
                .ok_or(QueryError::NotFound(what))
        }
    }

    fn get_verifier_list(ctx: &mut StakingView, _: ()) -> Result<Vec<u8>, QueryError> {
        let range = ctx.current_range(keys::EPOCH_INDEX_KEY, "epoch index")?;
        ctx.read(
            &keys::epoch_val_arr_key(range.start, range.end),
            "epoch validators",
        )
    }

    fn get_validator_list(ctx: &mut StakingView, _: ()) -> Result<Vec<u8>, QueryError> {
        let range = ctx.current_range(keys::ROUND_INDEX_KEY, "round index")?;
        ctx.read(
            &keys::round_val_arr_key(range.start, range.end),
            "round validators",
        )
    }

    fn get_candidate_list(ctx: &mut StakingView, _: ()) -> Result<Vec<u8>, QueryError> {
        let candidates = ctx
            .snapshot
            .prefix_scan(keys::CANDIDATE_KEY_PREFIX)
            .into_iter()
            .map(|(_, value)| {
                rlp::decode::<Candidate>(&value).map_err(|e| QueryError::Corrupt {
                    what: "candidate",
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(encode_list(&candidates))
    }

    fn get_candidate_info(
        ctx: &mut StakingView,
        (node_address,): (Address,),
    ) -> Result<Vec<u8>, QueryError> {
        ctx.read(&keys::candidate_key(&node_address), "candidate")
    }

    fn staking_queries() -> ContractDispatcher<StakingView, QueryError> {
        let mut d = ContractDispatcher::new("staking");
        d.register(staking::GET_VERIFIER_LIST, "getVerifierList", get_verifier_list)
            .unwrap();
        d.register(staking::GET_VALIDATOR_LIST, "getValidatorList", get_validator_list)
            .unwrap();
        d.register(staking::GET_CANDIDATE_LIST, "getCandidateList", get_candidate_list)
            .unwrap();
        d.register(staking::GET_CANDIDATE_INFO, "getCandidateInfo", get_candidate_info)
            .unwrap();
        d
    }

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn node_id(seed: u8) -> NodeId {
        let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
        let point = secret.public_key().to_encoded_point(false);
        NodeId::from_slice(&point.as_bytes()[1..]).unwrap()
    }

    fn initial_nodes(count: u8) -> Vec<InitialNode> {
        (1..=count)
            .map(|seed| InitialNode {
                node_id: node_id(seed),
                bls_pub_key: BlsPublicKey::new([seed; 96]),
            })
            .collect()
    }

    fn address_of(node: &InitialNode) -> Address {
        Secp256k1AddressDeriver.node_address(&node.node_id).unwrap()
    }

    struct Seeded {
        view: StakingView,
        state: InMemoryAccountState,
        outcome: GenesisOutcome,
    }

    fn seed(genesis: &Genesis, committee: u64) -> anyhow::Result<Seeded> {
        init_tracing();
        let model = EconomicModel {
            cons_validator_num: committee,
            ..Default::default()
        };
        let params = GenesisParams {
            program_version: 0x0001_0000,
            genesis_reward: U256::from(9_000_000u64) * U256::exp10(18),
            genesis_issue: U256::from(10_250_000_000u64) * U256::exp10(18),
        };
        let mut snapshot = InMemorySnapshotStore::new();
        let mut state = InMemoryAccountState::new();
        let mut ledger = InMemoryRestrictingLedger::new();

        let outcome = GenesisStateBuilder::new(genesis, &model, params, &Secp256k1AddressDeriver)
            .build(&mut snapshot, &mut state, &mut ledger)?;
        Ok(Seeded {
            view: StakingView { snapshot },
            state,
            outcome,
        })
    }

    fn summary(seeded: &Seeded) -> &GenesisSummary {
        match &seeded.outcome {
            GenesisOutcome::Built(summary) => summary,
            GenesisOutcome::Skipped(reason) => panic!("unexpected skip: {reason}"),
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: GENESIS → STAKING QUERIES
    // =============================================================================

    #[test]
    fn test_candidate_info_for_every_genesis_node() -> anyhow::Result<()> {
        let nodes = initial_nodes(4);
        let mut seeded = seed(&Genesis::ppos(100, nodes.clone()), 25)?;
        let d = staking_queries();

        for (i, node) in nodes.iter().enumerate() {
            let input = CallInput::new(staking::GET_CANDIDATE_INFO)
                .arg(&address_of(node))
                .to_bytes();
            let bytes = d.execute(&mut seeded.view, &input)?;
            let candidate: Candidate = rlp::decode(&bytes)?;

            assert_eq!(candidate.node_id, node.node_id);
            assert_eq!(candidate.staking_tx_index, i as u32 + 1);
            assert_eq!(candidate.shares, EconomicModel::default().stake_threshold);
        }
        Ok(())
    }

    #[test]
    fn test_verifier_and_validator_lists_agree() -> anyhow::Result<()> {
        let nodes = initial_nodes(5);
        let mut seeded = seed(&Genesis::ppos(100, nodes.clone()), 3)?;
        let d = staking_queries();

        let verifiers: ValidatorQueue = decode_list(&d.execute(
            &mut seeded.view,
            &CallInput::new(staking::GET_VERIFIER_LIST).to_bytes(),
        )?)?;
        let validators: ValidatorQueue = decode_list(&d.execute(
            &mut seeded.view,
            &CallInput::new(staking::GET_VALIDATOR_LIST).to_bytes(),
        )?)?;

        assert_eq!(verifiers, validators);
        let listed: Vec<Address> = verifiers.iter().map(|v| v.node_address).collect();
        let expected: Vec<Address> = nodes.iter().take(3).map(address_of).collect();
        assert_eq!(listed, expected);
        assert_eq!(summary(&seeded).validators, verifiers);
        Ok(())
    }

    #[test]
    fn test_candidate_list_holds_only_seeded_nodes() -> anyhow::Result<()> {
        let nodes = initial_nodes(5);
        let mut seeded = seed(&Genesis::ppos(100, nodes.clone()), 3)?;
        let d = staking_queries();

        let candidates: Vec<Candidate> = decode_list(&d.execute(
            &mut seeded.view,
            &CallInput::new(staking::GET_CANDIDATE_LIST).to_bytes(),
        )?)?;
        assert_eq!(candidates.len(), summary(&seeded).candidate_count);
        assert!(candidates
            .iter()
            .all(|c| nodes[..3].iter().any(|n| n.node_id == c.node_id)));

        // Truncated nodes were never seeded
        let input = CallInput::new(staking::GET_CANDIDATE_INFO)
            .arg(&address_of(&nodes[4]))
            .to_bytes();
        assert!(matches!(
            d.execute(&mut seeded.view, &input),
            Err(DispatchError::Handler(QueryError::NotFound("candidate")))
        ));
        Ok(())
    }

    #[test]
    fn test_ppos_hash_visible_in_account_state() -> anyhow::Result<()> {
        let seeded = seed(&Genesis::ppos(100, initial_nodes(2)), 25)?;
        let stored = seeded
            .state
            .get_state(STAKING_CONTRACT, keys::PPOS_HASH_KEY)?
            .expect("PPOSHASH seeded");
        assert_eq!(stored, summary(&seeded).ppos_hash.to_vec());
        Ok(())
    }

    #[test]
    fn test_mutating_codes_are_not_served() -> anyhow::Result<()> {
        let mut seeded = seed(&Genesis::ppos(100, initial_nodes(1)), 25)?;
        let d = staking_queries();
        let before = seeded.view.snapshot.write_count();

        let input = CallInput::new(staking::CREATE_STAKING)
            .arg(&node_id(1))
            .to_bytes();
        assert!(matches!(
            d.execute(&mut seeded.view, &input),
            Err(DispatchError::FunctionCodeUnknown(staking::CREATE_STAKING))
        ));
        assert_eq!(seeded.view.snapshot.write_count(), before);
        Ok(())
    }

    #[test]
    fn test_static_genesis_leaves_nothing_to_query() -> anyhow::Result<()> {
        let mut genesis = Genesis::ppos(100, initial_nodes(3));
        if let Some(cbft) = genesis.config.as_mut().and_then(|c| c.cbft.as_mut()) {
            cbft.validator_mode = ValidatorMode::Static;
        }
        let mut seeded = seed(&genesis, 25)?;
        assert!(seeded.outcome.is_skipped());

        let d = staking_queries();
        assert!(matches!(
            d.execute(
                &mut seeded.view,
                &CallInput::new(staking::GET_VERIFIER_LIST).to_bytes()
            ),
            Err(DispatchError::Handler(QueryError::NotFound("epoch index")))
        ));
        Ok(())
    }
}
