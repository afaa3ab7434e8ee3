//! # Quantum-Chain PPoS Benchmarks
//!
//! | Crate | Operation | Scales with |
//! |-------|-----------|-------------|
//! | qc-18 PPoS Genesis | Full genesis build | seeded node count |
//! | qc-18 PPoS Genesis | PPoS hash fold | write count |
//! | qc-19 PPoS Dispatch | Envelope parse + typed decode | argument count |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use qc_18_ppos_genesis::{
    fold_kv_hash, EconomicModel, Genesis, GenesisParams, GenesisStateBuilder,
    InMemoryAccountState, InMemoryRestrictingLedger, InMemorySnapshotStore, InitialNode,
    Secp256k1AddressDeriver,
};
use qc_19_ppos_dispatch::{CallInput, ContractDispatcher};
use shared_types::{BlsPublicKey, NodeId, U256, ZERO_HASH};
use std::time::Duration;

fn initial_nodes(count: usize) -> Vec<InitialNode> {
    (1..=count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[24..].copy_from_slice(&(i as u64).to_be_bytes());
            let secret = SecretKey::from_slice(&seed).expect("valid scalar");
            let point = secret.public_key().to_encoded_point(false);
            InitialNode {
                node_id: NodeId::from_slice(&point.as_bytes()[1..]).expect("64-byte id"),
                bls_pub_key: BlsPublicKey::new([i as u8; 96]),
            }
        })
        .collect()
}

// ============================================================================
// QC-18: Genesis Build
// ============================================================================

fn bench_genesis_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-ppos-genesis");
    group.measurement_time(Duration::from_secs(10));

    let params = GenesisParams {
        program_version: 0x0001_0000,
        genesis_reward: U256::from(9_000_000u64) * U256::exp10(18),
        genesis_issue: U256::from(10_250_000_000u64) * U256::exp10(18),
    };

    for size in [4usize, 25, 101] {
        let genesis = Genesis::ppos(100, initial_nodes(size));
        let model = EconomicModel {
            cons_validator_num: size as u64,
            ..Default::default()
        };

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &size, |b, _| {
            b.iter(|| {
                let mut snapshot = InMemorySnapshotStore::new();
                let mut state = InMemoryAccountState::new();
                let mut ledger = InMemoryRestrictingLedger::new();
                let outcome =
                    GenesisStateBuilder::new(&genesis, &model, params, &Secp256k1AddressDeriver)
                        .build(&mut snapshot, &mut state, &mut ledger);
                black_box(outcome)
            })
        });
    }

    group.finish();
}

fn bench_hash_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-ppos-hash");

    for writes in [10usize, 100, 1000] {
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = (0..writes)
            .map(|i| (format!("Can{i:020}").into_bytes(), vec![0xAB; 256]))
            .collect();

        group.throughput(Throughput::Elements(writes as u64));
        group.bench_with_input(BenchmarkId::new("fold", writes), &pairs, |b, pairs| {
            b.iter(|| {
                pairs.iter().fold(ZERO_HASH, |acc, (key, value)| {
                    fold_kv_hash(black_box(key), black_box(value), &acc)
                })
            })
        });
    }

    group.finish();
}

// ============================================================================
// QC-19: Dispatch
// ============================================================================

fn sum(_: &mut (), args: (u64, u64, u64, u64, u64, u64, u64, u64)) -> Result<Vec<u8>, String> {
    let total = args.0 + args.1 + args.2 + args.3 + args.4 + args.5 + args.6 + args.7;
    Ok(rlp::encode(&total).to_vec())
}

fn ping(_: &mut (), _: ()) -> Result<Vec<u8>, String> {
    Ok(Vec::new())
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-19-ppos-dispatch");

    let dispatcher: ContractDispatcher<(), String> = ContractDispatcher::new("bench")
        .with(1100, "ping", ping)
        .and_then(|d| d.with(1000, "sum", sum))
        .expect("distinct codes");

    let ping_input = CallInput::new(1100).to_bytes();
    let sum_input = (1u64..=8)
        .fold(CallInput::new(1000), |call, i| call.arg(&i))
        .to_bytes();

    group.bench_function("no_args", |b| {
        b.iter(|| black_box(dispatcher.execute(&mut (), black_box(&ping_input))))
    });
    group.bench_function("eight_args", |b| {
        b.iter(|| black_box(dispatcher.execute(&mut (), black_box(&sum_input))))
    });

    group.finish();
}

criterion_group!(genesis_benches, bench_genesis_build, bench_hash_fold);
criterion_group!(dispatch_benches, bench_dispatch);
criterion_main!(genesis_benches, dispatch_benches);
