use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use knizk::{Knizk, KnizkConfig, Prover, ScryptParams, SecureRng, Verifier};

fn bench_knizk() -> Knizk {
    Knizk::new(KnizkConfig {
        scrypt: ScryptParams::new(1024, 8, 1, 32).unwrap(),
        ..KnizkConfig::default()
    })
    .unwrap()
}

fn bench_key_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_derivation");
    group.sample_size(10);

    let default = Knizk::default();
    group.bench_function("scrypt_n32768", |b| {
        b.iter(|| default.credential_from_secret(black_box("secrets are good")).unwrap())
    });

    let fast = bench_knizk();
    group.bench_function("scrypt_n1024", |b| {
        b.iter(|| fast.credential_from_secret(black_box("secrets are good")).unwrap())
    });

    group.finish();
}

fn bench_proof_generation(c: &mut Criterion) {
    let knizk = bench_knizk();
    let credential = knizk.credential_from_secret("secrets are good").unwrap();
    let challenge = knizk.challenge_from_credential(&credential).unwrap();

    // Witness derivation excluded: measures the Schnorr step alone.
    let witness = challenge.keyfn().derive_witness(b"secrets are good").unwrap();
    let prover = Prover::with_witness(&challenge, witness);
    let mut rng = SecureRng::new();

    c.bench_function("knizk_proof_generation", |b| {
        b.iter(|| prover.prove(black_box(&mut rng)).unwrap())
    });
}

fn bench_proof_verification(c: &mut Criterion) {
    let knizk = bench_knizk();
    let credential = knizk.credential_from_secret("secrets are good").unwrap();
    let challenge = knizk.challenge_from_credential(&credential).unwrap();
    let proof = knizk
        .proof_from_secret_and_challenge("secrets are good", &challenge)
        .unwrap();

    c.bench_function("knizk_proof_verification", |b| {
        b.iter(|| {
            Verifier::new(&challenge)
                .verify_response(black_box(&proof))
                .unwrap()
        })
    });
}

fn bench_proof_serialization(c: &mut Criterion) {
    let knizk = bench_knizk();
    let verified = knizk.verifiable_from_secret("secrets are good").unwrap();
    let proof = verified.proof();

    c.bench_function("proof_to_json", |b| b.iter(|| black_box(&proof).to_json().unwrap()));

    let json = proof.to_json().unwrap();
    c.bench_function("proof_from_json", |b| {
        b.iter(|| knizk::Proof::from_json(black_box(&json)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_proof_generation,
    bench_proof_verification,
    bench_proof_serialization
);
criterion_main!(benches);
