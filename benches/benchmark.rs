use criterion::{criterion_group, criterion_main, Criterion};
use ntskem::traits::{Decaps, Encaps, KeyGen};
use ntskem::{nts_kem_12_64, nts_kem_13_136, nts_kem_13_80};
use rand_chacha::rand_core::SeedableRng;


pub fn criterion_benchmark(c: &mut Criterion) {
    // Key generation consumes bit-granular randomness, so the benches drive
    // everything from a fixed-seed stream cipher rather than the OS.
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0xB3);
    let (pk_12_64, sk_12_64) = nts_kem_12_64::KG::try_keygen_with_rng(&mut rng).unwrap();
    let (_, ct_12_64) = pk_12_64.try_encaps_with_rng(&mut rng).unwrap();
    let (pk_13_80, sk_13_80) = nts_kem_13_80::KG::try_keygen_with_rng(&mut rng).unwrap();
    let (_, ct_13_80) = pk_13_80.try_encaps_with_rng(&mut rng).unwrap();
    let (pk_13_136, sk_13_136) = nts_kem_13_136::KG::try_keygen_with_rng(&mut rng).unwrap();
    let (_, ct_13_136) = pk_13_136.try_encaps_with_rng(&mut rng).unwrap();

    c.bench_function("nts_kem_12_64  KeyGen", |b| {
        b.iter(|| nts_kem_12_64::KG::try_keygen_with_rng(&mut rng))
    });
    c.bench_function("nts_kem_13_80  KeyGen", |b| {
        b.iter(|| nts_kem_13_80::KG::try_keygen_with_rng(&mut rng))
    });
    c.bench_function("nts_kem_13_136 KeyGen", |b| {
        b.iter(|| nts_kem_13_136::KG::try_keygen_with_rng(&mut rng))
    });

    c.bench_function("nts_kem_12_64  Encaps", |b| {
        b.iter(|| pk_12_64.try_encaps_with_rng(&mut rng))
    });
    c.bench_function("nts_kem_13_80  Encaps", |b| {
        b.iter(|| pk_13_80.try_encaps_with_rng(&mut rng))
    });
    c.bench_function("nts_kem_13_136 Encaps", |b| {
        b.iter(|| pk_13_136.try_encaps_with_rng(&mut rng))
    });

    c.bench_function("nts_kem_12_64  Decaps", |b| b.iter(|| sk_12_64.try_decaps(&ct_12_64)));
    c.bench_function("nts_kem_13_80  Decaps", |b| b.iter(|| sk_13_80.try_decaps(&ct_13_80)));
    c.bench_function("nts_kem_13_136 Decaps", |b| b.iter(|| sk_13_136.try_decaps(&ct_13_136)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
