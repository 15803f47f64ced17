//! Criterion benchmarks for DKSAP derivations: channel, blinded secret, one-time key, address.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dksap_core::types::{EphemeralRecord, HashScheme, KeyPair};
use dksap_crypto::encode_address;
use dksap_stealth::{
    create_one_time_key, derive_blinded_secret, derive_sender_id, establish_channel,
    recover_one_time_key, Identity,
};

fn bench_channel(c: &mut Criterion) {
    let view = KeyPair::generate();
    let spend = KeyPair::generate();
    let mut g = c.benchmark_group("channel");
    g.throughput(Throughput::Elements(1));
    g.bench_function("establish_channel", |b| {
        b.iter(|| black_box(establish_channel(&view, spend.public())).unwrap());
    });
    g.finish();
}

fn bench_blinded(c: &mut Criterion) {
    let alice = Identity::generate();
    let bob = Identity::generate();
    let bob_record = EphemeralRecord::generate();
    let channel = alice.establish_channel(bob.spend().public()).unwrap();
    let spend = alice.spend().private().unwrap();

    let mut g = c.benchmark_group("blinded");
    g.throughput(Throughput::Elements(1));
    g.bench_function("derive_blinded_secret", |b| {
        b.iter(|| {
            black_box(derive_blinded_secret(
                &channel,
                spend,
                bob.view().public(),
                bob_record.public(),
            ))
            .unwrap()
        });
    });
    g.finish();
}

fn bench_one_time(c: &mut Criterion) {
    let recipient = Identity::generate();
    let meta = recipient.meta_address();

    let mut g = c.benchmark_group("one_time");
    g.throughput(Throughput::Elements(1));
    for scheme in [HashScheme::Standard, HashScheme::Legacy] {
        let otk = create_one_time_key(&meta, scheme).unwrap();
        let view = recipient.view().private().unwrap();
        g.bench_function(format!("create_{scheme}"), |b| {
            b.iter(|| black_box(create_one_time_key(&meta, scheme)).unwrap());
        });
        g.bench_function(format!("recover_{scheme}"), |b| {
            b.iter(|| {
                black_box(recover_one_time_key(otk.ephemeral_public(), view, &meta.spend, scheme))
                    .unwrap()
            });
        });
    }
    g.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let point = *KeyPair::generate().public();
    let mut g = c.benchmark_group("encoding");
    g.throughput(Throughput::Elements(1));
    for scheme in [HashScheme::Standard, HashScheme::Legacy] {
        g.bench_function(format!("address_{scheme}"), |b| {
            b.iter(|| black_box(encode_address(&point, scheme)));
        });
    }
    g.bench_function("sender_id", |b| {
        b.iter(|| black_box(derive_sender_id(&point, "1700000000", HashScheme::Standard)));
    });
    g.finish();
}

criterion_group!(benches, bench_channel, bench_blinded, bench_one_time, bench_encoding);
criterion_main!(benches);
