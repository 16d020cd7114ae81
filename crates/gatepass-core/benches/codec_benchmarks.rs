//! Performance benchmarks for gatepass-core.
//!
//! Run with: cargo bench -p gatepass-core

use std::time::Duration;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gatepass_core::token::{SigningSecret, TokenCodec};
use gatepass_core::{AccessGate, IdentityRecord};
use jsonwebtoken::Algorithm;

fn codec() -> TokenCodec {
    TokenCodec::new(
        &SigningSecret::generate(),
        Algorithm::HS256,
        Duration::from_secs(86400),
    )
    .unwrap()
}

/// Benchmark token issuance.
fn bench_issue(c: &mut Criterion) {
    let codec = codec();
    let record = IdentityRecord::new(1, "admin", "password", "admin").unwrap();
    let now = Utc::now();

    c.bench_function("token_issue", |b| {
        b.iter(|| codec.issue(black_box(&record), now).unwrap());
    });
}

/// Benchmark token verification, valid and tampered.
fn bench_verify(c: &mut Criterion) {
    let codec = codec();
    let record = IdentityRecord::new(1, "admin", "password", "admin").unwrap();
    let now = Utc::now();
    let (token, _) = codec.issue(&record, now).unwrap();
    let mut tampered = token.clone();
    tampered.pop();
    tampered.push(if token.ends_with('A') { 'Q' } else { 'A' });

    let mut group = c.benchmark_group("token_verify");
    group.bench_function("valid", |b| {
        b.iter(|| codec.verify(black_box(&token), now).unwrap());
    });
    group.bench_function("bad_signature", |b| {
        b.iter(|| codec.verify(black_box(&tampered), now).unwrap_err());
    });
    group.finish();
}

/// Benchmark the full header-to-claims path.
fn bench_gate(c: &mut Criterion) {
    let codec = std::sync::Arc::new(codec());
    let record = IdentityRecord::new(1, "admin", "password", "admin").unwrap();
    let now = Utc::now();
    let (token, _) = codec.issue(&record, now).unwrap();
    let header = format!("Bearer {token}");
    let gate = AccessGate::new(codec);

    c.bench_function("gate_check", |b| {
        b.iter(|| gate.check(black_box(Some(header.as_str())), now).unwrap());
    });
}

criterion_group!(benches, bench_issue, bench_verify, bench_gate);
criterion_main!(benches);
