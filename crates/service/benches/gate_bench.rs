use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use models::PersonInput;
use service::auth::{CredentialGate, ExpectedCredentials};
use service::repository::{InMemoryPersonRepository, PersonRepository};

fn bench_gate(c: &mut Criterion) {
    let gate = CredentialGate::new(Some(ExpectedCredentials { username: "admin".into(), password: "password123".into() }));
    let good = format!("Basic {}", STANDARD.encode("admin:password123"));
    let bad = format!("Basic {}", STANDARD.encode("admin:password124"));

    c.bench_function("gate_accept", |b| {
        b.iter(|| gate.authorize(Some(good.as_bytes())).unwrap());
    });
    c.bench_function("gate_reject", |b| {
        b.iter(|| gate.authorize(Some(bad.as_bytes())).unwrap_err());
    });
}

fn bench_in_memory_create(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = Arc::new(InMemoryPersonRepository::new());

    c.bench_function("in_memory_create", |b| {
        b.iter(|| rt.block_on(repo.create(PersonInput::new("Bench", 42))).unwrap());
    });
}

criterion_group!(benches, bench_gate, bench_in_memory_create);
criterion_main!(benches);
