use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use seamcheck::comparator::{any, eq};
use seamcheck::{CallArgs, CallCount, EntityId, SharedRegistry, VerifierConfig};

fn make_args(i: u64) -> CallArgs {
    CallArgs::new()
        .arg("id", i)
        .arg("name", format!("user-{}", i % 10))
}

fn bench_record_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_call");
    for &expectations in &[0usize, 4, 16] {
        for (label, config) in [
            ("quiet", VerifierConfig::quiet()),
            ("history", VerifierConfig::default()),
        ] {
            let registry = SharedRegistry::new(config);
            let mock = registry.mock(EntityId::from_raw(1), "Repository");
            for n in 0..expectations {
                mock.expect("update", vec![eq(n as u64), any()], CallCount::AtLeast(0));
            }

            group.bench_with_input(
                BenchmarkId::new(label, expectations),
                &expectations,
                |b, _| {
                    let mut i = 0u64;
                    b.iter(|| {
                        i += 1;
                        mock.record_call("update", black_box(&make_args(i))).unwrap();
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let registry = SharedRegistry::new(VerifierConfig::quiet());
    let mock = registry.mock(EntityId::from_raw(1), "Repository");
    for n in 0..8u64 {
        mock.expect("update", vec![eq(n), any()], CallCount::AtLeast(0));
    }
    for i in 0..1_000 {
        mock.record_call("update", &make_args(i)).unwrap();
    }

    c.bench_function("verify_registered", |b| {
        b.iter(|| black_box(mock.verify("update", CallCount::Exactly(1_000))))
    });
    c.bench_function("verify_unregistered", |b| {
        b.iter(|| black_box(mock.verify("missing", CallCount::Never)))
    });
}

criterion_group!(benches, bench_record_call, bench_verify);
criterion_main!(benches);
