use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::{Duration, Instant},
};
use streamkit::{
    FrozenRegistry, LockRegistry, LockTimeout, Platform, ReadOnlyRegistry, Registry,
    SnapshotRegistry,
};

// Number of registrants per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_ITEMS: usize = 1024;

fn registrants() -> Vec<Arc<Platform>> {
    (0..TOTAL_ITEMS)
        .map(|i| Arc::new(Platform::new(format!("p{i}"), format!("Platform {i}"))))
        .collect()
}

/// Benchmarks filling an empty registry.
fn bench_register<R>(c: &mut Criterion, group_name: &str, registry_factory: impl Fn() -> R)
where
    R: Registry<Platform>,
{
    let items = registrants();
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_ITEMS as u64));

    group.bench_function(format!("register/{TOTAL_ITEMS}"), |b| {
        b.iter_custom(|iters| {
            let mut elapsed = Duration::ZERO;
            for _ in 0..iters {
                let registry = registry_factory();
                let start = Instant::now();
                for item in &items {
                    black_box(registry.register(Arc::clone(item)));
                }
                elapsed += start.elapsed();
            }
            elapsed
        });
    });

    group.finish();
}

/// Benchmarks id lookups against a populated registry.
fn bench_get<R>(c: &mut Criterion, group_name: &str, registry: R)
where
    R: ReadOnlyRegistry<Platform>,
{
    let ids: Vec<String> = (0..TOTAL_ITEMS).map(|i| format!("p{i}")).collect();
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_ITEMS as u64));

    group.bench_function(format!("get/{TOTAL_ITEMS}"), |b| {
        b.iter(|| {
            for id in &ids {
                black_box(registry.get(id));
            }
        });
    });

    group.bench_function("all_registrants", |b| {
        b.iter(|| black_box(registry.all_registrants()));
    });

    group.finish();
}

/// Benchmarks lookups from every core while one thread keeps writing.
fn bench_threaded_reads<R>(c: &mut Criterion, group_name: &str, registry: R)
where
    R: Registry<Platform> + Sync,
{
    let readers = num_cpus::get().saturating_sub(1).max(1);
    let churn = Arc::new(Platform::new("churn", "Churn"));
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((TOTAL_ITEMS * readers) as u64));

    group.bench_function(format!("readers/{readers}"), |b| {
        b.iter_custom(|iters| {
            let barrier = Barrier::new(readers + 1);
            let start = Instant::now();
            scope(|s| {
                for _ in 0..readers {
                    let registry = &registry;
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        for _ in 0..iters {
                            for i in 0..TOTAL_ITEMS {
                                black_box(registry.get(&format!("p{i}")));
                            }
                        }
                    });
                }
                barrier.wait();
                for _ in 0..iters {
                    registry.register(Arc::clone(&churn));
                    registry.unregister(&churn);
                }
            });
            start.elapsed()
        });
    });

    group.finish();
}

fn populated_lock() -> LockRegistry<Platform> {
    LockRegistry::from_registrants(registrants(), LockTimeout::Blocking)
        .expect("bench registrants are unique")
}

fn populated_snapshot() -> SnapshotRegistry<Platform> {
    SnapshotRegistry::from_registrants(registrants()).expect("bench registrants are unique")
}

fn bench_lock_registry(c: &mut Criterion) {
    bench_register(c, "lock/bounded", LockRegistry::<Platform>::new);
    bench_register(c, "lock/blocking", || {
        LockRegistry::<Platform>::with_timeout(LockTimeout::Blocking)
    });
    bench_get(c, "lock/blocking", populated_lock());
    bench_threaded_reads(c, "lock/threaded", populated_lock());
}

fn bench_snapshot_registry(c: &mut Criterion) {
    bench_register(c, "snapshot", SnapshotRegistry::<Platform>::new);
    bench_get(c, "snapshot", populated_snapshot());
    bench_threaded_reads(c, "snapshot/threaded", populated_snapshot());
}

fn bench_frozen_registry(c: &mut Criterion) {
    let frozen = FrozenRegistry::new(registrants()).expect("bench registrants are unique");
    bench_get(c, "frozen", frozen);
}

criterion_group!(
    benches,
    bench_lock_registry,
    bench_snapshot_registry,
    bench_frozen_registry
);
criterion_main!(benches);
