//! Routing benchmarks for Huddle.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huddle_core::{Hub, InboundMessage, Router};

/// Hub with one room holding `members` sessions, numbered from 0.
fn seated_hub(router: &mut Router, members: i64) -> Hub {
    let mut hub = Hub::new();
    let capacity = members + 1;
    router.route(
        &mut hub,
        &InboundMessage::new(0, 0, "s0", format!("/create Bench {capacity}")),
    );
    for session in 1..members {
        router.route(&mut hub, &InboundMessage::new(session, session, "s", "/join 0"));
    }
    hub
}

/// Benchmark broadcast fan-out by room size.
fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    for members in [2_i64, 10, 100, 1000] {
        let mut router = Router::seeded(0);
        let mut hub = seated_hub(&mut router, members);
        let msg = InboundMessage::new(0, 0, "s0", "hello everyone");

        group.throughput(Throughput::Elements(members as u64 - 1));
        group.bench_with_input(BenchmarkId::from_parameter(members), &members, |b, _| {
            b.iter(|| router.route(&mut hub, black_box(&msg)));
        });
    }

    group.finish();
}

/// Benchmark lobby commands that do not change state.
fn bench_lobby(c: &mut Criterion) {
    let mut group = c.benchmark_group("lobby");
    let mut router = Router::seeded(0);
    let mut hub = Hub::new();

    for session in 0..100 {
        router.route(
            &mut hub,
            &InboundMessage::new(session, session, "s", format!("/create room{session} 5")),
        );
    }

    let list = InboundMessage::new(0, 10_000, "x", "/list");
    group.bench_function("list_100_rooms", |b| {
        b.iter(|| router.route(&mut hub, black_box(&list)));
    });

    let chatter = InboundMessage::new(0, 10_000, "x", "what is this place");
    group.bench_function("chatter", |b| {
        b.iter(|| router.route(&mut hub, black_box(&chatter)));
    });

    group.finish();
}

/// Benchmark join then quit round trips.
fn bench_join_quit(c: &mut Criterion) {
    let mut router = Router::seeded(0);
    let mut hub = seated_hub(&mut router, 1);
    let join = InboundMessage::new(0, 99, "j", "/join 0");
    let quit = InboundMessage::new(0, 99, "j", "/quit");

    c.bench_function("join_quit", |b| {
        b.iter(|| {
            router.route(&mut hub, black_box(&join));
            router.route(&mut hub, black_box(&quit));
        });
    });
}

criterion_group!(benches, bench_broadcast, bench_lobby, bench_join_quit);
criterion_main!(benches);
