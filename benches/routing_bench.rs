//! Benchmarks for the routing and allocation hot paths.
//!
//! Benchmarks cover:
//! - Dijkstra from the entrance over square grids
//! - Alternate routes on the default lot
//! - Nearest free slot with most of the lot taken
//! - Booking commits through the in-memory backend
#![allow(missing_docs)]

use std::collections::HashSet;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use parking_allocator::builders::LotBuilder;
use parking_allocator::config::LotConfig;
use parking_allocator::core::{
    allocate_nearest, shortest_paths, BookingRequest, LotGraph, NodeKind, Position, SlotStatus,
    SlotStore,
};
use parking_allocator::infra::InMemoryBackend;
use parking_allocator::util::clock::HOUR_MS;

// ============================================================================
// Fixtures
// ============================================================================

/// `side` x `side` grid of slots fed by one entrance in the corner.
fn grid(side: usize) -> LotGraph {
    let mut g = LotGraph::new();
    g.add_node("ENTRANCE", NodeKind::Entrance, "Entrance", Position::default())
        .unwrap();
    for r in 0..side {
        for c in 0..side {
            let id = format!("S{}", r * side + c + 1);
            g.add_node(id, NodeKind::Slot, "slot", Position::new(c as f64, r as f64))
                .unwrap();
        }
    }
    g.add_edge("ENTRANCE", "S1", 1.0).unwrap();
    for r in 0..side {
        for c in 0..side {
            let here = format!("S{}", r * side + c + 1);
            if c + 1 < side {
                g.add_edge(&here, &format!("S{}", r * side + c + 2), 1.0 + (c % 3) as f64)
                    .unwrap();
            }
            if r + 1 < side {
                g.add_edge(&here, &format!("S{}", (r + 1) * side + c + 1), 2.0)
                    .unwrap();
            }
        }
    }
    g
}

// ============================================================================
// Routing
// ============================================================================

fn bench_shortest_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_paths_grid");
    for side in [3_usize, 10, 20] {
        let g = grid(side);
        group.throughput(Throughput::Elements(g.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &g, |b, g| {
            let excluded = HashSet::new();
            b.iter(|| black_box(shortest_paths(g, "ENTRANCE", &excluded).unwrap()));
        });
    }
    group.finish();
}

fn bench_alternate_routes(c: &mut Criterion) {
    let mut group = c.benchmark_group("alternate_routes_default_lot");
    let lot = LotBuilder::new(LotConfig::default()).build(0).unwrap();
    for k in [1_usize, 3, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| black_box(lot.get_alternate_routes("ENTRANCE", "S9", k).unwrap()));
        });
    }
    group.finish();
}

// ============================================================================
// Allocation and commits
// ============================================================================

fn bench_allocate_nearly_full(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_nearly_full");
    for side in [3_usize, 10, 20] {
        let g = grid(side);
        let ids = g.slot_ids();
        let store = SlotStore::open(&ids, Box::new(InMemoryBackend::new()), 0).unwrap();
        for id in &ids[..ids.len() - 1] {
            store.update_status(id, SlotStatus::Occupied, false, 0).unwrap();
        }
        let slots = store.snapshot();
        group.bench_with_input(BenchmarkId::from_parameter(side), &slots, |b, slots| {
            b.iter(|| black_box(allocate_nearest(&g, slots, "ENTRANCE").unwrap()));
        });
    }
    group.finish();
}

fn bench_book_cancel(c: &mut Criterion) {
    let lot = LotBuilder::new(LotConfig::default()).build(0).unwrap();
    c.bench_function("book_then_cancel", |b| {
        b.iter(|| {
            let request = BookingRequest {
                vehicle_type: "car".into(),
                vehicle_number: "ABC-1234".into(),
                start_ms: 0,
                end_ms: HOUR_MS,
                billed_hours: 1,
                cost: 50.0,
            };
            black_box(lot.book("S5", request, 0).unwrap());
            black_box(lot.cancel("S5", 1).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_shortest_paths,
    bench_alternate_routes,
    bench_allocate_nearly_full,
    bench_book_cancel
);
criterion_main!(benches);
