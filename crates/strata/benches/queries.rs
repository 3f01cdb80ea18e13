//! Benchmarks for index build, blast radius, path finding and filter toggles.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use strata::{Edge, EdgeType, Engine, GraphSnapshot, Node, NodeType};

const LAYER_WIDTH: usize = 50;
const LAYERS: usize = 8;

/// Layered warehouse: each node feeds three nodes of the next layer.
///
/// 400 nodes and ~1050 edges, enough to count as dense with default settings.
fn layered_snapshot() -> GraphSnapshot {
    let node_types = [NodeType::Table, NodeType::View, NodeType::Query, NodeType::Procedure];
    let edge_types = [
        EdgeType::ForeignKey,
        EdgeType::Select,
        EdgeType::Insert,
        EdgeType::Update,
        EdgeType::Call,
    ];

    let mut nodes = Vec::with_capacity(LAYERS * LAYER_WIDTH);
    let mut edges = Vec::new();
    for layer in 0..LAYERS {
        for slot in 0..LAYER_WIDTH {
            let id = format!("l{layer}_n{slot}");
            nodes.push(
                Node::new(id.clone(), id, node_types[layer % node_types.len()])
                    .with_quality_score(f64::from(u32::try_from(slot % 100).unwrap_or(0))),
            );
            if layer + 1 < LAYERS {
                for step in 0..3 {
                    let target = (slot * 7 + step * 13) % LAYER_WIDTH;
                    edges.push(Edge::new(
                        format!("l{layer}_n{slot}"),
                        format!("l{}_n{target}", layer + 1),
                        edge_types[(slot + step) % edge_types.len()],
                    ));
                }
            }
        }
    }
    GraphSnapshot::new(nodes, edges)
}

fn bench_build(c: &mut Criterion) {
    let snapshot = layered_snapshot();

    c.bench_function("engine_build_400_nodes", |b| {
        b.iter(|| Engine::new(black_box(snapshot.clone())));
    });
}

fn bench_blast_radius(c: &mut Criterion) {
    let engine = Engine::new(layered_snapshot());

    c.bench_function("blast_radius_default_cutoff", |b| {
        b.iter(|| engine.blast_radius(black_box("l0_n0"), None, None));
    });
    c.bench_function("blast_radius_max_cutoff", |b| {
        b.iter(|| engine.blast_radius(black_box("l0_n0"), Some(120), Some(12)));
    });
}

fn bench_find_path(c: &mut Criterion) {
    let engine = Engine::new(layered_snapshot());

    c.bench_function("find_path_by_id", |b| {
        b.iter(|| engine.find_path(black_box("l0_n0"), black_box("l7_n21"), Some(20)));
    });
    c.bench_function("find_path_by_label_fragment", |b| {
        b.iter(|| engine.find_path(black_box("l0_n0"), black_box("7_n49"), Some(20)));
    });
}

fn bench_toggle(c: &mut Criterion) {
    let mut engine = Engine::new(layered_snapshot());

    c.bench_function("toggle_select_twice", |b| {
        b.iter(|| {
            engine.toggle_edge_type(EdgeType::Select);
            engine.toggle_edge_type(EdgeType::Select);
        });
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_blast_radius,
    bench_find_path,
    bench_toggle
);
criterion_main!(benches);
