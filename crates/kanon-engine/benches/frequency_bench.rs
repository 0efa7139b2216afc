//! Frequency set benchmarks: full scan vs. derivation from a parent set.
//!
//! Run with: cargo bench -p kanon-engine --bench frequency_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kanon_core::types::HierarchyKind;
use kanon_engine::{FrequencySet, HierarchyAutoBuilder, HierarchySet, MemoryDataset};

const CITIES: [&str; 8] = ["Athens", "Berlin", "Lima", "Oslo", "Paris", "Rome", "Tokyo", "NaN"];

/// Deterministic synthetic table with `rows` rows and three quasi-identifiers.
fn create_dataset(rows: usize) -> (MemoryDataset, HierarchySet) {
    let ages = (0..rows).map(|i| 18.0 + ((i * 7) % 70) as f64);
    let cities = (0..rows).map(|i| CITIES[(i * 13) % CITIES.len()]);
    let incomes = (0..rows).map(|i| ((i * 31) % 200) as f64 * 500.0);
    let dataset = MemoryDataset::builder()
        .numeric_column("age", ages.collect::<Vec<_>>())
        .text_column("city", cities.collect::<Vec<_>>())
        .numeric_column("income", incomes.collect::<Vec<_>>())
        .build()
        .unwrap();

    let kinds = [HierarchyKind::Distinct, HierarchyKind::Distinct, HierarchyKind::Range];
    let hierarchies = kinds
        .iter()
        .enumerate()
        .map(|(column, &kind)| {
            let tree = HierarchyAutoBuilder::new(format!("c{column}"), 2)
                .with_kind(kind)
                .build_for_column(&dataset, column)
                .unwrap();
            (column, tree)
        })
        .collect();
    (dataset, hierarchies)
}

fn frequency_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("frequency_set");
    group.sample_size(20);
    let qi = [0, 1, 2];
    let parent = [1u32, 0, 1];
    let child = [2u32, 1, 2];

    for rows in [10_000, 100_000] {
        let (dataset, hierarchies) = create_dataset(rows);
        let parent_set = FrequencySet::compute(&dataset, &parent, &hierarchies, &qi).unwrap();

        group.bench_with_input(BenchmarkId::new("scan", rows), &rows, |b, _| {
            b.iter(|| FrequencySet::compute(&dataset, &child, &hierarchies, &qi).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("incremental", rows), &rows, |b, _| {
            b.iter(|| {
                FrequencySet::compute_from_parent(&child, &parent, &parent_set, &hierarchies, &qi).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, frequency_paths);
criterion_main!(benches);
