//! Criterion benchmarks for the scoring and mitigation hot paths.
//!
//! Run with: `cargo bench -p stackscan-analysis --bench confidence_bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use stackscan_analysis::confidence::ConfidenceScoringEngine;
use stackscan_analysis::evidence::EvidenceStore;
use stackscan_analysis::mitigation::FalsePositiveMitigator;
use stackscan_analysis::pipeline::AnalysisPipeline;
use stackscan_core::types::evidence::{Evidence, EvidenceSource, EvidenceType};

// ---------------------------------------------------------------------------
// Fixture setup (outside the timed region)
// ---------------------------------------------------------------------------

/// Synthetic evidence for `technologies` technologies with `per_tech` items
/// each, mixing manifest, import, and AI evidence.
fn generate_evidence(technologies: usize, per_tech: usize) -> Vec<Evidence> {
    let mut items = Vec::with_capacity(technologies * per_tech);
    for t in 0..technologies {
        let name = format!("tech_{t}");
        for i in 0..per_tech {
            let mut e = match i % 3 {
                0 => {
                    let mut e = Evidence::new(
                        name.clone(),
                        EvidenceType::ManifestEntry,
                        EvidenceSource::ManifestParser,
                    );
                    e.details = Some("Version: 1.2.3".to_string());
                    e.confidence = 90.0;
                    e
                }
                1 => {
                    let mut e = Evidence::new(
                        name.clone(),
                        EvidenceType::ImportStatement,
                        EvidenceSource::ImportAnalyzer,
                    );
                    e.confidence = 80.0;
                    e
                }
                _ => {
                    let mut e = Evidence::new(
                        name.clone(),
                        EvidenceType::AiDetection,
                        EvidenceSource::AiModel,
                    );
                    e.confidence = 70.0;
                    e
                }
            };
            e.file_path = Some(format!("src/file_{}.ts", i % 10));
            e.line_number = Some(i as u32 + 1);
            items.push(e);
        }
    }
    items
}

// ---------------------------------------------------------------------------
// Scoring benchmarks
// ---------------------------------------------------------------------------

fn bench_confidence_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("confidence_scoring");

    for &(technologies, per_tech, label) in &[
        (10usize, 10usize, "small_10x10"),
        (100, 20, "medium_100x20"),
        (500, 50, "large_500x50"),
    ] {
        let items = generate_evidence(technologies, per_tech);
        group.throughput(Throughput::Elements(items.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("calculate_all", label),
            &items,
            |b, items| {
                b.iter(|| {
                    let mut engine = ConfidenceScoringEngine::new();
                    for e in items {
                        engine.add_evidence(&e.technology_name, e.clone());
                    }
                    engine.calculate_all_confidences()
                });
            },
        );
    }

    group.finish();
}

fn bench_mitigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mitigation");

    for &(technologies, per_tech, label) in &[
        (100usize, 20usize, "medium_100x20"),
        (500, 50, "large_500x50"),
    ] {
        let items = generate_evidence(technologies, per_tech);
        let mut store = EvidenceStore::new();
        for e in &items {
            store.add_evidence(e.clone());
        }
        group.throughput(Throughput::Elements(items.len() as u64));

        group.bench_with_input(BenchmarkId::new("mitigate", label), &store, |b, store| {
            b.iter(|| {
                let mut scorer = ConfidenceScoringEngine::new();
                for e in store.all_evidence() {
                    scorer.add_evidence(&e.technology_name, e.clone());
                }
                FalsePositiveMitigator::new().mitigate(store, &mut scorer)
            });
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(20);

    for &(technologies, per_tech, label) in &[
        (100usize, 20usize, "medium_100x20"),
        (500, 50, "large_500x50"),
    ] {
        let items = generate_evidence(technologies, per_tech);
        group.throughput(Throughput::Elements(items.len() as u64));

        group.bench_with_input(BenchmarkId::new("run", label), &items, |b, items| {
            b.iter(|| {
                let mut pipeline = AnalysisPipeline::new();
                for e in items {
                    pipeline.add_evidence(e.clone());
                }
                pipeline.run()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_confidence_scoring,
    bench_mitigation,
    bench_full_pipeline,
);
criterion_main!(benches);
