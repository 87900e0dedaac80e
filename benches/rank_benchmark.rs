//! Benchmarks for docrank ranking performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic spans and sections.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use docrank::model::{BoundingBox, RawSpan, Section};
use docrank::{HeadingDetector, ProfileAnalyzer, RelevanceScorer, SubsectionExtractor};

const BODY: &str = "Visit the old harbour at dawn to watch the fishing boats return. \
    Local markets open at 7 and sell fresh fish, olives and bread. \
    Groups of friends can book a shared table at one of the seafood restaurants.\n\n\
    The coastal path runs for 12 km between two beaches: plan half a day, \
    take water and explore the coves along the way.";

/// Creates spans for a document with the given number of pages.
fn create_spans(page_count: u32) -> Vec<RawSpan> {
    let mut spans = Vec::new();
    for page in 1..=page_count {
        let bbox = |y: f32| BoundingBox::new(50.0, y, 500.0, y + 12.0);
        spans.push(RawSpan::new(format!("Chapter {} Overview", page), 22.0, page, bbox(60.0)));
        spans.push(RawSpan::new("Things To Do", 16.0, page, bbox(120.0)).bold());
        for line in 0..30 {
            spans.push(RawSpan::new(
                format!("body text line {} on page {}", line, page),
                10.0,
                page,
                bbox(150.0 + line as f32 * 14.0),
            ));
        }
    }
    spans
}

fn create_sections(count: usize) -> Vec<Section> {
    (0..count)
        .map(|i| Section::new(format!("doc{}.pdf", i % 5), format!("Section {}", i), 1, BODY))
        .collect()
}

/// Benchmark heading detection at various sizes.
fn bench_heading_detection(c: &mut Criterion) {
    let detector = HeadingDetector::embedded().unwrap();
    let mut group = c.benchmark_group("heading_detection");

    for page_count in [1, 10, 50].iter() {
        let spans = create_spans(*page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| detector.detect(black_box(&spans)));
        });
    }

    group.finish();
}

/// Benchmark persona and task analysis.
fn bench_profile_analysis(c: &mut Criterion) {
    let analyzer = ProfileAnalyzer::embedded();
    c.bench_function("profile_analysis", |b| {
        b.iter(|| {
            analyzer.analyze(
                black_box("Travel Planner"),
                black_box("Plan a trip of 4 days for a group of 10 college friends"),
            )
        });
    });
}

/// Benchmark section scoring and excerpt extraction.
fn bench_ranking(c: &mut Criterion) {
    let profile = ProfileAnalyzer::embedded()
        .analyze("Travel Planner", "Plan a trip of 4 days for a group of friends");
    let scorer = RelevanceScorer::new();
    let extractor = SubsectionExtractor::default();
    let sections = create_sections(100);

    c.bench_function("rank_100_sections", |b| {
        b.iter(|| scorer.rank(black_box(&sections), &profile));
    });

    let ranked = scorer.rank(&sections, &profile);
    let selected = docrank::diversify(&ranked, Some(10));
    c.bench_function("extract_10_sections", |b| {
        b.iter(|| extractor.extract(black_box(&selected), &profile, 10));
    });
}

criterion_group!(
    benches,
    bench_heading_detection,
    bench_profile_analysis,
    bench_ranking,
);
criterion_main!(benches);
