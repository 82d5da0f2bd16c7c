//! Benchmarks for line index operations.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lindex_buffer::{EditNotification, GapSequence, TextEngine, Utf8Text};
use lindex_core::{Document, DocumentConfig, LineIndex};

/// Generates a text of `lines` lines, every tenth one holding non-ASCII text.
fn generate_text(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            if i % 10 == 0 {
                format!("Line {}: prix 12€, naïve café 😀\n", i)
            } else {
                format!("Line {}: This is a sample line of text for benchmarking.\n", i)
            }
        })
        .collect()
}

fn unchecked() -> DocumentConfig {
    DocumentConfig {
        verify_after_edit: false,
        ..DocumentConfig::default()
    }
}

/// Benchmarks a full rebuild.
fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");

    for size in [100, 1000, 10000, 100000].iter() {
        let text = Utf8Text::from(generate_text(*size));

        group.bench_with_input(BenchmarkId::new("rebuild_line_data", size), &text, |b, text| {
            let mut index = LineIndex::new();
            b.iter(|| {
                index.rebuild_line_data(black_box(text));
                black_box(index.count())
            })
        });
    }

    group.finish();
}

/// Benchmarks keystroke-style editing through a `Document`.
///
/// `Utf8Text::insert` shifts every later line start, so these timings are
/// dominated by the reference engine. `index_only_same_line` times the index alone.
fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");

    let base_text = generate_text(10000);

    group.bench_function("type_100_chars_mid_document", |b| {
        b.iter_with_setup(
            || Document::with_text(Utf8Text::from(base_text.as_str()), unchecked()),
            |mut doc| {
                let start = doc.index().char_position_from_line(5000) + 4;
                for i in 0..100 {
                    doc.insert(start + i, black_box("x")).unwrap();
                }
                black_box(doc)
            },
        )
    });

    group.bench_function("type_50_newlines_mid_document", |b| {
        b.iter_with_setup(
            || Document::with_text(Utf8Text::from(base_text.as_str()), unchecked()),
            |mut doc| {
                let start = doc.index().char_position_from_line(5000);
                for i in 0..50 {
                    doc.insert(start + 2 * i, black_box("y\n")).unwrap();
                }
                black_box(doc)
            },
        )
    });

    group.bench_function("alternate_start_and_end", |b| {
        b.iter_with_setup(
            || Document::with_text(Utf8Text::from(base_text.as_str()), unchecked()),
            |mut doc| {
                for _ in 0..10 {
                    doc.insert(0, black_box("a")).unwrap();
                    let end = doc.index().text_length();
                    doc.insert(end, black_box("z")).unwrap();
                }
                black_box(doc)
            },
        )
    });

    // Same-line keystroke notifications replayed against a fixed engine.
    group.bench_function("index_only_same_line", |b| {
        let text = Utf8Text::from(base_text.as_str());
        let at = text.byte_start_of_line(5000) + 4;
        let note = EditNotification::insert(at, b"x".as_slice(), 0);
        b.iter_with_setup(
            || {
                let mut index = LineIndex::new();
                index.rebuild_line_data(&text);
                index
            },
            |mut index| {
                for _ in 0..100 {
                    index.on_edit(&text, black_box(&note));
                }
                black_box(index)
            },
        )
    });

    group.finish();
}

/// Benchmarks position conversion.
fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    let text = Utf8Text::from(generate_text(100000));
    let mut index = LineIndex::new();
    index.rebuild_line_data(&text);
    let mid = index.text_length() / 2;
    let mid_byte = text.total_byte_length() / 2;

    group.bench_function("line_from_char_position", |b| {
        b.iter(|| black_box(index.line_from_char_position(black_box(mid))))
    });

    group.bench_function("char_to_wide_byte_position", |b| {
        b.iter(|| black_box(index.char_to_wide_byte_position(&text, black_box(mid))))
    });

    group.bench_function("byte_to_char_position", |b| {
        b.iter(|| black_box(index.byte_to_char_position(&text, black_box(mid_byte))))
    });

    group.finish();
}

/// Benchmarks the gap sequence on its own.
fn bench_gap_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap_sequence");

    group.bench_function("clustered_inserts", |b| {
        b.iter(|| {
            let mut seq: GapSequence<u64> = (0..10_000).collect();
            for i in 0..1_000 {
                seq.insert(5_000 + i as usize, i);
            }
            black_box(seq.len())
        })
    });

    group.bench_function("scattered_inserts", |b| {
        b.iter(|| {
            let mut seq: GapSequence<u64> = (0..10_000).collect();
            for i in 0..1_000u64 {
                let at = ((i * 7_919) % 10_000) as usize;
                seq.insert(at, i);
            }
            black_box(seq.len())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rebuild,
    bench_typing,
    bench_conversion,
    bench_gap_sequence,
);

criterion_main!(benches);
