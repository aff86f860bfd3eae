// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for jazzgen
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Progression parsing and section expansion
//! - Bass, comping and drum generation
//! - MIDI file writing
//! - Overlay mixing on the master buffer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use jazzgen::audio::AudioBuffer;
use jazzgen::generators::{BassLineGenerator, CompingGenerator, DrumGenerator, GeneratorContext};
use jazzgen::render::{Score, SmfWriter};
use jazzgen::Progression;

const BLUES: &str = "*head\n\
    F7\nBb7 Bdim7\nF7\nCm7 F7\nBb7\nBdim7\nF7 D7\nAbm7 Db7\nGm7\nC7\nF7 D7\nGm7 C7\n\
    *chorus\n\
    **head\n\
    **head\n\
    **head\n";

/// Benchmark parsing and expansion
fn bench_progression(c: &mut Criterion) {
    c.bench_function("parse_blues", |b| {
        b.iter(|| black_box(Progression::parse(black_box(BLUES))))
    });

    let progression = Progression::parse(BLUES);
    c.bench_function("expand_blues", |b| {
        b.iter(|| black_box(progression.expand()))
    });
}

/// Benchmark the walking bass for growing forms
fn bench_bass(c: &mut Criterion) {
    let mut group = c.benchmark_group("bass_line");
    let generator = BassLineGenerator::new();

    for choruses in [1usize, 4, 16].iter() {
        let text = format!("*head\n{}\n{}", "F7\nBb7\nC7 F7", "**head\n".repeat(*choruses));
        let items = Progression::parse(&text).expand().unwrap_or_default();

        group.bench_with_input(BenchmarkId::new("choruses", choruses), &items, |b, items| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(generator.generate_line(items, &mut rng)))
        });
    }

    group.finish();
}

/// Benchmark comping voicings
fn bench_comping(c: &mut Criterion) {
    let items = Progression::parse(BLUES).expand().unwrap_or_default();
    let generator = CompingGenerator::new();

    c.bench_function("comping_blues", |b| {
        b.iter(|| black_box(generator.generate_voicings(black_box(&items))))
    });
}

/// Benchmark drum patterns
fn bench_drums(c: &mut Criterion) {
    let mut group = c.benchmark_group("drum_pattern");
    let generator = DrumGenerator::new();
    let context = GeneratorContext::default();

    for bars in [4u32, 32, 256].iter() {
        group.bench_with_input(BenchmarkId::new("bars", bars), bars, |b, &bars| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(generator.pattern(bars, &context, &mut rng)))
        });
    }

    group.finish();
}

/// Benchmark MIDI file encoding of a comping score
fn bench_smf(c: &mut Criterion) {
    let context = GeneratorContext::default();
    let items = Progression::parse(BLUES).expand().unwrap_or_default();
    let voicings = CompingGenerator::new().generate_voicings(&items);
    let score = Score::from_voicings(&voicings, &context);
    let writer = SmfWriter::new();

    c.bench_function("smf_comping", |b| {
        b.iter(|| black_box(writer.to_bytes(black_box(&score))))
    });
}

/// Benchmark overlay mixing (combiner core)
fn bench_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");
    let hit = AudioBuffer::silent(120, 44_100, 2).with_gain_db(0.0);

    for hits in [16u64, 128, 1024].iter() {
        group.bench_with_input(BenchmarkId::new("hits", hits), hits, |b, &hits| {
            b.iter_batched(
                || AudioBuffer::empty(44_100, 2),
                |mut master| {
                    for i in 0..hits {
                        let _ = master.overlay(&hit, i * 250);
                    }
                    black_box(master.duration_ms())
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_progression,
    bench_bass,
    bench_comping,
    bench_drums,
    bench_smf,
    bench_overlay,
);
criterion_main!(benches);
