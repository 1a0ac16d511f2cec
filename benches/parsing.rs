//! Benchmarks for smsslicer streaming, aggregation and export.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench parsing -- aggregate`

use std::hint::black_box;
use std::io::Write;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use chrono::NaiveDate;
use smsslicer::Direction;
use smsslicer::core::output::{to_csv, to_txt};
use smsslicer::core::{Aggregator, ExportRecord, ExportRequest, Exporter};
use smsslicer::progress::no_progress;
use smsslicer::streaming::SmsReader;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_backup_xml(count: usize) -> String {
    let mut xml = String::with_capacity(count * 200);
    xml.push_str("<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>\n");
    xml.push_str(&format!("<smses count=\"{count}\">\n"));
    for i in 0..count {
        let address = format!("+1555{:07}", i % 50);
        let timestamp = 1_704_067_200_000_i64 + i as i64 * 60_000;
        let kind = if i % 3 == 0 { 2 } else { 1 };
        xml.push_str(&format!(
            "  <sms protocol=\"0\" address=\"{address}\" date=\"{timestamp}\" type=\"{kind}\" subject=\"null\" \
             body=\"Message number {i} with some &amp; entities\" read=\"1\" status=\"-1\" contact_name=\"Contact {}\" />\n",
            i % 50
        ));
    }
    xml.push_str("</smses>\n");
    xml
}

fn generate_records(count: usize) -> Vec<ExportRecord> {
    (0..count)
        .map(|i| ExportRecord {
            timestamp: format!("2024-01-{:02} {:02}:{:02}:00", i % 28 + 1, i % 24, i % 60),
            direction: if i % 2 == 0 { Direction::Sent } else { Direction::Received },
            body: format!("Message number {i}, with a comma"),
            raw_timestamp: i as i64,
        })
        .collect()
}

// =============================================================================
// Streaming
// =============================================================================

fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream");

    for size in SIZES {
        let xml = generate_backup_xml(size);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| {
                let reader = SmsReader::from_reader(xml.as_bytes(), xml.len() as u64, "bench.xml");
                black_box(reader.filter_map(Result::ok).count())
            });
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let aggregator = Aggregator::new();

    for size in SIZES {
        let xml = generate_backup_xml(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| {
                let reader = SmsReader::from_reader(xml.as_bytes(), xml.len() as u64, "bench.xml").skip_bodies();
                black_box(aggregator.aggregate_reader(reader, no_progress()).unwrap())
            });
        });
    }

    group.finish();
}

// =============================================================================
// Export
// =============================================================================

fn bench_export_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_collect");
    let exporter = Exporter::new();
    let request = ExportRequest::new(
        "+15550000007",
        NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
    );

    for size in SIZES {
        let mut file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        file.write_all(generate_backup_xml(size).as_bytes()).unwrap();
        file.flush().unwrap();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), file.path(), |b, path| {
            b.iter(|| black_box(exporter.collect(path, &request).unwrap()));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for size in SIZES {
        let records = generate_records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("csv", size), &records, |b, records| {
            b.iter(|| black_box(to_csv(records).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("txt", size), &records, |b, records| {
            b.iter(|| black_box(to_txt(records)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stream, bench_aggregate, bench_export_collect, bench_render);
criterion_main!(benches);
