//! Benchmarks for xml2table flattening performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks convert synthetic catalogs of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xml2table::{parser::parse_str, FlattenConfig, Flattener, RecordMode};

/// Creates a catalog with `book_count` books, each carrying `tag_count` tags.
fn create_catalog(book_count: usize, tag_count: usize) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><catalog>"#);

    for i in 0..book_count {
        xml.push_str(&format!(
            r#"<book id="{i}"><title>Book {i}</title><author><name>Author {i}</name></author><price>{}.99</price><tags>"#,
            i % 50
        ));
        for t in 0..tag_count {
            xml.push_str(&format!("<tag>tag{t}</tag>"));
        }
        xml.push_str("</tags><in_stock>true</in_stock></book>");
    }

    xml.push_str("</catalog>");
    xml
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_str");
    let config = FlattenConfig::default();

    for size in [10, 100, 1000] {
        let xml = create_catalog(size, 3);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| xml2table::convert_str(black_box(xml), &config).unwrap())
        });
    }

    group.finish();
}

fn bench_flatten_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for mode in [RecordMode::Root, RecordMode::RepeatedChildren] {
        let config = FlattenConfig::new().with_record_mode(mode);
        let root = parse_str(&create_catalog(500, 3), &config).unwrap();
        let flattener = Flattener::new(config);

        group.bench_function(format!("{:?}", mode), |b| {
            b.iter(|| flattener.flatten(black_box(&root)))
        });
    }

    group.finish();
}

fn bench_cartesian_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("cartesian");
    let config = FlattenConfig::default();

    for width in [4, 8, 16] {
        let mut xml = String::from("<r>");
        for group_name in ["x", "y", "z"] {
            for i in 0..width {
                xml.push_str(&format!("<{group_name}>{i}</{group_name}>"));
            }
        }
        xml.push_str("</r>");

        group.throughput(Throughput::Elements((width * width * width) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &xml, |b, xml| {
            b.iter(|| xml2table::convert_str(black_box(xml), &config).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convert, bench_flatten_only, bench_cartesian_growth);
criterion_main!(benches);
