use criterion::{black_box, criterion_group, criterion_main, Criterion};
use record_browser::data::{CellValue, ColumnSpec, Record};
use record_browser::text::format;
use record_browser::view::{apply, GridViewState, SortOrder, SortSpec};

fn create_test_records(rows: usize) -> Vec<Record> {
    let depts = [
        "Cardiology",
        "Neurology",
        "Oncology",
        "Pediatrics",
        "Radiology",
        "General Practice",
    ];
    (0..rows)
        .map(|i| {
            let mut record = Record::new();
            record.set("id", CellValue::Integer(i as i64));
            record.set("name", CellValue::String(format!("Patient {}", i)));
            record.set("age", CellValue::Integer(20 + (i as i64 * 7) % 70));
            record.set(
                "dept",
                CellValue::String(depts[i % depts.len()].to_string()),
            );
            record.set("score", CellValue::Float((i as f64 * 0.37) % 100.0));
            record
        })
        .collect()
}

fn columns() -> Vec<ColumnSpec> {
    ["id", "name", "age", "dept", "score"]
        .into_iter()
        .map(ColumnSpec::from_key)
        .collect()
}

fn benchmark_pipeline(c: &mut Criterion) {
    let records_10k = create_test_records(10_000);
    let records_50k = create_test_records(50_000);
    let columns = columns();

    let mut group = c.benchmark_group("view_pipeline");

    group.bench_function("search_10k", |b| {
        let mut state = GridViewState::new();
        state.set_search("cardio");
        b.iter(|| apply(black_box(&records_10k), &columns, &state, 20));
    });

    group.bench_function("search_50k", |b| {
        let mut state = GridViewState::new();
        state.set_search("cardio");
        b.iter(|| apply(black_box(&records_50k), &columns, &state, 20));
    });

    group.bench_function("sort_numeric_50k", |b| {
        let mut state = GridViewState::new();
        state.sort = Some(SortSpec {
            key: "score".to_string(),
            order: SortOrder::Ascending,
        });
        b.iter(|| apply(black_box(&records_50k), &columns, &state, 20));
    });

    group.bench_function("search_sort_paginate_50k", |b| {
        let mut state = GridViewState::new();
        state.set_search("patient 1");
        state.sort = Some(SortSpec {
            key: "age".to_string(),
            order: SortOrder::Descending,
        });
        state.set_page(3);
        b.iter(|| apply(black_box(&records_50k), &columns, &state, 20));
    });

    group.finish();
}

fn benchmark_formatter(c: &mut Criterion) {
    // A representative generated-analysis shape: headers, bullets, and
    // numbered items with inline emphasis.
    let mut doc = String::new();
    for section in 0..50 {
        doc.push_str(&format!("**Section {}**\n\n", section));
        doc.push_str("A paragraph with **bold** and *italic* inline runs.\n");
        for item in 0..5 {
            doc.push_str(&format!("* bullet item {}\n", item));
            doc.push_str("  * nested detail\n");
        }
        doc.push_str("1. first follow-up\n2. second follow-up\n\n");
    }

    c.bench_function("format_analysis_doc", |b| {
        b.iter(|| format(black_box(&doc)));
    });
}

criterion_group!(benches, benchmark_pipeline, benchmark_formatter);
criterion_main!(benches);
