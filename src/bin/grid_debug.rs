// Grid pipeline debug binary - exercises the view pipeline in isolation,
// without a terminal. Run with: cargo run --bin grid_debug

use record_browser::data::{CellValue, ColumnSpec, Record};
use record_browser::view::{apply, GridViewState, SortOrder, SortSpec};

fn sample_records() -> Vec<Record> {
    let rows = vec![
        (1, "Alice", 34, "Sales"),
        (2, "Bob", 28, "Marketing"),
        (3, "Charlie", 41, "Sales"),
        (4, "David", 35, "Engineering"),
        (5, "Eve", 29, "Marketing"),
        (6, "Frank", 52, "Sales"),
        (7, "Grace", 31, "Engineering"),
    ];
    rows.into_iter()
        .map(|(id, name, age, dept)| {
            let mut record = Record::new();
            record.set("id", CellValue::Integer(id));
            record.set("name", CellValue::String(name.to_string()));
            record.set("age", CellValue::Integer(age));
            record.set("dept", CellValue::String(dept.to_string()));
            record
        })
        .collect()
}

fn dump(label: &str, records: &[Record], columns: &[ColumnSpec], state: &GridViewState) {
    let view = apply(records, columns, state, 3);
    println!("{}", label);
    println!("────────────────────");
    println!(
        "  page {} of filtered {} (page size 3)",
        view.page, view.total_filtered
    );
    for idx in &view.page_rows {
        let record = &records[*idx];
        let cells: Vec<String> = columns.iter().map(|c| c.display_value(record)).collect();
        println!("  [{}] {}", idx, cells.join(" | "));
    }
    println!();
}

fn main() {
    let records = sample_records();
    let columns: Vec<ColumnSpec> = ["id", "name", "age", "dept"]
        .into_iter()
        .map(ColumnSpec::from_key)
        .collect();

    println!("=== Grid Pipeline Debug ===\n");

    let mut state = GridViewState::new();
    dump("Initial state", &records, &columns, &state);

    state.set_search("sales");
    dump("Search 'sales'", &records, &columns, &state);

    state.reset_query();
    state.toggle_sort("age");
    dump("Sort age ascending", &records, &columns, &state);

    state.toggle_sort("age");
    dump("Sort age descending", &records, &columns, &state);

    state.set_column_filter("dept", "eng");
    dump("Filter dept~eng (sort kept)", &records, &columns, &state);

    state.reset_query();
    state.sort = Some(SortSpec {
        key: "name".to_string(),
        order: SortOrder::Ascending,
    });
    state.set_page(3);
    dump("Page 3 by name", &records, &columns, &state);

    state.set_page(99);
    dump("Page 99 clamps", &records, &columns, &state);
}
