use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;
use record_browser::data::RecordSet;
use record_browser::view::{apply, filter_and_sort, total_pages, GridViewState};

/// Print the filtered, sorted collection to stdout. With a page size the
/// output is the single page named by `state.page`; without one the whole
/// collection prints. This is the non-interactive escape hatch.
pub fn print_records(set: &RecordSet, state: &GridViewState, page_size: Option<usize>) {
    let (order, footer) = match page_size {
        Some(size) => {
            let view = apply(&set.records, &set.columns, state, size);
            let pages = total_pages(view.total_filtered, size);
            let footer = format!(
                "page {} of {} \u{2022} {} of {} records",
                view.page,
                pages,
                view.total_filtered,
                set.records.len()
            );
            (view.page_rows, footer)
        }
        None => {
            let order = filter_and_sort(&set.records, &set.columns, state);
            let footer = format!("{} of {} records", order.len(), set.records.len());
            (order, footer)
        }
    };

    if order.is_empty() {
        println!("{}", "No matching records.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        set.columns
            .iter()
            .map(|col| Cell::new(&col.header).add_attribute(Attribute::Bold)),
    );

    for &idx in &order {
        let record = &set.records[idx];
        table.add_row(set.columns.iter().map(|col| col.display_value(record)));
    }

    println!("{table}");
    println!("\n{}", footer.green());
}
