#[cfg(test)]
mod grid_state_tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use record_browser::data::{CellValue, ColumnSpec, Record};
    use record_browser::ui::{DataGrid, GridAction};
    use record_browser::view::SortOrder;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                let mut record = Record::new();
                record.set("id", CellValue::Integer(i as i64));
                record.set("name", CellValue::String(format!("name{}", i)));
                record.set("group", CellValue::Integer((i % 3) as i64));
                record
            })
            .collect()
    }

    fn grid() -> DataGrid {
        let columns = vec![
            ColumnSpec::from_key("id"),
            ColumnSpec::from_key("name"),
            ColumnSpec::from_key("group"),
        ];
        DataGrid::new(columns, 5)
    }

    #[test]
    fn test_search_change_resets_page_but_sort_does_not() {
        let records = records(30);
        let mut grid = grid();

        grid.handle_key(key(KeyCode::PageDown), &records);
        assert_eq!(grid.state().page, 2);

        // Sorting stays on the current page.
        grid.handle_key(key(KeyCode::Char('s')), &records);
        assert_eq!(grid.state().page, 2);
        assert!(grid.state().sort.is_some());

        // A changed search snaps back to page 1.
        grid.set_search("name1");
        assert_eq!(grid.state().page, 1);
    }

    #[test]
    fn test_unchanged_search_keeps_page() {
        let records = records(30);
        let mut grid = grid();

        grid.set_search("name");
        grid.handle_key(key(KeyCode::PageDown), &records);
        assert_eq!(grid.state().page, 2);

        grid.set_search("name");
        assert_eq!(grid.state().page, 2);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let records = records(30);
        let mut grid = grid();

        grid.handle_key(key(KeyCode::PageDown), &records);
        grid.set_column_filter("group", "1");
        assert_eq!(grid.state().page, 1);

        let (filtered, _, _) = grid.view_summary(&records);
        assert_eq!(filtered, 10);
    }

    #[test]
    fn test_sort_cycle_never_returns_to_unsorted() {
        let records = records(10);
        let mut grid = grid();

        for expected in [
            SortOrder::Ascending,
            SortOrder::Descending,
            SortOrder::Ascending,
            SortOrder::Descending,
        ] {
            grid.handle_key(key(KeyCode::Char('s')), &records);
            let sort = grid.state().sort.as_ref().unwrap();
            assert_eq!(sort.key, "id");
            assert_eq!(sort.order, expected);
        }
    }

    #[test]
    fn test_switching_sort_column_starts_ascending() {
        let records = records(10);
        let mut grid = grid();

        grid.handle_key(key(KeyCode::Char('s')), &records);
        grid.handle_key(key(KeyCode::Char('s')), &records);
        assert_eq!(
            grid.state().sort.as_ref().map(|s| s.order),
            Some(SortOrder::Descending)
        );

        grid.handle_key(key(KeyCode::Right), &records);
        grid.handle_key(key(KeyCode::Char('s')), &records);
        let sort = grid.state().sort.as_ref().unwrap();
        assert_eq!(sort.key, "name");
        assert_eq!(sort.order, SortOrder::Ascending);
    }

    #[test]
    fn test_reset_query_keeps_sort() {
        let records = records(30);
        let mut grid = grid();

        grid.set_search("name2");
        grid.set_column_filter("group", "2");
        grid.handle_key(key(KeyCode::Char('s')), &records);

        grid.handle_key(key(KeyCode::Char('c')), &records);
        assert!(grid.state().search_text.is_empty());
        assert!(grid.state().column_filters.is_empty());
        assert!(grid.state().sort.is_some());
    }

    #[test]
    fn test_sorted_filtered_page_activation() {
        let records = records(30);
        let mut grid = grid();

        // group 1 holds ids 1, 4, 7, ..., 28; descending by id, page 2
        // starts at the sixth entry (id 13).
        grid.set_column_filter("group", "1");
        grid.set_sort("id", SortOrder::Descending);
        grid.handle_key(key(KeyCode::PageDown), &records);

        assert_eq!(
            grid.handle_key(key(KeyCode::Enter), &records),
            GridAction::RowActivated(13)
        );
    }

    #[test]
    fn test_operations_on_ghost_column_never_panic() {
        let records = records(5);
        let columns = vec![ColumnSpec::from_key("id"), ColumnSpec::from_key("ghost")];
        let mut grid = DataGrid::new(columns, 5);

        grid.handle_key(key(KeyCode::Right), &records);
        grid.handle_key(key(KeyCode::Char('s')), &records);
        grid.set_column_filter("ghost", "");
        grid.set_search("");
        let (filtered, page, pages) = grid.view_summary(&records);
        assert_eq!(filtered, 5);
        assert_eq!(page, 1);
        assert_eq!(pages, 1);

        // Every record lacks the key, so they tie and keep input order.
        assert_eq!(
            grid.handle_key(key(KeyCode::Enter), &records),
            GridAction::RowActivated(0)
        );
    }
}
