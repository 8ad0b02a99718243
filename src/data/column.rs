use crate::data::record::{CellValue, Record};

/// How one column of the grid is extracted, labeled, and rendered.
///
/// `key` addresses a field in each record; records missing the key display
/// as empty cells. When a `render` hook is present it is the sole authority
/// for the displayed text, otherwise the raw value is stringified.
#[derive(Clone)]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    pub filterable: bool,
    pub render: Option<fn(&CellValue, &Record) -> String>,
    /// Fixed display width in terminal cells; auto-sized when absent.
    pub width: Option<u16>,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: true,
            filterable: true,
            render: None,
            width: None,
        }
    }

    /// Column whose header is the key itself.
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let header = key.clone();
        Self::new(key, header)
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn with_render(mut self, render: fn(&CellValue, &Record) -> String) -> Self {
        self.render = Some(render);
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Displayed text for this column's cell in `record`.
    pub fn display_value(&self, record: &Record) -> String {
        match self.render {
            Some(render) => {
                let value = record.get(&self.key).cloned().unwrap_or(CellValue::Null);
                render(&value, record)
            }
            None => record.display_value(&self.key),
        }
    }
}

impl std::fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("render", &self.render.map(|_| "fn"))
            .field("width", &self.width)
            .finish()
    }
}

/// Derive column specs from the records themselves: the union of keys over
/// all records, sorted so the order is stable, headers equal to keys.
pub fn columns_from_records(records: &[Record]) -> Vec<ColumnSpec> {
    let mut seen: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !seen.iter().any(|k| k == key) {
                seen.push(key.clone());
            }
        }
    }
    seen.sort();
    seen.into_iter().map(ColumnSpec::from_key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value_uses_render_hook() {
        let mut record = Record::new();
        record.set("age", CellValue::Integer(42));

        let plain = ColumnSpec::new("age", "Age");
        assert_eq!(plain.display_value(&record), "42");

        let rendered = ColumnSpec::new("age", "Age").with_render(|v, _| format!("{} yrs", v));
        assert_eq!(rendered.display_value(&record), "42 yrs");
    }

    #[test]
    fn test_render_hook_sees_missing_value_as_null() {
        let record = Record::new();
        let col = ColumnSpec::new("ghost", "Ghost").with_render(|v, _| match v {
            CellValue::Null => "(none)".to_string(),
            other => other.to_string(),
        });
        assert_eq!(col.display_value(&record), "(none)");
    }

    #[test]
    fn test_columns_from_records_key_union() {
        let mut a = Record::new();
        a.set("id", CellValue::Integer(1));
        a.set("name", CellValue::String("x".into()));
        let mut b = Record::new();
        b.set("id", CellValue::Integer(2));
        b.set("extra", CellValue::Boolean(true));

        let columns = columns_from_records(&[a, b]);
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"id"));
        assert!(keys.contains(&"name"));
        assert!(keys.contains(&"extra"));
    }
}
