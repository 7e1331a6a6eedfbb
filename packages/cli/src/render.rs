//! Plain-text rendering of extraction results.

use std::fmt::Write as _;

use idss_extract_models::{ExtractedTable, KeyValueRecord};

/// Renders every table as an aligned grid under its title.
pub fn tables(tables: &[ExtractedTable]) -> String {
    let mut out = String::new();
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_table(&mut out, table);
    }
    out
}

fn render_table(out: &mut String, table: &ExtractedTable) {
    writeln!(out, "== {} ==", table.title).unwrap();

    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0_usize; columns];
    for row in std::iter::once(&table.headers).chain(&table.rows) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &table.headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths);
    for row in &table.rows {
        write_row(out, row, &widths);
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map_or("", String::as_str);
            format!("{cell:<width$}")
        })
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(out, "{}", line.trim_end()).unwrap();
}

/// Renders the informative entries of a record as `label: value` lines.
pub fn record(record: &KeyValueRecord) -> String {
    let width = record
        .displayable()
        .map(|e| e.key.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for entry in record.displayable() {
        let label = format!("{}:", entry.key);
        writeln!(out, "{label:<w$} {}", entry.value, w = width + 1).unwrap();
    }
    out
}
