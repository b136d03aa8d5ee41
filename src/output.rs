use crate::error::{EncodingJsonSnafu, Result, WritingCsvSnafu, WritingFileSnafu};
use serde::Serialize;
use snafu::ResultExt;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let p = path.display().to_string();
    let mut wtr = csv::Writer::from_path(path).context(WritingCsvSnafu { path: &p })?;
    for r in rows {
        wtr.serialize(r).context(WritingCsvSnafu { path: &p })?;
    }
    wtr.flush().context(WritingFileSnafu { path: &p })?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let p = path.display().to_string();
    let s = serde_json::to_string_pretty(value).context(EncodingJsonSnafu { path: &p })?;
    std::fs::write(path, s).context(WritingFileSnafu { path: p })?;
    Ok(())
}

/// Markdown rendering of the first `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows, max_rows));
}
