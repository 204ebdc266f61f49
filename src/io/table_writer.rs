use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use indexmap::{IndexMap, IndexSet};
use log::info;
use thiserror::Error;

use crate::progress::Progress;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("could not create {path}")]
    Create { path: PathBuf, #[source] source: std::io::Error },
    #[error("could not write table")]
    Write(#[from] std::io::Error),
    #[error("could not write table row")]
    Csv(#[from] csv::Error)
}

/**
 * A record that can be written as one table row, as (column, cell) pairs.
 */
pub trait TableRow {
    fn cells(&self) -> Vec<(String, String)>;
}

pub fn write_table<T: TableRow>(rows: &[T], file_path: &Path) -> Result<(), TableError> {
    info!("----------Writing {}", file_path.display());
    let file = File::create(file_path).map_err(|source| TableError::Create { path: file_path.to_path_buf(), source })?;
    write_table_to(rows, BufWriter::new(file))
}

/**
 * Writes a `#`-prefixed header followed by one comma separated row per record.
 * Columns are the union over all rows in first-seen order; cells a row lacks are left empty.
 */
pub fn write_table_to<T: TableRow, W: Write>(rows: &[T], mut writer: W) -> Result<(), TableError> {
    let progress = Progress::new("Writing frame", 1000);
    let row_cells = rows.iter().map(|row| row.cells().into_iter().collect::<IndexMap<String, String>>()).collect::<Vec<IndexMap<String, String>>>();
    let columns = row_cells.iter().flat_map(|cells| cells.keys().cloned()).collect::<IndexSet<String>>();

    if !columns.is_empty() {
        writeln!(writer, "#{}", columns.iter().map(|c| c.as_str()).collect::<Vec<&str>>().join(", "))?;
    }

    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    let row_count = row_cells.len();
    for (row_index, cells) in row_cells.iter().enumerate() {
        progress.tick(row_index, Some(row_count));
        csv.write_record(columns.iter().map(|c| cells.get(c).map(|v| v.as_str()).unwrap_or("")))?;
    }
    csv.flush()?;

    info!("Write time (s): {:.1}", progress.finish());
    Ok(())
}
